//! 扩展点 HTTP 流程测试
//!
//! 使用内存仓储驱动完整路由，无需外部依赖

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Utc;
use http_body_util::BodyExt;
use loyalty_service::{
    LoyaltyError, LoyaltyRecord, LoyaltyRepositoryTrait, LoyaltyService, PriceFormat,
    StorefrontExtension, routes, state::AppState,
};
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tower::ServiceExt;

// ==================== 内存仓储 ====================

#[derive(Default)]
struct InMemoryLoyaltyRepository {
    rows: RwLock<HashMap<i64, LoyaltyRecord>>,
    lookups: AtomicUsize,
    fail_reads: bool,
}

impl InMemoryLoyaltyRepository {
    fn failing() -> Self {
        Self {
            fail_reads: true,
            ..Default::default()
        }
    }

    async fn seed(&self, user_id: i64, points: i32) {
        self.rows.write().await.insert(
            user_id,
            LoyaltyRecord {
                user_id,
                points,
                last_updated: Utc::now(),
            },
        );
    }

    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LoyaltyRepositoryTrait for InMemoryLoyaltyRepository {
    async fn find_by_user(&self, user_id: i64) -> loyalty_service::Result<Option<LoyaltyRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(LoyaltyError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.rows.read().await.get(&user_id).cloned())
    }

    async fn upsert(&self, user_id: i64, points: i32) -> loyalty_service::Result<LoyaltyRecord> {
        let record = LoyaltyRecord {
            user_id,
            points,
            last_updated: Utc::now(),
        };
        self.rows.write().await.insert(user_id, record.clone());
        Ok(record)
    }
}

// ==================== 测试辅助 ====================

fn create_test_app(repo: Arc<InMemoryLoyaltyRepository>, notice: Option<&str>) -> Router {
    let repo: Arc<dyn LoyaltyRepositoryTrait> = repo;
    let loyalty = Arc::new(LoyaltyService::new(repo));
    let extension = StorefrontExtension::new(loyalty, PriceFormat::default())
        .with_product_notice(notice.map(String::from));
    routes::router(AppState::new(Arc::new(extension)))
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn shopper(user_id: i64) -> Value {
    json!({ "userId": user_id })
}

fn administrator(user_id: i64) -> Value {
    json!({ "userId": user_id, "backOffice": true, "capabilities": ["edit_users"] })
}

// ==================== 会员价 ====================

#[tokio::test]
async fn test_member_sees_discounted_price() {
    let repo = Arc::new(InMemoryLoyaltyRepository::default());
    repo.seed(42, 50).await;
    let app = create_test_app(repo.clone(), None);

    let (status, body) = post_json(
        &app,
        "/api/hooks/price",
        json!({ "caller": shopper(42), "productId": 1, "basePrice": "100.00" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["price"], "90.00");
    assert_eq!(body["data"]["discounted"], true);

    let (_, body) = post_json(
        &app,
        "/api/hooks/price-html",
        json!({
            "caller": shopper(42),
            "productId": 1,
            "basePrice": "100.00",
            "defaultHtml": "<span>100.00</span>"
        }),
    )
    .await;

    assert_eq!(body["data"]["text"], "Before: 100.00 / Your Price: 90.00");
    assert_eq!(
        body["data"]["html"],
        "<del>Before: 100.00</del> / <strong>Your Price: 90.00</strong>"
    );
}

#[tokio::test]
async fn test_non_member_pays_base_price() {
    let repo = Arc::new(InMemoryLoyaltyRepository::default());
    let app = create_test_app(repo, None);

    let (_, body) = post_json(
        &app,
        "/api/hooks/price-html",
        json!({
            "caller": shopper(7),
            "basePrice": "100.00",
            "defaultHtml": "<span>100.00</span>"
        }),
    )
    .await;

    assert_eq!(body["data"]["html"], "<span>100.00</span>");
    assert_eq!(body["data"]["discounted"], false);
}

#[tokio::test]
async fn test_back_office_and_anonymous_skip_lookup() {
    let repo = Arc::new(InMemoryLoyaltyRepository::default());
    repo.seed(1, 500).await;
    let app = create_test_app(repo.clone(), None);

    let (_, admin) = post_json(
        &app,
        "/api/hooks/price",
        json!({ "caller": administrator(1), "basePrice": "100.00" }),
    )
    .await;
    let (_, anonymous) = post_json(
        &app,
        "/api/hooks/price",
        json!({ "basePrice": "100.00" }),
    )
    .await;

    assert_eq!(admin["data"]["price"], "100.00");
    assert_eq!(anonymous["data"]["price"], "100.00");
    assert_eq!(repo.lookups(), 0);
}

#[tokio::test]
async fn test_catalog_resolves_status_once() {
    let repo = Arc::new(InMemoryLoyaltyRepository::default());
    repo.seed(42, 10).await;
    let app = create_test_app(repo.clone(), None);

    let (status, body) = post_json(
        &app,
        "/api/hooks/prices",
        json!({
            "caller": shopper(42),
            "products": [
                { "productId": 1, "basePrice": "100.00" },
                { "productId": 2, "basePrice": "19.99" },
                { "productId": 3, "basePrice": "10" }
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["price"], "90.00");
    assert_eq!(items[1]["price"], "17.99");
    assert_eq!(items[2]["price"], "9.00");
    assert_eq!(repo.lookups(), 1);
}

#[tokio::test]
async fn test_store_failure_degrades_to_base_price() {
    let repo = Arc::new(InMemoryLoyaltyRepository::failing());
    let app = create_test_app(repo, None);

    let (status, body) = post_json(
        &app,
        "/api/hooks/price",
        json!({ "caller": shopper(42), "basePrice": "100.00" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], "100.00");
    assert_eq!(body["data"]["discounted"], false);
}

#[tokio::test]
async fn test_negative_price_rejected() {
    let app = create_test_app(Arc::new(InMemoryLoyaltyRepository::default()), None);

    let (status, body) = post_json(
        &app,
        "/api/hooks/price",
        json!({ "caller": shopper(42), "basePrice": "-5.00" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// ==================== 刻字 ====================

#[tokio::test]
async fn test_engraving_flows_from_cart_to_order() {
    let app = create_test_app(Arc::new(InMemoryLoyaltyRepository::default()), None);

    let (status, body) = post_json(
        &app,
        "/api/hooks/cart-item",
        json!({
            "cartItem": { "productId": 55, "quantity": 1 },
            "engraving": "Happy Birthday!"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let cart_item = body["data"]["cartItem"].clone();
    assert_eq!(cart_item["engraving"], "Happy Birthday!");

    let (_, summary) = post_json(
        &app,
        "/api/hooks/cart-item/summary",
        json!({ "cartItem": cart_item.clone() }),
    )
    .await;
    assert_eq!(
        summary["data"]["rows"],
        json!([{ "label": "Engraving", "value": "Happy Birthday!" }])
    );

    let (_, order) = post_json(
        &app,
        "/api/hooks/order-item",
        json!({
            "cartItem": cart_item,
            "orderItem": { "itemId": 700, "productId": 55, "quantity": 1 }
        }),
    )
    .await;
    assert_eq!(
        order["data"]["orderItem"]["meta"],
        json!([{ "key": "engraving", "value": "Happy Birthday!" }])
    );
    assert_eq!(order["data"]["metaDisplay"], json!(["Engraving: Happy Birthday!"]));
}

#[tokio::test]
async fn test_engraving_is_sanitized_and_truncated() {
    let app = create_test_app(Arc::new(InMemoryLoyaltyRepository::default()), None);
    let long_text = format!("<b>{}</b>", "a".repeat(80));

    let (_, body) = post_json(
        &app,
        "/api/hooks/cart-item",
        json!({ "cartItem": { "productId": 1, "quantity": 1 }, "engraving": long_text }),
    )
    .await;

    assert_eq!(body["data"]["cartItem"]["engraving"], "a".repeat(50));
}

#[tokio::test]
async fn test_blank_engraving_is_not_recorded() {
    let app = create_test_app(Arc::new(InMemoryLoyaltyRepository::default()), None);

    let (_, body) = post_json(
        &app,
        "/api/hooks/cart-item",
        json!({ "cartItem": { "productId": 1, "quantity": 2 }, "engraving": "   " }),
    )
    .await;
    assert!(body["data"]["cartItem"].get("engraving").is_none());

    let (_, summary) = post_json(
        &app,
        "/api/hooks/cart-item/summary",
        json!({ "cartItem": body["data"]["cartItem"].clone() }),
    )
    .await;
    assert_eq!(summary["data"]["rows"], json!([]));
}

#[tokio::test]
async fn test_non_string_engraving_treated_as_absent() {
    let app = create_test_app(Arc::new(InMemoryLoyaltyRepository::default()), None);

    let (status, body) = post_json(
        &app,
        "/api/hooks/cart-item",
        json!({ "cartItem": { "productId": 1, "quantity": 1 }, "engraving": 12345 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["cartItem"]["productId"], 1);
    assert!(body["data"]["cartItem"].get("engraving").is_none());
}

// ==================== 用户资料与我的账户 ====================

#[tokio::test]
async fn test_admin_sets_points_then_reads_back() {
    let repo = Arc::new(InMemoryLoyaltyRepository::default());
    let app = create_test_app(repo, None);

    let (_, saved) = post_json(
        &app,
        "/api/hooks/profile/save",
        json!({ "caller": administrator(1), "userId": 42, "loyaltyPoints": "120" }),
    )
    .await;
    assert_eq!(saved["data"]["updated"], true);
    assert_eq!(saved["data"]["points"], 120);

    let (_, viewed) = post_json(
        &app,
        "/api/hooks/profile/view",
        json!({ "caller": administrator(1), "userId": 42 }),
    )
    .await;
    assert_eq!(viewed["data"]["member"], true);
    assert_eq!(viewed["data"]["points"], 120);

    let (_, dashboard) = post_json(&app, "/api/hooks/dashboard", json!({ "caller": shopper(42) })).await;
    assert_eq!(dashboard["data"]["message"], "You have 120 loyalty points.");
}

#[tokio::test]
async fn test_shopper_cannot_change_own_points() {
    let repo = Arc::new(InMemoryLoyaltyRepository::default());
    repo.seed(42, 10).await;
    let app = create_test_app(repo.clone(), None);

    let (status, saved) = post_json(
        &app,
        "/api/hooks/profile/save",
        json!({ "caller": shopper(42), "userId": 42, "loyaltyPoints": "9999" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["data"]["updated"], false);
    assert_eq!(saved["data"]["declinedReason"], "missing_capability");

    let (_, viewed) = post_json(
        &app,
        "/api/hooks/profile/view",
        json!({ "caller": shopper(42), "userId": 42 }),
    )
    .await;
    assert_eq!(viewed["data"]["points"], 10);
}

#[tokio::test]
async fn test_profile_view_of_other_user_forbidden() {
    let app = create_test_app(Arc::new(InMemoryLoyaltyRepository::default()), None);

    let (status, body) = post_json(
        &app,
        "/api/hooks/profile/view",
        json!({ "caller": shopper(5), "userId": 6 }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_dashboard_for_non_member_and_anonymous() {
    let app = create_test_app(Arc::new(InMemoryLoyaltyRepository::default()), None);

    let (_, body) = post_json(&app, "/api/hooks/dashboard", json!({ "caller": shopper(9) })).await;
    assert_eq!(body["data"]["member"], false);
    assert_eq!(
        body["data"]["message"],
        "You are not a member of the loyalty program yet."
    );

    let (status, body) = post_json(&app, "/api/hooks/dashboard", json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_dashboard_store_failure_is_internal_error() {
    let app = create_test_app(Arc::new(InMemoryLoyaltyRepository::failing()), None);

    let (status, body) = post_json(&app, "/api/hooks/dashboard", json!({ "caller": shopper(9) })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "服务内部错误，请稍后重试");
}

#[tokio::test]
async fn test_product_notice_is_escaped() {
    let app = create_test_app(
        Arc::new(InMemoryLoyaltyRepository::default()),
        Some("Members save 10% & more"),
    );

    let (_, body) = post_json(&app, "/api/hooks/product-notice", json!({})).await;
    assert_eq!(body["data"]["html"], "<p>Members save 10% &amp; more</p>");
}

// ==================== 健康检查 ====================

#[tokio::test]
async fn test_health_without_database() {
    let app = create_test_app(Arc::new(InMemoryLoyaltyRepository::default()), None);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "loyalty-service");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["database"], "disabled");
}
