//! 路由配置模块
//!
//! 宿主商城通过 `/api/hooks/*` 回调扩展点

use axum::{
    Router, middleware,
    routing::{get, post},
};
use loyalty_shared::observability::middleware as obs_middleware;

use crate::{handlers, state::AppState};

/// 价格相关扩展点
fn pricing_routes() -> Router<AppState> {
    Router::new()
        .route("/price", post(handlers::pricing::resolve_price))
        .route("/price-html", post(handlers::pricing::render_price_html))
        .route("/prices", post(handlers::pricing::catalog_prices))
}

/// 刻字相关扩展点
fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart-item", post(handlers::cart::add_to_cart))
        .route("/order-item", post(handlers::cart::create_order_item))
        .route(
            "/cart-item/summary",
            post(handlers::cart::cart_item_summary),
        )
}

/// 用户资料与我的账户扩展点
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/profile/view", post(handlers::account::profile_view))
        .route("/profile/save", post(handlers::account::profile_save))
        .route("/dashboard", post(handlers::account::dashboard))
        .route("/product-notice", post(handlers::account::product_notice))
}

/// 构建全部扩展点路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(pricing_routes())
        .merge(cart_routes())
        .merge(account_routes())
}

/// 构建完整应用路由（不含超时、CORS 等部署相关的层）
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/hooks", api_routes())
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::health::metrics))
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}
