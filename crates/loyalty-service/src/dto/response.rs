//! 扩展点响应体

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::extension::{DashboardView, PricedProduct, ProfileLoyalty};
use crate::models::{CartItem, OrderItem, SummaryRow};
use crate::pricing::PriceDisplay;
use crate::service::UpdateOutcome;

/// API 统一响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: Some(data),
        }
    }
}

/// 商品价格
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDto {
    pub price: Decimal,
    pub formatted: String,
    pub discounted: bool,
}

/// 价格展示
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHtmlDto {
    pub html: String,
    pub text: String,
    pub discounted: bool,
}

impl From<PriceDisplay> for PriceHtmlDto {
    fn from(display: PriceDisplay) -> Self {
        Self {
            html: display.to_html(),
            text: display.to_text(),
            discounted: display.is_discounted(),
        }
    }
}

/// 批量计价结果中的单个商品
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPriceDto {
    pub product_id: i64,
    pub price: Decimal,
    pub html: String,
    pub text: String,
    pub discounted: bool,
}

impl CatalogPriceDto {
    pub fn new(product_id: i64, priced: PricedProduct) -> Self {
        Self {
            product_id,
            price: priced.price,
            html: priced.display.to_html(),
            text: priced.display.to_text(),
            discounted: priced.display.is_discounted(),
        }
    }
}

/// 加入购物车结果
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDto {
    pub cart_item: CartItem,
}

/// 订单行结果，附带元数据的展示文本
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    pub order_item: OrderItem,
    pub meta_display: Vec<String>,
}

impl From<OrderItem> for OrderItemDto {
    fn from(order_item: OrderItem) -> Self {
        let meta_display = order_item.meta_lines();
        Self {
            order_item,
            meta_display,
        }
    }
}

/// 购物车/结算摘要
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummaryDto {
    pub rows: Vec<SummaryRow>,
}

/// 用户资料页积分
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileLoyaltyDto {
    pub user_id: i64,
    pub member: bool,
    pub points: Option<i32>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl From<ProfileLoyalty> for ProfileLoyaltyDto {
    fn from(profile: ProfileLoyalty) -> Self {
        Self {
            user_id: profile.user_id,
            member: profile.record.is_some(),
            points: profile.record.as_ref().map(|r| r.points),
            last_updated: profile.record.as_ref().map(|r| r.last_updated),
        }
    }
}

/// 用户资料页保存结果
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSaveDto {
    pub updated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declined_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<i32>,
}

impl From<UpdateOutcome> for ProfileSaveDto {
    fn from(outcome: UpdateOutcome) -> Self {
        match outcome {
            UpdateOutcome::Updated(record) => Self {
                updated: true,
                declined_reason: None,
                points: Some(record.points),
            },
            UpdateOutcome::Declined(reason) => Self {
                updated: false,
                declined_reason: Some(reason.as_str().to_string()),
                points: None,
            },
        }
    }
}

/// 我的账户积分展示
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    pub member: bool,
    pub points: Option<i32>,
    pub message: String,
}

impl From<DashboardView> for DashboardDto {
    fn from(view: DashboardView) -> Self {
        Self {
            member: view.points.is_some(),
            points: view.points,
            message: view.message,
        }
    }
}

/// 商品详情页提示
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNoticeDto {
    pub html: Option<String>,
}

/// 健康检查
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDto {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}
