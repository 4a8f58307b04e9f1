//! 扩展点请求体
//!
//! 宿主商城回调时提交的 JSON，字段统一 camelCase

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{Caller, CartItem, OrderItem};

fn non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::new("negative_price"));
    }
    Ok(())
}

/// 商品价格计算
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PriceRequest {
    #[serde(default)]
    pub caller: Caller,
    pub product_id: Option<i64>,
    #[validate(custom(function = "non_negative_price"))]
    pub base_price: Decimal,
}

/// 价格展示
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PriceHtmlRequest {
    #[serde(default)]
    pub caller: Caller,
    pub product_id: Option<i64>,
    #[validate(custom(function = "non_negative_price"))]
    pub base_price: Decimal,
    /// 宿主生成的默认价格 HTML
    #[serde(default)]
    pub default_html: String,
}

/// 商品列表中的单个商品
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub product_id: i64,
    #[validate(custom(function = "non_negative_price"))]
    pub base_price: Decimal,
    #[serde(default)]
    pub default_html: String,
}

/// 商品列表批量计价（同一请求只解析一次会员状态）
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPricesRequest {
    #[serde(default)]
    pub caller: Caller,
    #[validate(length(min = 1, max = 200, message = "商品数量必须在1-200之间"), nested)]
    pub products: Vec<CatalogProduct>,
}

/// 加入购物车
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    pub cart_item: CartItem,
    /// 商品页表单中的刻字字段（原始提交值）
    #[serde(default, deserialize_with = "crate::engraving::deserialize_posted_text")]
    pub engraving: Option<String>,
}

/// 创建订单行
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub cart_item: CartItem,
    pub order_item: OrderItem,
}

/// 购物车/结算摘要
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummaryRequest {
    pub cart_item: CartItem,
}

/// 用户资料页查看
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileViewRequest {
    #[serde(default)]
    pub caller: Caller,
    #[validate(range(min = 0, message = "用户 ID 不能为负数"))]
    pub user_id: i64,
}

/// 用户资料页保存
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSaveRequest {
    #[serde(default)]
    pub caller: Caller,
    #[validate(range(min = 0, message = "用户 ID 不能为负数"))]
    pub user_id: i64,
    /// 表单提交的积分原文
    pub loyalty_points: Option<String>,
}

/// 我的账户
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRequest {
    #[serde(default)]
    pub caller: Caller,
}
