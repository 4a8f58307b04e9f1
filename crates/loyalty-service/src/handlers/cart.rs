//! 刻字相关扩展点：加入购物车、创建订单行、摘要展示

use axum::{Json, extract::State};
use tracing::instrument;

use crate::{
    dto::{
        ApiResponse, CartItemDto, CartItemRequest, CartSummaryDto, CartSummaryRequest,
        OrderItemDto, OrderItemRequest,
    },
    error::LoyaltyError,
    state::AppState,
};

/// 加入购物车
///
/// POST /api/hooks/cart-item
#[instrument(skip(state, req), fields(product_id = req.cart_item.product_id))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(req): Json<CartItemRequest>,
) -> Result<Json<ApiResponse<CartItemDto>>, LoyaltyError> {
    let cart_item = state
        .extension
        .add_to_cart(req.cart_item, req.engraving.as_deref());

    Ok(Json(ApiResponse::success(CartItemDto { cart_item })))
}

/// 创建订单行
///
/// POST /api/hooks/order-item
#[instrument(skip(state, req), fields(item_id = req.order_item.item_id))]
pub async fn create_order_item(
    State(state): State<AppState>,
    Json(req): Json<OrderItemRequest>,
) -> Result<Json<ApiResponse<OrderItemDto>>, LoyaltyError> {
    let order_item = state
        .extension
        .create_order_line_item(req.order_item, &req.cart_item);

    Ok(Json(ApiResponse::success(order_item.into())))
}

/// 购物车/结算摘要行
///
/// POST /api/hooks/cart-item/summary
pub async fn cart_item_summary(
    State(state): State<AppState>,
    Json(req): Json<CartSummaryRequest>,
) -> Result<Json<ApiResponse<CartSummaryDto>>, LoyaltyError> {
    let rows = state.extension.cart_item_summary(&req.cart_item);
    Ok(Json(ApiResponse::success(CartSummaryDto { rows })))
}
