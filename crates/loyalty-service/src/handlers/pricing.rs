//! 价格相关扩展点

use axum::{Json, extract::State};
use tracing::instrument;
use validator::Validate;

use crate::{
    dto::{
        ApiResponse, CatalogPriceDto, CatalogPricesRequest, PriceDto, PriceHtmlDto,
        PriceHtmlRequest, PriceRequest,
    },
    error::LoyaltyError,
    state::AppState,
};

/// 商品价格计算
///
/// POST /api/hooks/price
#[instrument(skip(state, req), fields(product_id = ?req.product_id))]
pub async fn resolve_price(
    State(state): State<AppState>,
    Json(req): Json<PriceRequest>,
) -> Result<Json<ApiResponse<PriceDto>>, LoyaltyError> {
    req.validate()?;

    let ext = &state.extension;
    let ctx = ext.request_context(req.caller).await;
    let price = ext.resolve_product_price(&ctx, req.base_price);

    Ok(Json(ApiResponse::success(PriceDto {
        price,
        formatted: ext.price_format().format(price),
        discounted: ctx.discount_eligible(),
    })))
}

/// 价格展示
///
/// POST /api/hooks/price-html
#[instrument(skip(state, req), fields(product_id = ?req.product_id))]
pub async fn render_price_html(
    State(state): State<AppState>,
    Json(req): Json<PriceHtmlRequest>,
) -> Result<Json<ApiResponse<PriceHtmlDto>>, LoyaltyError> {
    req.validate()?;

    let ext = &state.extension;
    let ctx = ext.request_context(req.caller).await;
    let display = ext.render_price_html(&ctx, req.base_price, &req.default_html);

    Ok(Json(ApiResponse::success(display.into())))
}

/// 商品列表批量计价
///
/// POST /api/hooks/prices
///
/// 会员状态只解析一次，所有商品的价格和展示共用
#[instrument(skip(state, req), fields(count = req.products.len()))]
pub async fn catalog_prices(
    State(state): State<AppState>,
    Json(req): Json<CatalogPricesRequest>,
) -> Result<Json<ApiResponse<Vec<CatalogPriceDto>>>, LoyaltyError> {
    req.validate()?;

    let ext = &state.extension;
    let ctx = ext.request_context(req.caller).await;

    let items = req
        .products
        .iter()
        .map(|product| {
            let priced = ext.product_price(&ctx, product.base_price, &product.default_html);
            CatalogPriceDto::new(product.product_id, priced)
        })
        .collect();

    Ok(Json(ApiResponse::success(items)))
}
