//! 用户资料与我的账户扩展点

use axum::{Json, extract::State};
use tracing::instrument;
use validator::Validate;

use crate::{
    dto::{
        ApiResponse, DashboardDto, DashboardRequest, ProductNoticeDto, ProfileLoyaltyDto,
        ProfileSaveDto, ProfileSaveRequest, ProfileViewRequest,
    },
    error::LoyaltyError,
    state::AppState,
};

/// 用户资料页查看积分
///
/// POST /api/hooks/profile/view
#[instrument(skip(state, req), fields(user_id = req.user_id))]
pub async fn profile_view(
    State(state): State<AppState>,
    Json(req): Json<ProfileViewRequest>,
) -> Result<Json<ApiResponse<ProfileLoyaltyDto>>, LoyaltyError> {
    req.validate()?;

    let profile = state.extension.profile_view(&req.caller, req.user_id).await?;
    Ok(Json(ApiResponse::success(profile.into())))
}

/// 用户资料页保存积分
///
/// POST /api/hooks/profile/save
///
/// 无权限或提交值无效时返回 updated=false，不视为错误
#[instrument(skip(state, req), fields(user_id = req.user_id))]
pub async fn profile_save(
    State(state): State<AppState>,
    Json(req): Json<ProfileSaveRequest>,
) -> Result<Json<ApiResponse<ProfileSaveDto>>, LoyaltyError> {
    req.validate()?;

    let outcome = state
        .extension
        .profile_save(&req.caller, req.user_id, req.loyalty_points.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(outcome.into())))
}

/// 我的账户积分展示
///
/// POST /api/hooks/dashboard
#[instrument(skip(state, req))]
pub async fn dashboard(
    State(state): State<AppState>,
    Json(req): Json<DashboardRequest>,
) -> Result<Json<ApiResponse<DashboardDto>>, LoyaltyError> {
    let view = state.extension.account_dashboard(&req.caller).await?;
    Ok(Json(ApiResponse::success(view.into())))
}

/// 商品详情页提示
///
/// POST /api/hooks/product-notice
pub async fn product_notice(
    State(state): State<AppState>,
) -> Json<ApiResponse<ProductNoticeDto>> {
    Json(ApiResponse::success(ProductNoticeDto {
        html: state.extension.product_notice(),
    }))
}
