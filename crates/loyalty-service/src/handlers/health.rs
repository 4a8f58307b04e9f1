//! 健康检查与指标

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{dto::HealthDto, extension::EXTENSION_VERSION, state::AppState};

pub const SERVICE_NAME: &str = "loyalty-service";

/// 健康检查
///
/// GET /health
///
/// 数据库不可用时返回 503，供负载均衡摘除实例
pub async fn health_check(State(state): State<AppState>) -> Response {
    let database = match &state.database {
        Some(db) => {
            if db.health_check().await.is_ok() {
                "ok"
            } else {
                "fail"
            }
        }
        None => "disabled",
    };

    let healthy = database != "fail";
    let body = HealthDto {
        status: if healthy { "ok" } else { "degraded" },
        service: SERVICE_NAME,
        version: EXTENSION_VERSION,
        database,
    };
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(body)).into_response()
}

/// Prometheus 指标
///
/// GET /metrics
pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
