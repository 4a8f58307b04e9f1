//! 会员积分商城扩展服务
//!
//! 启动 HTTP 服务，供宿主商城回调扩展点。

use std::{sync::Arc, time::Duration};

use axum::http::StatusCode;
use loyalty_service::{
    LoyaltyRepository, LoyaltyRepositoryTrait, LoyaltyService, PriceFormat, StorefrontExtension,
    handlers::health::SERVICE_NAME, routes, state::AppState,
};
use loyalty_shared::{config::AppConfig, database::Database, observability};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load(SERVICE_NAME)?;

    let guard = observability::init(&config.service_name, &config.observability)?;

    info!(
        environment = %config.environment,
        "Starting {} on {}",
        SERVICE_NAME,
        config.server_addr()
    );

    let db = Database::connect(&config.database).await?;
    if config.database.run_migrations {
        db.run_migrations().await?;
    }

    let repo: Arc<dyn LoyaltyRepositoryTrait> = Arc::new(LoyaltyRepository::new(db.pool().clone()));
    let loyalty = Arc::new(LoyaltyService::new(repo));
    let extension = StorefrontExtension::new(loyalty, PriceFormat::from(&config.storefront))
        .with_product_notice(config.storefront.product_notice.clone());

    let state = AppState::new(Arc::new(extension))
        .with_database(db.clone())
        .with_metrics(guard.metrics_handle());

    let app = routes::router(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.server.request_timeout_seconds),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    // 收到 SIGTERM 或 Ctrl+C 后停止接收新连接，等待已有请求处理完毕
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");

    Ok(())
}

/// 监听关闭信号
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
