//! 统一可观测性模块
//!
//! 提供日志和指标的统一初始化。
//! 所有服务通过单一入口点配置可观测性，确保一致的指标命名。

pub mod metrics;
pub mod middleware;
pub mod tracing;

use ::tracing::info;
use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::ObservabilityConfig;

/// 可观测性资源守卫
///
/// 持有指标渲染 handle，未启用指标时为空
pub struct ObservabilityGuard {
    metrics_handle: Option<PrometheusHandle>,
}

impl ObservabilityGuard {
    pub fn metrics_handle(&self) -> Option<PrometheusHandle> {
        self.metrics_handle.clone()
    }
}

impl Drop for ObservabilityGuard {
    fn drop(&mut self) {
        info!("Shutting down observability...");
    }
}

/// 统一初始化可观测性
///
/// 初始化顺序：
/// 1. 日志
/// 2. Prometheus 指标（metrics_enabled 为 false 时跳过）
///
/// # Example
///
/// ```ignore
/// use loyalty_shared::{config::AppConfig, observability};
///
/// let config = AppConfig::load("loyalty-service")?;
/// let guard = observability::init(&config.service_name, &config.observability)?;
/// ```
pub fn init(service_name: &str, config: &ObservabilityConfig) -> Result<ObservabilityGuard> {
    tracing::init(config)?;

    let metrics_handle = if config.metrics_enabled {
        Some(metrics::init(service_name)?)
    } else {
        None
    };

    info!(
        service = %service_name,
        log_format = %config.log_format,
        metrics_enabled = config.metrics_enabled,
        "Observability initialized"
    );

    Ok(ObservabilityGuard { metrics_handle })
}
