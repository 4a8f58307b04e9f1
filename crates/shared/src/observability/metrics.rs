//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集与导出。
//! 指标通过服务自身的 `/metrics` 路由暴露，供 Prometheus 抓取。

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// 全局 Prometheus handle，用于渲染指标
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// 安装 Prometheus recorder
///
/// 进程内只能安装一次；重复调用返回已安装的 handle。
pub fn init(service_name: &str) -> Result<PrometheusHandle> {
    if let Some(handle) = PROMETHEUS_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROMETHEUS_HANDLE.set(handle.clone());

    register_common_metrics(service_name);

    Ok(handle)
}

/// 注册通用指标描述
///
/// 这些描述会出现在 /metrics 端点的 HELP 注释中
fn register_common_metrics(service_name: &str) {
    metrics::describe_counter!("http_requests_total", "Total number of HTTP requests");
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );

    metrics::describe_counter!(
        "loyalty_status_lookups_total",
        "Loyalty status lookups against the store"
    );
    metrics::describe_counter!(
        "loyalty_points_updates_total",
        "Loyalty point writes, labelled by outcome"
    );
    metrics::describe_counter!(
        "loyalty_discounts_applied_total",
        "Prices discounted for loyalty members"
    );
    metrics::describe_counter!(
        "engravings_captured_total",
        "Engraving texts captured on add-to-cart"
    );

    metrics::counter!("service_starts_total", "service" => service_name.to_string()).increment(1);
}

/// 记录 HTTP 请求
#[inline]
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let status_str = status.to_string();
    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str.clone()
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str
    )
    .record(duration_secs);
}
