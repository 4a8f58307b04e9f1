//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use loyalty_shared::database::Database;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::extension::StorefrontExtension;

/// Axum 应用共享状态
///
/// 扩展对象在启动时构造一次，通过 Arc 在 handler 间共享
#[derive(Clone)]
pub struct AppState {
    pub extension: Arc<StorefrontExtension>,
    /// 健康检查使用；测试环境可不接数据库
    pub database: Option<Database>,
    /// Prometheus 渲染 handle，未启用指标时为 None
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(extension: Arc<StorefrontExtension>) -> Self {
        Self {
            extension,
            database: None,
            metrics: None,
        }
    }

    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }
}
