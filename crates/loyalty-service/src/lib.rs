//! 会员积分商城扩展服务
//!
//! 以扩展点的形式接入宿主商城，提供三项能力：
//!
//! - **会员积分**：按用户持久化积分，资料页查看与管理员改分
//! - **会员价**：已登录会员在前台看到九折价，并展示原价/会员价
//! - **商品刻字**：加入购物车时捕获刻字，贯穿购物车、结算与订单
//!
//! ## 模块结构
//!
//! - `models`: 会员记录、调用方、购物车/订单行
//! - `repository`: 积分存储
//! - `service`: 积分服务与单次请求上下文
//! - `pricing` / `engraving` / `markup`: 价格计算、刻字清洗与 HTML 转义
//! - `extension`: 各扩展点入口
//! - `dto` / `handlers` / `routes` / `state`: HTTP 接入层
//! - `error`: 错误类型定义

pub mod dto;
pub mod engraving;
pub mod error;
pub mod extension;
pub mod handlers;
pub mod markup;
pub mod models;
pub mod pricing;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;

// 重新导出核心类型
pub use engraving::Engraving;
pub use error::{LoyaltyError, Result};
pub use extension::StorefrontExtension;
pub use models::{Caller, Capability, CartItem, LoyaltyRecord, LoyaltyStatus, OrderItem};
pub use pricing::{PriceDisplay, PriceFormat};
pub use repository::{LoyaltyRepository, LoyaltyRepositoryTrait};
pub use service::{LoyaltyService, RequestContext, UpdateOutcome};
pub use state::AppState;
