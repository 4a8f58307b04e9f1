//! 业务服务层
//!
//! - `LoyaltyService`: 会员积分的读取、写入与改分授权
//! - `RequestContext`: 单次请求内解析一次的会员状态

mod context;
mod loyalty_service;

pub use context::RequestContext;
pub use loyalty_service::{DeclineReason, LoyaltyService, UpdateOutcome};
