//! 数据库仓储层
//!
//! 封装 loyalty_status 表的 SQL 操作。
//!
//! ## 设计原则
//!
//! - 仓储只负责数据持久化，不包含授权和业务规则
//! - 使用 SQLx 进行类型安全的数据库操作
//! - 定义 trait 接口以支持 mock 测试

mod loyalty_repo;
mod traits;

pub use loyalty_repo::LoyaltyRepository;
pub use traits::*;
