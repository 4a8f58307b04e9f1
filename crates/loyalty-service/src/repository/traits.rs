//! 仓储 Trait 定义
//!
//! 定义仓储接口，便于服务层依赖抽象而非具体实现，支持 mock 测试

use async_trait::async_trait;

use crate::error::Result;
use crate::models::LoyaltyRecord;

/// 会员积分仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoyaltyRepositoryTrait: Send + Sync {
    /// 按用户查询积分记录，无记录返回 None
    async fn find_by_user(&self, user_id: i64) -> Result<Option<LoyaltyRecord>>;

    /// 整行替换（不存在则创建），写入时间取当前时间
    async fn upsert(&self, user_id: i64, points: i32) -> Result<LoyaltyRecord>;
}
