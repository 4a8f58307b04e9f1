//! 会员积分仓储
//!
//! loyalty_status 表的读写，每个用户至多一行

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use super::traits::LoyaltyRepositoryTrait;
use crate::error::Result;
use crate::models::LoyaltyRecord;

/// 会员积分仓储
pub struct LoyaltyRepository {
    pool: PgPool,
}

impl LoyaltyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 查询用户积分记录
    #[instrument(skip(self))]
    pub async fn find_by_user(&self, user_id: i64) -> Result<Option<LoyaltyRecord>> {
        let record = sqlx::query_as::<_, LoyaltyRecord>(
            r#"
            SELECT user_id, loyalty_points AS points, last_updated
            FROM loyalty_status
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// 写入用户积分
    ///
    /// 依赖 ON CONFLICT 在行级原子替换，并发写入以最后一次为准
    #[instrument(skip(self))]
    pub async fn upsert(&self, user_id: i64, points: i32) -> Result<LoyaltyRecord> {
        let record = sqlx::query_as::<_, LoyaltyRecord>(
            r#"
            INSERT INTO loyalty_status (user_id, loyalty_points, last_updated)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id) DO UPDATE
            SET loyalty_points = EXCLUDED.loyalty_points,
                last_updated = EXCLUDED.last_updated
            RETURNING user_id, loyalty_points AS points, last_updated
            "#,
        )
        .bind(user_id)
        .bind(points)
        .fetch_one(&self.pool)
        .await?;

        debug!(user_id, points, "Loyalty status written");
        Ok(record)
    }
}

#[async_trait]
impl LoyaltyRepositoryTrait for LoyaltyRepository {
    async fn find_by_user(&self, user_id: i64) -> Result<Option<LoyaltyRecord>> {
        self.find_by_user(user_id).await
    }

    async fn upsert(&self, user_id: i64, points: i32) -> Result<LoyaltyRecord> {
        self.upsert(user_id, points).await
    }
}
