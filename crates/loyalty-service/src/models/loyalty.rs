//! 会员积分实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 会员积分记录
///
/// 对应 loyalty_status 表的一行。存在记录即为会员，积分为 0 的会员仍是会员
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyRecord {
    /// 用户 ID（主键）
    pub user_id: i64,
    /// 积分余额
    pub points: i32,
    /// 最近一次写入时间
    pub last_updated: DateTime<Utc>,
}

impl LoyaltyRecord {
    pub fn status(&self) -> LoyaltyStatus {
        LoyaltyStatus::Member {
            points: self.points,
        }
    }
}

/// 会员状态
///
/// `NotMember` 表示没有积分记录，与积分为 0 的会员严格区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoyaltyStatus {
    #[default]
    NotMember,
    Member { points: i32 },
}

impl LoyaltyStatus {
    pub fn is_member(&self) -> bool {
        matches!(self, Self::Member { .. })
    }

    pub fn points(&self) -> Option<i32> {
        match self {
            Self::NotMember => None,
            Self::Member { points } => Some(*points),
        }
    }
}

impl From<Option<LoyaltyRecord>> for LoyaltyStatus {
    fn from(record: Option<LoyaltyRecord>) -> Self {
        record.map(|r| r.status()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_points_is_still_member() {
        let status = LoyaltyStatus::from(Some(LoyaltyRecord {
            user_id: 3,
            points: 0,
            last_updated: Utc::now(),
        }));
        assert!(status.is_member());
        assert_eq!(status.points(), Some(0));
    }

    #[test]
    fn test_missing_record_is_not_member() {
        let status = LoyaltyStatus::from(None::<LoyaltyRecord>);
        assert_eq!(status, LoyaltyStatus::NotMember);
        assert_eq!(status.points(), None);
    }

    #[test]
    fn test_record_status() {
        let record = LoyaltyRecord {
            user_id: 7,
            points: 50,
            last_updated: Utc::now(),
        };
        assert_eq!(record.status(), LoyaltyStatus::Member { points: 50 });
    }
}
