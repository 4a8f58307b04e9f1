//! 会员积分服务
//!
//! 积分的读取、整行写入，以及带权限校验的后台改分入口。
//! 写入采用整行替换语义，不支持增量加减。

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::error::{LoyaltyError, Result};
use crate::models::{Caller, Capability, LoyaltyRecord, LoyaltyStatus};
use crate::repository::LoyaltyRepositoryTrait;
use crate::service::RequestContext;

/// 改分被拒绝的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineReason {
    /// 调用方未登录
    NotAuthenticated,
    /// 调用方缺少 edit_users 能力
    MissingCapability,
    /// 提交的积分值缺失、无法解析或为负数
    InvalidPoints,
}

impl DeclineReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "not_authenticated",
            Self::MissingCapability => "missing_capability",
            Self::InvalidPoints => "invalid_points",
        }
    }
}

/// 改分结果
///
/// 无权限时静默拒绝而非报错，与宿主回调的宽松约定一致
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(LoyaltyRecord),
    Declined(DeclineReason),
}

impl UpdateOutcome {
    fn metric_label(&self) -> &'static str {
        match self {
            Self::Updated(_) => "updated",
            Self::Declined(reason) => reason.as_str(),
        }
    }
}

/// 会员积分服务
pub struct LoyaltyService<R: LoyaltyRepositoryTrait + ?Sized = dyn LoyaltyRepositoryTrait> {
    repo: Arc<R>,
}

impl<R: LoyaltyRepositoryTrait + ?Sized> LoyaltyService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// 查询会员状态
    ///
    /// 无记录返回 `NotMember`；存储不可用时错误直接向上传播，不做重试
    #[instrument(skip(self))]
    pub async fn get_status(&self, user_id: i64) -> Result<LoyaltyStatus> {
        ensure_user_id(user_id)?;
        let record = self.repo.find_by_user(user_id).await?;
        metrics::counter!("loyalty_status_lookups_total").increment(1);
        Ok(record.into())
    }

    /// 查询完整积分记录（含最近更新时间）
    #[instrument(skip(self))]
    pub async fn get_record(&self, user_id: i64) -> Result<Option<LoyaltyRecord>> {
        ensure_user_id(user_id)?;
        let record = self.repo.find_by_user(user_id).await?;
        metrics::counter!("loyalty_status_lookups_total").increment(1);
        Ok(record)
    }

    /// 写入积分（整行替换，不存在则创建）
    ///
    /// 不做权限校验，由调用方负责
    #[instrument(skip(self))]
    pub async fn set_status(&self, user_id: i64, points: i32) -> Result<LoyaltyRecord> {
        ensure_user_id(user_id)?;
        if points < 0 {
            return Err(LoyaltyError::NegativePoints(points));
        }

        let record = self.repo.upsert(user_id, points).await?;
        info!(user_id, points, "Loyalty points set");
        Ok(record)
    }

    /// 后台为用户改分
    ///
    /// 只有具备 edit_users 能力的已登录调用方才能写入，否则不写入并返回拒绝原因
    #[instrument(skip(self, actor), fields(actor_id = ?actor.user_id))]
    pub async fn update_points(
        &self,
        actor: &Caller,
        target_user_id: i64,
        points: i32,
    ) -> Result<UpdateOutcome> {
        let outcome = if !actor.is_authenticated() {
            UpdateOutcome::Declined(DeclineReason::NotAuthenticated)
        } else if !actor.can(Capability::EditUsers) {
            UpdateOutcome::Declined(DeclineReason::MissingCapability)
        } else if points < 0 {
            UpdateOutcome::Declined(DeclineReason::InvalidPoints)
        } else {
            UpdateOutcome::Updated(self.set_status(target_user_id, points).await?)
        };

        if let UpdateOutcome::Declined(reason) = &outcome {
            warn!(target_user_id, reason = reason.as_str(), "Loyalty points update declined");
        }
        metrics::counter!("loyalty_points_updates_total", "outcome" => outcome.metric_label())
            .increment(1);

        Ok(outcome)
    }

    /// 解析请求上下文
    ///
    /// 只对前台已登录用户查询一次会员状态；匿名和后台请求不访问存储
    #[instrument(skip(self, caller), fields(user_id = ?caller.user_id, back_office = caller.back_office))]
    pub async fn resolve_context(&self, caller: Caller) -> Result<RequestContext> {
        let status = match caller.user_id {
            Some(user_id) if !caller.back_office => self.get_status(user_id).await?,
            _ => LoyaltyStatus::NotMember,
        };
        Ok(RequestContext::new(caller, status))
    }
}

fn ensure_user_id(user_id: i64) -> Result<()> {
    if user_id < 0 {
        return Err(LoyaltyError::InvalidUserId(user_id));
    }
    Ok(())
}
