//! 请求上下文
//!
//! 每个请求解析一次当前用户的会员状态，随后在价格计算和价格展示之间传递，
//! 避免同一请求内重复查询。上下文随请求结束而丢弃，不跨请求共享。

use crate::models::{Caller, LoyaltyStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    caller: Caller,
    status: LoyaltyStatus,
}

impl RequestContext {
    pub fn new(caller: Caller, status: LoyaltyStatus) -> Self {
        Self { caller, status }
    }

    /// 查询失败时使用的降级上下文：按非会员处理
    pub fn degraded(caller: Caller) -> Self {
        Self::new(caller, LoyaltyStatus::NotMember)
    }

    pub fn caller(&self) -> &Caller {
        &self.caller
    }

    pub fn status(&self) -> LoyaltyStatus {
        self.status
    }

    pub fn is_authenticated(&self) -> bool {
        self.caller.is_authenticated()
    }

    pub fn is_back_office(&self) -> bool {
        self.caller.back_office
    }

    /// 是否享受会员价：已登录、前台、且为会员
    pub fn discount_eligible(&self) -> bool {
        self.is_authenticated() && !self.is_back_office() && self.status.is_member()
    }
}
