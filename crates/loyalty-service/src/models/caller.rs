//! 调用方身份
//!
//! 宿主商城负责认证，每次回调时把当前用户和所处界面一并传入

use serde::{Deserialize, Serialize};

/// 用户能力
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// 可编辑其他用户资料（含积分）
    EditUsers,
    /// 本服务不关心的其他能力
    #[serde(other)]
    Other,
}

/// 当前请求的调用方
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caller {
    /// 已登录用户 ID，匿名访问为空
    #[serde(default)]
    pub user_id: Option<i64>,
    /// 是否处于后台管理界面
    #[serde(default)]
    pub back_office: bool,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn shopper(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }

    pub fn administrator(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            back_office: true,
            capabilities: vec![Capability::EditUsers],
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}
