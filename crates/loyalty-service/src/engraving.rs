//! 刻字备注
//!
//! 商品页表单提交的刻字文本，经清洗后随购物车行进入订单行元数据。
//!
//! ## 生命周期
//!
//! ```text
//! NoText --加入购物车(清洗后非空)--> Captured --创建订单行(原样复制)--> Persisted
//! ```
//!
//! 不存在回退；购物车行上的刻字一旦捕获即不可修改。

use serde::{Deserialize, Deserializer, Serialize};

use crate::markup::{escape_html, sanitize_text_field, truncate_chars};
use crate::models::{CartItem, OrderItem, OrderItemMeta, SummaryRow};

/// 刻字最大字符数
pub const ENGRAVING_MAX_CHARS: usize = 50;

/// 刻字在订单元数据和结算摘要中的标签
pub const ENGRAVING_LABEL: &str = "Engraving";

/// 已清洗的刻字文本
///
/// 只能通过清洗构造，因此始终非空、不含标签与控制字符、不超过 50 个字符
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Engraving(String);

impl Engraving {
    /// 清洗并截断，结果为空时视为未填写
    pub fn sanitize(raw: &str) -> Option<Self> {
        let cleaned = sanitize_text_field(raw);
        let truncated = truncate_chars(&cleaned, ENGRAVING_MAX_CHARS);
        if truncated.is_empty() {
            None
        } else {
            Some(Self(truncated))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 用于页面展示的转义文本
    pub fn to_html(&self) -> String {
        escape_html(&self.0)
    }
}

impl std::fmt::Display for Engraving {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Engraving {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::sanitize(&raw).ok_or_else(|| "engraving text is empty after sanitizing".to_string())
    }
}

impl From<Engraving> for String {
    fn from(engraving: Engraving) -> Self {
        engraving.0
    }
}

/// 反序列化表单提交的刻字原文
///
/// 宿主可能提交数字、数组等非字符串值，这些一律视为未填写，不拒绝整个请求
pub(crate) fn deserialize_posted_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => Ok(Some(text)),
        _ => Ok(None),
    }
}

/// 反序列化可选刻字：缺失、非字符串或清洗后为空均视为未填写
pub(crate) fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<Engraving>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = deserialize_posted_text(deserializer)?;
    Ok(raw.as_deref().and_then(Engraving::sanitize))
}

/// 捕获表单提交的刻字
///
/// 未提交字段返回 None，不视为错误
pub fn capture(form_text: Option<&str>) -> Option<Engraving> {
    form_text.and_then(Engraving::sanitize)
}

/// 把刻字挂到购物车行上
///
/// 购物车行已有刻字时不覆盖，返回是否发生了写入
pub fn attach_to_cart_item(cart_item: &mut CartItem, text: Option<Engraving>) -> bool {
    if cart_item.engraving.is_some() {
        return false;
    }
    match text {
        Some(engraving) => {
            cart_item.engraving = Some(engraving);
            true
        }
        None => false,
    }
}

/// 下单时把购物车行的刻字写入订单行元数据
///
/// 订单行已有刻字元数据时保持原值，返回是否发生了写入
pub fn carry_to_order_item(order_item: &mut OrderItem, cart_item: &CartItem) -> bool {
    let Some(engraving) = &cart_item.engraving else {
        return false;
    };
    if order_item.engraving().is_some() {
        return false;
    }
    order_item
        .meta
        .push(OrderItemMeta::Engraving(engraving.clone()));
    true
}

/// 购物车/结算页摘要行
pub fn render_in_summary(cart_item: &CartItem) -> Option<SummaryRow> {
    cart_item.engraving.as_ref().map(|engraving| SummaryRow {
        label: ENGRAVING_LABEL.to_string(),
        value: engraving.to_html(),
    })
}
