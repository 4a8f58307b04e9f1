//! 购物车行与订单行

use serde::{Deserialize, Serialize};

use crate::engraving::{ENGRAVING_LABEL, Engraving};

/// 购物车行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: i64,
    pub quantity: u32,
    /// 刻字文本，未填写为空
    #[serde(
        default,
        deserialize_with = "crate::engraving::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub engraving: Option<Engraving>,
}

impl CartItem {
    pub fn new(product_id: i64, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
            engraving: None,
        }
    }
}

/// 订单行元数据
///
/// 元数据键由枚举固定，避免字符串键拼写错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key", content = "value", rename_all = "snake_case")]
pub enum OrderItemMeta {
    Engraving(Engraving),
}

impl OrderItemMeta {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Engraving(_) => ENGRAVING_LABEL,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Engraving(engraving) => engraving.as_str(),
        }
    }

    /// 订单详情/邮件中的展示形式，如 `Engraving: Happy Birthday!`
    pub fn display(&self) -> String {
        format!("{}: {}", self.label(), self.value())
    }
}

/// 订单行（下单后持久化）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub item_id: i64,
    pub product_id: i64,
    pub quantity: u32,
    #[serde(default)]
    pub meta: Vec<OrderItemMeta>,
}

impl OrderItem {
    pub fn new(item_id: i64, product_id: i64, quantity: u32) -> Self {
        Self {
            item_id,
            product_id,
            quantity,
            meta: Vec::new(),
        }
    }

    pub fn engraving(&self) -> Option<&Engraving> {
        self.meta.iter().find_map(|meta| match meta {
            OrderItemMeta::Engraving(engraving) => Some(engraving),
        })
    }

    pub fn meta_lines(&self) -> Vec<String> {
        self.meta.iter().map(OrderItemMeta::display).collect()
    }
}

/// 购物车/结算页摘要中的一行 (标签, 值)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub label: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_item_deserialize_sanitizes_engraving() {
        let item: CartItem = serde_json::from_str(
            r#"{"productId": 5, "quantity": 2, "engraving": "<b>For Mum</b>"}"#,
        )
        .unwrap();
        assert_eq!(item.engraving.unwrap().as_str(), "For Mum");
    }

    #[test]
    fn test_cart_item_blank_engraving_is_absent() {
        let item: CartItem =
            serde_json::from_str(r#"{"productId": 5, "quantity": 1, "engraving": "  "}"#).unwrap();
        assert!(item.engraving.is_none());

        let item: CartItem = serde_json::from_str(r#"{"productId": 5, "quantity": 1}"#).unwrap();
        assert!(item.engraving.is_none());
    }

    #[test]
    fn test_order_item_meta_serialization() {
        let mut order_item = OrderItem::new(1, 5, 1);
        order_item
            .meta
            .push(OrderItemMeta::Engraving(Engraving::sanitize("Hello").unwrap()));

        let json = serde_json::to_value(&order_item).unwrap();
        assert_eq!(json["meta"][0]["key"], "engraving");
        assert_eq!(json["meta"][0]["value"], "Hello");

        let back: OrderItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, order_item);
    }
}
