//! 会员价格计算与展示
//!
//! 会员在前台统一享受九折；非会员、未登录或后台界面一律保持原价。

use loyalty_shared::config::StorefrontConfig;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use crate::service::RequestContext;

/// 会员价系数（九折）
pub const MEMBER_PRICE_FACTOR: Decimal = Decimal::from_parts(90, 0, 0, false, 2);

/// Decimal 可表示的最大小数位数
pub const MAX_PRICE_DECIMALS: u32 = 28;

/// 货币符号位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymbolPosition {
    #[default]
    Left,
    Right,
    LeftSpace,
    RightSpace,
}

impl SymbolPosition {
    /// 无法识别的取值按 left 处理
    pub fn parse(value: &str) -> Self {
        match value {
            "right" => Self::Right,
            "left_space" => Self::LeftSpace,
            "right_space" => Self::RightSpace,
            _ => Self::Left,
        }
    }
}

/// 金额格式，对应宿主商城的货币设置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFormat {
    pub symbol: String,
    pub symbol_position: SymbolPosition,
    pub decimals: u32,
    pub decimal_separator: String,
    pub thousand_separator: String,
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self {
            symbol: String::new(),
            symbol_position: SymbolPosition::Left,
            decimals: 2,
            decimal_separator: ".".to_string(),
            thousand_separator: ",".to_string(),
        }
    }
}

impl From<&StorefrontConfig> for PriceFormat {
    fn from(config: &StorefrontConfig) -> Self {
        Self {
            symbol: config.currency_symbol.clone(),
            symbol_position: SymbolPosition::parse(&config.currency_position),
            decimals: clamp_decimals(config.price_decimals),
            decimal_separator: config.decimal_separator.clone(),
            thousand_separator: config.thousand_separator.clone(),
        }
    }
}

fn clamp_decimals(decimals: u32) -> u32 {
    if decimals > MAX_PRICE_DECIMALS {
        warn!(
            configured = decimals,
            max = MAX_PRICE_DECIMALS,
            "storefront.price_decimals exceeds supported precision, clamping"
        );
        return MAX_PRICE_DECIMALS;
    }
    decimals
}

impl PriceFormat {
    /// 按货币精度四舍五入（0.5 远离零）
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.decimals, RoundingStrategy::MidpointAwayFromZero)
    }

    /// 格式化金额，如 `1,234.50`
    pub fn format(&self, amount: Decimal) -> String {
        let mut rounded = self.round(amount);
        rounded.rescale(self.decimals);

        let raw = rounded.abs().to_string();
        let (int_part, frac_part) = match raw.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (raw.as_str(), None),
        };

        let mut number = group_thousands(int_part, &self.thousand_separator);
        if let Some(frac) = frac_part {
            number.push_str(&self.decimal_separator);
            number.push_str(frac);
        }
        if rounded.is_sign_negative() && !rounded.is_zero() {
            number.insert(0, '-');
        }

        if self.symbol.is_empty() {
            return number;
        }
        match self.symbol_position {
            SymbolPosition::Left => format!("{}{}", self.symbol, number),
            SymbolPosition::Right => format!("{}{}", number, self.symbol),
            SymbolPosition::LeftSpace => format!("{} {}", self.symbol, number),
            SymbolPosition::RightSpace => format!("{} {}", number, self.symbol),
        }
    }
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// 计算当前请求用户看到的价格
///
/// 非会员、未登录、后台界面均返回原价；会员返回九折后按货币精度舍入的价格
pub fn adjust_price(base_price: Decimal, ctx: &RequestContext, format: &PriceFormat) -> Decimal {
    if !ctx.discount_eligible() {
        return base_price;
    }
    format.round(base_price * MEMBER_PRICE_FACTOR)
}

/// 价格展示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceDisplay {
    /// 宿主商城原有的单价展示
    Default { html: String, text: String },
    /// 会员价：原价划线、会员价强调
    Discounted { before: String, after: String },
}

impl PriceDisplay {
    pub fn is_discounted(&self) -> bool {
        matches!(self, Self::Discounted { .. })
    }

    pub fn to_html(&self) -> String {
        match self {
            Self::Default { html, .. } => html.clone(),
            Self::Discounted { before, after } => format!(
                "<del>Before: {}</del> / <strong>Your Price: {}</strong>",
                before, after
            ),
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            Self::Default { text, .. } => text.clone(),
            Self::Discounted { before, after } => {
                format!("Before: {} / Your Price: {}", before, after)
            }
        }
    }
}

/// 生成价格展示
///
/// 已登录会员（非后台）展示原价与会员价，其余情况原样返回宿主的默认展示
pub fn render_price_display(
    base_price: Decimal,
    discounted_price: Decimal,
    ctx: &RequestContext,
    format: &PriceFormat,
    default_html: &str,
) -> PriceDisplay {
    if ctx.discount_eligible() {
        PriceDisplay::Discounted {
            before: format.format(base_price),
            after: format.format(discounted_price),
        }
    } else {
        PriceDisplay::Default {
            html: default_html.to_string(),
            text: format.format(base_price),
        }
    }
}
