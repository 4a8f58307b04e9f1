//! 商城扩展点
//!
//! 宿主商城在各生命周期节点回调这里的方法。扩展对象在启动时构造一次并注入到
//! 路由状态中，不依赖全局单例。
//!
//! | 扩展点 | 方法 |
//! |---|---|
//! | 商品价格计算 | [`StorefrontExtension::resolve_product_price`] |
//! | 价格展示 | [`StorefrontExtension::render_price_html`] |
//! | 加入购物车 | [`StorefrontExtension::add_to_cart`] |
//! | 创建订单行 | [`StorefrontExtension::create_order_line_item`] |
//! | 购物车/结算摘要 | [`StorefrontExtension::cart_item_summary`] |
//! | 用户资料查看/保存 | [`StorefrontExtension::profile_view`] / [`StorefrontExtension::profile_save`] |
//! | 我的账户 | [`StorefrontExtension::account_dashboard`] |
//! | 商品详情页提示 | [`StorefrontExtension::product_notice`] |

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use crate::engraving;
use crate::error::{LoyaltyError, Result};
use crate::markup::escape_html;
use crate::models::{Caller, CartItem, Capability, LoyaltyRecord, OrderItem, SummaryRow};
use crate::pricing::{self, PriceDisplay, PriceFormat};
use crate::repository::LoyaltyRepositoryTrait;
use crate::service::{DeclineReason, LoyaltyService, RequestContext, UpdateOutcome};

/// 扩展版本号，随健康检查上报给宿主
pub const EXTENSION_VERSION: &str = "1.0.0";

/// 同一请求内计算出的价格与展示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedProduct {
    pub price: Decimal,
    pub display: PriceDisplay,
}

/// 用户资料页的积分信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileLoyalty {
    pub user_id: i64,
    pub record: Option<LoyaltyRecord>,
}

/// 我的账户页的积分展示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub points: Option<i32>,
    pub message: String,
}

pub struct StorefrontExtension<R: LoyaltyRepositoryTrait + ?Sized = dyn LoyaltyRepositoryTrait> {
    loyalty: Arc<LoyaltyService<R>>,
    price_format: PriceFormat,
    product_notice: Option<String>,
}

impl<R: LoyaltyRepositoryTrait + ?Sized> StorefrontExtension<R> {
    pub fn new(loyalty: Arc<LoyaltyService<R>>, price_format: PriceFormat) -> Self {
        Self {
            loyalty,
            price_format,
            product_notice: None,
        }
    }

    pub fn with_product_notice(mut self, notice: Option<String>) -> Self {
        self.product_notice = notice.filter(|n| !n.trim().is_empty());
        self
    }

    pub fn price_format(&self) -> &PriceFormat {
        &self.price_format
    }

    /// 为本次请求解析上下文
    ///
    /// 会员状态查询失败时降级为非会员，价格与展示保持宿主默认值
    pub async fn request_context(&self, caller: Caller) -> RequestContext {
        match self.loyalty.resolve_context(caller.clone()).await {
            Ok(ctx) => ctx,
            Err(e) => {
                warn!(user_id = ?caller.user_id, error = %e, "Loyalty status unavailable, using base pricing");
                RequestContext::degraded(caller)
            }
        }
    }

    /// 商品价格计算
    pub fn resolve_product_price(&self, ctx: &RequestContext, base_price: Decimal) -> Decimal {
        let price = pricing::adjust_price(base_price, ctx, &self.price_format);
        if ctx.discount_eligible() {
            metrics::counter!("loyalty_discounts_applied_total").increment(1);
        }
        price
    }

    /// 价格展示
    pub fn render_price_html(
        &self,
        ctx: &RequestContext,
        base_price: Decimal,
        default_html: &str,
    ) -> PriceDisplay {
        let discounted = pricing::adjust_price(base_price, ctx, &self.price_format);
        pricing::render_price_display(base_price, discounted, ctx, &self.price_format, default_html)
    }

    /// 一次算出价格与展示，两者共用同一个上下文
    pub fn product_price(
        &self,
        ctx: &RequestContext,
        base_price: Decimal,
        default_html: &str,
    ) -> PricedProduct {
        let price = self.resolve_product_price(ctx, base_price);
        let display = pricing::render_price_display(
            base_price,
            price,
            ctx,
            &self.price_format,
            default_html,
        );
        PricedProduct { price, display }
    }

    /// 加入购物车：捕获表单中的刻字并挂到购物车行
    pub fn add_to_cart(&self, mut cart_item: CartItem, posted_engraving: Option<&str>) -> CartItem {
        let captured = engraving::capture(posted_engraving);
        if engraving::attach_to_cart_item(&mut cart_item, captured) {
            metrics::counter!("engravings_captured_total").increment(1);
            debug!(product_id = cart_item.product_id, "Engraving captured");
        }
        cart_item
    }

    /// 创建订单行：把刻字写入订单行元数据
    pub fn create_order_line_item(&self, mut order_item: OrderItem, cart_item: &CartItem) -> OrderItem {
        if engraving::carry_to_order_item(&mut order_item, cart_item) {
            debug!(item_id = order_item.item_id, "Engraving persisted to order item");
        }
        order_item
    }

    /// 购物车/结算页摘要行
    pub fn cart_item_summary(&self, cart_item: &CartItem) -> Vec<SummaryRow> {
        engraving::render_in_summary(cart_item).into_iter().collect()
    }

    /// 用户资料页：查看积分
    ///
    /// 本人或具备 edit_users 能力的调用方可查看
    #[instrument(skip(self, caller), fields(caller_id = ?caller.user_id))]
    pub async fn profile_view(&self, caller: &Caller, user_id: i64) -> Result<ProfileLoyalty> {
        let Some(caller_id) = caller.user_id else {
            return Err(LoyaltyError::Unauthenticated);
        };
        if caller_id != user_id && !caller.can(Capability::EditUsers) {
            return Err(LoyaltyError::Forbidden("edit_users".to_string()));
        }

        let record = self.loyalty.get_record(user_id).await?;
        Ok(ProfileLoyalty { user_id, record })
    }

    /// 用户资料页：保存积分
    ///
    /// 提交值按整数解析，缺失、无法解析或为负数时不写入
    #[instrument(skip(self, caller, posted_points), fields(caller_id = ?caller.user_id))]
    pub async fn profile_save(
        &self,
        caller: &Caller,
        user_id: i64,
        posted_points: Option<&str>,
    ) -> Result<UpdateOutcome> {
        let Some(points) = posted_points.and_then(parse_points) else {
            warn!(user_id, "Posted loyalty points missing or malformed, ignoring");
            return Ok(UpdateOutcome::Declined(DeclineReason::InvalidPoints));
        };
        self.loyalty.update_points(caller, user_id, points).await
    }

    /// 我的账户：展示当前用户积分
    #[instrument(skip(self, caller), fields(user_id = ?caller.user_id))]
    pub async fn account_dashboard(&self, caller: &Caller) -> Result<DashboardView> {
        let Some(user_id) = caller.user_id else {
            return Err(LoyaltyError::Unauthenticated);
        };

        let status = self.loyalty.get_status(user_id).await?;
        let view = match status.points() {
            Some(points) => DashboardView {
                points: Some(points),
                message: format!("You have {} loyalty points.", points),
            },
            None => DashboardView {
                points: None,
                message: "You are not a member of the loyalty program yet.".to_string(),
            },
        };
        Ok(view)
    }

    /// 商品详情页提示段落
    pub fn product_notice(&self) -> Option<String> {
        self.product_notice
            .as_deref()
            .map(|notice| format!("<p>{}</p>", escape_html(notice.trim())))
    }
}

fn parse_points(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok().filter(|points| *points >= 0)
}
