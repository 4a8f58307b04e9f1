//! 领域模型定义

mod caller;
mod cart;
mod loyalty;

pub use caller::{Caller, Capability};
pub use cart::{CartItem, OrderItem, OrderItemMeta, SummaryRow};
pub use loyalty::{LoyaltyRecord, LoyaltyStatus};
