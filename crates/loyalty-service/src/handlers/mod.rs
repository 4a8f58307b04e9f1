//! HTTP 请求处理器模块
//!
//! 每个处理器对应宿主商城的一个扩展点

pub mod account;
pub mod cart;
pub mod health;
pub mod pricing;
