//! Handler layer: the type-keyed dispatch table.

pub mod dispatch;

pub use dispatch::{FnHandler, HandlerTable, MessageHandler};
