//! KitchenPool core library: order queues, cooking bots and the dispatcher that
//! connects them.
//!
//! Orders are created by an [`OrderRegistry`] into a normal or a VIP queue. Bots
//! held by a [`BotPool`] claim the next order (VIP first), cook it for a fixed
//! duration and push it to the completed queue. Removing a bot mid-cook hands
//! its order back to the front of the queue it came from.

pub mod bot;
pub mod config;
pub mod engine;
pub mod order;
pub mod pool;
pub mod registry;

/// Library error type
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PoolError {
    #[error("cannot remove a bot from an empty pool")]
    EmptyPool,

    #[error("invalid value {value:?} for {key}")]
    Config { key: String, value: String },
}

pub type Result<T> = std::result::Result<T, PoolError>;

// Public interface re-exports
pub use bot::{completion_channel, Bot, BotId, Completion, CompletionReceiver, CompletionSender};
pub use config::KitchenConfig;
pub use engine::{BotView, Kitchen, KitchenSnapshot};
pub use order::{Order, OrderId, Priority};
pub use pool::BotPool;
pub use registry::OrderRegistry;
