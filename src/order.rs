//! Order model shared by the registry, bots and snapshots.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order identifier. Starts at 1 and is never reused within a registry.
pub type OrderId = u64;

/// Which pending queue an order is created in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Normal,
    Vip,
}

impl From<bool> for Priority {
    fn from(vip: bool) -> Self {
        if vip {
            Priority::Vip
        } else {
            Priority::Normal
        }
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::Vip => "vip",
        }
    }
}

/// A unit of work. The VIP flag is fixed at creation and decides which queue
/// the order returns to if its bot is removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub vip: bool,
}

impl Order {
    pub(crate) fn new(id: OrderId, priority: Priority) -> Self {
        Self {
            id,
            vip: priority == Priority::Vip,
        }
    }

    pub fn priority(&self) -> Priority {
        Priority::from(self.vip)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.vip {
            write!(f, "#{} (VIP)", self.id)
        } else {
            write!(f, "#{}", self.id)
        }
    }
}
