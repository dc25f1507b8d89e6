//! Serializable point-in-time view of queues and bots.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bot::BotId;
use crate::order::{Order, OrderId};
use crate::pool::BotPool;
use crate::registry::OrderRegistry;

/// One bot as seen by a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotView {
    pub id: BotId,
    pub label: usize,
    pub order: Option<Order>,
}

/// Point-in-time view of the whole kitchen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitchenSnapshot {
    pub pending: Vec<Order>,
    pub pending_vip: Vec<Order>,
    pub completed: Vec<Order>,
    pub bots: Vec<BotView>,
}

impl KitchenSnapshot {
    /// Every slot is locked in pool order before the registry, matching the
    /// lock order bots use, so no order is seen twice or missed mid-move.
    pub(crate) fn capture(pool: &BotPool, registry: &OrderRegistry) -> Self {
        let slots: Vec<_> = pool.bots().iter().map(|bot| bot.lock_slot()).collect();
        let queues = registry.lock();

        let bots = pool
            .bots()
            .iter()
            .zip(&slots)
            .map(|(bot, slot)| BotView {
                id: bot.id(),
                label: bot.label(),
                order: slot.claim.as_ref().map(|c| c.order.clone()),
            })
            .collect();

        Self {
            pending: queues.pending.iter().cloned().collect(),
            pending_vip: queues.pending_vip.iter().cloned().collect(),
            completed: queues.completed.clone(),
            bots,
        }
    }

    /// Ids of every order, wherever it currently is.
    pub fn all_order_ids(&self) -> Vec<OrderId> {
        self.pending_vip
            .iter()
            .chain(&self.pending)
            .chain(self.bots.iter().filter_map(|b| b.order.as_ref()))
            .chain(&self.completed)
            .map(|o| o.id)
            .collect()
    }

    pub fn idle_bots(&self) -> usize {
        self.bots.iter().filter(|b| b.order.is_none()).count()
    }
}

fn write_ids(f: &mut fmt::Formatter<'_>, name: &str, orders: &[Order]) -> fmt::Result {
    let ids: Vec<String> = orders.iter().map(|o| o.id.to_string()).collect();
    writeln!(f, "{}=[{}]", name, ids.join(","))
}

impl fmt::Display for KitchenSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_ids(f, "pending", &self.pending)?;
        write_ids(f, "vip", &self.pending_vip)?;
        write_ids(f, "completed", &self.completed)?;
        for bot in &self.bots {
            match &bot.order {
                Some(order) => writeln!(f, "bot {}: {}", bot.label, order)?,
                None => writeln!(f, "bot {}: idle", bot.label)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_queues_then_bots() {
        let snapshot = KitchenSnapshot {
            pending: vec![Order { id: 2, vip: false }, Order { id: 4, vip: false }],
            pending_vip: vec![Order { id: 3, vip: true }],
            completed: vec![Order { id: 1, vip: false }],
            bots: vec![
                BotView {
                    id: BotId::new(),
                    label: 0,
                    order: Some(Order { id: 5, vip: true }),
                },
                BotView {
                    id: BotId::new(),
                    label: 1,
                    order: None,
                },
            ],
        };

        assert_eq!(
            snapshot.to_string(),
            "pending=[2,4]\nvip=[3]\ncompleted=[1]\nbot 0: #5 (VIP)\nbot 1: idle\n"
        );
        assert_eq!(snapshot.all_order_ids(), vec![3, 2, 4, 5, 1]);
        assert_eq!(snapshot.idle_bots(), 1);
    }
}
