//! Cooking bot: claims one order at a time from the registry, holds it for the
//! processing time, then completes it.
//!
//! Each claim carries a ticket. The timer task spawned by
//! [`Bot::pickup_order`] only completes the order if the slot still holds the
//! same ticket when it wakes up, so a bot that was stripped of its order
//! (see [`Bot::return_order`]) never completes it afterwards.

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use uuid::Uuid;

use crate::order::Order;
use crate::registry::OrderRegistry;

/// Durable bot identity. Unlike the display label it is never shared by two
/// bots, even after removals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BotId(Uuid);

impl BotId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Emitted once per completed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub order: Order,
    pub bot: BotId,
    pub label: usize,
}

pub type CompletionSender = mpsc::UnboundedSender<Completion>;
pub type CompletionReceiver = mpsc::UnboundedReceiver<Completion>;

/// Channel bots report completions on.
pub fn completion_channel() -> (CompletionSender, CompletionReceiver) {
    mpsc::unbounded_channel()
}

#[derive(Debug)]
pub(crate) struct Claim {
    pub(crate) order: Order,
    ticket: u64,
    started_at: Instant,
}

/// Current-order slot. Empty means idle.
#[derive(Debug, Default)]
pub(crate) struct Slot {
    pub(crate) claim: Option<Claim>,
    last_ticket: u64,
}

pub struct Bot {
    id: BotId,
    label: usize,
    processing_time: Duration,
    registry: Arc<OrderRegistry>,
    events: CompletionSender,
    slot: Mutex<Slot>,
}

impl Bot {
    /// Create an idle bot that takes work from `registry` and reports on `events`.
    pub fn new(
        label: usize,
        registry: Arc<OrderRegistry>,
        processing_time: Duration,
        events: CompletionSender,
    ) -> Self {
        Self {
            id: BotId::new(),
            label,
            processing_time,
            registry,
            events,
            slot: Mutex::new(Slot::default()),
        }
    }

    pub fn id(&self) -> BotId {
        self.id
    }

    /// Position in the pool at creation time. Display only.
    pub fn label(&self) -> usize {
        self.label
    }

    pub fn processing_time(&self) -> Duration {
        self.processing_time
    }

    pub fn current_order(&self) -> Option<Order> {
        self.slot.lock().claim.as_ref().map(|c| c.order.clone())
    }

    pub fn is_idle(&self) -> bool {
        self.slot.lock().claim.is_none()
    }

    /// Claim the next order and start cooking it.
    ///
    /// Returns the claimed order. Returns `None` without side effects when the
    /// bot is already cooking or nothing is queued. The cook timer runs on the
    /// current tokio runtime.
    pub fn pickup_order(self: &Arc<Self>) -> Option<Order> {
        let mut slot = self.slot.lock();
        if let Some(claim) = &slot.claim {
            log::debug!(
                "Bot {} is already cooking order {}, pickup ignored",
                self.label,
                claim.order
            );
            return None;
        }
        let order = self.registry.dequeue_next()?;
        slot.last_ticket += 1;
        let ticket = slot.last_ticket;
        slot.claim = Some(Claim {
            order: order.clone(),
            ticket,
            started_at: Instant::now(),
        });
        drop(slot);

        log::info!("Bot {} picked up order {}", self.label, order);
        let bot = Arc::clone(self);
        tokio::spawn(async move {
            time::sleep(bot.processing_time).await;
            bot.finish(ticket);
        });
        Some(order)
    }

    /// Timer callback. Completes the order only if claim `ticket` is still held.
    fn finish(&self, ticket: u64) {
        let mut slot = self.slot.lock();
        let claim = match slot.claim.take() {
            Some(claim) if claim.ticket == ticket => claim,
            other => {
                slot.claim = other;
                log::debug!(
                    "Bot {} no longer owns claim {}, completion skipped",
                    self.label,
                    ticket
                );
                return;
            }
        };
        self.registry.mark_completed(claim.order.clone());
        drop(slot);

        metrics::counter!("kitchen_orders_completed_total").increment(1);
        log::info!(
            "Bot {} completed order {} in {:?}",
            self.label,
            claim.order,
            claim.started_at.elapsed()
        );

        let completion = Completion {
            order: claim.order,
            bot: self.id,
            label: self.label,
        };
        if let Err(e) = self.events.send(completion) {
            log::warn!(
                "Completion of order {} by bot {} was not delivered: {}",
                e.0.order,
                self.label,
                e
            );
        }
    }

    /// Abort the current order and put it back at the front of its queue.
    ///
    /// Returns the aborted order, or `None` if the bot was idle. A timer still
    /// running for the aborted claim will find it gone and do nothing.
    pub fn return_order(&self) -> Option<Order> {
        let mut slot = self.slot.lock();
        let claim = slot.claim.take()?;
        self.registry.requeue_front(claim.order.clone());
        drop(slot);

        metrics::counter!("kitchen_orders_returned_total").increment(1);
        log::info!("Bot {} returned order {}", self.label, claim.order);
        Some(claim.order)
    }

    pub(crate) fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock()
    }
}

impl fmt::Debug for Bot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bot")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("order", &self.current_order())
            .finish()
    }
}
