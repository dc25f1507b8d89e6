//! Bot pool: the ordered set of active bots.

use std::sync::Arc;
use std::time::Duration;

use crate::bot::{Bot, BotId, CompletionSender};
use crate::order::Order;
use crate::registry::OrderRegistry;
use crate::{PoolError, Result};

/// Active bots in creation order. Bots are removed newest first.
pub struct BotPool {
    bots: Vec<Arc<Bot>>,
    registry: Arc<OrderRegistry>,
    processing_time: Duration,
    events: CompletionSender,
}

impl BotPool {
    /// Create an empty pool. New bots cook for `processing_time` and report
    /// completions on `events`.
    pub fn new(
        registry: Arc<OrderRegistry>,
        processing_time: Duration,
        events: CompletionSender,
    ) -> Self {
        Self {
            bots: Vec::new(),
            registry,
            processing_time,
            events,
        }
    }

    /// Append a new idle bot labelled with its position.
    pub fn add(&mut self) -> Arc<Bot> {
        let bot = Arc::new(Bot::new(
            self.bots.len(),
            Arc::clone(&self.registry),
            self.processing_time,
            self.events.clone(),
        ));
        self.bots.push(Arc::clone(&bot));
        metrics::gauge!("kitchen_bots").set(self.bots.len() as f64);
        log::info!("Bot {} ({}) added", bot.label(), bot.id());
        bot
    }

    /// Remove the newest bot, returning any order it was cooking to its queue.
    ///
    /// Callers must not remove from an empty pool; doing so is reported as
    /// [`PoolError::EmptyPool`].
    pub fn remove(&mut self) -> Result<(Arc<Bot>, Option<Order>)> {
        let bot = self.bots.pop().ok_or(PoolError::EmptyPool)?;
        let order = bot.return_order();
        metrics::gauge!("kitchen_bots").set(self.bots.len() as f64);
        match &order {
            Some(order) => log::info!("Bot {} removed, order {} returned", bot.label(), order),
            None => log::info!("Bot {} removed while idle", bot.label()),
        }
        Ok((bot, order))
    }

    /// First idle bot in creation order.
    pub fn find_idle(&self) -> Option<Arc<Bot>> {
        self.bots.iter().find(|bot| bot.is_idle()).cloned()
    }

    pub fn get(&self, id: BotId) -> Option<Arc<Bot>> {
        self.bots.iter().find(|bot| bot.id() == id).cloned()
    }

    pub fn bots(&self) -> &[Arc<Bot>] {
        &self.bots
    }

    pub fn len(&self) -> usize {
        self.bots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bots.is_empty()
    }
}
