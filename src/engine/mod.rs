//! Kitchen engine: owns the registry and bot pool, and hands queued orders to
//! idle bots whenever an order arrives, a bot joins or leaves, or a bot
//! finishes cooking.

mod snapshot;

pub use snapshot::{BotView, KitchenSnapshot};

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::bot::{completion_channel, Bot, Completion, CompletionReceiver};
use crate::config::KitchenConfig;
use crate::order::{Order, Priority};
use crate::pool::BotPool;
use crate::registry::OrderRegistry;
use crate::Result;

struct Shared {
    registry: Arc<OrderRegistry>,
    pool: Mutex<BotPool>,
}

impl Shared {
    /// Give queued orders to idle bots until one side runs out.
    ///
    /// Every pickup happens under the pool lock, so two dispatches never
    /// race for the same idle bot.
    fn dispatch(&self) -> usize {
        let pool = self.pool.lock();
        let mut claimed = 0;
        while let Some(bot) = pool.find_idle() {
            if bot.pickup_order().is_none() {
                break;
            }
            claimed += 1;
        }
        if claimed > 0 {
            log::debug!("Dispatched {} orders, {} still queued", claimed, self.registry.pending_len());
        }
        claimed
    }

    fn on_completed(&self, completion: Completion) {
        log::info!(
            "Order {} served by bot {} ({})",
            completion.order,
            completion.label,
            completion.bot
        );
        self.dispatch();
    }
}

/// Order-fulfillment simulation driver.
pub struct Kitchen {
    shared: Arc<Shared>,
    shutdown_notify: Arc<Notify>,
    dispatcher: Option<JoinHandle<()>>,
}

impl Kitchen {
    /// Open a kitchen with `config.initial_bots` idle bots.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: KitchenConfig) -> Self {
        let registry = Arc::new(OrderRegistry::new());
        let (events, receiver) = completion_channel();
        let mut pool = BotPool::new(Arc::clone(&registry), config.processing_time(), events);
        for _ in 0..config.initial_bots {
            pool.add();
        }

        let shared = Arc::new(Shared {
            registry,
            pool: Mutex::new(pool),
        });
        let shutdown_notify = Arc::new(Notify::new());
        let dispatcher = tokio::spawn(run_dispatcher(
            Arc::clone(&shared),
            receiver,
            Arc::clone(&shutdown_notify),
        ));

        log::info!(
            "Kitchen open with {} bots, {:?} per order",
            config.initial_bots,
            config.processing_time()
        );
        Self {
            shared,
            shutdown_notify,
            dispatcher: Some(dispatcher),
        }
    }

    /// Queue a new order and start it right away if a bot is idle.
    pub fn add_order(&self, priority: Priority) -> Order {
        let order = self.shared.registry.enqueue(priority);
        log::info!("Order {} received", order);
        self.shared.dispatch();
        order
    }

    /// Add a bot; it immediately picks up pending work if there is any.
    pub fn add_bot(&self) -> Arc<Bot> {
        let bot = self.shared.pool.lock().add();
        self.shared.dispatch();
        bot
    }

    /// Remove the newest bot. Its order, if any, goes back to the front of its
    /// queue and is offered to the remaining idle bots.
    pub fn remove_bot(&self) -> Result<(Arc<Bot>, Option<Order>)> {
        let removed = self.shared.pool.lock().remove();
        match &removed {
            Ok((_, Some(_))) => {
                self.shared.dispatch();
            }
            Ok((_, None)) => {}
            Err(e) => log::warn!("Bot removal refused: {}", e),
        }
        removed
    }

    pub fn registry(&self) -> &OrderRegistry {
        &self.shared.registry
    }

    pub fn bot_count(&self) -> usize {
        self.shared.pool.lock().len()
    }

    /// Consistent view of every queue and every bot.
    pub fn snapshot(&self) -> KitchenSnapshot {
        let pool = self.shared.pool.lock();
        KitchenSnapshot::capture(&pool, &self.shared.registry)
    }

    /// Stop reacting to completions. Bots still cooking finish into the
    /// completed queue but no new orders are handed out.
    pub async fn shutdown(mut self) {
        self.shutdown_notify.notify_one();
        if let Some(dispatcher) = self.dispatcher.take() {
            if let Err(e) = dispatcher.await {
                log::error!("Dispatcher task failed: {}", e);
            }
        }
        log::info!("Kitchen closed");
    }
}

impl Drop for Kitchen {
    /// A kitchen dropped without `shutdown()` stops dispatching as well.
    fn drop(&mut self) {
        if let Some(dispatcher) = self.dispatcher.take() {
            self.shutdown_notify.notify_one();
            dispatcher.abort();
            log::debug!("Kitchen dropped, dispatcher aborted");
        }
    }
}

async fn run_dispatcher(
    shared: Arc<Shared>,
    mut receiver: CompletionReceiver,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            completion = receiver.recv() => {
                match completion {
                    Some(completion) => shared.on_completed(completion),
                    None => break,
                }
            }
            _ = shutdown.notified() => {
                break;
            }
        }
    }
    log::debug!("Dispatcher stopped");
}
