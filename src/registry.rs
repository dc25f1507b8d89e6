//! Order registry: id allocation plus the pending, VIP and completed queues.

use parking_lot::{Mutex, MutexGuard};
use std::collections::VecDeque;

use crate::order::{Order, OrderId, Priority};

/// Queue state guarded by the registry lock.
#[derive(Debug, Default)]
pub(crate) struct Queues {
    last_id: OrderId,
    pub(crate) pending: VecDeque<Order>,
    pub(crate) pending_vip: VecDeque<Order>,
    pub(crate) completed: Vec<Order>,
}

/// Owns every order that is not currently held by a bot.
///
/// Each operation is a single step under one lock, so ids are handed out in
/// the same order orders land in their queue.
#[derive(Debug, Default)]
pub struct OrderRegistry {
    queues: Mutex<Queues>,
}

impl OrderRegistry {
    /// Create a registry with empty queues. The first order gets id 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an order and append it to the queue selected by `priority`.
    pub fn enqueue(&self, priority: Priority) -> Order {
        let mut queues = self.queues.lock();
        queues.last_id += 1;
        let order = Order::new(queues.last_id, priority);
        match priority {
            Priority::Vip => queues.pending_vip.push_back(order.clone()),
            Priority::Normal => queues.pending.push_back(order.clone()),
        }
        drop(queues);

        metrics::counter!("kitchen_orders_created_total", "priority" => priority.as_str())
            .increment(1);
        log::debug!("Order {} queued", order);
        order
    }

    /// Take the oldest VIP order, falling back to the oldest normal order.
    pub fn dequeue_next(&self) -> Option<Order> {
        let mut queues = self.queues.lock();
        let order = match queues.pending_vip.pop_front() {
            Some(order) => Some(order),
            None => queues.pending.pop_front(),
        };
        if let Some(order) = &order {
            log::debug!("Order {} dequeued", order);
        }
        order
    }

    /// Put an aborted order back at the head of its original queue.
    pub fn requeue_front(&self, order: Order) {
        log::debug!("Order {} requeued at front", order);
        let mut queues = self.queues.lock();
        if order.vip {
            queues.pending_vip.push_front(order);
        } else {
            queues.pending.push_front(order);
        }
    }

    /// Append a finished order. Completed orders are never removed.
    pub fn mark_completed(&self, order: Order) {
        log::debug!("Order {} completed", order);
        self.queues.lock().completed.push(order);
    }

    pub fn pending(&self) -> Vec<Order> {
        self.queues.lock().pending.iter().cloned().collect()
    }

    pub fn pending_vip(&self) -> Vec<Order> {
        self.queues.lock().pending_vip.iter().cloned().collect()
    }

    pub fn completed(&self) -> Vec<Order> {
        self.queues.lock().completed.clone()
    }

    /// Orders waiting in either pending queue.
    pub fn pending_len(&self) -> usize {
        let queues = self.queues.lock();
        queues.pending.len() + queues.pending_vip.len()
    }

    pub fn completed_len(&self) -> usize {
        self.queues.lock().completed.len()
    }

    /// Raw access for consistent multi-structure snapshots.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Queues> {
        self.queues.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(orders: &[Order]) -> Vec<OrderId> {
        orders.iter().map(|o| o.id).collect()
    }

    #[test]
    fn first_normal_order_lands_in_pending() {
        let registry = OrderRegistry::new();
        let order = registry.enqueue(Priority::Normal);

        assert_eq!(order, Order { id: 1, vip: false });
        assert_eq!(ids(&registry.pending()), vec![1]);
        assert!(registry.pending_vip().is_empty());
        assert!(registry.completed().is_empty());
    }

    #[test]
    fn vip_order_beats_earlier_normal_order() {
        let registry = OrderRegistry::new();
        let vip = registry.enqueue(Priority::Vip);
        let normal = registry.enqueue(Priority::Normal);

        assert_eq!(vip.id, 1);
        assert_eq!(normal.id, 2);
        assert_eq!(registry.dequeue_next(), Some(vip));
        assert_eq!(registry.dequeue_next(), Some(normal));
        assert_eq!(registry.dequeue_next(), None);
    }

    #[test]
    fn vip_drained_before_normal_regardless_of_arrival() {
        let registry = OrderRegistry::new();
        registry.enqueue(Priority::Normal);
        registry.enqueue(Priority::Normal);
        registry.enqueue(Priority::Vip);
        registry.enqueue(Priority::Vip);

        let order: Vec<_> = std::iter::from_fn(|| registry.dequeue_next())
            .map(|o| o.id)
            .collect();
        assert_eq!(order, vec![3, 4, 1, 2]);
    }

    #[test]
    fn requeue_front_goes_to_original_queue_head() {
        let registry = OrderRegistry::new();
        let first = registry.enqueue(Priority::Normal);
        registry.enqueue(Priority::Normal);
        let vip = registry.enqueue(Priority::Vip);
        registry.enqueue(Priority::Vip);

        let taken = registry.dequeue_next().expect("vip order");
        assert_eq!(taken, vip);
        registry.requeue_front(taken);
        assert_eq!(ids(&registry.pending_vip()), vec![3, 4]);

        // Drain VIP, then take and return the first normal order.
        registry.dequeue_next();
        registry.dequeue_next();
        let taken = registry.dequeue_next().expect("normal order");
        assert_eq!(taken, first);
        registry.requeue_front(taken);
        assert_eq!(ids(&registry.pending()), vec![1, 2]);
        assert!(registry.pending_vip().is_empty());
    }

    #[test]
    fn completed_is_append_only() {
        let registry = OrderRegistry::new();
        registry.enqueue(Priority::Normal);
        registry.enqueue(Priority::Vip);

        while let Some(order) = registry.dequeue_next() {
            registry.mark_completed(order);
        }
        assert_eq!(ids(&registry.completed()), vec![2, 1]);
        assert_eq!(registry.completed_len(), 2);
        assert_eq!(registry.pending_len(), 0);
    }

    #[test]
    fn ids_are_never_reused_after_requeue() {
        let registry = OrderRegistry::new();
        let order = registry.enqueue(Priority::Normal);
        let taken = registry.dequeue_next().expect("order");
        registry.requeue_front(taken);

        let next = registry.enqueue(Priority::Normal);
        assert!(next.id > order.id);
        assert_eq!(ids(&registry.pending()), vec![1, 2]);
    }
}
