//! Order Channel
//!
//! Bounded single-producer/single-consumer queue carrying `DspOrder` updates
//! from the control thread to the audio thread. Both ends are wait-free; the
//! ring buffer keeps independent atomic read and write cursors.
//!
//! A full queue drops the new update and reports it to the producer. The
//! consumer drains everything pending at block start and keeps only the last
//! entry.

use rtrb::{Consumer, Producer, RingBuffer};

use crate::dsp::DspOrder;

/// Default number of pending orders the channel can hold
pub const DEFAULT_ORDER_CAPACITY: usize = 8;

/// Create a connected sender/receiver pair holding up to `capacity` orders
pub fn order_channel(capacity: usize) -> (OrderSender, OrderReceiver) {
    let capacity = capacity.max(1);
    let (tx, rx) = RingBuffer::<DspOrder>::new(capacity);
    (OrderSender { tx, capacity }, OrderReceiver { rx })
}

/// Control-thread end of the Order Channel
pub struct OrderSender {
    tx: Producer<DspOrder>,
    capacity: usize,
}

impl OrderSender {
    /// Enqueue an order without blocking.
    ///
    /// Returns `false` if the channel was full and the order was dropped.
    pub fn push(&mut self, order: DspOrder) -> bool {
        self.tx.push(order).is_ok()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True once the receiver has been dropped
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_abandoned()
    }
}

/// Audio-thread end of the Order Channel
pub struct OrderReceiver {
    rx: Consumer<DspOrder>,
}

impl OrderReceiver {
    /// Take the oldest pending order, `None` if the channel is empty
    #[inline]
    pub fn pull(&mut self) -> Option<DspOrder> {
        self.rx.pop().ok()
    }

    /// Take every pending order and return the newest one.
    ///
    /// `None` means nothing arrived and the caller keeps its current order.
    #[inline]
    pub fn drain_latest(&mut self) -> Option<DspOrder> {
        let mut latest = None;
        while let Ok(order) = self.rx.pop() {
            latest = Some(order);
        }
        latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::EffectKind;

    fn order(kinds: &[EffectKind]) -> DspOrder {
        DspOrder::from_kinds(kinds).unwrap()
    }

    #[test]
    fn test_pull_is_fifo() {
        let (mut tx, mut rx) = order_channel(4);
        let a = order(&[EffectKind::Chorus]);
        let b = order(&[EffectKind::Phaser]);
        assert!(tx.push(a));
        assert!(tx.push(b));

        assert_eq!(rx.pull(), Some(a));
        assert_eq!(rx.pull(), Some(b));
        assert_eq!(rx.pull(), None);
    }

    #[test]
    fn test_drain_keeps_newest() {
        let (mut tx, mut rx) = order_channel(8);
        let a = order(&[EffectKind::Chorus]);
        let b = order(&[EffectKind::Overdrive, EffectKind::Phaser]);
        let c = order(&[EffectKind::GeneralFilter]);
        for o in [a, b, c] {
            assert!(tx.push(o));
        }

        assert_eq!(rx.drain_latest(), Some(c));
        assert_eq!(rx.pull(), None);
        assert_eq!(rx.drain_latest(), None);
    }

    #[test]
    fn test_full_channel_drops_update() {
        let (mut tx, mut rx) = order_channel(2);
        assert_eq!(tx.capacity(), 2);
        assert!(tx.push(DspOrder::default()));
        assert!(tx.push(DspOrder::empty()));
        assert!(!tx.push(order(&[EffectKind::Chorus])));

        // The dropped entry never shows up
        assert_eq!(rx.drain_latest(), Some(DspOrder::empty()));
        assert!(tx.push(order(&[EffectKind::Chorus])));
    }

    #[test]
    fn test_default_order_is_delivered() {
        let (mut tx, mut rx) = order_channel(1);
        assert!(tx.push(DspOrder::default()));
        assert_eq!(rx.drain_latest(), Some(DspOrder::default()));
    }

    #[test]
    fn test_zero_capacity_is_rounded_up() {
        let (tx, _rx) = order_channel(0);
        assert_eq!(tx.capacity(), 1);
    }

    #[test]
    fn test_abandoned_when_receiver_dropped() {
        let (tx, rx) = order_channel(2);
        assert!(!tx.is_abandoned());
        drop(rx);
        assert!(tx.is_abandoned());
    }
}
