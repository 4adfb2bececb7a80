//! Time-ordered queue of actions due later on the simulation clock

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Queue entry
#[derive(Debug, Clone)]
struct Scheduled<T> {
    at_ms: f64,
    seq: u64,
    action: T,
}

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> Ord for Scheduled<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; equal times pop in insertion order
        other
            .at_ms
            .total_cmp(&self.at_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of `(fire_at, seq, action)`
#[derive(Debug, Clone)]
pub struct DeferredQueue<T> {
    heap: BinaryHeap<Scheduled<T>>,
    next_seq: u64,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at_ms: f64, action: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Scheduled { at_ms, seq, action });
    }

    /// Pop the earliest action if it is due at `now_ms`
    pub fn pop_due(&mut self, now_ms: f64) -> Option<T> {
        if self.heap.peek()?.at_ms > now_ms {
            return None;
        }
        self.heap.pop().map(|entry| entry.action)
    }

    /// Time of the earliest pending action
    pub fn next_due(&self) -> Option<f64> {
        self.heap.peek().map(|entry| entry.at_ms)
    }

    /// Drop every action for which `keep` returns false
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.heap.retain(|entry| keep(&entry.action));
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_time_order() {
        let mut q = DeferredQueue::new();
        q.schedule(300.0, "c");
        q.schedule(100.0, "a");
        q.schedule(200.0, "b");

        assert_eq!(q.next_due(), Some(100.0));
        assert_eq!(q.pop_due(250.0), Some("a"));
        assert_eq!(q.pop_due(250.0), Some("b"));
        assert_eq!(q.pop_due(250.0), None);
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop_due(300.0), Some("c"));
        assert!(q.is_empty());
    }

    #[test]
    fn test_ties_are_fifo() {
        let mut q = DeferredQueue::new();
        for i in 0..5 {
            q.schedule(50.0, i);
        }
        let drained: Vec<_> = std::iter::from_fn(|| q.pop_due(50.0)).collect();
        assert_eq!(drained, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_retain_and_clear() {
        let mut q = DeferredQueue::new();
        q.schedule(10.0, 1u32);
        q.schedule(20.0, 2);
        q.schedule(30.0, 1);
        q.retain(|owner| *owner != 1);
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop_due(100.0), Some(2));

        q.schedule(5.0, 3);
        q.clear();
        assert!(q.pop_due(f64::MAX).is_none());
    }
}
