//! Priority queue of pending operations

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::operation::{OpKey, Operation, PriorityLevel};

struct Entry {
    priority: PriorityLevel,
    seq: u64,
    op: Box<dyn Operation>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Max-heap: the most urgent priority, then the oldest entry, compares greatest
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Operations waiting for a link, most urgent first and FIFO within a priority
#[derive(Default)]
pub struct OpQueue {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

impl OpQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an operation
    ///
    /// If an operation with the same key is already waiting, it is kept and
    /// its priority raised to the new one's instead. Returns `false` then.
    pub fn push(&mut self, op: Box<dyn Operation>) -> bool {
        let key = op.key();
        if self.contains(&key) {
            let priority = op.priority();
            let mut entries = std::mem::take(&mut self.heap).into_vec();
            for entry in entries.iter_mut().filter(|e| e.op.key() == key) {
                entry.op.raise_priority(priority);
                entry.priority = entry.op.priority();
            }
            self.heap = BinaryHeap::from(entries);
            debug!("{} {} already queued", key.name, key.device);
            return false;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry {
            priority: op.priority(),
            seq,
            op,
        });
        true
    }

    pub fn pop(&mut self) -> Option<Box<dyn Operation>> {
        self.heap.pop().map(|entry| entry.op)
    }

    pub fn contains(&self, key: &OpKey) -> bool {
        self.heap.iter().any(|entry| entry.op.key() == *key)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Remove every queued operation
    pub fn drain(&mut self) -> Vec<Box<dyn Operation>> {
        std::mem::take(&mut self.heap)
            .into_sorted_vec()
            .into_iter()
            .rev()
            .map(|entry| entry.op)
            .collect()
    }
}
