// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory FIFO of operations waiting for connectivity.
//!
//! Membership only changes in three ways: append on submit, take-all when a
//! drain starts, and restore when it ends. Nothing is ever reordered.

use std::collections::VecDeque;

use crate::operation::{PendingRequest, QueuedEntry};

/// Ordered queue of pending entries.
#[derive(Debug, Default)]
pub(crate) struct OfflineQueue {
    entries: VecDeque<QueuedEntry>,
}

impl OfflineQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends an entry at the tail.
    pub(crate) fn enqueue(&mut self, entry: QueuedEntry) {
        self.entries.push_back(entry);
    }

    /// Read-model projection of every entry, in queue order.
    pub(crate) fn pending(&self) -> Vec<PendingRequest> {
        self.entries.iter().map(QueuedEntry::to_pending).collect()
    }

    /// Removes every entry, returning them in queue order.
    ///
    /// This is the drain snapshot: the caller owns the entries by value and
    /// the visible queue is empty afterwards.
    pub(crate) fn take_all(&mut self) -> Vec<QueuedEntry> {
        self.entries.drain(..).collect()
    }

    /// Puts requeued entries back ahead of anything appended since the
    /// matching [`take_all`](Self::take_all).
    pub(crate) fn restore(&mut self, requeued: Vec<QueuedEntry>) {
        let arrived = std::mem::take(&mut self.entries);
        self.entries = requeued.into_iter().chain(arrived).collect();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
