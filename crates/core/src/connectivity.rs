// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity signal abstraction.
//!
//! The buffer never probes the network itself. It reads a boolean once at
//! creation and then follows edge-triggered notifications. Subscribing hands
//! out a broadcast receiver; dropping that receiver is the unsubscription.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

/// Capacity of the edge notification channel.
const EVENT_CAPACITY: usize = 64;

/// An edge in the connectivity state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    /// The network became reachable.
    Reachable,
    /// The network became unreachable.
    Unreachable,
}

impl ConnectivityEvent {
    /// Returns the event for a target state.
    pub fn from_reachable(reachable: bool) -> Self {
        if reachable {
            ConnectivityEvent::Reachable
        } else {
            ConnectivityEvent::Unreachable
        }
    }

    pub fn is_reachable(self) -> bool {
        self == ConnectivityEvent::Reachable
    }
}

/// Source of connectivity state and edge notifications.
///
/// Implementations must emit an event for every state change, in order.
pub trait ConnectivitySignal: Send + Sync + 'static {
    /// Current state, used to seed the buffer and to resynchronize after
    /// missed notifications.
    fn is_reachable(&self) -> bool;

    /// Registers a new listener for edge notifications.
    fn subscribe(&self) -> broadcast::Receiver<ConnectivityEvent>;
}

/// A connectivity signal driven by the host.
///
/// Hosts forward their platform's reachability callbacks into
/// [`set_reachable`](ConnectivityMonitor::set_reachable); repeated reports of
/// the same state are swallowed so listeners only ever see real edges.
pub struct ConnectivityMonitor {
    /// Guards the flag and the matching send, so the last event emitted
    /// always agrees with the stored state.
    reachable: Mutex<bool>,
    events: broadcast::Sender<ConnectivityEvent>,
}

impl ConnectivityMonitor {
    /// Creates a monitor with the given initial state.
    pub fn new(reachable: bool) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        ConnectivityMonitor {
            reachable: Mutex::new(reachable),
            events,
        }
    }

    /// Updates the state, notifying listeners if it changed.
    ///
    /// Returns true if an edge was emitted.
    pub fn set_reachable(&self, reachable: bool) -> bool {
        let mut current = self.state();
        if *current == reachable {
            return false;
        }
        *current = reachable;
        tracing::debug!(reachable, "connectivity changed");
        // No listeners is fine, the state is still recorded.
        let _ = self.events.send(ConnectivityEvent::from_reachable(reachable));
        true
    }

    fn state(&self) -> MutexGuard<'_, bool> {
        self.reachable.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConnectivitySignal for ConnectivityMonitor {
    fn is_reachable(&self) -> bool {
        *self.state()
    }

    fn subscribe(&self) -> broadcast::Receiver<ConnectivityEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
