// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Background tasks owned by a buffer.
//!
//! - The listener owns the connectivity subscription. It updates the cached
//!   flag and, on each reachable edge, posts a drain request.
//! - The drainer is the single consumer of drain requests and runs cycles
//!   one after another.
//!
//! Both are aborted when [`Tasks`] is dropped. Aborting the listener drops
//! its receiver, which is the unsubscription.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::Shared;
use crate::connectivity::{ConnectivityEvent, ConnectivitySignal};

pub(super) struct Tasks {
    listener: Option<JoinHandle<()>>,
    drainer: Option<JoinHandle<()>>,
}

impl Tasks {
    pub(super) fn spawn<S: ConnectivitySignal>(
        runtime: &Handle,
        shared: Arc<Shared>,
        signal: Arc<S>,
        events: broadcast::Receiver<ConnectivityEvent>,
    ) -> Self {
        let (drain_tx, drain_rx) = mpsc::unbounded_channel();
        let drainer = runtime.spawn(run_drains(Arc::clone(&shared), drain_rx));
        let listener = runtime.spawn(listen(shared, signal, events, drain_tx));
        Tasks {
            listener: Some(listener),
            drainer: Some(drainer),
        }
    }

    /// Unsubscribes, then waits for queued drain requests to finish.
    pub(super) async fn shutdown(mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
            let _ = listener.await;
        }
        // The listener held the only sender, so the drainer exits once the
        // requests already posted have run.
        if let Some(drainer) = self.drainer.take() {
            let _ = drainer.await;
        }
    }
}

impl Drop for Tasks {
    fn drop(&mut self) {
        for handle in [self.listener.take(), self.drainer.take()]
            .into_iter()
            .flatten()
        {
            handle.abort();
        }
    }
}

async fn listen<S: ConnectivitySignal>(
    shared: Arc<Shared>,
    signal: Arc<S>,
    mut events: broadcast::Receiver<ConnectivityEvent>,
    drains: mpsc::UnboundedSender<()>,
) {
    loop {
        let reachable = match events.recv().await {
            Ok(event) => event.is_reachable(),
            Err(RecvError::Lagged(missed)) => {
                warn!(missed, "missed connectivity notifications, resampling");
                signal.is_reachable()
            }
            Err(RecvError::Closed) => {
                debug!("connectivity signal closed");
                break;
            }
        };

        if shared.apply_connectivity(reachable) && drains.send(()).is_err() {
            break;
        }
    }
}

async fn run_drains(shared: Arc<Shared>, mut requests: mpsc::UnboundedReceiver<()>) {
    while requests.recv().await.is_some() {
        shared.drain().await;
    }
}
