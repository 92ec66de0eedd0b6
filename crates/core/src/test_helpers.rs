// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for buffer tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::buffer::{DrainReport, RequestBuffer};
use crate::connectivity::ConnectivityMonitor;

/// Upper bound for anything a test waits on.
pub const WAIT: Duration = Duration::from_secs(5);

/// Records the order in which scripted operations were invoked.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, name: &str) {
        self.0.lock().unwrap().push(name.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|c| *c == name).count()
    }
}

/// An operation that fails its first `fail_times` invocations, then succeeds
/// with its own name.
pub fn scripted(
    log: &CallLog,
    name: &'static str,
    fail_times: u32,
) -> impl Fn() -> BoxFuture<'static, Result<&'static str, String>> + Send + Sync + 'static {
    let log = log.clone();
    let invocations = Arc::new(AtomicU32::new(0));
    move || {
        log.record(name);
        let n = invocations.fetch_add(1, Ordering::SeqCst);
        async move {
            if n < fail_times {
                Err(format!("{name} failed (call {})", n + 1))
            } else {
                Ok(name)
            }
        }
        .boxed()
    }
}

pub fn succeeding(
    log: &CallLog,
    name: &'static str,
) -> impl Fn() -> BoxFuture<'static, Result<&'static str, String>> + Send + Sync + 'static {
    scripted(log, name, 0)
}

pub fn always_failing(
    log: &CallLog,
    name: &'static str,
) -> impl Fn() -> BoxFuture<'static, Result<&'static str, String>> + Send + Sync + 'static {
    scripted(log, name, u32::MAX)
}

/// Flips the monitor and waits until the buffer has observed it.
pub async fn set_reachable(monitor: &ConnectivityMonitor, buffer: &RequestBuffer, reachable: bool) {
    let mut view = buffer.watch();
    monitor.set_reachable(reachable);
    tokio::time::timeout(WAIT, view.wait_for(|v| v.reachable == reachable))
        .await
        .expect("buffer never observed connectivity change")
        .map(|_| ())
        .unwrap();
}

/// Goes online and waits for the resulting drain cycle to finish.
///
/// Only valid when something is pending; empty drains publish no report.
pub async fn go_online_and_drain(monitor: &ConnectivityMonitor, buffer: &RequestBuffer) -> DrainReport {
    let mut reports = buffer.subscribe_reports();
    monitor.set_reachable(true);
    tokio::time::timeout(WAIT, reports.recv())
        .await
        .expect("drain never finished")
        .unwrap()
}
