// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Background location tracker.
//!
//! Runs one tracking cycle over every registered user, sleeps for a fixed
//! interval, and repeats until stopped. The interval is measured from the end
//! of one cycle to the start of the next, so slow cycles push later ones back.

use crate::services::TourGuideService;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Lifecycle of the tracker task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Idle,
    Running,
    Sleeping,
    Stopped,
}

/// Periodic location tracker owning a cancellable background task.
pub struct Tracker {
    service: TourGuideService,
    interval: Duration,
    shutdown_tx: watch::Sender<bool>,
    state_tx: Arc<watch::Sender<TrackerState>>,
    cycles: Arc<AtomicU64>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Tracker {
    /// Create an idle tracker. Call [`Tracker::start`] to begin tracking.
    pub fn new(service: TourGuideService, interval: Duration) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        let (state_tx, _) = watch::channel(TrackerState::Idle);
        Self {
            service,
            interval,
            shutdown_tx,
            state_tx: Arc::new(state_tx),
            cycles: Arc::new(AtomicU64::new(0)),
            handle: Mutex::new(None),
        }
    }

    /// Spawn the tracking task. Does nothing unless the tracker is idle.
    pub fn start(&self) {
        let mut handle = self.handle.lock();
        if *self.state_tx.borrow() != TrackerState::Idle {
            tracing::warn!(state = ?self.state(), "Tracker already started");
            return;
        }
        self.state_tx.send_replace(TrackerState::Running);

        let worker = TrackerWorker {
            service: self.service.clone(),
            interval: self.interval,
            shutdown: self.shutdown_tx.subscribe(),
            state_tx: Arc::clone(&self.state_tx),
            cycles: Arc::clone(&self.cycles),
        };
        *handle = Some(tokio::spawn(worker.run()));
        tracing::info!(interval_secs = self.interval.as_secs(), "Tracker started");
    }

    pub fn state(&self) -> TrackerState {
        *self.state_tx.borrow()
    }

    /// Watch state transitions.
    pub fn subscribe_state(&self) -> watch::Receiver<TrackerState> {
        self.state_tx.subscribe()
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    /// Signal the task to stop and wait for it to exit.
    ///
    /// An in-flight cycle is abandoned, not rolled back. Safe to call more
    /// than once and on a tracker that was never started.
    pub async fn stop_tracking(&self) {
        self.shutdown_tx.send_replace(true);

        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Tracker task failed");
            }
            tracing::info!(cycles = self.cycles_completed(), "Tracker stopped");
        }
        self.state_tx.send_replace(TrackerState::Stopped);
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        self.shutdown_tx.send_replace(true);
    }
}

/// State moved into the spawned task.
struct TrackerWorker {
    service: TourGuideService,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
    state_tx: Arc<watch::Sender<TrackerState>>,
    cycles: Arc<AtomicU64>,
}

impl TrackerWorker {
    async fn run(mut self) {
        loop {
            if *self.shutdown.borrow() {
                tracing::debug!("Tracker stopping");
                break;
            }

            self.state_tx.send_replace(TrackerState::Running);
            let users = self.service.users().all_users();
            tracing::debug!(users = users.len(), "Begin tracker cycle");
            let started = Instant::now();

            tokio::select! {
                _ = self.shutdown.changed() => {
                    tracing::debug!("Tracker interrupted during cycle");
                    break;
                }
                result = self.service.track_all_users(&users) => match result {
                    Ok(report) => tracing::debug!(
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        located = report.located,
                        location_failures = report.location_failures.len(),
                        rewards_added = report.rewards.rewards_added,
                        "Tracker cycle complete"
                    ),
                    Err(e) => tracing::error!(
                        error = %e,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Tracker cycle failed"
                    ),
                }
            }
            self.cycles.fetch_add(1, Ordering::Relaxed);

            self.state_tx.send_replace(TrackerState::Sleeping);
            tracing::debug!("Tracker sleeping");
            tokio::select! {
                _ = self.shutdown.changed() => {
                    tracing::debug!("Tracker woken for shutdown");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        self.state_tx.send_replace(TrackerState::Stopped);
    }
}
