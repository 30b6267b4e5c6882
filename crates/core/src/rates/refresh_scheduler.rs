//! Refresh cycle state machine.
//!
//! At most one refresh cycle is in flight. A trigger that arrives while a
//! cycle runs is dropped rather than queued, so a slow source never builds up
//! a backlog of cycles.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, error, info, warn};
use ratekeeper_market_data::RetryClass;
use tokio::task::JoinHandle;

use super::rates_errors::RatesError;
use super::rates_traits::RefreshServiceTrait;
use crate::errors::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

#[derive(Debug)]
pub enum TriggerOutcome {
    /// A new cycle was spawned.
    Started(JoinHandle<()>),
    /// A cycle was already running; nothing happened.
    Dropped,
}

impl TriggerOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, TriggerOutcome::Started(_))
    }
}

/// Clears the running flag when a cycle ends, including by panic.
struct RunningGuard {
    running: Arc<AtomicBool>,
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct RefreshScheduler {
    service: Arc<dyn RefreshServiceTrait>,
    running: Arc<AtomicBool>,
    completed_cycles: Arc<AtomicU64>,
}

impl RefreshScheduler {
    pub fn new(service: Arc<dyn RefreshServiceTrait>) -> Self {
        Self {
            service,
            running: Arc::new(AtomicBool::new(false)),
            completed_cycles: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.running.load(Ordering::Acquire) {
            SchedulerState::Running
        } else {
            SchedulerState::Idle
        }
    }

    /// Cycles that ran to completion, successful or not.
    pub fn completed_cycles(&self) -> u64 {
        self.completed_cycles.load(Ordering::Acquire)
    }

    /// Starts a cycle unless one is already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn trigger(&self) -> TriggerOutcome {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Refresh already in progress, dropping trigger");
            return TriggerOutcome::Dropped;
        }

        let guard = RunningGuard {
            running: self.running.clone(),
        };
        let service = self.service.clone();
        let completed = self.completed_cycles.clone();

        TriggerOutcome::Started(tokio::spawn(async move {
            let _guard = guard;
            match service.refresh().await {
                Ok(report) => info!(
                    "Rate refresh completed: {} stored, {} skipped (captured at {}, {} published at {})",
                    report.stored,
                    report.skipped.len(),
                    report.captured_at.to_rfc3339(),
                    report.source,
                    report.published_at.to_rfc3339()
                ),
                Err(e) => log_cycle_failure(&e),
            }
            completed.fetch_add(1, Ordering::AcqRel);
        }))
    }
}

fn log_cycle_failure(err: &Error) {
    match err {
        Error::Rates(RatesError::SourceUnavailable(source)) => match source.retry_class() {
            RetryClass::NextCycle => warn!("Rate refresh failed, will retry next cycle: {}", err),
            RetryClass::Never => error!(
                "Rate refresh failed and will keep failing until reconfigured: {}",
                err
            ),
        },
        _ => error!("Rate refresh failed: {}", err),
    }
}
