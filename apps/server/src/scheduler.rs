//! Background timer that drives rate refreshes.
//!
//! The first tick fires immediately, so the store is refreshed at startup;
//! after that one trigger is issued every period.

use std::time::Duration;

use ratekeeper_core::rates::{RefreshScheduler, TriggerOutcome};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Starts the periodic refresh loop. Abort the handle to stop it.
pub fn start_rate_refresh_scheduler(
    scheduler: RefreshScheduler,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Rate refresh scheduler started ({}s interval)", period.as_secs());

        let mut ticker = interval(period);
        // A late tick is not worth a burst of catch-up refreshes.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            match scheduler.trigger() {
                TriggerOutcome::Started(_) => debug!("Scheduled rate refresh started"),
                TriggerOutcome::Dropped => {
                    info!("Previous rate refresh still running, skipping this tick")
                }
            }
        }
    })
}
