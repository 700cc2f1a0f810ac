use std::time::Duration;

use chrono::Utc;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::{services::poll_service::run_scheduled_reset, state::SharedState};

/// Check the wall clock against the stored reset time every `period`, forever.
///
/// Runs independently of any connection, so the weekly rollover happens even
/// when nobody is connected.
pub async fn run(state: SharedState, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(period_secs = period.as_secs(), "reset scheduler started");

    loop {
        ticker.tick().await;
        if !run_scheduled_reset(&state, Utc::now()).await {
            debug!("scheduled reset not due yet");
        }
    }
}
