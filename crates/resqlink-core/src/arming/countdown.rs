use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Ticks between arming and dispatch.
pub const COUNTDOWN_TICKS: u32 = 5;

/// Time between two ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Repeating countdown timer owned by the arming controller.
///
/// The timer only exists while the controller is armed. Dropping it stops
/// the schedule, so no tick can be delivered after expiry, cancel or
/// controller teardown.
#[derive(Debug)]
pub(crate) struct CountdownTimer {
    ticker: Interval,
}

impl CountdownTimer {
    /// First tick fires one `period` from now, not immediately.
    pub(crate) fn start(period: Duration) -> Self {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::trace!(?period, "Countdown timer started");
        Self { ticker }
    }

    pub(crate) async fn tick(&mut self) -> Instant {
        self.ticker.tick().await
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        tracing::trace!("Countdown timer released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_one_period() {
        let start = Instant::now();
        let mut timer = CountdownTimer::start(TICK_PERIOD);
        let first = timer.tick().await;
        let second = timer.tick().await;
        assert_eq!(first - start, TICK_PERIOD);
        assert_eq!(second - first, TICK_PERIOD);
    }
}
