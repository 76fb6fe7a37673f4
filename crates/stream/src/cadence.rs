use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

// tokio intervals reject a zero period
const MIN_PERIOD: Duration = Duration::from_micros(1);

/// Paces the publish loop at a target rate.
///
/// The first tick completes one period after creation. A cycle that overruns
/// its slot pushes the schedule back instead of bursting to catch up.
pub struct Cadence {
    interval: Interval,
}

impl Cadence {
    pub fn new(period: Duration) -> Self {
        let period = period.max(MIN_PERIOD);
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }

    /// Wait for the next slot.
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}
