//! Bounded polling used instead of fixed sleeps while a results page renders.

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::config::TimingConfig;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitConfig {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl WaitConfig {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self { timeout, poll_interval }
    }

    pub fn initial_settle(timing: &TimingConfig) -> Self {
        Self::new(timing.initial_settle, timing.poll_interval)
    }

    pub fn scroll_settle(timing: &TimingConfig) -> Self {
        Self::new(timing.scroll_settle, timing.poll_interval)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaitOutcome {
    Satisfied { polls: u32, last_count: usize },
    TimedOut { polls: u32, last_count: usize },
}

impl WaitOutcome {
    pub fn last_count(&self) -> usize {
        match self {
            WaitOutcome::Satisfied { last_count, .. } | WaitOutcome::TimedOut { last_count, .. } => *last_count,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        matches!(self, WaitOutcome::Satisfied { .. })
    }
}

/// Polls `probe` until `done(previous, current)` holds or the timeout elapses.
/// `previous` is `None` on the first poll. A failed probe counts as zero
/// elements, so a page that re-renders mid-wait is polled again.
pub async fn wait_for_count<P, F, D>(config: WaitConfig, mut probe: P, mut done: D) -> WaitOutcome
where
    P: FnMut() -> F,
    F: Future<Output = Result<usize>>,
    D: FnMut(Option<usize>, usize) -> bool,
{
    let deadline = Instant::now() + config.timeout;
    let mut previous = None;
    let mut polls = 0;

    loop {
        let current = match probe().await {
            Ok(count) => count,
            Err(e) => {
                debug!("Element count probe failed, treating as empty: {}", e);
                0
            }
        };
        polls += 1;

        if done(previous, current) {
            debug!("Wait satisfied after {} polls with count {}", polls, current);
            return WaitOutcome::Satisfied { polls, last_count: current };
        }

        let now = Instant::now();
        if now >= deadline {
            debug!("Wait timed out after {} polls with count {}", polls, current);
            return WaitOutcome::TimedOut { polls, last_count: current };
        }

        previous = Some(current);
        sleep(config.poll_interval.min(deadline - now)).await;
    }
}

/// At least `minimum` elements present.
pub fn at_least(minimum: usize) -> impl Fn(Option<usize>, usize) -> bool {
    move |_, current| current >= minimum
}

/// Same non-zero count for `required` polls in a row after the first reading.
pub fn stable_for(required: u32) -> impl FnMut(Option<usize>, usize) -> bool {
    let required = required.max(1);
    let mut unchanged = 0;
    move |previous, current| {
        if current > 0 && previous == Some(current) {
            unchanged += 1;
        } else {
            unchanged = 0;
        }
        unchanged >= required
    }
}

/// Number of unchanged polls that covers `timing.stable_window`.
pub fn stable_polls(timing: &TimingConfig) -> u32 {
    let interval = timing.poll_interval.as_millis().max(1);
    let window = timing.stable_window.as_millis();
    ((window + interval - 1) / interval).max(1) as u32
}
