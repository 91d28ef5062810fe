// Bulk reaction sending: one PATCH per emoji, strictly sequential, with a
// fixed pause between calls to stay under the API rate limit.

use crate::api::{ApiClient, ReactionTarget, Transport};
use std::time::Duration;
use tracing::{info, warn};

/// Delay used when none is configured: one request per second keeps well
/// under the 2 requests/second limit.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Daily request quota of the reaction endpoint.
pub const DAILY_REQUEST_LIMIT: usize = 2000;

/// Blocking pause between calls.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionStatus {
    Sent,
    Failed { status: Option<u16>, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionOutcome {
    pub emoji: String,
    pub status: ReactionStatus,
}

impl ReactionOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self.status, ReactionStatus::Sent)
    }
}

/// Result of one dispatch: outcomes in the order the emojis were sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub outcomes: Vec<ReactionOutcome>,
}

impl DispatchSummary {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_sent()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ReactionOutcome> {
        self.outcomes.iter().filter(|o| !o.is_sent())
    }
}

/// Rough wall-clock estimate for sending `count` reactions: one `delay`
/// slot per request. Saturates instead of overflowing.
pub fn estimated_duration(count: usize, delay: Duration) -> Duration {
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    delay.saturating_mul(count)
}

pub struct Dispatcher<'a, T: Transport, S: Sleeper = ThreadSleeper> {
    client: &'a ApiClient<T>,
    sleeper: S,
    delay: Duration,
}

impl<'a, T: Transport> Dispatcher<'a, T, ThreadSleeper> {
    pub fn new(client: &'a ApiClient<T>, delay: Duration) -> Self {
        Dispatcher {
            client,
            sleeper: ThreadSleeper,
            delay,
        }
    }
}

impl<'a, T: Transport, S: Sleeper> Dispatcher<'a, T, S> {
    pub fn with_sleeper<S2: Sleeper>(self, sleeper: S2) -> Dispatcher<'a, T, S2> {
        Dispatcher {
            client: self.client,
            sleeper,
            delay: self.delay,
        }
    }

    pub fn dispatch(&self, target: &ReactionTarget, emojis: &[String]) -> DispatchSummary {
        self.dispatch_with(target, emojis, |_, _| {})
    }

    /// Send every emoji in order, calling `observe` with the index and
    /// outcome after each call. Failures are recorded and the loop carries
    /// on; the pause is skipped after the last emoji.
    pub fn dispatch_with<F>(
        &self,
        target: &ReactionTarget,
        emojis: &[String],
        mut observe: F,
    ) -> DispatchSummary
    where
        F: FnMut(usize, &ReactionOutcome),
    {
        let mut summary = DispatchSummary {
            outcomes: Vec::with_capacity(emojis.len()),
        };

        for (index, emoji) in emojis.iter().enumerate() {
            // Pause between calls only, never before the first.
            if index > 0 {
                self.sleeper.sleep(self.delay);
            }

            let status = match self.client.add_reaction(target, emoji) {
                Ok(()) => ReactionStatus::Sent,
                Err(e) => {
                    warn!(%emoji, message_id = %target.message_id, error = %e, "reaction failed");
                    ReactionStatus::Failed {
                        status: e.status(),
                        reason: e.to_string(),
                    }
                }
            };
            let outcome = ReactionOutcome {
                emoji: emoji.clone(),
                status,
            };
            observe(index, &outcome);
            summary.outcomes.push(outcome);
        }

        info!(
            message_id = %target.message_id,
            attempted = summary.attempted(),
            succeeded = summary.succeeded(),
            "dispatch complete"
        );
        summary
    }
}
