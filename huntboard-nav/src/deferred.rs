use std::time::Duration;

use crate::effect::BrowserEffect;

/// Handle of a scheduled deferred action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeferredToken(pub u64);

#[derive(Debug, Clone)]
struct Entry {
    token: DeferredToken,
    due: Duration,
    sequence: u64,
}

/// Virtual clock for deferred browser actions.
///
/// Hosts and tests schedule tokens from `BrowserEffect::Schedule`, advance
/// the clock explicitly and feed every due token back to the browser.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    now: Duration,
    next_sequence: u64,
    entries: Vec<Entry>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the queue was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Schedule `token` to fire `after` from now. Rescheduling a token
    /// replaces its previous deadline.
    pub fn schedule(&mut self, token: DeferredToken, after: Duration) {
        self.cancel(token);
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.push(Entry {
            token,
            due: self.now + after,
            sequence,
        });
    }

    /// Remove `token`. Returns whether it was pending.
    pub fn cancel(&mut self, token: DeferredToken) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.token != token);
        before != self.entries.len()
    }

    /// Move the clock forward and return the tokens that became due,
    /// ordered by deadline and then by scheduling order.
    pub fn advance(&mut self, by: Duration) -> Vec<DeferredToken> {
        self.now += by;
        let now = self.now;

        let (mut due, pending): (Vec<Entry>, Vec<Entry>) = self
            .entries
            .drain(..)
            .partition(|entry| entry.due <= now);
        self.entries = pending;

        due.sort_by_key(|entry| (entry.due, entry.sequence));
        due.into_iter().map(|entry| entry.token).collect()
    }

    /// Time until the next deadline, if any.
    pub fn next_due_in(&self) -> Option<Duration> {
        self.entries
            .iter()
            .map(|entry| entry.due.saturating_sub(self.now))
            .min()
    }

    /// Apply the scheduling effects of a reducer step. Other effects are
    /// left to the caller.
    pub fn absorb(&mut self, effects: &[BrowserEffect]) {
        for effect in effects {
            match effect {
                BrowserEffect::Schedule { token, after } => {
                    self.schedule(*token, *after);
                },
                BrowserEffect::Cancel { token } => {
                    self.cancel(*token);
                },
                _ => {},
            }
        }
    }
}
