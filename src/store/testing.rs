//! Deterministic collaborators for store tests

use std::cell::Cell;

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::ids::{Clock, IdGenerator};

/// Yields "id-1", "id-2", ... unless a script of ids is queued first
#[derive(Debug, Default)]
pub struct SequenceIds {
    next: usize,
    scripted: Vec<String>,
}

impl SequenceIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids to hand out before falling back to the sequence
    pub fn scripted(ids: &[&str]) -> Self {
        Self {
            next: 0,
            scripted: ids.iter().rev().map(|s| s.to_string()).collect(),
        }
    }
}

impl IdGenerator for SequenceIds {
    fn generate(&mut self) -> String {
        if let Some(id) = self.scripted.pop() {
            return id;
        }
        self.next += 1;
        format!("id-{}", self.next)
    }
}

/// Clock that advances one second per reading, or stays where it was set
#[derive(Debug)]
pub struct StepClock {
    current: Cell<DateTime<Utc>>,
    step: Cell<Duration>,
}

impl StepClock {
    pub fn new() -> Self {
        Self {
            current: Cell::new(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()),
            step: Cell::new(Duration::seconds(1)),
        }
    }

    /// Advance by `step` per reading instead of one second
    pub fn with_step(step: Duration) -> Self {
        let clock = Self::new();
        clock.step.set(step);
        clock
    }

    /// Stop advancing and report `at` from now on
    pub fn freeze_at(&self, at: DateTime<Utc>) {
        self.current.set(at);
        self.step.set(Duration::zero());
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let now = self.current.get() + self.step.get();
        self.current.set(now);
        now
    }
}

impl<T: Clock> Clock for &T {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
