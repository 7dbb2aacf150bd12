use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

/// Source of fresh note ids
pub trait IdGenerator {
    fn generate(&mut self) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Source of "now" for creation and update stamps. Stored timestamps keep
/// millisecond precision, so readings finer than that are truncated by the store.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}
