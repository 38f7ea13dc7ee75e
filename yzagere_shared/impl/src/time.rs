use chrono::{DateTime, Utc};
use yzagere_shared_contracts::time::TimeService;

/// Wall clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeServiceImpl;

impl TimeService for TimeServiceImpl {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
