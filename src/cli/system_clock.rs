use chrono::{DateTime, Local, NaiveDate, Utc};

use snapbooks_core::time::Clock;

/// Wall clock. "Today" is the studio's local calendar date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
