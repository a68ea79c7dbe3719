use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Where one calendar day ends and the next begins
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DayBoundary {
    #[default]
    Local,
    Utc,
}

/// Source of "today". The ledger asks exactly one clock for every operation so
/// reads and writes agree on the day.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    pub boundary: DayBoundary,
}

impl SystemClock {
    pub fn new(boundary: DayBoundary) -> Self {
        Self { boundary }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        match self.boundary {
            DayBoundary::Local => Local::now().date_naive(),
            DayBoundary::Utc => Utc::now().date_naive(),
        }
    }
}

/// Always returns the same day. Useful for tests and for replaying history.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
