use std::collections::BTreeMap;

use {
    chrono::{Days, NaiveDate},
    serde::{Deserialize, Serialize},
};

/// Ounces per calendar day for a single drinker
pub type DailyIntake = BTreeMap<NaiveDate, f64>;

/// Every drinker's daily intake, keyed by drinker id. Serializes as
/// `{"<id>": {"YYYY-MM-DD": oz}}`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct IntakeRecord(pub BTreeMap<String, DailyIntake>);

impl IntakeRecord {
    pub fn drinker(&self, drinker_id: &str) -> Option<&DailyIntake> {
        self.0.get(drinker_id)
    }

    pub fn intake_on(&self, drinker_id: &str, date: NaiveDate) -> f64 {
        self.drinker(drinker_id)
            .and_then(|days| days.get(&date))
            .copied()
            .unwrap_or(0.0)
    }

    /// Adds `amount` to the bucket for `date` and returns the new total
    pub fn add(&mut self, drinker_id: &str, date: NaiveDate, amount: f64) -> f64 {
        let entry = self
            .0
            .entry(drinker_id.to_string())
            .or_default()
            .entry(date)
            .or_insert(0.0);
        *entry += amount;
        *entry
    }

    pub fn set(&mut self, drinker_id: &str, date: NaiveDate, amount: f64) {
        self.0
            .entry(drinker_id.to_string())
            .or_default()
            .insert(date, amount);
    }

    pub fn remove_drinker(&mut self, drinker_id: &str) -> Option<DailyIntake> {
        self.0.remove(drinker_id)
    }

    /// Drops every entry strictly older than `today - retention_days`. Returns
    /// how many entries were removed.
    pub fn prune(&mut self, drinker_id: &str, today: NaiveDate, retention_days: u64) -> usize {
        let Some(days) = self.0.get_mut(drinker_id) else {
            return 0;
        };
        let Some(cutoff) = today.checked_sub_days(Days::new(retention_days)) else {
            return 0;
        };

        let before = days.len();
        days.retain(|date, _| *date >= cutoff);
        before - days.len()
    }
}
