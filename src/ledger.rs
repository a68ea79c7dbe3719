use chrono::Days;
use tracing::{debug, instrument, trace};

use crate::{
    clock::Clock,
    error::{Result, ValidationError},
    storage::{load_json, save_json, KeyValueStore, StorageKeys},
    structs::{
        day_intake::DayIntake,
        drinker::{Drinker, NewDrinker},
        intake_record::IntakeRecord,
    },
};

/// How many days back from today survive pruning
pub const RETENTION_DAYS: u64 = 7;

/// Length of the history returned by [`IntakeLedger::last_seven_days`]
pub const HISTORY_DAYS: u64 = 7;

/// Drinkers, their per-day intake and the active-drinker pointer, all kept in a
/// [`KeyValueStore`].
///
/// Every operation reads the current value from the store and writes it back
/// before returning. Operations touching several keys (like
/// [`delete_drinker`](Self::delete_drinker)) write them one after another, so a
/// failing store can leave some of them updated.
#[derive(Debug)]
pub struct IntakeLedger<S, C> {
    store: S,
    clock: C,
    keys: StorageKeys,
}

impl<S: KeyValueStore, C: Clock> IntakeLedger<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self::with_keys(store, clock, StorageKeys::default())
    }

    pub fn with_keys(store: S, clock: C, keys: StorageKeys) -> Self {
        Self { store, clock, keys }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn drinkers(&self) -> Result<Vec<Drinker>> {
        Ok(load_json(&self.store, &self.keys.drinkers)?)
    }

    pub fn drinker(&self, id: &str) -> Result<Option<Drinker>> {
        Ok(self.drinkers()?.into_iter().find(|d| d.id == id))
    }

    fn intake_record(&self) -> Result<IntakeRecord> {
        Ok(load_json(&self.store, &self.keys.daily_data)?)
    }

    fn save_intake_record(&mut self, record: &IntakeRecord) -> Result<()> {
        Ok(save_json(&mut self.store, &self.keys.daily_data, record)?)
    }

    #[instrument(skip(self), fields(name = %profile.name))]
    pub fn add_drinker(&mut self, profile: NewDrinker) -> Result<Drinker> {
        let drinker = Drinker::create(profile)?;

        let mut drinkers = self.drinkers()?;
        drinkers.push(drinker.clone());
        save_json(&mut self.store, &self.keys.drinkers, &drinkers)?;

        debug!(id = %drinker.id, goal = drinker.daily_goal, "Added drinker");
        Ok(drinker)
    }

    /// Removes the drinker, its intake history and, if it was active, the
    /// active pointer. Unknown ids are a no-op.
    #[instrument(skip(self))]
    pub fn delete_drinker(&mut self, id: &str) -> Result<()> {
        let mut drinkers = self.drinkers()?;
        drinkers.retain(|d| d.id != id);
        save_json(&mut self.store, &self.keys.drinkers, &drinkers)?;

        let mut record = self.intake_record()?;
        if record.remove_drinker(id).is_some() {
            self.save_intake_record(&record)?;
        }

        if self.active_drinker_id()?.as_deref() == Some(id) {
            self.set_active_drinker(None)?;
        }

        debug!("Deleted drinker");
        Ok(())
    }

    pub fn active_drinker_id(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(&self.keys.active_drinker)?
            .filter(|id| !id.is_empty()))
    }

    #[instrument(skip(self))]
    pub fn set_active_drinker(&mut self, id: Option<&str>) -> Result<()> {
        match id {
            Some(id) if !id.is_empty() => self.store.set(&self.keys.active_drinker, id)?,
            _ => self.store.remove(&self.keys.active_drinker)?,
        }

        Ok(())
    }

    /// Resolves the active pointer against the drinker list. A pointer to a
    /// drinker that no longer exists reads as `None`.
    pub fn active_drinker(&self) -> Result<Option<Drinker>> {
        match self.active_drinker_id()? {
            Some(id) => self.drinker(&id),
            None => Ok(None),
        }
    }

    pub fn today_intake(&self, id: &str) -> Result<f64> {
        let today = self.clock.today();
        Ok(self.intake_record()?.intake_on(id, today))
    }

    /// Adds `amount` ounces to today's total, prunes entries outside the
    /// retention window and returns the new total
    #[instrument(skip(self))]
    pub fn add_intake(&mut self, id: &str, amount: f64) -> Result<f64> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ValidationError::NonPositiveAmount(amount).into());
        }

        let today = self.clock.today();
        let mut record = self.intake_record()?;
        let total = record.add(id, today, amount);

        let pruned = record.prune(id, today, RETENTION_DAYS);
        if pruned > 0 {
            trace!("Pruned {pruned} stale day(s)");
        }
        self.save_intake_record(&record)?;

        debug!(total, "Recorded intake");
        Ok(total)
    }

    /// Sets today's total to zero. Other days are left alone.
    #[instrument(skip(self))]
    pub fn reset_today_intake(&mut self, id: &str) -> Result<()> {
        let today = self.clock.today();
        let mut record = self.intake_record()?;
        record.set(id, today, 0.0);
        self.save_intake_record(&record)?;

        debug!("Reset today's intake");
        Ok(())
    }

    /// The last seven calendar days ending today, oldest first. Days with no
    /// entry read as 0.
    pub fn last_seven_days(&self, id: &str) -> Result<Vec<DayIntake>> {
        let today = self.clock.today();
        let record = self.intake_record()?;

        let history = (0..HISTORY_DAYS)
            .rev()
            .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
            .map(|date| DayIntake::new(date, record.intake_on(id, date), today))
            .collect();

        Ok(history)
    }

    /// Removes every persisted key this ledger owns
    #[instrument(skip(self))]
    pub fn clear_all_data(&mut self) -> Result<()> {
        self.store.remove(&self.keys.drinkers)?;
        self.store.remove(&self.keys.daily_data)?;
        self.store.remove(&self.keys.active_drinker)?;

        debug!("Cleared all data");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{clock::FixedClock, error::Error, storage::MemoryStore};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()
    }

    fn ledger() -> IntakeLedger<MemoryStore, FixedClock> {
        IntakeLedger::new(MemoryStore::new(), FixedClock(today()))
    }

    fn bruno() -> NewDrinker {
        NewDrinker::new("Bruno", 150.0, 65.0, 30)
    }

    #[test]
    fn add_and_list_drinkers() {
        let mut ledger = ledger();
        let a = ledger.add_drinker(bruno()).unwrap();
        let b = ledger.add_drinker(NewDrinker::new("Kuma", 220.0, 70.0, 40)).unwrap();

        let drinkers = ledger.drinkers().unwrap();
        assert_eq!(drinkers, vec![a.clone(), b]);
        assert_eq!(ledger.drinker(&a.id).unwrap(), Some(a));
    }

    #[test]
    fn add_drinker_rejects_invalid_profile() {
        let mut ledger = ledger();
        let err = ledger.add_drinker(NewDrinker::new("", 150.0, 65.0, 30)).unwrap_err();

        assert!(matches!(err, Error::Validation(ValidationError::EmptyName)));
        assert!(ledger.drinkers().unwrap().is_empty());
    }

    #[test]
    fn add_intake_accumulates_today() {
        let mut ledger = ledger();
        let id = ledger.add_drinker(bruno()).unwrap().id;

        assert_eq!(ledger.today_intake(&id).unwrap(), 0.0);
        assert_eq!(ledger.add_intake(&id, 16.9).unwrap(), 16.9);
        let total = ledger.add_intake(&id, 16.9).unwrap();
        assert!((total - 33.8).abs() < 1e-9);
        assert!((ledger.today_intake(&id).unwrap() - 33.8).abs() < 1e-9);
    }

    #[test]
    fn add_intake_rejects_non_positive_amounts() {
        let mut ledger = ledger();
        for amount in [0.0, -1.0, f64::NAN] {
            let err = ledger.add_intake("x", amount).unwrap_err();
            assert!(matches!(
                err,
                Error::Validation(ValidationError::NonPositiveAmount(_))
            ));
        }
        assert_eq!(ledger.today_intake("x").unwrap(), 0.0);
    }

    #[test]
    fn reset_only_touches_today() {
        let store = MemoryStore::new();
        let yesterday = today().pred_opt().unwrap();

        let mut earlier = IntakeLedger::new(store, FixedClock(yesterday));
        earlier.add_intake("a", 20.0).unwrap();

        let mut ledger = IntakeLedger::new(earlier.into_store(), FixedClock(today()));
        ledger.add_intake("a", 30.0).unwrap();
        ledger.reset_today_intake("a").unwrap();

        assert_eq!(ledger.today_intake("a").unwrap(), 0.0);
        let week = ledger.last_seven_days("a").unwrap();
        assert_eq!(week[5].intake_oz, 20.0);
        assert_eq!(week[6].intake_oz, 0.0);
    }

    #[test]
    fn reset_untracked_drinker_reads_zero() {
        let mut ledger = ledger();
        ledger.reset_today_intake("ghost").unwrap();
        assert_eq!(ledger.today_intake("ghost").unwrap(), 0.0);
    }

    #[test]
    fn active_pointer_resolves_and_tolerates_dangling_ids() {
        let mut ledger = ledger();
        assert_eq!(ledger.active_drinker().unwrap(), None);

        let drinker = ledger.add_drinker(bruno()).unwrap();
        ledger.set_active_drinker(Some(&drinker.id)).unwrap();
        assert_eq!(ledger.active_drinker().unwrap(), Some(drinker));

        ledger.set_active_drinker(Some("does-not-exist")).unwrap();
        assert_eq!(ledger.active_drinker().unwrap(), None);
        assert_eq!(
            ledger.active_drinker_id().unwrap().as_deref(),
            Some("does-not-exist")
        );

        ledger.set_active_drinker(None).unwrap();
        assert_eq!(ledger.active_drinker_id().unwrap(), None);
    }

    #[test]
    fn delete_cascades() {
        let mut ledger = ledger();
        let keep = ledger.add_drinker(bruno()).unwrap();
        let gone = ledger.add_drinker(NewDrinker::new("Kuma", 220.0, 70.0, 40)).unwrap();
        ledger.add_intake(&keep.id, 10.0).unwrap();
        ledger.add_intake(&gone.id, 10.0).unwrap();
        ledger.set_active_drinker(Some(&gone.id)).unwrap();

        ledger.delete_drinker(&gone.id).unwrap();

        assert_eq!(ledger.drinkers().unwrap(), vec![keep.clone()]);
        assert_eq!(ledger.active_drinker_id().unwrap(), None);
        assert_eq!(ledger.today_intake(&gone.id).unwrap(), 0.0);
        assert_eq!(ledger.today_intake(&keep.id).unwrap(), 10.0);
    }

    #[test]
    fn delete_keeps_other_active_drinker_and_ignores_unknown_ids() {
        let mut ledger = ledger();
        let keep = ledger.add_drinker(bruno()).unwrap();
        ledger.set_active_drinker(Some(&keep.id)).unwrap();

        ledger.delete_drinker("unknown").unwrap();

        assert_eq!(ledger.active_drinker().unwrap(), Some(keep));
    }

    #[test]
    fn history_is_seven_days_ending_today() {
        let ledger = ledger();
        let week = ledger.last_seven_days("a").unwrap();

        assert_eq!(week.len(), 7);
        assert_eq!(week[6].date, today());
        assert_eq!(week[6].label, "Today");
        // 2024-02-29 was a Thursday
        assert_eq!(week[0].date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(week[0].label, "Thu");
        assert_eq!(week[5].label, "Tue");
        for pair in week.windows(2) {
            assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
        }
        assert!(week.iter().all(|d| d.intake_oz == 0.0));
    }

    #[test]
    fn old_entries_are_pruned_on_write_only() {
        let long_ago = today().checked_sub_days(Days::new(8)).unwrap();
        let cutoff = today().checked_sub_days(Days::new(7)).unwrap();

        let mut old = IntakeLedger::new(MemoryStore::new(), FixedClock(long_ago));
        old.add_intake("a", 5.0).unwrap();
        let mut edge = IntakeLedger::new(old.into_store(), FixedClock(cutoff));
        edge.add_intake("a", 6.0).unwrap();

        let mut ledger = IntakeLedger::new(edge.into_store(), FixedClock(today()));
        // reads never prune
        let record = ledger.intake_record().unwrap();
        assert_eq!(record.intake_on("a", long_ago), 5.0);

        ledger.add_intake("a", 1.0).unwrap();

        let record = ledger.intake_record().unwrap();
        assert_eq!(record.intake_on("a", long_ago), 0.0);
        assert!(record.drinker("a").unwrap().get(&long_ago).is_none());
        assert_eq!(record.intake_on("a", cutoff), 6.0);
    }

    #[test]
    fn clear_all_data_empties_store() {
        let mut ledger = ledger();
        let drinker = ledger.add_drinker(bruno()).unwrap();
        ledger.set_active_drinker(Some(&drinker.id)).unwrap();
        ledger.add_intake(&drinker.id, 3.0).unwrap();

        ledger.clear_all_data().unwrap();

        assert!(ledger.store().is_empty());
    }

    #[test]
    fn corrupt_drinker_list_reads_empty() {
        let mut store = MemoryStore::new();
        store.set("splashyBear_drinkers", "[{\"id\":").unwrap();
        store.set("splashyBear_dailyData", "42").unwrap();
        let mut ledger = IntakeLedger::new(store, FixedClock(today()));

        assert!(ledger.drinkers().unwrap().is_empty());
        assert_eq!(ledger.today_intake("a").unwrap(), 0.0);
        // and writes recover the key
        ledger.add_drinker(bruno()).unwrap();
        assert_eq!(ledger.drinkers().unwrap().len(), 1);
    }
}
