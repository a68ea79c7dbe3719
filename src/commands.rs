//! Operations the front-end calls. Each one returns everything the UI needs to
//! redraw so it never has to combine calculator and ledger results itself.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    calculator::{mascot_offset_px, progress_percent, water_level, MotivationTier},
    clock::{Clock, SystemClock},
    config::Config,
    error::Result,
    ledger::IntakeLedger,
    storage::{FileStore, KeyValueStore},
    structs::{
        day_intake::DayIntake,
        drinker::{Drinker, NewDrinker},
    },
};

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrinkOutcome {
    pub total_oz: f64,
    pub progress: u8,
    /// True only for the drink that takes today's progress to 100%
    pub goal_reached: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryBar {
    /// Percentage of the goal, capped at 100
    pub height: f64,
    /// e.g. `34oz`, empty for days without intake
    pub value_text: String,
    pub day: DayIntake,
}

impl HistoryBar {
    fn new(day: DayIntake, goal_oz: f64) -> Self {
        let height = if goal_oz == 0.0 {
            0.0
        } else {
            (day.intake_oz / goal_oz * 100.0).min(100.0)
        };
        let value_text = if day.intake_oz > 0.0 {
            // halves round up like the browser chart's toFixed(0)
            format!("{:.0}oz", day.intake_oz.round())
        } else {
            String::new()
        };

        Self {
            height,
            value_text,
            day,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub drinker: Drinker,
    pub today_oz: f64,
    pub progress: u8,
    pub water_level: f64,
    pub mascot_offset_px: f64,
    pub tier: MotivationTier,
    pub message: &'static str,
    /// Whether the goal celebration should be showing
    pub celebrate: bool,
    pub history: Vec<HistoryBar>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub drinker: Drinker,
    pub active: bool,
}

/// Ledger plus the user's settings, driven by the UI
#[derive(Debug)]
pub struct Tracker<S, C> {
    ledger: IntakeLedger<S, C>,
    config: Config,
}

impl Tracker<FileStore, SystemClock> {
    /// Opens the on-disk tracker described by `config`
    pub fn open(config: Config) -> Result<Self> {
        let store = match &config.data_dir {
            Some(dir) => FileStore::new(dir)?,
            None => FileStore::open_default()?,
        };
        let clock = SystemClock::new(config.day_boundary);

        Ok(Self::new(store, clock, config))
    }
}

impl<S: KeyValueStore, C: Clock> Tracker<S, C> {
    pub fn new(store: S, clock: C, config: Config) -> Self {
        let ledger = IntakeLedger::with_keys(store, clock, config.storage_keys());
        Self { ledger, config }
    }

    pub fn ledger(&self) -> &IntakeLedger<S, C> {
        &self.ledger
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_ledger(self) -> IntakeLedger<S, C> {
        self.ledger
    }

    /// Adds the drinker and makes it the active one
    #[instrument(skip_all)]
    pub fn register_drinker(&mut self, profile: NewDrinker) -> Result<Drinker> {
        let drinker = self.ledger.add_drinker(profile)?;
        self.ledger.set_active_drinker(Some(&drinker.id))?;

        Ok(drinker)
    }

    pub fn select_drinker(&mut self, id: &str) -> Result<Option<Dashboard>> {
        self.ledger.set_active_drinker(Some(id))?;
        self.dashboard()
    }

    pub fn remove_drinker(&mut self, id: &str) -> Result<()> {
        self.ledger.delete_drinker(id)
    }

    pub fn roster(&self) -> Result<Vec<RosterEntry>> {
        let active = self.ledger.active_drinker_id()?;

        Ok(self
            .ledger
            .drinkers()?
            .into_iter()
            .map(|drinker| RosterEntry {
                active: active.as_deref() == Some(drinker.id.as_str()),
                drinker,
            })
            .collect())
    }

    /// Logs one serving for the active drinker. Does nothing when no drinker
    /// is selected.
    #[instrument(skip(self))]
    pub fn drink(&mut self) -> Result<Option<DrinkOutcome>> {
        let Some(drinker) = self.ledger.active_drinker()? else {
            debug!("Drink ignored, no active drinker");
            return Ok(None);
        };

        let before = progress_percent(self.ledger.today_intake(&drinker.id)?, drinker.daily_goal);
        let total_oz = self
            .ledger
            .add_intake(&drinker.id, self.config.serving_size_oz)?;
        let progress = progress_percent(total_oz, drinker.daily_goal);

        Ok(Some(DrinkOutcome {
            total_oz,
            progress,
            goal_reached: before < 100 && progress >= 100,
        }))
    }

    /// Zeroes today's intake for the active drinker
    pub fn reset_day(&mut self) -> Result<Option<Dashboard>> {
        let Some(drinker) = self.ledger.active_drinker()? else {
            return Ok(None);
        };

        self.ledger.reset_today_intake(&drinker.id)?;
        self.dashboard()
    }

    /// Everything shown for the active drinker, or `None` when nobody is
    /// selected
    pub fn dashboard(&self) -> Result<Option<Dashboard>> {
        let Some(drinker) = self.ledger.active_drinker()? else {
            return Ok(None);
        };

        let goal = drinker.daily_goal;
        let today_oz = self.ledger.today_intake(&drinker.id)?;
        let progress = progress_percent(today_oz, goal);
        let level = water_level(today_oz, goal);
        let tier = MotivationTier::from_percent(f64::from(progress));
        let history = self
            .ledger
            .last_seven_days(&drinker.id)?
            .into_iter()
            .map(|day| HistoryBar::new(day, goal))
            .collect();

        Ok(Some(Dashboard {
            drinker,
            today_oz,
            progress,
            water_level: level,
            mascot_offset_px: mascot_offset_px(level),
            tier,
            message: tier.message(),
            celebrate: progress >= 100 && today_oz > 0.0,
            history,
        }))
    }
}
