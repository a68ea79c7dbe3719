//! Hydration tracking for one or more drinkers: a daily water goal derived from
//! weight, height and age, per-day intake logging and a trailing 7-day history.
//!
//! [`ledger::IntakeLedger`] owns the persisted state behind a
//! [`storage::KeyValueStore`]; [`commands::Tracker`] wraps it with the
//! operations a front-end calls.

pub mod calculator;
pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod storage;
pub mod structs;

pub use {
    calculator::{compute_daily_goal, progress_percent, water_level, MotivationTier},
    clock::{Clock, DayBoundary, FixedClock, SystemClock},
    commands::{Dashboard, DrinkOutcome, Tracker},
    config::Config,
    error::{ConfigError, Error, PersistenceError, Result, ValidationError},
    ledger::IntakeLedger,
    storage::{FileStore, KeyValueStore, MemoryStore, StorageKeys},
    structs::{
        day_intake::DayIntake,
        drinker::{Drinker, NewDrinker},
        intake_record::IntakeRecord,
    },
};
