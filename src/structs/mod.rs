pub mod day_intake;
pub mod drinker;
pub mod intake_record;
