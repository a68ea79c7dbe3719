use {
    chrono::{Datelike, NaiveDate, Weekday},
    serde::{Deserialize, Serialize},
};

/// One bar of the 7-day history
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayIntake {
    pub date: NaiveDate,

    /// Ounces drunk on `date`, 0 when nothing was tracked
    pub intake_oz: f64,

    /// `Today` for the current day, otherwise a three letter weekday
    pub label: String,
}

impl DayIntake {
    pub fn new(date: NaiveDate, intake_oz: f64, today: NaiveDate) -> Self {
        let label = if date == today {
            "Today".to_string()
        } else {
            weekday_label(date.weekday()).to_string()
        };

        Self {
            date,
            intake_oz,
            label,
        }
    }
}

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}
