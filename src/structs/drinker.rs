use {
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    uuid::Uuid,
};

use crate::{calculator::compute_daily_goal, error::ValidationError};

/// A tracked profile. `daily_goal` is computed once when the drinker is created
/// and never recomputed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Drinker {
    pub id: String,

    pub name: String,

    /// Body weight in pounds
    pub weight: f64,

    /// Height in inches
    pub height: f64,

    /// Age in years
    pub age: u32,

    /// Daily goal in fluid ounces
    pub daily_goal: f64,

    pub created_at: DateTime<Utc>,
}

/// Profile fields as submitted from the add-drinker form
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewDrinker {
    pub name: String,
    pub weight: f64,
    pub height: f64,
    pub age: u32,
}

impl NewDrinker {
    pub fn new(name: impl Into<String>, weight: f64, height: f64, age: u32) -> Self {
        Self {
            name: name.into(),
            weight,
            height,
            age,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        for (field, value) in [("Weight", self.weight), ("Height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::NotPositive { field, value });
            }
        }
        if self.age == 0 {
            return Err(ValidationError::ZeroAge);
        }

        Ok(())
    }
}

impl Drinker {
    /// Validates the profile and freezes its daily goal. The id is a random v4
    /// UUID so drinkers created in quick succession never collide.
    pub fn create(profile: NewDrinker) -> Result<Self, ValidationError> {
        profile.validate()?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: profile.name.trim().to_string(),
            daily_goal: compute_daily_goal(profile.weight, profile.height, f64::from(profile.age)),
            weight: profile.weight,
            height: profile.height,
            age: profile.age,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_freezes_goal_and_trims_name() {
        let drinker = Drinker::create(NewDrinker::new("  Bruno ", 150.0, 65.0, 30)).unwrap();

        assert_eq!(drinker.name, "Bruno");
        assert!((drinker.daily_goal - 75.5).abs() < 1e-9);
        assert!(!drinker.id.is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let profile = NewDrinker::new("Bruno", 150.0, 65.0, 30);
        let a = Drinker::create(profile.clone()).unwrap();
        let b = Drinker::create(profile).unwrap();

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn rejects_bad_profiles() {
        assert_eq!(
            NewDrinker::new("   ", 150.0, 65.0, 30).validate(),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            NewDrinker::new("Bruno", 0.0, 65.0, 30).validate(),
            Err(ValidationError::NotPositive {
                field: "Weight",
                value: 0.0
            })
        );
        assert!(matches!(
            NewDrinker::new("Bruno", 150.0, f64::NAN, 30).validate(),
            Err(ValidationError::NotPositive { field: "Height", .. })
        ));
        assert_eq!(
            NewDrinker::new("Bruno", 150.0, 65.0, 0).validate(),
            Err(ValidationError::ZeroAge)
        );
    }

    #[test]
    fn serializes_with_stored_field_names() {
        let drinker = Drinker::create(NewDrinker::new("Bruno", 150.0, 65.0, 30)).unwrap();
        let json = serde_json::to_value(&drinker).unwrap();

        assert!(json.get("dailyGoal").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
