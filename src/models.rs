use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::FitRsError;

/// Biological sex used by the Mifflin-St Jeor BMR equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl Sex {
    /// Parse a sex label leniently; anything other than a female label is treated as male
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "female" | "f" | "woman" => Sex::Female,
            _ => Sex::Male,
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sex::Male => write!(f, "male"),
            Sex::Female => write!(f, "female"),
        }
    }
}

/// Performance of a single exercise entry within a training session
///
/// Every field is optional because the service layer passes through whatever
/// the user logged. Derived values treat missing fields as "no data".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetPerformance {
    /// Load in kilograms
    pub weight: Option<f64>,

    /// Repetitions per set
    pub reps: Option<u32>,

    /// Number of sets performed
    pub sets: Option<u32>,

    /// Rate of perceived exertion (1-10)
    pub rpe: Option<f64>,
}

impl SetPerformance {
    pub fn new(weight: f64, sets: u32, reps: u32) -> Self {
        Self {
            weight: Some(weight),
            reps: Some(reps),
            sets: Some(sets),
            rpe: None,
        }
    }

    pub fn with_rpe(mut self, rpe: f64) -> Self {
        self.rpe = Some(rpe);
        self
    }
}

/// Parses the `WEIGHTxSETSxREPS[@RPE]` shorthand, e.g. `100x3x10@8`
impl FromStr for SetPerformance {
    type Err = FitRsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| FitRsError::parse(format!("set '{}'", s), reason);

        let (body, rpe) = match s.trim().split_once('@') {
            Some((body, rpe)) => {
                let rpe: f64 = rpe.trim().parse().map_err(|_| invalid("RPE is not a number"))?;
                if !(1.0..=10.0).contains(&rpe) {
                    return Err(invalid("RPE must be between 1 and 10"));
                }
                (body, Some(rpe))
            }
            None => (s.trim(), None),
        };

        let parts: Vec<&str> = body.split(['x', 'X']).map(str::trim).collect();
        let [weight, sets, reps] = parts.as_slice() else {
            return Err(invalid("expected WEIGHTxSETSxREPS"));
        };

        let weight: f64 = weight.parse().map_err(|_| invalid("weight is not a number"))?;
        if weight < 0.0 {
            return Err(invalid("weight must not be negative"));
        }

        Ok(SetPerformance {
            weight: Some(weight),
            sets: Some(sets.parse().map_err(|_| invalid("sets is not a whole number"))?),
            reps: Some(reps.parse().map_err(|_| invalid("reps is not a whole number"))?),
            rpe,
        })
    }
}

/// Subjective and physiological recovery markers for one day
///
/// The same record feeds both recovery models. The lightweight model reads
/// `sleep_quality`, `muscle_soreness` and `subjective_energy` on a 1-5 scale;
/// the comprehensive model reads them on a 1-10 scale together with the
/// optional physiological markers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecoveryInput {
    /// Hours slept (0-24)
    pub sleep_hours: Option<f64>,

    /// Perceived sleep quality
    pub sleep_quality: Option<f64>,

    /// Perceived muscle soreness
    pub muscle_soreness: Option<f64>,

    /// Perceived energy level (1-5)
    pub subjective_energy: Option<f64>,

    /// Perceived fatigue (1-10)
    pub fatigue_level: Option<f64>,

    /// Perceived life stress (1-10)
    pub stress_level: Option<f64>,

    /// Heart rate variability (RMSSD, ms)
    pub hrv: Option<f64>,

    /// Resting heart rate (bpm)
    pub resting_heart_rate: Option<f64>,
}

/// Anthropometric profile used for energy expenditure estimates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyProfile {
    /// Body weight in kilograms
    pub weight_kg: f64,

    /// Height in centimeters
    pub height_cm: f64,

    /// Age in years
    pub age: u32,

    pub sex: Sex,
}

/// Total volume lifted on a given day, as loaded by the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedVolume {
    pub date: NaiveDate,
    pub volume: f64,
}

/// Food intake logged for one day, already summed across meals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionIntake {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// A single dated observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Ordered sequence of dated values
///
/// Insertion order is treated as chronological order; the series is never
/// re-sorted except by explicit rollups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatedMetricSeries {
    points: Vec<MetricPoint>,
}

impl DatedMetricSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observation to the end of the series
    pub fn push(&mut self, date: NaiveDate, value: f64) {
        self.points.push(MetricPoint { date, value });
    }

    pub fn points(&self) -> &[MetricPoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<(NaiveDate, f64)> for DatedMetricSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, f64)>>(iter: I) -> Self {
        Self {
            points: iter
                .into_iter()
                .map(|(date, value)| MetricPoint { date, value })
                .collect(),
        }
    }
}

impl From<Vec<MetricPoint>> for DatedMetricSeries {
    fn from(points: Vec<MetricPoint>) -> Self {
        Self { points }
    }
}
