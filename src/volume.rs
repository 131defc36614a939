use crate::calories::CalorieEstimator;
use crate::models::{DatedVolume, SetPerformance};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of days of training volume the comprehensive recovery score looks back over
pub const RECENT_LOAD_DAYS: u32 = 3;

/// Aggregate training load for a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionLoad {
    /// Σ weight × sets × reps across every entry
    pub total_volume: f64,

    /// Σ RPE-weighted volume across entries that carry an RPE
    pub total_stress: f64,

    /// Number of exercise entries in the session
    pub entry_count: usize,

    /// Σ sets, saturating at `u64::MAX`
    pub total_sets: u64,

    /// Σ sets × reps, saturating at `u64::MAX`
    pub total_reps: u64,

    /// Mean RPE over entries that recorded one
    pub average_rpe: Option<f64>,
}

/// Training volume and stress calculations
pub struct VolumeCalculator;

impl VolumeCalculator {
    /// Volume of one exercise entry: weight × sets × reps
    pub fn volume(weight: Option<f64>, sets: Option<u32>, reps: Option<u32>) -> f64 {
        match (weight, sets, reps) {
            (Some(w), Some(s), Some(r)) => w * s as f64 * r as f64,
            _ => 0.0,
        }
    }

    /// Volume scaled by perceived exertion: volume × (rpe / 10)
    pub fn training_stress(volume: Option<f64>, rpe: Option<f64>) -> f64 {
        match (volume, rpe) {
            (Some(v), Some(r)) => v * (r / 10.0),
            _ => 0.0,
        }
    }

    /// Calories burned for a session, see [`CalorieEstimator::estimate`]
    pub fn calories(duration_minutes: Option<f64>, intensity: Option<f64>) -> f64 {
        CalorieEstimator::estimate(duration_minutes, intensity)
    }

    /// Volume of a [`SetPerformance`] entry
    pub fn entry_volume(entry: &SetPerformance) -> f64 {
        Self::volume(entry.weight, entry.sets, entry.reps)
    }

    /// Aggregate every entry of a session
    ///
    /// Entries without an RPE still count toward volume but add nothing to stress.
    pub fn session_load(entries: &[SetPerformance]) -> SessionLoad {
        let mut load = SessionLoad {
            entry_count: entries.len(),
            ..Default::default()
        };
        let mut rpe_sum = 0.0;
        let mut rpe_count = 0usize;

        for entry in entries {
            let volume = Self::entry_volume(entry);
            load.total_volume += volume;

            if let Some(rpe) = entry.rpe {
                load.total_stress += Self::training_stress(Some(volume), Some(rpe));
                rpe_sum += rpe;
                rpe_count += 1;
            }

            let sets = u64::from(entry.sets.unwrap_or(0));
            let reps = u64::from(entry.reps.unwrap_or(0));
            load.total_sets = load.total_sets.saturating_add(sets);
            load.total_reps = load.total_reps.saturating_add(sets.saturating_mul(reps));
        }

        if rpe_count > 0 {
            load.average_rpe = Some(rpe_sum / rpe_count as f64);
        }

        tracing::debug!(
            entries = load.entry_count,
            volume = load.total_volume,
            stress = load.total_stress,
            "Session load aggregated"
        );

        load
    }

    /// Total volume over the `days` days ending on `as_of` (inclusive)
    pub fn recent_volume(records: &[DatedVolume], as_of: NaiveDate, days: u32) -> f64 {
        if days == 0 {
            return 0.0;
        }
        // windows reaching past the earliest representable date start there
        let window_start = as_of
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);

        records
            .iter()
            .filter(|r| r.date > window_start && r.date <= as_of)
            .map(|r| r.volume)
            .sum()
    }
}
