//! Recovery scoring
//!
//! Two independent models share the [`RecoveryInput`] record but not their
//! scales, and must not be compared with each other:
//!
//! - **Lightweight** (0-20): a per-session product of soreness, sleep quality
//!   and energy, each on a 1-5 scale.
//! - **Comprehensive** (0-100): a base of 50 adjusted by sleep, perceived
//!   soreness/fatigue/stress (1-10 scales), HRV, resting heart rate and the
//!   training volume of the last three days.
//!
//! # Comprehensive Score Adjustments
//!
//! | Factor | Adjustment |
//! |---|---|
//! | Sleep hours | ≥8: +20, ≥7: +15, ≥6: +5, <5: −15, otherwise −5 |
//! | Sleep quality | +(q − 5) × 3 |
//! | Muscle soreness | −(s − 3) × 3 |
//! | Fatigue | −(f − 5) × 3 |
//! | Stress | −(s − 5) × 3 |
//! | HRV | ≥60: +10, ≥50: +5, <40: −10 |
//! | Resting HR | ≤55: +5, ≤65: +2, ≥80: −5 |
//! | 3-day volume | >10000: −15, >5000: −5, >2000: 0, otherwise +5 |
//!
//! The status and recommended intensity are both derived from the final
//! clamped integer score, never from intermediate values.

use crate::models::RecoveryInput;
use serde::{Deserialize, Serialize};
use std::fmt;

const BASE_SCORE: f64 = 50.0;
const MAX_SCORE: f64 = 100.0;

/// Upper bound of the lightweight model
pub const LIGHTWEIGHT_MAX: f64 = 20.0;

/// Value assumed for a missing lightweight-model field
const LIGHTWEIGHT_DEFAULT: f64 = 3.0;

/// Recovery status categories for the comprehensive score
///
/// - **Excellent**: 80-100
/// - **Good**: 60-79
/// - **Fair**: 40-59
/// - **Poor**: 20-39
/// - **Critical**: 0-19
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecoveryStatus {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl RecoveryStatus {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            RecoveryStatus::Excellent
        } else if score >= 60 {
            RecoveryStatus::Good
        } else if score >= 40 {
            RecoveryStatus::Fair
        } else if score >= 20 {
            RecoveryStatus::Poor
        } else {
            RecoveryStatus::Critical
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RecoveryStatus::Excellent => "Fully recovered and ready for hard training",
            RecoveryStatus::Good => "Well recovered, normal training is fine",
            RecoveryStatus::Fair => "Partially recovered, keep the load moderate",
            RecoveryStatus::Poor => "Poorly recovered, favour light sessions",
            RecoveryStatus::Critical => "Recovery is critically low, rest is needed",
        }
    }
}

impl fmt::Display for RecoveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryStatus::Excellent => write!(f, "EXCELLENT"),
            RecoveryStatus::Good => write!(f, "GOOD"),
            RecoveryStatus::Fair => write!(f, "FAIR"),
            RecoveryStatus::Poor => write!(f, "POOR"),
            RecoveryStatus::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Training intensity appropriate for a comprehensive score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendedIntensity {
    Intense,
    High,
    Moderate,
    Light,
    Rest,
}

impl RecommendedIntensity {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            RecommendedIntensity::Intense
        } else if score >= 65 {
            RecommendedIntensity::High
        } else if score >= 50 {
            RecommendedIntensity::Moderate
        } else if score >= 30 {
            RecommendedIntensity::Light
        } else {
            RecommendedIntensity::Rest
        }
    }
}

impl fmt::Display for RecommendedIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecommendedIntensity::Intense => write!(f, "INTENSE"),
            RecommendedIntensity::High => write!(f, "HIGH"),
            RecommendedIntensity::Moderate => write!(f, "MODERATE"),
            RecommendedIntensity::Light => write!(f, "LIGHT"),
            RecommendedIntensity::Rest => write!(f, "REST"),
        }
    }
}

/// Inputs that move the comprehensive score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryFactor {
    SleepHours,
    SleepQuality,
    MuscleSoreness,
    FatigueLevel,
    StressLevel,
    Hrv,
    RestingHeartRate,
    RecentLoad,
}

/// Signed contribution of one factor to the comprehensive score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorAdjustment {
    pub factor: RecoveryFactor,
    pub adjustment: f64,
}

/// Result of the comprehensive recovery model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComprehensiveRecovery {
    /// Recovery score (0-100)
    pub score: u8,

    pub status: RecoveryStatus,

    pub recommended_intensity: RecommendedIntensity,

    /// Adjustments applied on top of the base score, in table order
    pub adjustments: Vec<FactorAdjustment>,

    pub advice: Vec<String>,
}

/// Recovery score computations
pub struct RecoveryScoreEngine;

impl RecoveryScoreEngine {
    /// Lightweight per-session score (0-20)
    ///
    /// `(5 − soreness) × sleep_quality × (energy / 5)` with every field on a
    /// 1-5 scale. Missing fields default to 3; a missing record scores 0.
    pub fn lightweight_score(input: Option<&RecoveryInput>) -> f64 {
        let Some(input) = input else {
            return 0.0;
        };

        let soreness = input.muscle_soreness.unwrap_or(LIGHTWEIGHT_DEFAULT);
        let sleep_quality = input.sleep_quality.unwrap_or(LIGHTWEIGHT_DEFAULT);
        let energy = input.subjective_energy.unwrap_or(LIGHTWEIGHT_DEFAULT);

        let score = (5.0 - soreness) * sleep_quality * (energy / 5.0);
        score.clamp(0.0, LIGHTWEIGHT_MAX)
    }

    /// Comprehensive 0-100 score
    ///
    /// `recent_load` is the total training volume of the last
    /// [`crate::volume::RECENT_LOAD_DAYS`] days as loaded by the caller;
    /// `None` means no training was recorded.
    pub fn comprehensive_score(
        input: &RecoveryInput,
        recent_load: Option<f64>,
    ) -> ComprehensiveRecovery {
        let adjustments = Self::adjustments(input, recent_load);
        let raw = BASE_SCORE + adjustments.iter().map(|a| a.adjustment).sum::<f64>();
        let score = raw.round().clamp(0.0, MAX_SCORE) as u8;

        let status = RecoveryStatus::from_score(score);
        let recommended_intensity = RecommendedIntensity::from_score(score);
        let advice = Self::generate_advice(input, recent_load, status);

        tracing::debug!(
            raw_score = raw,
            score,
            %status,
            intensity = %recommended_intensity,
            "Comprehensive recovery score calculated"
        );

        ComprehensiveRecovery {
            score,
            status,
            recommended_intensity,
            adjustments,
            advice,
        }
    }

    /// Per-factor adjustments; absent optional markers contribute nothing
    pub fn adjustments(input: &RecoveryInput, recent_load: Option<f64>) -> Vec<FactorAdjustment> {
        let mut adjustments = Vec::with_capacity(8);
        let mut push = |factor, adjustment| {
            adjustments.push(FactorAdjustment { factor, adjustment });
        };

        if let Some(hours) = input.sleep_hours {
            push(RecoveryFactor::SleepHours, Self::sleep_hours_adjustment(hours));
        }
        if let Some(quality) = input.sleep_quality {
            push(RecoveryFactor::SleepQuality, (quality - 5.0) * 3.0);
        }
        if let Some(soreness) = input.muscle_soreness {
            push(RecoveryFactor::MuscleSoreness, -(soreness - 3.0) * 3.0);
        }
        if let Some(fatigue) = input.fatigue_level {
            push(RecoveryFactor::FatigueLevel, -(fatigue - 5.0) * 3.0);
        }
        if let Some(stress) = input.stress_level {
            push(RecoveryFactor::StressLevel, -(stress - 5.0) * 3.0);
        }
        if let Some(hrv) = input.hrv {
            push(RecoveryFactor::Hrv, Self::hrv_adjustment(hrv));
        }
        if let Some(rhr) = input.resting_heart_rate {
            push(RecoveryFactor::RestingHeartRate, Self::resting_hr_adjustment(rhr));
        }
        push(RecoveryFactor::RecentLoad, Self::recent_load_adjustment(recent_load));

        adjustments
    }

    fn sleep_hours_adjustment(hours: f64) -> f64 {
        if hours >= 8.0 {
            20.0
        } else if hours >= 7.0 {
            15.0
        } else if hours >= 6.0 {
            5.0
        } else if hours < 5.0 {
            -15.0
        } else {
            -5.0
        }
    }

    fn hrv_adjustment(hrv: f64) -> f64 {
        if hrv >= 60.0 {
            10.0
        } else if hrv >= 50.0 {
            5.0
        } else if hrv < 40.0 {
            -10.0
        } else {
            0.0
        }
    }

    fn resting_hr_adjustment(rhr: f64) -> f64 {
        if rhr <= 55.0 {
            5.0
        } else if rhr <= 65.0 {
            2.0
        } else if rhr >= 80.0 {
            -5.0
        } else {
            0.0
        }
    }

    fn recent_load_adjustment(recent_load: Option<f64>) -> f64 {
        match recent_load {
            Some(load) if load > 10_000.0 => -15.0,
            Some(load) if load > 5_000.0 => -5.0,
            Some(load) if load > 2_000.0 => 0.0,
            _ => 5.0,
        }
    }

    /// Advice lines: one for the overall status, then one per weak marker
    pub fn generate_advice(
        input: &RecoveryInput,
        recent_load: Option<f64>,
        status: RecoveryStatus,
    ) -> Vec<String> {
        let mut advice = vec![match status {
            RecoveryStatus::Excellent => {
                "You are well recovered. A good day for a hard or heavy session.".to_string()
            }
            RecoveryStatus::Good => {
                "Recovery is good. Train as planned and keep an eye on fatigue.".to_string()
            }
            RecoveryStatus::Fair => {
                "Recovery is incomplete. Keep intensity moderate today.".to_string()
            }
            RecoveryStatus::Poor => {
                "Recovery is poor. Choose a light session or active recovery.".to_string()
            }
            RecoveryStatus::Critical => {
                "Recovery is critically low. Take a rest day.".to_string()
            }
        }];

        if input.sleep_hours.is_some_and(|h| h < 7.0) {
            advice.push("Aim for 7-9 hours of sleep tonight.".to_string());
        }
        if input.sleep_quality.is_some_and(|q| q < 5.0) {
            advice.push(
                "Sleep quality was low. Keep a regular bedtime and avoid screens before bed."
                    .to_string(),
            );
        }
        if input.muscle_soreness.is_some_and(|s| s >= 7.0) {
            advice.push(
                "Muscle soreness is high. Avoid loading sore muscle groups and try mobility work."
                    .to_string(),
            );
        }
        if input.fatigue_level.is_some_and(|f| f >= 7.0) {
            advice.push("Fatigue is elevated. Reduce training volume today.".to_string());
        }
        if input.stress_level.is_some_and(|s| s >= 7.0) {
            advice.push(
                "Stress is elevated. Breathing exercises or a walk can help recovery.".to_string(),
            );
        }
        if input.hrv.is_some_and(|h| h < 40.0) {
            advice.push("HRV is low, a sign of incomplete recovery.".to_string());
        }
        if input.resting_heart_rate.is_some_and(|r| r >= 80.0) {
            advice.push(
                "Resting heart rate is elevated. Watch for signs of illness or overreaching."
                    .to_string(),
            );
        }
        if recent_load.is_some_and(|l| l > 10_000.0) {
            advice.push(
                "Training volume over the last three days is very high. Plan a deload.".to_string(),
            );
        }

        advice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lightweight(soreness: f64, sleep: f64, energy: f64) -> RecoveryInput {
        RecoveryInput {
            muscle_soreness: Some(soreness),
            sleep_quality: Some(sleep),
            subjective_energy: Some(energy),
            ..Default::default()
        }
    }

    fn lightweight_score(soreness: f64, sleep: f64, energy: f64) -> f64 {
        RecoveryScoreEngine::lightweight_score(Some(&lightweight(soreness, sleep, energy)))
    }

    #[test]
    fn test_lightweight_extremes() {
        let best = lightweight(1.0, 5.0, 5.0);
        assert_eq!(RecoveryScoreEngine::lightweight_score(Some(&best)), 20.0);

        let sore = lightweight(5.0, 4.0, 2.0);
        assert_eq!(RecoveryScoreEngine::lightweight_score(Some(&sore)), 0.0);

        assert_eq!(RecoveryScoreEngine::lightweight_score(None), 0.0);
    }

    #[test]
    fn test_lightweight_defaults() {
        // (5 - 3) * 3 * (3 / 5)
        let empty = RecoveryInput::default();
        let score = RecoveryScoreEngine::lightweight_score(Some(&empty));
        assert!((score - 3.6).abs() < 1e-9);
    }

    #[test]
    fn test_comprehensive_baseline() {
        // Only the "no recent load" bonus applies
        let result = RecoveryScoreEngine::comprehensive_score(&RecoveryInput::default(), None);
        assert_eq!(result.score, 55);
        assert_eq!(result.status, RecoveryStatus::Fair);
        assert_eq!(result.recommended_intensity, RecommendedIntensity::Moderate);
        assert_eq!(result.adjustments.len(), 1);
    }

    #[test]
    fn test_comprehensive_well_rested() {
        let input = RecoveryInput {
            sleep_hours: Some(8.5),
            sleep_quality: Some(8.0),
            muscle_soreness: Some(2.0),
            fatigue_level: Some(3.0),
            stress_level: Some(4.0),
            hrv: Some(65.0),
            resting_heart_rate: Some(52.0),
            ..Default::default()
        };

        // 50 + 20 + 9 + 3 + 6 + 3 + 10 + 5 + 0
        let result = RecoveryScoreEngine::comprehensive_score(&input, Some(3000.0));
        assert_eq!(result.score, 100);
        assert_eq!(result.status, RecoveryStatus::Excellent);
        assert_eq!(result.recommended_intensity, RecommendedIntensity::Intense);
    }

    #[test]
    fn test_comprehensive_exhausted() {
        let input = RecoveryInput {
            sleep_hours: Some(4.0),
            sleep_quality: Some(2.0),
            muscle_soreness: Some(9.0),
            fatigue_level: Some(9.0),
            stress_level: Some(8.0),
            hrv: Some(30.0),
            resting_heart_rate: Some(85.0),
            ..Default::default()
        };

        let result = RecoveryScoreEngine::comprehensive_score(&input, Some(12_000.0));
        assert_eq!(result.score, 0);
        assert_eq!(result.status, RecoveryStatus::Critical);
        assert_eq!(result.recommended_intensity, RecommendedIntensity::Rest);
        assert!(result.advice.iter().any(|a| a.contains("rest day")));
        assert!(result.advice.iter().any(|a| a.contains("deload")));
    }

    #[test]
    fn test_sleep_hour_bands() {
        let score_for = |hours: f64| {
            let input = RecoveryInput {
                sleep_hours: Some(hours),
                ..Default::default()
            };
            RecoveryScoreEngine::comprehensive_score(&input, Some(3000.0)).score
        };

        assert_eq!(score_for(8.0), 70);
        assert_eq!(score_for(7.0), 65);
        assert_eq!(score_for(6.0), 55);
        assert_eq!(score_for(5.5), 45);
        assert_eq!(score_for(5.0), 45);
        assert_eq!(score_for(4.9), 35);
    }

    #[test]
    fn test_recent_load_bands() {
        let input = RecoveryInput::default();
        let score_for = |load| RecoveryScoreEngine::comprehensive_score(&input, load).score;

        assert_eq!(score_for(Some(10_001.0)), 35);
        assert_eq!(score_for(Some(10_000.0)), 45);
        assert_eq!(score_for(Some(5_000.0)), 50);
        assert_eq!(score_for(Some(2_000.0)), 55);
        assert_eq!(score_for(None), 55);
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(RecoveryStatus::from_score(80), RecoveryStatus::Excellent);
        assert_eq!(RecoveryStatus::from_score(79), RecoveryStatus::Good);
        assert_eq!(RecoveryStatus::from_score(40), RecoveryStatus::Fair);
        assert_eq!(RecoveryStatus::from_score(20), RecoveryStatus::Poor);
        assert_eq!(RecoveryStatus::from_score(19), RecoveryStatus::Critical);

        assert_eq!(RecommendedIntensity::from_score(65), RecommendedIntensity::High);
        assert_eq!(RecommendedIntensity::from_score(64), RecommendedIntensity::Moderate);
        assert_eq!(RecommendedIntensity::from_score(30), RecommendedIntensity::Light);
        assert_eq!(RecommendedIntensity::from_score(29), RecommendedIntensity::Rest);
    }

    #[test]
    fn test_status_serializes_upper_case() {
        let json = serde_json::to_string(&RecoveryStatus::Excellent).unwrap();
        assert_eq!(json, "\"EXCELLENT\"");
    }

    proptest! {
        #[test]
        fn test_lightweight_in_range(
            soreness in 1.0f64..=5.0,
            sleep in 1.0f64..=5.0,
            energy in 1.0f64..=5.0
        ) {
            let score = lightweight_score(soreness, sleep, energy);
            prop_assert!((0.0..=LIGHTWEIGHT_MAX).contains(&score));
        }

        #[test]
        fn test_lightweight_monotonic_in_soreness(
            soreness in 1.0f64..5.0,
            sleep in 1.0f64..=5.0,
            energy in 1.0f64..=5.0
        ) {
            let sorer = (soreness + 0.5).min(5.0);
            let rested = lightweight_score(soreness, sleep, energy);
            prop_assert!(rested >= lightweight_score(sorer, sleep, energy));
        }

        #[test]
        fn test_lightweight_monotonic_in_sleep_quality(
            soreness in 1.0f64..=5.0,
            sleep in 1.0f64..5.0,
            step in 0.0f64..=4.0,
            energy in 1.0f64..=5.0
        ) {
            let better = (sleep + step).min(5.0);
            let baseline = lightweight_score(soreness, sleep, energy);
            prop_assert!(lightweight_score(soreness, better, energy) >= baseline);
        }

        #[test]
        fn test_lightweight_monotonic_in_energy(
            soreness in 1.0f64..=5.0,
            sleep in 1.0f64..=5.0,
            energy in 1.0f64..5.0,
            step in 0.0f64..=4.0
        ) {
            let livelier = (energy + step).min(5.0);
            let baseline = lightweight_score(soreness, sleep, energy);
            prop_assert!(lightweight_score(soreness, sleep, livelier) >= baseline);
        }

        #[test]
        fn test_lightweight_max_soreness_scores_zero(
            sleep in 1.0f64..=5.0,
            energy in 1.0f64..=5.0
        ) {
            prop_assert_eq!(lightweight_score(5.0, sleep, energy), 0.0);
        }

        #[test]
        fn test_comprehensive_labels_match_score(
            sleep_hours in prop::option::of(0.0f64..=24.0),
            sleep_quality in prop::option::of(1.0f64..=10.0),
            soreness in prop::option::of(1.0f64..=10.0),
            fatigue in prop::option::of(1.0f64..=10.0),
            stress in prop::option::of(1.0f64..=10.0),
            hrv in prop::option::of(10.0f64..=150.0),
            rhr in prop::option::of(35.0f64..=110.0),
            load in prop::option::of(0.0f64..=30_000.0)
        ) {
            let input = RecoveryInput {
                sleep_hours,
                sleep_quality,
                muscle_soreness: soreness,
                subjective_energy: None,
                fatigue_level: fatigue,
                stress_level: stress,
                hrv,
                resting_heart_rate: rhr,
            };

            let result = RecoveryScoreEngine::comprehensive_score(&input, load);
            prop_assert!(result.score <= 100);
            prop_assert_eq!(result.status, RecoveryStatus::from_score(result.score));
            prop_assert_eq!(
                result.recommended_intensity,
                RecommendedIntensity::from_score(result.score)
            );
        }
    }
}
