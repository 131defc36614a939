//! One-repetition maximum estimation
//!
//! Converts a submaximal set (weight × reps) into an estimated 1RM using one
//! of five published regression formulas.
//!
//! # Formulas
//!
//! With W = weight lifted and R = repetitions completed:
//!
//! - **Epley**: `W × (1 + R/30)`
//! - **Brzycki**: `W × 36 / (37 − R)`, capped at `W × 10` from 37 reps
//! - **Lombardi**: `W × R^0.1`
//! - **O'Conner**: `W × (1 + R/40)`
//! - **Mayhew**: `W × 100 / (48.8 + 53.8 × e^(−0.075 × R))`
//!
//! Missing weight or reps, or reps ≤ 0, yield 0 instead of an error so that
//! callers can keep treating 0 as "no data".

use crate::error::FitRsError;
use crate::models::SetPerformance;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rep count at which the Brzycki denominator reaches zero
const BRZYCKI_POLE: f64 = 37.0;

/// Regression formulas for estimating a 1RM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OneRepMaxModel {
    #[default]
    Epley,
    Brzycki,
    Lombardi,
    OConner,
    Mayhew,
}

const SUPPORTED_MODELS: [OneRepMaxModel; 5] = [
    OneRepMaxModel::Epley,
    OneRepMaxModel::Brzycki,
    OneRepMaxModel::Lombardi,
    OneRepMaxModel::OConner,
    OneRepMaxModel::Mayhew,
];

impl OneRepMaxModel {
    /// Resolve a model name, falling back to Epley for absent or unknown names
    pub fn from_name(name: Option<&str>) -> Self {
        name.and_then(|n| n.parse().ok()).unwrap_or_default()
    }

    /// Apply the formula for an already validated rep count (≥ 1)
    fn apply(&self, weight: f64, reps: f64) -> f64 {
        match self {
            OneRepMaxModel::Epley => weight * (1.0 + reps / 30.0),
            OneRepMaxModel::Brzycki => {
                if reps < BRZYCKI_POLE {
                    weight * 36.0 / (BRZYCKI_POLE - reps)
                } else {
                    weight * 10.0
                }
            }
            OneRepMaxModel::Lombardi => weight * reps.powf(0.1),
            OneRepMaxModel::OConner => weight * (1.0 + reps / 40.0),
            OneRepMaxModel::Mayhew => weight * 100.0 / (48.8 + 53.8 * (-0.075 * reps).exp()),
        }
    }

    /// Estimate a 1RM with this model
    pub fn estimate(&self, weight: f64, reps: i32) -> f64 {
        if reps <= 0 || !weight.is_finite() {
            return 0.0;
        }
        self.apply(weight, reps.max(1) as f64)
    }
}

impl fmt::Display for OneRepMaxModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OneRepMaxModel::Epley => write!(f, "Epley"),
            OneRepMaxModel::Brzycki => write!(f, "Brzycki"),
            OneRepMaxModel::Lombardi => write!(f, "Lombardi"),
            OneRepMaxModel::OConner => write!(f, "OConner"),
            OneRepMaxModel::Mayhew => write!(f, "Mayhew"),
        }
    }
}

impl FromStr for OneRepMaxModel {
    type Err = FitRsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "epley" => Ok(OneRepMaxModel::Epley),
            "brzycki" => Ok(OneRepMaxModel::Brzycki),
            "lombardi" => Ok(OneRepMaxModel::Lombardi),
            "oconner" | "oconnor" => Ok(OneRepMaxModel::OConner),
            "mayhew" => Ok(OneRepMaxModel::Mayhew),
            _ => Err(FitRsError::UnknownVariant {
                kind: "1RM model",
                value: s.to_string(),
            }),
        }
    }
}

/// Estimate for a single model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelEstimate {
    pub model: OneRepMaxModel,
    pub one_rep_max: f64,
}

/// 1RM estimation engine
pub struct OneRepMaxEstimator;

impl OneRepMaxEstimator {
    /// Estimate a 1RM from possibly missing inputs and a model name
    pub fn estimate(weight: Option<f64>, reps: Option<i32>, model: Option<&str>) -> f64 {
        match (weight, reps) {
            (Some(w), Some(r)) => OneRepMaxModel::from_name(model).estimate(w, r),
            _ => 0.0,
        }
    }

    /// The fixed, ordered set of supported models
    pub fn supported_models() -> &'static [OneRepMaxModel] {
        &SUPPORTED_MODELS
    }

    /// Estimates from every supported model, in `supported_models` order
    pub fn estimate_all(weight: f64, reps: i32) -> Vec<ModelEstimate> {
        SUPPORTED_MODELS
            .iter()
            .map(|&model| ModelEstimate {
                model,
                one_rep_max: model.estimate(weight, reps),
            })
            .collect()
    }

    /// Mean of all model estimates
    pub fn consensus(weight: f64, reps: i32) -> f64 {
        let estimates = Self::estimate_all(weight, reps);
        estimates.iter().map(|e| e.one_rep_max).sum::<f64>() / estimates.len() as f64
    }

    /// Highest estimate across a list of logged sets
    ///
    /// Entries missing weight or reps are ignored. Returns 0 for an empty list.
    pub fn best_estimate(sets: &[SetPerformance], model: OneRepMaxModel) -> f64 {
        sets.iter()
            .filter_map(|s| match (s.weight, s.reps) {
                (Some(w), Some(r)) => Some(model.estimate(w, i32::try_from(r).unwrap_or(i32::MAX))),
                _ => None,
            })
            .fold(0.0, f64::max)
    }

    /// Load expected for `reps` repetitions at a given 1RM (inverse Epley)
    pub fn weight_for_reps(one_rep_max: f64, reps: u32) -> f64 {
        if one_rep_max <= 0.0 || reps == 0 {
            return 0.0;
        }
        if reps == 1 {
            return one_rep_max;
        }
        one_rep_max / (1.0 + reps as f64 / 30.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    #[test]
    fn test_reference_values() {
        assert!(approx_eq(
            OneRepMaxEstimator::estimate(Some(100.0), Some(5), Some("Epley")),
            116.67,
            0.01
        ));
        assert_eq!(
            OneRepMaxEstimator::estimate(Some(100.0), Some(5), Some("Brzycki")),
            112.5
        );
        assert_eq!(
            OneRepMaxEstimator::estimate(Some(100.0), Some(5), Some("OConner")),
            112.5
        );
    }

    #[test]
    fn test_missing_inputs_return_zero() {
        assert_eq!(OneRepMaxEstimator::estimate(None, Some(5), None), 0.0);
        assert_eq!(OneRepMaxEstimator::estimate(Some(100.0), None, None), 0.0);
        assert_eq!(OneRepMaxEstimator::estimate(Some(100.0), Some(0), None), 0.0);
        assert_eq!(OneRepMaxEstimator::estimate(Some(100.0), Some(-3), None), 0.0);
    }

    #[test]
    fn test_unknown_model_defaults_to_epley() {
        let epley = OneRepMaxEstimator::estimate(Some(80.0), Some(8), Some("Epley"));
        assert_eq!(OneRepMaxEstimator::estimate(Some(80.0), Some(8), Some("Wathan")), epley);
        assert_eq!(OneRepMaxEstimator::estimate(Some(80.0), Some(8), None), epley);
    }

    #[test]
    fn test_model_name_parsing() {
        assert_eq!("brzycki".parse::<OneRepMaxModel>().unwrap(), OneRepMaxModel::Brzycki);
        assert_eq!("O'Conner".parse::<OneRepMaxModel>().unwrap(), OneRepMaxModel::OConner);
        assert_eq!(" MAYHEW ".parse::<OneRepMaxModel>().unwrap(), OneRepMaxModel::Mayhew);
        assert!("wathan".parse::<OneRepMaxModel>().is_err());
    }

    #[test]
    fn test_brzycki_pole_guard() {
        assert_eq!(OneRepMaxModel::Brzycki.estimate(50.0, 37), 500.0);
        assert_eq!(OneRepMaxModel::Brzycki.estimate(50.0, 40), 500.0);
        assert!(OneRepMaxModel::Brzycki.estimate(50.0, 36).is_finite());
    }

    #[test]
    fn test_single_rep() {
        assert_eq!(OneRepMaxModel::Lombardi.estimate(120.0, 1), 120.0);
        assert_eq!(OneRepMaxModel::Brzycki.estimate(120.0, 1), 120.0);
    }

    #[test]
    fn test_supported_models_order() {
        let names: Vec<String> = OneRepMaxEstimator::supported_models()
            .iter()
            .map(|m| m.to_string())
            .collect();
        assert_eq!(names, vec!["Epley", "Brzycki", "Lombardi", "OConner", "Mayhew"]);
    }

    #[test]
    fn test_estimate_all_and_consensus() {
        let all = OneRepMaxEstimator::estimate_all(100.0, 5);
        assert_eq!(all.len(), 5);
        assert_eq!(all[1].model, OneRepMaxModel::Brzycki);
        assert_eq!(all[1].one_rep_max, 112.5);

        let consensus = OneRepMaxEstimator::consensus(100.0, 5);
        let min = all.iter().map(|e| e.one_rep_max).fold(f64::MAX, f64::min);
        let max = all.iter().map(|e| e.one_rep_max).fold(0.0, f64::max);
        assert!(consensus >= min && consensus <= max);
    }

    #[test]
    fn test_best_estimate() {
        let sets = vec![
            SetPerformance::new(100.0, 3, 5),
            SetPerformance::new(110.0, 1, 3),
            SetPerformance {
                weight: None,
                reps: Some(10),
                sets: Some(1),
                rpe: None,
            },
        ];
        let best = OneRepMaxEstimator::best_estimate(&sets, OneRepMaxModel::Epley);
        assert!(approx_eq(best, 121.0, 0.001));
        assert_eq!(OneRepMaxEstimator::best_estimate(&[], OneRepMaxModel::Epley), 0.0);
    }

    #[test]
    fn test_best_estimate_with_huge_rep_count() {
        let sets = vec![SetPerformance::new(100.0, 1, u32::MAX)];

        let best = OneRepMaxEstimator::best_estimate(&sets, OneRepMaxModel::Brzycki);
        assert!(approx_eq(best, 1000.0, 1e-9));
        assert!(OneRepMaxEstimator::best_estimate(&sets, OneRepMaxModel::Epley) > 100.0);
    }

    #[test]
    fn test_weight_for_reps_inverts_epley() {
        let one_rm = OneRepMaxModel::Epley.estimate(100.0, 5);
        assert!(approx_eq(OneRepMaxEstimator::weight_for_reps(one_rm, 5), 100.0, 1e-9));
        assert_eq!(OneRepMaxEstimator::weight_for_reps(150.0, 1), 150.0);
        assert_eq!(OneRepMaxEstimator::weight_for_reps(0.0, 5), 0.0);
    }

    fn any_model() -> impl Strategy<Value = OneRepMaxModel> {
        prop::sample::select(SUPPORTED_MODELS.to_vec())
    }

    proptest! {
        #[test]
        fn test_estimate_never_below_weight(
            weight in 0.5f64..500.0,
            reps in 1i32..=30,
            model in any_model()
        ) {
            prop_assert!(model.estimate(weight, reps) >= weight - 1e-9);
        }

        #[test]
        fn test_estimate_linear_in_weight(
            weight in 1.0f64..300.0,
            k in 0.1f64..10.0,
            reps in 1i32..=30,
            model in any_model()
        ) {
            let scaled = model.estimate(weight * k, reps);
            let expected = k * model.estimate(weight, reps);
            prop_assert!((scaled - expected).abs() <= expected.abs() * 1e-9);
        }

        #[test]
        fn test_estimate_monotonic_in_reps(
            weight in 1.0f64..300.0,
            reps1 in 1i32..30,
            delta in 1i32..6,
            model in any_model()
        ) {
            let reps2 = reps1 + delta;
            prop_assert!(model.estimate(weight, reps2) >= model.estimate(weight, reps1));
        }

        #[test]
        fn test_non_positive_reps_is_zero(
            weight in 0.0f64..300.0,
            reps in -50i32..=0,
            model in any_model()
        ) {
            prop_assert_eq!(model.estimate(weight, reps), 0.0);
        }
    }
}
