/// Intensity assumed when a session carries none
pub const DEFAULT_INTENSITY: f64 = 5.0;

/// kcal per minute per intensity point
const CALORIES_PER_INTENSITY_MINUTE: f64 = 1.2;

/// Duration and intensity based energy expenditure estimates
pub struct CalorieEstimator;

impl CalorieEstimator {
    /// Estimated calories burned: duration × intensity × 1.2
    ///
    /// Missing or non-positive duration yields 0. Missing intensity uses
    /// [`DEFAULT_INTENSITY`].
    pub fn estimate(duration_minutes: Option<f64>, intensity: Option<f64>) -> f64 {
        let duration = match duration_minutes {
            Some(d) if d > 0.0 => d,
            _ => return 0.0,
        };
        let intensity = intensity.unwrap_or(DEFAULT_INTENSITY);

        duration * intensity * CALORIES_PER_INTENSITY_MINUTE
    }

    /// Total calories over several (duration, intensity) sessions
    pub fn estimate_sessions(sessions: &[(Option<f64>, Option<f64>)]) -> f64 {
        sessions
            .iter()
            .map(|&(duration, intensity)| Self::estimate(duration, intensity))
            .sum()
    }
}
