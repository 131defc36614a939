// Library interface for fitrs modules
// The analytics engine is pure; config and logging serve the CLI

pub mod calories;
pub mod config;
pub mod error;
pub mod import;
pub mod logging;
pub mod models;
pub mod nutrition;
pub mod one_rep_max;
pub mod recovery;
pub mod rounding;
pub mod trends;
pub mod volume;

// Re-export commonly used types for convenience
pub use calories::CalorieEstimator;
pub use error::{ErrorKind, FitRsError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use models::*;
pub use nutrition::{ActivityLevel, NutritionCalculator, NutritionTarget, TrainingGoal};
pub use one_rep_max::{OneRepMaxEstimator, OneRepMaxModel};
pub use recovery::{
    ComprehensiveRecovery, RecommendedIntensity, RecoveryScoreEngine, RecoveryStatus,
};
pub use trends::{TrendAnalyzer, TrendConfig, TrendDirection};
pub use volume::{SessionLoad, VolumeCalculator};
