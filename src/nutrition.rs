//! Daily calorie and macronutrient targets
//!
//! # Method
//!
//! 1. **BMR** from the Mifflin-St Jeor equation:
//!    `10 × kg + 6.25 × cm − 5 × age + 5` (−161 instead of +5 for women)
//! 2. **TDEE** = BMR × activity multiplier (1.2 sedentary to 1.9 very active)
//! 3. **Calories** = TDEE × goal factor (0.8 fat loss, 1.15 muscle gain, 1.0 maintenance)
//! 4. **Protein** is the larger of a bodyweight target and the goal's share of
//!    calories, capped at 2.2 g/kg
//! 5. **Carbs and fat** split the calories left after protein in the goal's
//!    nominal carb:fat ratio (4 kcal/g carbs, 9 kcal/g fat)
//!
//! When protein lands on its nominal share, step 5 reduces to
//! `calories × share ÷ kcal per gram` for both carbs and fat.

use crate::error::FitRsError;
use crate::models::{BodyProfile, NutritionIntake, Sex};
use crate::rounding::round_dp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

/// Protein ceiling in g per kg of bodyweight, for every goal
pub const MAX_PROTEIN_PER_KG: f64 = 2.2;

/// Lowest per-kg protein target across goals
pub const MIN_PROTEIN_PER_KG: f64 = 1.6;

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Exercise 1-3 days/week
    Light,
    /// Exercise 3-5 days/week
    #[default]
    Moderate,
    /// Exercise 6-7 days/week
    Active,
    /// Hard daily training or a physical job
    VeryActive,
}

impl ActivityLevel {
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    /// Resolve a name, falling back to moderate for absent or unknown names
    pub fn from_name(name: Option<&str>) -> Self {
        name.and_then(|n| n.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityLevel::Sedentary => write!(f, "sedentary"),
            ActivityLevel::Light => write!(f, "light"),
            ActivityLevel::Moderate => write!(f, "moderate"),
            ActivityLevel::Active => write!(f, "active"),
            ActivityLevel::VeryActive => write!(f, "very_active"),
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = FitRsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_name(s).as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" | "lightly_active" => Ok(ActivityLevel::Light),
            "moderate" | "moderately_active" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "very_active" | "extra_active" => Ok(ActivityLevel::VeryActive),
            _ => Err(FitRsError::UnknownVariant {
                kind: "activity level",
                value: s.to_string(),
            }),
        }
    }
}

/// Training goal driving the calorie adjustment and macro split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrainingGoal {
    FatLoss,
    MuscleGain,
    #[default]
    Maintenance,
}

/// Percentage of calories assigned to each macronutrient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl TrainingGoal {
    pub fn calorie_factor(&self) -> f64 {
        match self {
            TrainingGoal::FatLoss => 0.8,
            TrainingGoal::MuscleGain => 1.15,
            TrainingGoal::Maintenance => 1.0,
        }
    }

    pub fn macro_split(&self) -> MacroSplit {
        match self {
            TrainingGoal::FatLoss => MacroSplit {
                protein: 30.0,
                carbs: 35.0,
                fat: 35.0,
            },
            TrainingGoal::MuscleGain => MacroSplit {
                protein: 25.0,
                carbs: 50.0,
                fat: 25.0,
            },
            TrainingGoal::Maintenance => MacroSplit {
                protein: 25.0,
                carbs: 45.0,
                fat: 30.0,
            },
        }
    }

    /// Bodyweight protein target in g/kg
    pub fn protein_per_kg(&self) -> f64 {
        match self {
            TrainingGoal::FatLoss => 2.0,
            TrainingGoal::MuscleGain => 2.2,
            TrainingGoal::Maintenance => 1.6,
        }
    }

    /// Resolve a name, falling back to maintenance for absent or unknown names
    pub fn from_name(name: Option<&str>) -> Self {
        name.and_then(|n| n.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for TrainingGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingGoal::FatLoss => write!(f, "fat_loss"),
            TrainingGoal::MuscleGain => write!(f, "muscle_gain"),
            TrainingGoal::Maintenance => write!(f, "maintenance"),
        }
    }
}

impl FromStr for TrainingGoal {
    type Err = FitRsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_name(s).as_str() {
            "fat_loss" | "weight_loss" | "cut" => Ok(TrainingGoal::FatLoss),
            "muscle_gain" | "bulk" => Ok(TrainingGoal::MuscleGain),
            "maintenance" | "maintain" => Ok(TrainingGoal::Maintenance),
            _ => Err(FitRsError::UnknownVariant {
                kind: "training goal",
                value: s.to_string(),
            }),
        }
    }
}

/// Lowercase and map spaces/hyphens to underscores
fn normalize_name(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Recommended daily intake
///
/// When protein is raised above its nominal share, carb and fat grams come
/// from the calories left after protein, split in the goal's carb:fat ratio.
/// They then differ from `calories × share ÷ kcal/g`; without a shift the two
/// agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionTarget {
    /// Basal metabolic rate (kcal/day)
    pub bmr: f64,

    /// Total daily energy expenditure (kcal/day)
    pub tdee: f64,

    pub recommended_calories: f64,
    pub recommended_protein_g: f64,
    pub recommended_carbs_g: f64,
    pub recommended_fat_g: f64,

    pub protein_percentage: f64,
    pub carbs_percentage: f64,
    pub fat_percentage: f64,

    pub activity_level: ActivityLevel,
    pub goal: TrainingGoal,
}

impl NutritionTarget {
    /// All-zero target returned when the profile can't support a calculation
    fn empty(activity_level: ActivityLevel, goal: TrainingGoal) -> Self {
        Self {
            bmr: 0.0,
            tdee: 0.0,
            recommended_calories: 0.0,
            recommended_protein_g: 0.0,
            recommended_carbs_g: 0.0,
            recommended_fat_g: 0.0,
            protein_percentage: 0.0,
            carbs_percentage: 0.0,
            fat_percentage: 0.0,
            activity_level,
            goal,
        }
    }

    pub fn percentage_total(&self) -> f64 {
        self.protein_percentage + self.carbs_percentage + self.fat_percentage
    }
}

/// How a day's logged intake compares to its target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionAdherence {
    /// Percent of the calorie target consumed
    pub calories_pct: f64,
    pub protein_pct: f64,
    pub carbs_pct: f64,
    pub fat_pct: f64,

    /// Intake minus target, in kcal
    pub calorie_balance: f64,
}

/// Nutrition target calculations
pub struct NutritionCalculator;

impl NutritionCalculator {
    /// Mifflin-St Jeor basal metabolic rate
    pub fn bmr(profile: &BodyProfile) -> f64 {
        let base = 10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * profile.age as f64;
        match profile.sex {
            Sex::Female => base - 161.0,
            Sex::Male => base + 5.0,
        }
    }

    pub fn tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
        bmr * activity_level.multiplier()
    }

    /// Daily target from activity and goal names, applying the defaults for unknown names
    pub fn target_from_names(
        profile: &BodyProfile,
        activity_level: Option<&str>,
        goal: Option<&str>,
    ) -> NutritionTarget {
        Self::target(
            profile,
            ActivityLevel::from_name(activity_level),
            TrainingGoal::from_name(goal),
        )
    }

    /// Daily calorie and macro target
    pub fn target(
        profile: &BodyProfile,
        activity_level: ActivityLevel,
        goal: TrainingGoal,
    ) -> NutritionTarget {
        let weight = profile.weight_kg;
        let height = profile.height_cm;
        if !(weight.is_finite() && weight > 0.0 && height.is_finite() && height > 0.0) {
            return NutritionTarget::empty(activity_level, goal);
        }

        let bmr = Self::bmr(profile);
        let tdee = Self::tdee(bmr, activity_level);
        let calories = tdee * goal.calorie_factor();
        if calories <= 0.0 {
            return NutritionTarget::empty(activity_level, goal);
        }

        let split = goal.macro_split();

        let protein_by_weight = weight * goal.protein_per_kg();
        let protein_by_share = calories * split.protein / 100.0 / KCAL_PER_G_PROTEIN;
        let protein_g = protein_by_weight
            .max(protein_by_share)
            .min(weight * MAX_PROTEIN_PER_KG);
        let protein_kcal = protein_g * KCAL_PER_G_PROTEIN;

        let remaining_kcal = (calories - protein_kcal).max(0.0);
        let carb_ratio = split.carbs / (split.carbs + split.fat);
        let carbs_g = remaining_kcal * carb_ratio / KCAL_PER_G_CARBS;
        let fat_g = remaining_kcal * (1.0 - carb_ratio) / KCAL_PER_G_FAT;

        let target = NutritionTarget {
            bmr: round_dp(bmr, 0),
            tdee: round_dp(tdee, 0),
            recommended_calories: round_dp(calories, 0),
            recommended_protein_g: round_dp(protein_g, 1),
            recommended_carbs_g: round_dp(carbs_g, 1),
            recommended_fat_g: round_dp(fat_g, 1),
            protein_percentage: round_dp(protein_kcal / calories * 100.0, 1),
            carbs_percentage: round_dp(carbs_g * KCAL_PER_G_CARBS / calories * 100.0, 1),
            fat_percentage: round_dp(fat_g * KCAL_PER_G_FAT / calories * 100.0, 1),
            activity_level,
            goal,
        };

        tracing::debug!(
            bmr = target.bmr,
            tdee = target.tdee,
            calories = target.recommended_calories,
            protein_g = target.recommended_protein_g,
            %activity_level,
            %goal,
            "Nutrition target calculated"
        );

        target
    }

    /// Compare a day's intake against its target
    pub fn adherence(target: &NutritionTarget, intake: &NutritionIntake) -> NutritionAdherence {
        let pct = |actual: f64, goal: f64| {
            if goal > 0.0 {
                round_dp(actual / goal * 100.0, 1)
            } else {
                0.0
            }
        };

        NutritionAdherence {
            calories_pct: pct(intake.calories, target.recommended_calories),
            protein_pct: pct(intake.protein_g, target.recommended_protein_g),
            carbs_pct: pct(intake.carbs_g, target.recommended_carbs_g),
            fat_pct: pct(intake.fat_g, target.recommended_fat_g),
            calorie_balance: round_dp(intake.calories - target.recommended_calories, 0),
        }
    }
}
