use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use fitrs::config::AppConfig;
use fitrs::import::SeriesCsvImporter;
use fitrs::logging::{init_logging, LogLevel};
use fitrs::nutrition::NutritionCalculator;
use fitrs::rounding::round_dp;
use fitrs::{
    ActivityLevel, BodyProfile, CalorieEstimator, OneRepMaxEstimator, OneRepMaxModel, RecoveryInput,
    RecoveryScoreEngine, RecoveryStatus, SetPerformance, Sex, TrainingGoal, TrendAnalyzer,
    TrendDirection, VolumeCalculator,
};

/// FitRS - Strength Training Analytics CLI
///
/// Estimates one-rep maxes, session volume, calorie burn, recovery readiness,
/// nutrition targets and metric trends from logged training data.
#[derive(Parser)]
#[command(name = "fitrs")]
#[command(author = "FitRS Contributors")]
#[command(version)]
#[command(about = "Strength Training Analytics CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate a one-rep max from a set
    OneRm {
        /// Load lifted (kg)
        #[arg(short, long)]
        weight: f64,

        /// Repetitions completed
        #[arg(short, long)]
        reps: i32,

        /// Formula (epley, brzycki, lombardi, oconner, mayhew)
        #[arg(short, long)]
        model: Option<String>,

        /// Show every formula and the consensus
        #[arg(short, long)]
        all: bool,
    },

    /// Total volume and training stress of a session
    Volume {
        /// Entries as WEIGHTxSETSxREPS[@RPE], e.g. 100x3x10@8
        #[arg(required = true)]
        entries: Vec<String>,
    },

    /// Estimate calories burned by a session
    Calories {
        /// Session duration in minutes
        #[arg(short, long)]
        duration: f64,

        /// Intensity (1-10)
        #[arg(short, long)]
        intensity: Option<f64>,
    },

    /// Comprehensive 0-100 recovery score
    Recovery {
        /// Hours slept
        #[arg(long)]
        sleep_hours: Option<f64>,

        /// Sleep quality (1-10)
        #[arg(long)]
        sleep_quality: Option<f64>,

        /// Muscle soreness (1-10)
        #[arg(long)]
        soreness: Option<f64>,

        /// Fatigue (1-10)
        #[arg(long)]
        fatigue: Option<f64>,

        /// Life stress (1-10)
        #[arg(long)]
        stress: Option<f64>,

        /// Heart rate variability (ms)
        #[arg(long)]
        hrv: Option<f64>,

        /// Resting heart rate (bpm)
        #[arg(long)]
        rhr: Option<f64>,

        /// Training volume of the last three days
        #[arg(long)]
        recent_load: Option<f64>,
    },

    /// Lightweight 0-20 per-session recovery score
    QuickRecovery {
        /// Muscle soreness (1-5)
        #[arg(long)]
        soreness: Option<f64>,

        /// Sleep quality (1-5)
        #[arg(long)]
        sleep_quality: Option<f64>,

        /// Energy level (1-5)
        #[arg(long)]
        energy: Option<f64>,
    },

    /// Daily calorie and macro targets
    Nutrition {
        /// Body weight (kg)
        #[arg(short, long)]
        weight: f64,

        /// Height (cm)
        #[arg(long)]
        height: f64,

        /// Age in years
        #[arg(short, long)]
        age: u32,

        /// Sex (male, female)
        #[arg(short, long, default_value = "male")]
        sex: String,

        /// Activity level (sedentary, light, moderate, active, very_active)
        #[arg(long)]
        activity: Option<String>,

        /// Goal (muscle_gain, fat_loss, maintenance)
        #[arg(short, long)]
        goal: Option<String>,
    },

    /// Summarize a dated metric series from a CSV file
    Trend {
        /// CSV file with date and value columns
        #[arg(short, long)]
        file: PathBuf,

        /// Window length for the period comparison (config default if omitted)
        #[arg(short, long)]
        days: Option<u32>,

        /// Last day of the current window (YYYY-MM-DD, default today)
        #[arg(short, long)]
        end: Option<NaiveDate>,

        /// Sum same-day values before summarizing
        #[arg(short, long)]
        rollup: bool,
    },

    /// Configure application settings
    Config {
        /// List all configuration options
        #[arg(short, long)]
        list: bool,

        /// Set a configuration value (key=value)
        #[arg(short, long)]
        set: Option<String>,

        /// Get a configuration value
        #[arg(short, long)]
        get: Option<String>,
    },
}

#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "1RM (kg)")]
    one_rep_max: String,
}

#[derive(Tabled)]
struct AdjustmentRow {
    #[tabled(rename = "Factor")]
    factor: String,
    #[tabled(rename = "Adjustment")]
    adjustment: String,
}

#[derive(Tabled)]
struct MacroRow {
    #[tabled(rename = "Macro")]
    name: &'static str,
    #[tabled(rename = "Grams")]
    grams: String,
    #[tabled(rename = "Share")]
    share: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone();
    let resolved_path = config_path
        .clone()
        .unwrap_or_else(AppConfig::default_config_path);
    let loaded = AppConfig::load_for_update(&resolved_path);
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let mut log_config = config.logging.clone();
    log_config.level = LogLevel::from_verbosity(log_config.level, cli.verbose);
    init_logging(&log_config)?;

    // reported only once logging is up
    if let Err(err) = &loaded {
        tracing::warn!(
            path = %resolved_path.display(),
            error = %format!("{:#}", err),
            "Config file rejected, using default configuration"
        );
    }

    if cli.verbose > 0 {
        eprintln!("{}", format!("Log level: {}", log_config.level.to_filter()).dimmed());
    }

    match cli.command {
        Commands::OneRm {
            weight,
            reps,
            model,
            all,
        } => {
            let model = match model {
                Some(name) => name.parse::<OneRepMaxModel>()?,
                None => config.defaults.one_rep_max_model,
            };
            run_one_rm(weight, reps, model, all, cli.json)?;
        }

        Commands::Volume { entries } => run_volume(&entries, cli.json)?,

        Commands::Calories {
            duration,
            intensity,
        } => {
            let intensity = intensity.unwrap_or(config.defaults.calorie_intensity);
            let calories = round_dp(CalorieEstimator::estimate(Some(duration), Some(intensity)), 0);
            if cli.json {
                print_json(&serde_json::json!({
                    "duration_minutes": duration,
                    "intensity": intensity,
                    "calories": calories,
                }))?;
            } else {
                println!("{}", "Estimated calorie burn".green().bold());
                println!("  Duration:  {} min", duration);
                println!("  Intensity: {}", intensity);
                println!("  Calories:  {} kcal", calories.to_string().bold());
            }
        }

        Commands::Recovery {
            sleep_hours,
            sleep_quality,
            soreness,
            fatigue,
            stress,
            hrv,
            rhr,
            recent_load,
        } => {
            let input = RecoveryInput {
                sleep_hours,
                sleep_quality,
                muscle_soreness: soreness,
                fatigue_level: fatigue,
                stress_level: stress,
                hrv,
                resting_heart_rate: rhr,
                ..RecoveryInput::default()
            };
            run_recovery(&input, recent_load, cli.json)?;
        }

        Commands::QuickRecovery {
            soreness,
            sleep_quality,
            energy,
        } => {
            let input = RecoveryInput {
                sleep_quality,
                muscle_soreness: soreness,
                subjective_energy: energy,
                ..RecoveryInput::default()
            };
            let score = round_dp(RecoveryScoreEngine::lightweight_score(Some(&input)), 1);
            if cli.json {
                print_json(&serde_json::json!({ "score": score, "max": 20 }))?;
            } else {
                println!("{}", "Session recovery".cyan().bold());
                println!("  Score: {} / 20", score.to_string().bold());
            }
        }

        Commands::Nutrition {
            weight,
            height,
            age,
            sex,
            activity,
            goal,
        } => {
            let activity = match activity {
                Some(name) => name.parse::<ActivityLevel>()?,
                None => config.defaults.activity_level,
            };
            let goal = match goal {
                Some(name) => name.parse::<TrainingGoal>()?,
                None => config.defaults.goal,
            };
            let profile = BodyProfile {
                weight_kg: weight,
                height_cm: height,
                age,
                sex: Sex::from_name(&sex),
            };
            run_nutrition(&profile, activity, goal, cli.json)?;
        }

        Commands::Trend {
            file,
            days,
            end,
            rollup,
        } => {
            let days = days.unwrap_or(config.trends.comparison_days);
            let end = end.unwrap_or_else(|| Local::now().date_naive());
            let analyzer = TrendAnalyzer::with_config(config.trends.clone());
            run_trend(&analyzer, &file, days, end, rollup, cli.json)?;
        }

        Commands::Config { list, set, get } => {
            run_config(config_path.as_deref(), list, set, get)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_one_rm(weight: f64, reps: i32, model: OneRepMaxModel, all: bool, json: bool) -> Result<()> {
    if all {
        let estimates = OneRepMaxEstimator::estimate_all(weight, reps);
        let consensus = round_dp(OneRepMaxEstimator::consensus(weight, reps), 1);

        if json {
            return print_json(&serde_json::json!({
                "weight": weight,
                "reps": reps,
                "estimates": estimates,
                "consensus": consensus,
            }));
        }

        let rows: Vec<ModelRow> = estimates
            .iter()
            .map(|e| ModelRow {
                model: e.model.to_string(),
                one_rep_max: format!("{:.1}", e.one_rep_max),
            })
            .collect();

        println!("{}", format!("1RM estimates for {} kg x {}", weight, reps).green().bold());
        println!("{}", Table::new(rows).with(Style::rounded()));
        println!("  Consensus: {} kg", consensus.to_string().bold());
        return Ok(());
    }

    let one_rep_max = round_dp(model.estimate(weight, reps), 1);
    if json {
        print_json(&serde_json::json!({
            "weight": weight,
            "reps": reps,
            "model": model,
            "one_rep_max": one_rep_max,
        }))
    } else {
        println!("{}", "Estimated one-rep max".green().bold());
        println!("  Model: {}", model);
        println!("  1RM:   {} kg", one_rep_max.to_string().bold());
        Ok(())
    }
}

fn run_volume(raw_entries: &[String], json: bool) -> Result<()> {
    let entries = raw_entries
        .iter()
        .map(|raw| raw.parse::<SetPerformance>())
        .collect::<fitrs::Result<Vec<_>>>()?;

    let load = VolumeCalculator::session_load(&entries);

    if json {
        return print_json(&load);
    }

    println!("{}", "Session load".blue().bold());
    println!("  Entries:      {}", load.entry_count);
    println!("  Sets / reps:  {} / {}", load.total_sets, load.total_reps);
    println!("  Volume:       {} kg", round_dp(load.total_volume, 1).to_string().bold());
    println!("  Stress:       {}", round_dp(load.total_stress, 1));
    if let Some(rpe) = load.average_rpe {
        println!("  Average RPE:  {}", round_dp(rpe, 1));
    }
    Ok(())
}

fn run_recovery(input: &RecoveryInput, recent_load: Option<f64>, json: bool) -> Result<()> {
    let recovery = RecoveryScoreEngine::comprehensive_score(input, recent_load);

    if json {
        return print_json(&recovery);
    }

    let score = recovery.score.to_string();
    let score = match recovery.status {
        RecoveryStatus::Excellent | RecoveryStatus::Good => score.green(),
        RecoveryStatus::Fair => score.yellow(),
        RecoveryStatus::Poor | RecoveryStatus::Critical => score.red(),
    };

    println!("{}", "Recovery readiness".cyan().bold());
    println!("  Score:     {} / 100", score.bold());
    println!("  Status:    {} ({})", recovery.status, recovery.status.description());
    println!("  Intensity: {}", recovery.recommended_intensity);

    if !recovery.adjustments.is_empty() {
        let rows: Vec<AdjustmentRow> = recovery
            .adjustments
            .iter()
            .map(|a| AdjustmentRow {
                factor: format!("{:?}", a.factor),
                adjustment: format!("{:+.0}", a.adjustment),
            })
            .collect();
        println!("{}", Table::new(rows).with(Style::rounded()));
    }

    for line in &recovery.advice {
        println!("  {} {}", "•".cyan(), line);
    }
    Ok(())
}

fn run_nutrition(
    profile: &BodyProfile,
    activity: ActivityLevel,
    goal: TrainingGoal,
    json: bool,
) -> Result<()> {
    let target = NutritionCalculator::target(profile, activity, goal);

    if json {
        return print_json(&target);
    }

    println!("{}", "Daily nutrition target".magenta().bold());
    println!("  Activity: {}  Goal: {}", target.activity_level, target.goal);
    println!("  BMR:      {} kcal", target.bmr);
    println!("  TDEE:     {} kcal", target.tdee);
    println!("  Target:   {} kcal", target.recommended_calories.to_string().bold());

    let rows = vec![
        MacroRow {
            name: "Protein",
            grams: format!("{:.1}", target.recommended_protein_g),
            share: format!("{:.1}%", target.protein_percentage),
        },
        MacroRow {
            name: "Carbs",
            grams: format!("{:.1}", target.recommended_carbs_g),
            share: format!("{:.1}%", target.carbs_percentage),
        },
        MacroRow {
            name: "Fat",
            grams: format!("{:.1}", target.recommended_fat_g),
            share: format!("{:.1}%", target.fat_percentage),
        },
    ];
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

fn run_trend(
    analyzer: &TrendAnalyzer,
    file: &Path,
    days: u32,
    end: NaiveDate,
    rollup: bool,
    json: bool,
) -> Result<()> {
    let mut series = SeriesCsvImporter::new()
        .import_file(file)
        .with_context(|| format!("Failed to import series from {}", file.display()))?;
    if rollup {
        series = TrendAnalyzer::daily_rollup(&series);
    }

    let summary = analyzer.summarize(&series);
    let comparison = TrendAnalyzer::compare_windows(&series, end, days);

    if json {
        return print_json(&serde_json::json!({
            "summary": summary,
            "comparison": comparison,
        }));
    }

    let direction = match summary.direction {
        TrendDirection::Increasing => summary.direction.to_string().green(),
        TrendDirection::Stable => summary.direction.to_string().yellow(),
        TrendDirection::Decreasing => summary.direction.to_string().red(),
    };

    println!("{}", format!("Trend for {}", file.display()).cyan().bold());
    println!("  Points:    {}", summary.count);
    println!("  Total:     {}", round_dp(summary.sum, 1));
    println!("  Mean:      {}", round_dp(summary.mean, 1));
    println!("  Range:     {} .. {}", round_dp(summary.min, 1), round_dp(summary.max, 1));
    println!("  Std dev:   {}", round_dp(summary.std_dev, 2));
    println!("  Slope:     {}", round_dp(summary.slope, 3));
    println!("  Direction: {}", direction.bold());

    println!(
        "  Last {} days vs previous {}: {} -> {} ({})",
        days,
        days,
        round_dp(comparison.previous_total, 1),
        round_dp(comparison.current_total, 1),
        comparison.relative_change,
    );
    Ok(())
}

fn run_config(
    path: Option<&Path>,
    list: bool,
    set: Option<String>,
    get: Option<String>,
) -> Result<()> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(AppConfig::default_config_path);
    let config = AppConfig::load_for_update(&path)?;

    if let Some(key_value) = set {
        let (key, value) = key_value
            .split_once('=')
            .with_context(|| format!("Expected key=value, got '{}'", key_value))?;
        AppConfig::update_file(&path, key.trim(), value.trim())?;
        println!("{} {} = {}", "✓".green(), key.trim(), value.trim());
    } else if let Some(key) = get {
        let value = config
            .get(&key)
            .with_context(|| format!("Unknown configuration key: {}", key))?;
        println!("{}", value);
    } else if list {
        println!("{}", format!("Configuration ({})", path.display()).white().bold());
        for key in AppConfig::keys() {
            println!("  {} = {}", key, config.get(key).unwrap_or_default());
        }
    } else {
        println!("{}", "Nothing to do; pass --list, --get or --set".dimmed());
    }
    Ok(())
}
