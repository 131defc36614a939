use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fitrs::nutrition::NutritionCalculator;
use fitrs::{
    ActivityLevel, BodyProfile, DatedMetricSeries, DatedVolume, OneRepMaxEstimator, RecoveryInput,
    RecoveryScoreEngine, SetPerformance, Sex, TrainingGoal, TrendAnalyzer, VolumeCalculator,
};

/// Benchmarks for the analytics engine
///
/// Session and series sizes scale up to a few years of daily logging.

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
}

fn create_session(size: usize) -> Vec<SetPerformance> {
    (0..size)
        .map(|i| {
            let weight = 40.0 + (i % 12) as f64 * 5.0;
            SetPerformance::new(weight, 3, 5 + (i % 8) as u32).with_rpe(6.0 + (i % 4) as f64)
        })
        .collect()
}

fn create_series(days: usize) -> DatedMetricSeries {
    (0..days)
        .map(|i| {
            let date = start_date() + Duration::days(i as i64);
            let value = 3000.0 + (i as f64 * 0.7).sin() * 800.0 + i as f64 * 2.0;
            (date, value)
        })
        .collect()
}

fn bench_one_rep_max(c: &mut Criterion) {
    let mut group = c.benchmark_group("One Rep Max");

    group.bench_function("estimate_all", |b| {
        b.iter(|| OneRepMaxEstimator::estimate_all(black_box(102.5), black_box(8)))
    });

    for &size in &[10, 100, 1000] {
        let sets = create_session(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("best_estimate", size), &sets, |b, sets| {
            b.iter(|| OneRepMaxEstimator::best_estimate(black_box(sets), Default::default()))
        });
    }

    group.finish();
}

fn bench_volume(c: &mut Criterion) {
    let mut group = c.benchmark_group("Volume");

    for &size in &[10, 100, 1000] {
        let entries = create_session(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("session_load", size), &entries, |b, entries| {
            b.iter(|| VolumeCalculator::session_load(black_box(entries)))
        });
    }

    let records: Vec<DatedVolume> = create_series(1095)
        .points()
        .iter()
        .map(|p| DatedVolume {
            date: p.date,
            volume: p.value,
        })
        .collect();
    let as_of = start_date() + Duration::days(1000);
    group.bench_function("recent_volume_3y", |b| {
        b.iter(|| VolumeCalculator::recent_volume(black_box(&records), as_of, 3))
    });

    group.finish();
}

fn bench_recovery_and_nutrition(c: &mut Criterion) {
    let mut group = c.benchmark_group("Recovery And Nutrition");

    let input = RecoveryInput {
        sleep_hours: Some(7.5),
        sleep_quality: Some(7.0),
        muscle_soreness: Some(4.0),
        fatigue_level: Some(6.0),
        stress_level: Some(5.0),
        hrv: Some(55.0),
        resting_heart_rate: Some(58.0),
        ..RecoveryInput::default()
    };
    group.bench_function("comprehensive_score", |b| {
        b.iter(|| RecoveryScoreEngine::comprehensive_score(black_box(&input), Some(6200.0)))
    });

    let profile = BodyProfile {
        weight_kg: 82.0,
        height_cm: 181.0,
        age: 34,
        sex: Sex::Male,
    };
    group.bench_function("nutrition_target", |b| {
        b.iter(|| {
            NutritionCalculator::target(
                black_box(&profile),
                ActivityLevel::Active,
                TrainingGoal::MuscleGain,
            )
        })
    });

    group.finish();
}

fn bench_trends(c: &mut Criterion) {
    let mut group = c.benchmark_group("Trends");
    let analyzer = TrendAnalyzer::new();

    for &days in &[30, 365, 1095] {
        let series = create_series(days);
        group.throughput(Throughput::Elements(days as u64));
        group.bench_with_input(BenchmarkId::new("summarize", days), &series, |b, series| {
            b.iter(|| analyzer.summarize(black_box(series)))
        });
        group.bench_with_input(BenchmarkId::new("daily_rollup", days), &series, |b, series| {
            b.iter(|| TrendAnalyzer::daily_rollup(black_box(series)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_one_rep_max,
    bench_volume,
    bench_recovery_and_nutrition,
    bench_trends
);

criterion_main!(benches);
