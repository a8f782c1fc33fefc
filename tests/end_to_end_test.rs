//! End-to-end tests for trueprofit
//!
//! These tests run complete workflows: generating a data set, loading it
//! from disk, filtering through command-line arguments and formatting the
//! final report.

mod common;

use clap::Parser;
use common::{date, sample_trips, store_of, write_csv};
use rust_decimal::Decimal;
use serde_json::Value;
use tempfile::TempDir;
use trueprofit::{
    aggregation::Aggregator,
    cli::{Cli, Command},
    config::CostConfig,
    costs::ProfitCalculator,
    generator::{GeneratorConfig, TripGenerator, write_csv_file},
    output::{JsonFormatter, OutputFormatter, PlatformSummary, Report, TableFormatter},
    store::{CsvTripSource, StoreLoader, TripStore},
};

/// Generate a seeded data set on disk and load it back
fn generated_store(trips: usize) -> (TempDir, TripStore) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gig_work_data.csv");

    let config = GeneratorConfig {
        trips,
        seed: Some(2025),
        ..GeneratorConfig::default()
    };
    let generated = TripGenerator::new(config).unwrap().generate().unwrap();
    write_csv_file(&generated, &path).unwrap();

    let store = StoreLoader::new(ProfitCalculator::default())
        .load(&CsvTripSource::from_path(&path))
        .unwrap();
    (dir, store)
}

fn report_args(args: &[&str]) -> trueprofit::cli::ReportArgs {
    let mut argv = vec!["trueprofit"];
    argv.extend_from_slice(args);
    match Cli::parse_from(argv).effective_command() {
        Command::Report(report) => report,
        other => panic!("expected report command, got {other:?}"),
    }
}

#[test]
fn test_generate_load_and_aggregate() {
    let (_dir, store) = generated_store(500);
    assert_eq!(store.len(), 500);
    assert_eq!(store.distinct_platforms().len(), 2);

    let (start, end) = store.date_bounds().unwrap();
    assert!(start >= date(2025, 5, 1));
    assert!(end <= date(2025, 7, 22));

    let trips = store.query(&store.full_range_criteria().unwrap()).unwrap();
    let result = Aggregator::new().with_parallel(true).aggregate(&trips);

    assert_eq!(result.totals.trip_count, 500);
    assert_eq!(
        result.totals.platform_fees + result.totals.net_earnings,
        result.totals.gross_fare
    );
    assert!(result.totals.total_time_minutes > Decimal::ZERO);
    assert_eq!(result, Aggregator::new().aggregate(&trips));
}

#[test]
fn test_report_args_month_filter() {
    let (_dir, store) = generated_store(300);
    let args = report_args(&["--since", "2025-06", "--until", "2025-06", "-p", "Lyft"]);

    let criteria = args.criteria(&store).unwrap();
    assert_eq!(criteria.start_date(), date(2025, 6, 1));
    assert_eq!(criteria.end_date(), date(2025, 6, 30));

    let trips = store.query(&criteria).unwrap();
    assert!(!trips.is_empty());
    for trip in trips {
        assert_eq!(trip.platform().as_str(), "Lyft");
        assert!(criteria.includes_date(trip.date()));
    }
}

#[test]
fn test_report_args_default_to_whole_store() {
    let store = store_of(sample_trips());
    let criteria = report_args(&[]).criteria(&store).unwrap();

    assert_eq!(criteria.start_date(), date(2025, 5, 1));
    assert_eq!(criteria.end_date(), date(2025, 5, 7));
    assert_eq!(criteria.platforms(), store.distinct_platforms());
}

#[test]
fn test_json_report_from_csv() {
    let csv = "trip_id,date,platform,trip_duration_minutes,wait_time_minutes,trip_distance_km,gross_fare,platform_commission_percent\n\
               1000,2025-05-01,Uber,20,5,10,20.00,0.25\n";
    let (_dir, path) = write_csv(csv);
    let store = TripStore::load(&CsvTripSource::from_path(&path), &ProfitCalculator::default())
        .unwrap();

    let criteria = store.full_range_criteria().unwrap();
    let trips = store.query(&criteria).unwrap();
    let result = Aggregator::new().aggregate(&trips);
    let report = Report::new(store.source_name(), &criteria, &result).with_trips(&trips);

    let json: Value = serde_json::from_str(&JsonFormatter.format_report(&report)).unwrap();
    assert_eq!(json["filters"]["start_date"], "2025-05-01");
    assert_eq!(json["filters"]["platforms"][0], "Uber");
    assert_eq!(json["summary"]["totals"]["true_profit"].as_f64(), Some(13.0));
    assert_eq!(json["summary"]["true_hourly_wage"].as_f64(), Some(31.2));
    assert_eq!(json["cost_breakdown"][1]["category"], "platform_fees");
    assert_eq!(json["cost_breakdown"][1]["amount"].as_f64(), Some(5.0));
    assert!(json["empty_reason"].is_null());
    assert_eq!(json["trips"][0]["trip_id"], "1000");
    assert_eq!(json["trips"][0]["vehicle_costs"].as_f64(), Some(2.0));
}

#[test]
fn test_table_report_sections() {
    let store = store_of(sample_trips());
    let criteria = store.full_range_criteria().unwrap();
    let trips = store.query(&criteria).unwrap();
    let result = Aggregator::new().aggregate(&trips);

    let output = TableFormatter::new()
        .with_colors(false)
        .format_report(&Report::new(store.source_name(), &criteria, &result));

    assert!(output.contains("Key Figures"));
    assert!(output.contains("True Profit by Date"));
    assert!(output.contains("True Hourly Wage by Platform"));
    assert!(output.contains("Cost Breakdown"));
    assert!(output.contains("$51.89"));
    assert!(output.contains("-$1.28"));
}

#[test]
fn test_empty_selection_report_warns() {
    let store = store_of(sample_trips());
    let criteria = store.full_range_criteria().unwrap().with_platforms(Vec::new());
    let trips = store.query(&criteria).unwrap();
    let result = Aggregator::new().aggregate(&trips);
    let report = Report::new(store.source_name(), &criteria, &result);

    let table = TableFormatter::new().with_colors(false).format_report(&report);
    assert!(table.contains("No platforms selected"));
    assert!(!table.contains("Key Figures"));

    let json: Value = serde_json::from_str(&JsonFormatter.format_report(&report)).unwrap();
    assert_eq!(json["empty_reason"], "no_platforms_selected");
    assert_eq!(json["summary"]["totals"]["trip_count"], 0);
}

#[test]
fn test_platform_summary_json() {
    let store = store_of(sample_trips());
    let summary = PlatformSummary {
        source: store.source_name(),
        trip_count: store.len(),
        platforms: store.distinct_platforms(),
        date_bounds: store.date_bounds().ok(),
    };

    let json: Value = serde_json::from_str(&JsonFormatter.format_platforms(&summary)).unwrap();
    assert_eq!(json["trip_count"], 5);
    assert_eq!(json["platforms"], serde_json::json!(["Lyft", "Uber"]));
    assert_eq!(json["start_date"], "2025-05-01");
    assert_eq!(json["end_date"], "2025-05-07");
}

#[test]
fn test_config_file_changes_costs() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("trueprofit.json");
    std::fs::write(
        &config_path,
        r#"{"fuel_cost_per_km": 0.20, "maintenance_cost_per_km": 0.10}"#,
    )
    .unwrap();

    let config = CostConfig::from_cli(Some(&config_path), None, None).unwrap();
    let store = TripStore::load(
        &trueprofit::store::MemoryTripSource::new(sample_trips()),
        &ProfitCalculator::new(config),
    )
    .unwrap();

    let trips = store.query(&store.full_range_criteria().unwrap()).unwrap();
    let result = Aggregator::new().aggregate(&trips);
    // 64.45 km at 0.30 per km
    assert_eq!(result.totals.vehicle_costs, rust_decimal_macros::dec!(19.335));
}

#[test]
fn test_header_only_csv_reports_empty_store() {
    let (_dir, path) = write_csv(
        "trip_id,date,platform,trip_duration_minutes,wait_time_minutes,trip_distance_km,gross_fare\n",
    );
    let store = TripStore::load(&CsvTripSource::from_path(&path), &ProfitCalculator::default())
        .unwrap();
    assert!(store.is_empty());

    let args = report_args(&["--since", "2025-05-01", "--until", "2025-05-31"]);
    let err = args.criteria(&store).unwrap_err();
    assert!(matches!(err, trueprofit::TrueProfitError::EmptyStore));
}
