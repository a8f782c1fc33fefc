//! trueprofit - Derive the true profit of gig-economy driving

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trueprofit::{
    aggregation::Aggregator,
    cli::{Cli, Command, GenerateArgs, ReportArgs, parse_date_filter, parse_until_filter},
    config::CostConfig,
    costs::ProfitCalculator,
    error::Result,
    generator::{GeneratorConfig, TripGenerator, write_csv_file},
    output::{PlatformSummary, Report, get_formatter},
    store::{CsvTripSource, StoreLoader, TripStore},
    types::{Platform, TripDate},
};

/// Load the data file, with a spinner when a person is watching
fn load_store(cli: &Cli, config: CostConfig) -> Result<TripStore> {
    let show_progress = !cli.json && is_terminal::is_terminal(std::io::stderr());
    StoreLoader::new(ProfitCalculator::new(config))
        .with_progress(show_progress)
        .load(&CsvTripSource::from_path(&cli.data))
}

fn run_report(cli: &Cli, args: &ReportArgs, config: CostConfig) -> Result<()> {
    info!("Running profit report");

    let store = load_store(cli, config)?;
    let criteria = args.criteria(&store)?;
    if criteria.selects_nothing() {
        warn!("No platforms selected");
    }

    let trips = store.query(&criteria)?;
    info!(
        "{} of {} trips match {} to {}",
        trips.len(),
        store.len(),
        criteria.start_date(),
        criteria.end_date()
    );

    let result = Aggregator::new()
        .with_parallel(args.parallel)
        .aggregate(&trips);

    let mut report = Report::new(store.source_name(), &criteria, &result);
    if args.trips {
        report = report.with_trips(&trips);
    }
    if let Some(reason) = report.empty_reason() {
        warn!("{}", reason.message());
    }

    println!("{}", get_formatter(cli.json).format_report(&report));
    Ok(())
}

fn run_platforms(cli: &Cli, config: CostConfig) -> Result<()> {
    info!("Listing platforms");

    let store = load_store(cli, config)?;
    let summary = PlatformSummary {
        source: store.source_name(),
        trip_count: store.len(),
        platforms: store.distinct_platforms(),
        date_bounds: store.date_bounds().ok(),
    };

    println!("{}", get_formatter(cli.json).format_platforms(&summary));
    Ok(())
}

fn run_generate(cli: &Cli, args: &GenerateArgs, config: CostConfig) -> Result<()> {
    info!("Generating {} synthetic trips", args.trips);

    let defaults = GeneratorConfig::default();
    let start_date = match &args.since {
        Some(since) => TripDate::new(parse_date_filter(since)?),
        None => defaults.start_date,
    };
    let end_date = match &args.until {
        Some(until) => TripDate::new(parse_until_filter(until)?),
        None => defaults.end_date,
    };

    let generator_config = GeneratorConfig {
        trips: args.trips,
        start_date,
        end_date,
        platforms: args.platforms.iter().map(|p| Platform::new(p.trim())).collect(),
        commissions: config.commissions,
        seed: args.seed,
    };

    let trips = TripGenerator::new(generator_config)?.generate()?;
    write_csv_file(&trips, &args.output)?;

    println!(
        "{}",
        get_formatter(cli.json).format_generated(&args.output, trips.len())
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Quiet by default; --verbose overrides RUST_LOG
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("trueprofit=info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CostConfig::from_cli(cli.config.as_deref(), cli.fuel_cost, cli.maintenance_cost)?;

    match cli.effective_command() {
        Command::Report(args) => run_report(&cli, &args, config),
        Command::Platforms => run_platforms(&cli, config),
        Command::Generate(args) => run_generate(&cli, &args, config),
    }
}
