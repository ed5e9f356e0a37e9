use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use travel_advisor::{
    AdvisorConfig, AdvisorError, LoggingConfig, Scenario, Synthesizer, render_text,
};

/// Recommend when to travel from weather, flight and lodging data
#[derive(Parser)]
#[command(name = "travel-advisor", version)]
#[command(about = "Recommends when to travel from weather, flight and lodging data", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend a travel window from a JSON scenario file
    Recommend {
        /// Scenario file with profile, weather_days, flights and hotels
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Preferred start date (YYYY-MM-DD), overrides the scenario's anchor
        #[arg(long)]
        anchor: Option<NaiveDate>,
    },
    /// Run the built-in sample scenario
    Demo {
        /// First forecast day (YYYY-MM-DD), defaults to today
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<AdvisorError>() {
                Some(AdvisorError::Config { .. }) | None => eprintln!("Error: {err:#}"),
                Some(advisor_err) => eprintln!("Error: {}", advisor_err.user_message()),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config =
        AdvisorConfig::load_from_path(cli.config).context("Failed to load configuration")?;
    init_tracing(&config.logging, cli.verbose);
    debug!("Configuration loaded: {:?}", config);

    let (scenario, format) = match cli.command {
        Commands::Recommend {
            input,
            format,
            anchor,
        } => {
            let mut scenario = Scenario::from_path(&input)?;
            if anchor.is_some() {
                scenario.params.anchor = anchor;
            }
            (scenario, format)
        }
        Commands::Demo { start, format } => {
            let start = start.unwrap_or_else(|| Local::now().date_naive());
            (Scenario::sample(start)?, format)
        }
    };

    let synthesizer = Synthesizer::from_config(&config);
    let recommendation = synthesizer.synthesize(
        &scenario.profile,
        &scenario.weather_days,
        &scenario.flights,
        &scenario.hotels,
        &scenario.params,
    )?;

    match format {
        OutputFormat::Text => print!("{}", render_text(&recommendation, &scenario.profile)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&recommendation)?),
    }

    Ok(())
}

/// Install the stderr subscriber; `RUST_LOG` wins over the configured level
fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose);

    match logging.format.as_str() {
        "json" => builder.json().init(),
        "compact" => builder.compact().init(),
        _ => builder.pretty().init(),
    }
}
