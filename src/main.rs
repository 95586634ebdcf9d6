mod abort;
mod config;
mod geo;
mod source;
mod tracker;

use clap::{Parser, Subcommand};
use std::io;
use std::process::ExitCode;

use crate::abort::abort_channel;
use crate::config::{Config, ConfigError};
use crate::source::{build_client, FixedLocation, IpGeolocator, LocationSource, OpenNotifyClient};
use crate::tracker::{ErrorPolicy, PositionTracker, TrackerMode};

#[derive(Parser)]
#[command(name = "iss-locator")]
#[command(about = "Where is the ISS, and how far away is it from me?")]
struct Cli {
    /// YAML config file
    #[arg(long, global = true)]
    config: Option<String>,
    /// ISS position endpoint
    #[arg(long, global = true)]
    iss_url: Option<String>,
    /// IP geolocation endpoint
    #[arg(long, global = true)]
    geolocation_url: Option<String>,
    /// Pause before each poll (e.g. 1s, 500ms)
    #[arg(long, global = true)]
    interval: Option<String>,
    /// HTTP request timeout (e.g. 10s)
    #[arg(long, global = true)]
    timeout: Option<String>,
    /// Number of reports to print, 0 for no limit
    #[arg(long, short = 'n', global = true)]
    count: Option<u64>,
    /// What to do when a fetch fails
    #[arg(long, value_enum, global = true)]
    on_error: Option<ErrorPolicy>,
    /// Own position as "lat, lon" instead of looking it up by IP
    #[arg(long, global = true)]
    location: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Print the distance between the ISS and this machine (default)
    Distance,
    /// Print the ISS position only
    Position,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut tracker = match build_tracker(&config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let (abort_handle, mut abort_listener) = abort_channel();
    tokio::spawn(async move {
        if abort::relay_interrupts(abort_handle, tokio::signal::ctrl_c).await {
            eprintln!("Interrupted twice, exiting");
            std::process::exit(130);
        }
    });

    let result = match cli.command.unwrap_or(Commands::Distance) {
        Commands::Distance => tracker.run_distance(config.count, &mut abort_listener).await,
        Commands::Position => tracker.run_position(config.count, &mut abort_listener).await,
    };

    match result {
        Ok(summary) => {
            let state = tracker.state();
            if let (Some(iss), Some(user), Some(km)) = (state.iss, state.user, state.last_distance_km) {
                log::info!("Last seen ISS at {} ({:.3} km from {})", iss.position, km, user);
            }
            debug_assert_eq!(tracker.mode(), TrackerMode::Done);
            match summary.aborted {
                Some(signal) => log::info!(
                    "Stopped ({}): {} cycles, {} skipped",
                    signal.reason,
                    summary.cycles,
                    summary.skipped
                ),
                None => log::info!(
                    "Done: {} cycles, {} skipped",
                    summary.cycles,
                    summary.skipped
                ),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Config file first, then command line flags on top.
fn load_config(cli: &Cli) -> Result<Config, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(url) = &cli.iss_url {
        config.iss_url = url.clone();
    }
    if let Some(url) = &cli.geolocation_url {
        config.geolocation_url = url.clone();
    }
    if let Some(interval) = &cli.interval {
        config.interval = interval.clone();
    }
    if let Some(timeout) = &cli.timeout {
        config.timeout = timeout.clone();
    }
    if let Some(count) = cli.count {
        config.count = count;
    }
    if let Some(on_error) = cli.on_error {
        config.on_error = on_error;
    }
    if let Some(location) = &cli.location {
        config.location = Some(location.clone());
    }

    Ok(config)
}

fn build_tracker(config: &Config) -> Result<PositionTracker<io::Stdout>, Box<dyn std::error::Error>> {
    let settings = config.tracker_settings()?;
    let client = build_client(config.request_timeout()?)?;

    log::info!("ISS position from {}", config.iss_url);
    let iss = OpenNotifyClient::new(client.clone(), config.iss_url.clone());

    let location: Box<dyn LocationSource> = match config.fixed_location()? {
        Some(here) => {
            log::info!("Using fixed location {}", here);
            Box::new(FixedLocation(here))
        }
        None => {
            log::info!("Own location from {}", config.geolocation_url);
            Box::new(IpGeolocator::new(client, config.geolocation_url.clone()))
        }
    };

    Ok(PositionTracker::new(
        Box::new(iss),
        location,
        settings,
        io::stdout(),
    ))
}
