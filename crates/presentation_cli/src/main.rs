//! HERE CLI
//!
//! Command-line front end for the HERE routing, matrix, sequence and geocoding
//! client. Results are printed as pretty JSON.

#![allow(clippy::print_stdout)]

mod settings;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use domain::{Address, RoutingMode, Waypoint};
use integration_here::{
    HereClient, MatrixRequest, OptimizeRequest, RouteRequest, TravelTimesRequest, parse_departure,
};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// HERE CLI
#[derive(Debug, Parser)]
#[command(name = "here-cli")]
#[command(author, version, about = "HERE routing and geocoding client", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Configuration file, without extension
    #[arg(short, long, default_value = "here")]
    config: String,

    /// Application id (overrides configuration)
    #[arg(long, env = "HERE_APP_ID")]
    app_id: Option<String>,

    /// Application code (overrides configuration)
    #[arg(long, env = "HERE_APP_CODE", hide_env_values = true)]
    app_code: Option<String>,

    /// Send every request to this host instead of the configured ones
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Route from origin to destination
    ///
    /// Points are `lat,lng` or `lat,lng,key`.
    /// Example: here-cli route --mode "fastest;car" 41.28,-96.0042,business 41.2939,-96.0206
    Route {
        /// Where the route starts
        origin: Waypoint,

        /// Where the route ends
        destination: Waypoint,

        /// Routing mode, e.g. "fastest;car;traffic:enabled"
        #[arg(short, long, default_value = "fastest;car")]
        mode: RoutingMode,

        /// Intermediate stop; repeat for more
        #[arg(long)]
        via: Vec<Waypoint>,

        /// Departure time (RFC 3339); now when omitted
        #[arg(short, long, value_parser = parse_departure)]
        departure: Option<DateTime<Utc>>,
    },

    /// Per-leg travel times along an ordered list of stops
    ///
    /// Example: here-cli travel-times 41.28,-96.0042,business 41.2939,-96.0206,home
    TravelTimes {
        /// Stops in visiting order
        stops: Vec<Waypoint>,

        /// Departure time (RFC 3339); now when omitted
        #[arg(short, long, value_parser = parse_departure)]
        departure: Option<DateTime<Utc>>,

        /// Ignore traffic information
        #[arg(long)]
        no_traffic: bool,
    },

    /// Travel time and distance for every origin/destination pair
    Matrix {
        /// Origin; repeat for more
        #[arg(short, long = "origin")]
        origins: Vec<Waypoint>,

        /// Destination; repeat for more
        #[arg(short = 't', long = "destination")]
        destinations: Vec<Waypoint>,

        /// Routing mode; "fastest;car;traffic:disabled" when omitted
        #[arg(short, long)]
        mode: Option<RoutingMode>,
    },

    /// Fastest visiting order between a fixed start and end
    Optimize {
        /// Where the sequence starts
        #[arg(long)]
        start: Waypoint,

        /// Where the sequence ends
        #[arg(long)]
        end: Waypoint,

        /// Stops to reorder
        waypoints: Vec<Waypoint>,

        /// Departure time (RFC 3339); now when omitted
        #[arg(short, long, value_parser = parse_departure)]
        departure: Option<DateTime<Utc>>,

        /// Ignore traffic information
        #[arg(long)]
        no_traffic: bool,
    },

    /// Resolve a postal address to a position
    Geocode {
        /// Street with house number
        #[arg(long)]
        street: Option<String>,

        /// Postal code
        #[arg(long)]
        zip: Option<String>,

        /// Unit or apartment
        #[arg(long)]
        unit: Option<String>,

        /// City
        #[arg(long)]
        city: Option<String>,

        /// State or region
        #[arg(long)]
        state: Option<String>,

        /// Country
        #[arg(long)]
        country: Option<String>,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_filter_from_verbosity(verbose)));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    let config = settings::load(
        &cli.config,
        settings::Overrides {
            app_id: cli.app_id,
            app_code: cli.app_code,
            base_url: cli.base_url,
        },
    )
    .with_context(|| format!("Failed to load configuration '{}'", cli.config))?;
    debug!(app_id = ?config.app_id, "Configuration loaded");

    let client = HereClient::new(config).context("Failed to create HERE client")?;

    match cli.command {
        Commands::Route {
            origin,
            destination,
            mode,
            via,
            departure,
        } => {
            let request = RouteRequest {
                departure,
                waypoints: via,
                ..RouteRequest::new(origin, destination, mode)
            };
            print_json(&client.route().calculate(&request).await?)?;
        },

        Commands::TravelTimes {
            stops,
            departure,
            no_traffic,
        } => {
            let request = TravelTimesRequest {
                stops,
                departure,
                disable_traffic: no_traffic,
            };
            print_json(&client.route().calculate_travel_times(&request).await?)?;
        },

        Commands::Matrix {
            origins,
            destinations,
            mode,
        } => {
            let request = MatrixRequest {
                origins,
                destinations,
                mode,
            };
            print_json(&client.distance().calculate_travel_times(&request).await?)?;
        },

        Commands::Optimize {
            start,
            end,
            waypoints,
            departure,
            no_traffic,
        } => {
            let request = OptimizeRequest {
                departure,
                disable_traffic: no_traffic,
                ..OptimizeRequest::new(start, end, waypoints)
            };
            print_json(&client.sequence().optimize(&request).await?)?;
        },

        Commands::Geocode {
            street,
            zip,
            unit,
            city,
            state,
            country,
        } => {
            let address = Address {
                street,
                unit,
                city,
                state,
                zip,
                country,
            };
            print_json(&client.address().geocode(&address).await?)?;
        },
    }

    Ok(())
}
