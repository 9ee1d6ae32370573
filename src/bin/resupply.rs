//! Find resupply stops along a GPX track.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use resupply_planner::gpx_source::GpxRouteSource;
use resupply_planner::matcher::{MatchOptions, MatchStrategy};
use resupply_planner::overpass::{OverpassClient, OverpassConfig};
use resupply_planner::report::{render_report, report_file_name};
use resupply_planner::route::Route;
use resupply_planner::session::{QuerySession, SessionConfig};
use resupply_planner::traits::RouteSource;
use resupply_planner::{DEFAULT_GAP_THRESHOLD_KM, PoiSourceError};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// GPX file with the route.
    gpx: PathBuf,

    /// Maximum detour from the route, in km.
    #[arg(long, env = "RESUPPLY_MAX_DETOUR_KM", default_value_t = 1.0)]
    max_detour_km: f64,

    /// Report stretches longer than this without a stop, in km.
    #[arg(long, default_value_t = DEFAULT_GAP_THRESHOLD_KM)]
    gap_threshold_km: f64,

    /// Overpass interpreter endpoints, tried in order.
    #[arg(long = "overpass-url", env = "RESUPPLY_OVERPASS_URL", value_delimiter = ',')]
    overpass_urls: Vec<String>,

    /// HTTP timeout per Overpass endpoint, in seconds.
    #[arg(long, default_value_t = 90)]
    timeout_secs: u64,

    /// Include supermarkets and convenience stores.
    #[arg(long)]
    supermarkets: bool,

    /// Scan every route point instead of sampling.
    #[arg(long)]
    exhaustive: bool,

    /// Look up nearest route points in an R-tree. Exact, and faster than
    /// --exhaustive on long tracks.
    #[arg(long, conflicts_with = "exhaustive")]
    indexed: bool,

    /// Derive the sampling stride so each sample covers about this many km.
    #[arg(long, conflicts_with_all = ["exhaustive", "indexed"])]
    sample_spacing_km: Option<f64>,

    /// Print stops and gaps as JSON instead of a text report.
    #[arg(long)]
    json: bool,

    /// Write the text report to a file. Pass a directory to use the default
    /// file name.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let track = GpxRouteSource::new(&args.gpx).load_track()?;
    let route = Route::named(track.name, &track.coordinates)?;
    tracing::info!(
        name = route.name().unwrap_or_default(),
        points = route.len(),
        total_km = route.total_distance_km(),
        "route loaded"
    );

    let mut overpass = OverpassConfig {
        timeout_secs: args.timeout_secs,
        include_supermarkets: args.supermarkets,
        ..OverpassConfig::default()
    };
    if !args.overpass_urls.is_empty() {
        overpass.endpoints = args.overpass_urls.clone();
    }
    let client = OverpassClient::new(overpass).map_err(PoiSourceError::from)?;

    let strategy = if args.exhaustive {
        MatchStrategy::Exhaustive
    } else if args.indexed {
        MatchStrategy::Indexed
    } else if let Some(spacing_km) = args.sample_spacing_km {
        MatchStrategy::adaptive(&route, spacing_km)
    } else {
        MatchStrategy::default()
    };
    tracing::debug!(?strategy, "match strategy");
    let config = SessionConfig {
        max_detour_km: args.max_detour_km,
        gap_threshold_km: args.gap_threshold_km,
        match_options: MatchOptions { strategy },
        ..SessionConfig::default()
    };

    let session = QuerySession::load(client, route, config)?;
    let plan = session.plan()?;
    tracing::info!(stops = plan.stops.len(), gaps = plan.gaps.len(), "plan ready");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let route_name = session.route().name();
    let report = render_report(&plan.stops, &plan.gaps, plan.total_distance_km, route_name);

    match args.output {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(report_file_name(route_name))
            } else {
                path
            };
            std::fs::write(&path, report)?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => print!("{}", report),
    }

    Ok(())
}
