//! Command-line runner: scripts one passenger ride against the simulated
//! collaborator set and prints its lifecycle to stdout.

use std::fs;

use anyhow::{bail, Context, Result};
use clap::Parser;

use dispatch_core::controller::RideSessionController;
use dispatch_core::drivers::DriverId;
use dispatch_core::geo::Coordinate;
use dispatch_core::notify::{NotificationSink, NotificationSinkResource};
use dispatch_core::scenario::ScenarioParams;
use dispatch_core::session::RidePhase;

#[derive(Parser)]
#[command(
    name = "dispatch_cli",
    about = "Run one simulated moped ride end to end"
)]
struct Cli {
    /// Scenario parameters as JSON; defaults apply when omitted
    #[arg(long)]
    scenario: Option<String>,
    /// Destination latitude
    #[arg(long, default_value_t = -7.48, allow_hyphen_values = true)]
    dest_lat: f64,
    /// Destination longitude
    #[arg(long, default_value_t = -38.97, allow_hyphen_values = true)]
    dest_lng: f64,
    /// Destination as an address, resolved by the simulated geocoder
    /// (overrides the coordinates)
    #[arg(long)]
    dest_address: Option<String>,
    /// Driver to dispatch; nearest driver when omitted
    #[arg(long)]
    driver: Option<u32>,
    /// Override the scenario's jitter seed
    #[arg(long)]
    seed: Option<u64>,
    /// Upper bound on processed events
    #[arg(long, default_value_t = 200_000)]
    max_events: usize,
    /// Print the final session snapshot as JSON
    #[arg(long)]
    json: bool,
}

/// Prints passenger-facing notifications to stdout.
struct StdoutNotifier;

impl NotificationSink for StdoutNotifier {
    fn info(&self, message: &str) {
        println!("[info] {message}");
    }

    fn success(&self, message: &str) {
        println!("[ok] {message}");
    }

    fn error(&self, message: &str) {
        println!("[error] {message}");
    }
}

fn load_params(cli: &Cli) -> Result<ScenarioParams> {
    let Some(path) = &cli.scenario else {
        return Ok(ScenarioParams::default());
    };
    let raw = fs::read_to_string(path).with_context(|| format!("reading scenario {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing scenario {path}"))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut params = load_params(&cli)?;
    if let Some(seed) = cli.seed {
        params.jitter.seed = seed;
    }

    let mut controller = RideSessionController::new(params);
    controller
        .world
        .insert_resource(NotificationSinkResource(Box::new(StdoutNotifier)));

    println!("drivers on shift:");
    for profile in controller.driver_profiles() {
        println!(
            "  #{} {} ({}, {}) rated {:.1}",
            profile.id.0, profile.display_name, profile.vehicle_label, profile.plate_label,
            profile.rating
        );
    }

    let snapshot = controller.snapshot();
    match (&snapshot.origin, &snapshot.origin_address) {
        (Some(origin), Some(address)) => {
            println!(
                "origin: {} ({:.5}, {:.5})",
                address, origin.latitude, origin.longitude
            )
        }
        _ => bail!("no origin available; the simulated device denied location"),
    }

    match &cli.dest_address {
        Some(address) => controller.set_destination_address(address),
        None => controller.set_destination(Coordinate::new(cli.dest_lat, cli.dest_lng)),
    }
    if !controller.run_until(|s| s.phase == RidePhase::Quoted, cli.max_events) {
        bail!("no quote produced; destination may be unroutable");
    }

    let snapshot = controller.snapshot();
    let quote = snapshot.quote.as_ref().context("quoted without a quote")?;
    println!(
        "quote: {:.2} for {:.0} m, about {}",
        quote.price_estimate, quote.distance_meters, quote.duration_label
    );

    controller.confirm_ride(cli.driver.map(DriverId))?;

    let mut previous = controller.snapshot().phase;
    let mut events = 0;
    while events < cli.max_events && controller.snapshot().phase != RidePhase::Completed {
        let stepped = controller.step_with_hook(|snapshot, _event| {
            if snapshot.phase != previous {
                log::debug!("phase {:?} -> {:?}", previous, snapshot.phase);
                previous = snapshot.phase;
            }
        });
        if stepped.is_none() {
            break;
        }
        events += 1;
    }

    let snapshot = controller.snapshot();
    if snapshot.phase != RidePhase::Completed {
        bail!("ride did not complete within {} events", cli.max_events);
    }
    println!(
        "arrived after {} events at t={} ms",
        events,
        controller.now_ms()
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }
    controller.end_ride();
    Ok(())
}
