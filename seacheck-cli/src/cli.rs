use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::CustomType;
use seacheck_core::{
    Command as SessionCommand, Config, Coordinate, DistressAlert, ListPanel, LocationFix,
    LocationRegistry, MarkerSync, Session, ViewEvent, ViewSync, nearest_stations,
    provider_from_config,
};

use crate::render::{self, TerminalMarkers};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "seacheck", version, about = "Sea safety check for marked points")]
pub struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set safety thresholds and the fallback map center.
    Configure,

    /// Fetch conditions for points, list them and recommend the safest.
    Check {
        /// Point as "lat,lon" or "lat,lon=Name"; repeat for more points.
        #[arg(short = 'p', long = "point", required = true, allow_hyphen_values = true)]
        points: Vec<Point>,

        /// Your own position as "lat,lon"; tracked as "Current Location".
        #[arg(long, allow_hyphen_values = true)]
        here: Option<Coordinate>,

        /// Re-fetch every point once after adding them.
        #[arg(long)]
        refresh: bool,

        /// Skip the comparison table.
        #[arg(long)]
        no_compare: bool,

        /// Print session events and locations as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print a distress alert and the nearest coastal radio stations.
    Sos {
        /// Position as "lat,lon".
        #[arg(long, allow_hyphen_values = true)]
        at: Coordinate,

        /// How many stations to list.
        #[arg(long, default_value_t = 3)]
        stations: usize,
    },
}

/// A point given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub coordinate: Coordinate,
    pub name: Option<String>,
}

impl FromStr for Point {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (coords, name) = match s.split_once('=') {
            Some((coords, name)) if !name.trim().is_empty() => (coords, Some(name.trim().to_string())),
            Some((coords, _)) => (coords, None),
            None => (s, None),
        };

        let coordinate = coords.parse::<Coordinate>().map_err(|e| e.to_string())?;
        Ok(Self { coordinate, name })
    }
}

/// Forwards view events to a view owned elsewhere, so it can be read after
/// the session is done with it.
#[derive(Clone)]
struct Shared<V>(Arc<Mutex<V>>);

impl<V: ViewSync + Send> ViewSync for Shared<V> {
    fn apply(&mut self, event: &ViewEvent) {
        if let Ok(mut view) = self.0.lock() {
            view.apply(event);
        }
    }
}

impl Cli {
    pub async fn run(self, config: Config) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(config),
            Command::Check { points, here, refresh, no_compare, json } => {
                check(config, points, here, refresh, !no_compare, json).await
            }
            Command::Sos { at, stations } => {
                println!("{}", DistressAlert::new(at).message());
                render::print_stations(at, &nearest_stations(at), stations);
                Ok(())
            }
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let wind = CustomType::<f64>::new("Wind limit (km/h):")
        .with_default(config.thresholds.wind_limit_kmh)
        .with_error_message("Please type a number")
        .prompt()?;

    let wave = CustomType::<f64>::new("Wave height limit (m):")
        .with_default(config.thresholds.wave_limit_m)
        .with_error_message("Please type a number")
        .prompt()?;

    let lat = CustomType::<f64>::new("Default map center latitude:")
        .with_default(config.default_center.latitude())
        .with_error_message("Please type a number")
        .prompt()?;

    let lon = CustomType::<f64>::new("Default map center longitude:")
        .with_default(config.default_center.longitude())
        .with_error_message("Please type a number")
        .prompt()?;

    config.thresholds.wind_limit_kmh = wind;
    config.thresholds.wave_limit_m = wave;
    config.default_center = Coordinate::new(lat, lon)?;
    config.validate()?;
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn check(
    config: Config,
    points: Vec<Point>,
    here: Option<Coordinate>,
    refresh: bool,
    compare: bool,
    json: bool,
) -> anyhow::Result<()> {
    let provider = provider_from_config(&config).context("Failed to set up condition provider")?;
    let registry = LocationRegistry::new(provider, config.thresholds);
    let mut session = Session::new(registry, config.default_center);

    let panel = Shared(Arc::new(Mutex::new(ListPanel::default())));
    session.attach(Box::new(panel.clone()));
    if !json {
        session.attach(Box::new(MarkerSync::new(TerminalMarkers::default())));
    }

    let mut commands = Vec::new();
    if let Some(here) = here {
        commands.push(SessionCommand::Locate(LocationFix::Resolved(here)));
    }
    commands.extend(
        points
            .into_iter()
            .map(|p| SessionCommand::AddPoint { coordinate: p.coordinate, name: p.name }),
    );
    if refresh {
        commands.push(SessionCommand::RefreshAll);
    }
    if compare {
        commands.push(SessionCommand::Compare);
    }

    tracing::debug!(commands = commands.len(), json, "running check");

    let mut all_events = Vec::new();
    for command in commands {
        let events = session.handle(command).await;
        if !json {
            events.iter().for_each(render::print_event);
        }
        all_events.extend(events);
    }

    if json {
        let out = serde_json::json!({
            "events": all_events,
            "locations": session.registry().locations(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let list = panel.0.lock().map_err(|_| anyhow!("location list is unavailable"))?;
    render::print_list(&list, session.registry().locations());

    Ok(())
}
