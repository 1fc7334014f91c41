//! Human-friendly terminal output.

use chrono::Local;
use seacheck_core::{
    Comparison, ConditionSnapshot, Coordinate, ListPanel, Location, MarkerBackend, Notice,
    NoticeLevel, OriginSource, SafetyTier, SessionEvent, StationDistance,
};

/// Map markers drawn as log lines; the handle is the marker number.
#[derive(Debug, Default)]
pub struct TerminalMarkers {
    placed: u32,
}

impl MarkerBackend for TerminalMarkers {
    type Handle = u32;

    fn attach(&mut self, coordinate: Coordinate, tier: SafetyTier, name: &str) -> u32 {
        self.placed += 1;
        println!("  marker #{} {} {name} @ {coordinate:.3}", self.placed, tier.glyph());
        self.placed
    }

    fn restyle(&mut self, handle: &mut u32, tier: SafetyTier, snapshot: &ConditionSnapshot) {
        println!("  marker #{handle} {} now {tier} ({})", tier.glyph(), snapshot.format_wind());
    }

    fn detach(&mut self, handle: u32) {
        println!("  marker #{handle} removed");
    }
}

pub fn print_event(event: &SessionEvent) {
    match event {
        SessionEvent::Centered(origin) => {
            let source = match origin.source {
                OriginSource::Device => "your position",
                OriginSource::Fallback => "default center",
            };
            println!("Map centered on {:.3} ({source})", origin.coordinate);
        }
        SessionEvent::Notice(notice) => print_notice(notice),
        SessionEvent::Compared(comparison) => print_comparison(comparison),
        SessionEvent::Distress(alert) => println!("{}", alert.message()),
        SessionEvent::View(_) | SessionEvent::Refreshed(_) => {}
    }
}

pub fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Info => println!("• {}", notice.message),
        NoticeLevel::Error => eprintln!("✗ {}", notice.message),
    }
}

pub fn print_comparison(comparison: &Comparison) {
    println!();
    println!("Location comparison");
    println!("{:<24} {:<8} {:>12} {:>8}", "Location", "Safety", "Wind", "Waves");

    for row in &comparison.rows {
        let tier = row.tier.map_or("-", |t| t.as_str());
        let wind = row.wind_speed_kmh.map_or_else(|| "N/A".to_string(), |w| format!("{w:.1} km/h"));
        let waves = row.wave_height_m.map_or_else(|| "N/A".to_string(), |w| format!("{w:.1} m"));
        println!("{:<24} {:<8} {:>12} {:>8}", row.name, tier, wind, waves);
    }

    println!();
    println!("Recommendation: {}", comparison.recommendation.message());
}

pub fn print_list(panel: &ListPanel, locations: &[Location]) {
    println!();
    println!("Tracked locations");

    for line in panel.render_lines() {
        println!("  {line}");
    }

    for location in locations {
        if let (Some(tier), Some(at)) = (location.tier(), location.fetched_at()) {
            println!(
                "  {} checked {}: {}",
                location.name(),
                at.with_timezone(&Local).format("%H:%M:%S"),
                tier.recommendation()
            );
        }
    }
}

pub fn print_stations(from: Coordinate, ranked: &[StationDistance], limit: usize) {
    let Some(nearest) = ranked.first() else {
        return;
    };

    println!();
    println!(
        "Nearest coastal radio: {} ({}) on {}, {:.1} km",
        nearest.station.name, nearest.station.call_sign, nearest.station.frequency, nearest.distance_km
    );
    println!("Navigate: {}", nearest.directions_link(from));

    println!();
    println!("{:<22} {:<6} {:>9} {:>10}", "Station", "Call", "Freq", "Distance");
    for entry in ranked.iter().take(limit) {
        let station = entry.station;
        println!(
            "{:<22} {:<6} {:>9} {:>7.1} km",
            station.name, station.call_sign, station.frequency, entry.distance_km
        );
    }
}
