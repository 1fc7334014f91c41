//! Indian coastal radio stations a vessel in distress can call, ranked by
//! great-circle distance from a position.

use serde::Serialize;

use crate::model::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoastalStation {
    pub name: &'static str,
    pub call_sign: &'static str,
    pub frequency: &'static str,
    pub coordinate: Coordinate,
    pub area: &'static str,
}

const fn station(
    name: &'static str,
    call_sign: &'static str,
    frequency: &'static str,
    lat: f64,
    lon: f64,
    area: &'static str,
) -> CoastalStation {
    CoastalStation { name, call_sign, frequency, coordinate: Coordinate::new_unchecked(lat, lon), area }
}

pub const COASTAL_STATIONS: [CoastalStation; 12] = [
    // west coast
    station("Mumbai Radio", "VWM", "8728 kHz", 19.0760, 72.8777, "Mumbai, Maharashtra"),
    station("Goa Radio", "VWG", "8746 kHz", 15.2993, 74.1240, "Panaji, Goa"),
    station("Kochi Radio", "VWX", "8752 kHz", 9.9312, 76.2673, "Kochi, Kerala"),
    station("New Mangalore Radio", "VWN", "8758 kHz", 12.8697, 74.8560, "Mangalore, Karnataka"),
    // east coast
    station("Chennai Radio", "VWC", "8740 kHz", 13.0827, 80.2707, "Chennai, Tamil Nadu"),
    station("Visakhapatnam Radio", "VWV", "8764 kHz", 17.6868, 83.2185, "Visakhapatnam, Andhra Pradesh"),
    station("Kolkata Radio", "VWK", "8734 kHz", 22.5726, 88.3639, "Kolkata, West Bengal"),
    station("Paradip Radio", "VWP", "8770 kHz", 20.3156, 86.6100, "Paradip, Odisha"),
    station("Tuticorin Radio", "VWT", "8776 kHz", 8.7642, 78.1348, "Tuticorin, Tamil Nadu"),
    // islands
    station("Port Blair Radio", "VWB", "8782 kHz", 11.6234, 92.7265, "Port Blair, Andaman & Nicobar"),
    station("Kandla Radio", "VWJ", "8788 kHz", 23.0333, 70.2167, "Kandla, Gujarat"),
    station("Haldia Radio", "VWH", "8794 kHz", 22.0580, 88.0580, "Haldia, West Bengal"),
];

/// A station together with its distance from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationDistance {
    pub station: CoastalStation,
    pub distance_km: f64,
}

impl StationDistance {
    /// Driving/sailing directions link from `from` to the station.
    #[must_use]
    pub fn directions_link(&self, from: Coordinate) -> String {
        let to = self.station.coordinate;
        format!(
            "https://www.google.com/maps/dir/{},{}/{},{}",
            from.latitude(),
            from.longitude(),
            to.latitude(),
            to.longitude()
        )
    }
}

impl From<Coordinate> for haversine::Location {
    fn from(coordinate: Coordinate) -> Self {
        haversine::Location { latitude: coordinate.latitude(), longitude: coordinate.longitude() }
    }
}

/// Great-circle distance in kilometres.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    haversine::distance(a.into(), b.into(), haversine::Units::Kilometers)
}

/// Every known station, nearest first.
pub fn nearest_stations(from: Coordinate) -> Vec<StationDistance> {
    let mut ranked: Vec<StationDistance> = COASTAL_STATIONS
        .iter()
        .map(|&station| StationDistance { station, distance_km: haversine_km(from, station.coordinate) })
        .collect();
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn haversine_known_distances() {
        assert_eq!(haversine_km(at(10.0, 70.0), at(10.0, 70.0)), 0.0);

        // one degree of latitude along a meridian
        let degree = haversine_km(at(0.0, 0.0), at(1.0, 0.0));
        assert!((degree - 111.19).abs() < 0.01, "{degree}");

        // Mumbai to Chennai is roughly 1030 km
        let mumbai_chennai = haversine_km(at(19.0760, 72.8777), at(13.0827, 80.2707));
        assert!((1000.0..1060.0).contains(&mumbai_chennai), "{mumbai_chennai}");
    }

    #[test]
    fn haversine_is_symmetric() {
        let a = at(9.93, 76.27);
        let b = at(11.62, 92.73);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn nearest_first() {
        let off_kochi = at(9.8, 76.0);
        let ranked = nearest_stations(off_kochi);

        assert_eq!(ranked.len(), COASTAL_STATIONS.len());
        assert_eq!(ranked[0].station.call_sign, "VWX");
        assert_eq!(ranked[1].station.call_sign, "VWT");
        assert!(ranked.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
    }

    #[test]
    fn nearest_from_the_bay_of_bengal() {
        let ranked = nearest_stations(at(21.5, 88.2));
        assert_eq!(ranked[0].station.name, "Haldia Radio");
    }

    #[test]
    fn directions_link_joins_both_ends() {
        let from = at(15.0, 74.0);
        let nearest = nearest_stations(from)[0];
        assert_eq!(nearest.station.call_sign, "VWG");
        assert_eq!(
            nearest.directions_link(from),
            "https://www.google.com/maps/dir/15,74/15.2993,74.124"
        );
    }
}
