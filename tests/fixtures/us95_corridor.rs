//! US-95 corridor from Las Vegas to Beatty, Nevada.
//!
//! Long desert stretches between towns make it a good gap-analysis route.
//! Waypoints are town centers; the track is densified between them.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use resupply_planner::{Coordinate, Poi};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

pub const WAYPOINTS: &[Location] = &[
    Location::new("Las Vegas", 36.1716, -115.1391),
    Location::new("Corn Creek", 36.4380, -115.3570),
    Location::new("Indian Springs", 36.5697, -115.6706),
    Location::new("Mercury junction", 36.6180, -115.9950),
    Location::new("Amargosa Valley", 36.6427, -116.4003),
    Location::new("Beatty", 36.9086, -116.7589),
];

/// Densified track: `steps` interpolated points per waypoint leg.
pub fn track(steps: usize) -> Vec<Coordinate> {
    let mut coords = Vec::new();
    for leg in WAYPOINTS.windows(2) {
        for step in 0..steps {
            let t = step as f64 / steps as f64;
            coords.push(Coordinate::new(
                leg[0].lat + (leg[1].lat - leg[0].lat) * t,
                leg[0].lon + (leg[1].lon - leg[0].lon) * t,
            ));
        }
    }
    if let Some(last) = WAYPOINTS.last() {
        coords.push(last.coordinate());
    }
    coords
}

/// Fuel stops a couple of hundred meters off the towns along the way,
/// listed out of route order, plus one in Pahrump well off the route.
pub fn stations() -> Vec<Poi> {
    vec![
        Poi::fuel(4, Coordinate::new(36.9100, -116.7575), "Beatty Fuel"),
        Poi::fuel(2, Coordinate::new(36.5710, -115.6690), "Indian Springs Fuel"),
        Poi::fuel(9, Coordinate::new(36.2083, -115.9839), "Pahrump Fuel"),
        Poi::fuel(3, Coordinate::new(36.6440, -116.3990), "Amargosa Fuel"),
        Poi::fuel(1, Coordinate::new(36.1730, -115.1380), "Downtown Fuel"),
    ]
}

/// POIs scattered around the track within `spread_deg` of a track point.
pub fn scattered_pois(track: &[Coordinate], count: usize, spread_deg: f64, seed: u64) -> Vec<Poi> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let anchor = track[rng.random_range(0..track.len())];
            let coordinate = Coordinate::new(
                anchor.lat + rng.random_range(-spread_deg..spread_deg),
                anchor.lon + rng.random_range(-spread_deg..spread_deg),
            );
            Poi::fuel(i as i64, coordinate, format!("Scattered {}", i))
        })
        .collect()
}
