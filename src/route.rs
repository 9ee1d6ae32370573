//! Route representation with cumulative distance per point.
//!
//! A route is built once from a decoded coordinate sequence (GPX track,
//! polyline, ...) and only read afterwards. Parsing happens at the boundary,
//! not within the matching core.

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::haversine::{Coordinate, haversine_km};

/// Approximate kilometers per degree of latitude.
const KM_PER_DEGREE: f64 = 111.0;

/// A point on the route with its distance from the route start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub coordinate: Coordinate,
    /// Cumulative great-circle length up to and including this point, in km.
    pub distance_from_start_km: f64,
}

/// An ordered, non-empty sequence of route points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    name: Option<String>,
    points: Vec<RoutePoint>,
}

impl Route {
    pub fn from_coordinates(coords: &[Coordinate]) -> Result<Self> {
        build_route(coords)
    }

    pub fn named(name: impl Into<String>, coords: &[Coordinate]) -> Result<Self> {
        let mut route = build_route(coords)?;
        route.name = Some(name.into());
        Ok(route)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn points(&self) -> &[RoutePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total route length in km (0 for a single-point route).
    pub fn total_distance_km(&self) -> f64 {
        self.points
            .last()
            .map(|point| point.distance_from_start_km)
            .unwrap_or(0.0)
    }
}

/// Build a route, assigning each point its cumulative distance from the start.
pub fn build_route(coords: &[Coordinate]) -> Result<Route> {
    let Some(first) = coords.first() else {
        return Err(PlannerError::EmptyRoute);
    };

    let mut points = Vec::with_capacity(coords.len());
    points.push(RoutePoint {
        coordinate: *first,
        distance_from_start_km: 0.0,
    });

    let mut total = 0.0;
    for pair in coords.windows(2) {
        total += haversine_km(pair[0], pair[1]);
        points.push(RoutePoint {
            coordinate: pair[1],
            distance_from_start_km: total,
        });
    }

    tracing::debug!(points = points.len(), total_km = total, "built route");

    Ok(Route { name: None, points })
}

/// A lat/lon rectangle used to scope spatial POI queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.lat >= self.south
            && coord.lat <= self.north
            && coord.lon >= self.west
            && coord.lon <= self.east
    }
}

/// Bounding box of the route expanded by `buffer_km` on every side.
///
/// Degrees per km are approximated as `1/111` for latitude and
/// `1/(111 * cos(avg_lat))` for longitude. Not geodesically exact, only wide
/// enough that no POI within `buffer_km` of the route falls outside.
pub fn bounding_box(route: &Route, buffer_km: f64) -> BoundingBox {
    let mut south = f64::INFINITY;
    let mut west = f64::INFINITY;
    let mut north = f64::NEG_INFINITY;
    let mut east = f64::NEG_INFINITY;
    let mut lat_sum = 0.0;

    for point in route.points() {
        let Coordinate { lat, lon } = point.coordinate;
        south = south.min(lat);
        north = north.max(lat);
        west = west.min(lon);
        east = east.max(lon);
        lat_sum += lat;
    }

    let avg_lat = lat_sum / route.len() as f64;
    let buffer_lat = buffer_km / KM_PER_DEGREE;
    let buffer_lon = buffer_km / (KM_PER_DEGREE * avg_lat.to_radians().cos());

    BoundingBox {
        south: south - buffer_lat,
        west: west - buffer_lon,
        north: north + buffer_lat,
        east: east + buffer_lon,
    }
}
