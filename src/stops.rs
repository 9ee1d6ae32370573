//! Matching POIs against a route and ranking them as stops.

use rayon::prelude::*;
use serde::Serialize;

use crate::error::{PlannerError, Result};
use crate::matcher::{MatchOptions, RouteMatcher};
use crate::poi::Poi;
use crate::route::{Route, RoutePoint};

/// A POI that qualifies as a stop, with its position along the route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult<'a> {
    pub poi: &'a Poi,
    pub nearest_point: RoutePoint,
    /// Distance from the POI to `nearest_point`, in km.
    pub detour_km: f64,
    /// Equal to `nearest_point.distance_from_start_km`.
    pub distance_along_route_km: f64,
}

/// Match every POI against the route and keep those within `max_detour_km`.
///
/// The boundary is inclusive. Results are ordered by position along the
/// route; POIs at the same position keep their input order.
pub fn filter_along_route<'a>(
    pois: &'a [Poi],
    route: &Route,
    max_detour_km: f64,
    options: &MatchOptions,
) -> Result<Vec<MatchResult<'a>>> {
    validate_detour(max_detour_km)?;

    let start = std::time::Instant::now();
    let matcher = RouteMatcher::new(route, options);
    let mut stops: Vec<MatchResult<'a>> = pois
        .par_iter()
        .filter_map(|poi| {
            let nearest = matcher.nearest(poi.coordinate);
            (nearest.distance_km <= max_detour_km).then_some(MatchResult {
                poi,
                nearest_point: nearest.point,
                detour_km: nearest.distance_km,
                distance_along_route_km: nearest.point.distance_from_start_km,
            })
        })
        .collect();

    // `sort_by` is stable, which preserves input order for equal positions.
    stops.sort_by(|a, b| a.distance_along_route_km.total_cmp(&b.distance_along_route_km));

    tracing::debug!(
        pois = pois.len(),
        stops = stops.len(),
        max_detour_km,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "filtered POIs along route"
    );

    Ok(stops)
}

/// Re-filter an already matched stop list to a narrower detour.
///
/// Equivalent to running [`filter_along_route`] again with the smaller
/// threshold, without repeating the nearest-point search.
pub fn narrow<'a>(stops: &[MatchResult<'a>], max_detour_km: f64) -> Result<Vec<MatchResult<'a>>> {
    validate_detour(max_detour_km)?;

    Ok(stops
        .iter()
        .filter(|stop| stop.detour_km <= max_detour_km)
        .cloned()
        .collect())
}

pub(crate) fn validate_detour(max_detour_km: f64) -> Result<()> {
    if max_detour_km.is_finite() && max_detour_km > 0.0 {
        Ok(())
    } else {
        Err(PlannerError::InvalidDetour(max_detour_km))
    }
}
