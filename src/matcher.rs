//! Nearest route point search.

use serde::{Deserialize, Serialize};

use crate::haversine::{Coordinate, haversine_km};
use crate::route::{Route, RoutePoint};
use crate::route_index::RouteIndex;

/// Default coarse sampling stride.
pub const DEFAULT_SAMPLE_EVERY: usize = 5;

/// Upper bound for a stride derived from point spacing.
const MAX_ADAPTIVE_STRIDE: usize = 50;

/// How the matcher scans the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStrategy {
    /// Sample every `sample_every`th point, then rescan `±sample_every` points
    /// around the best sample. O(N/K) but may miss a sharper local minimum
    /// outside the refine window.
    CoarseToFine { sample_every: usize },
    /// Scan every point. Always exact.
    Exhaustive,
    /// Query an R-tree over the route points. Exact, with the same
    /// tie-breaking as `Exhaustive`; worth it on routes with thousands of
    /// points.
    Indexed,
}

impl Default for MatchStrategy {
    fn default() -> Self {
        Self::CoarseToFine {
            sample_every: DEFAULT_SAMPLE_EVERY,
        }
    }
}

impl MatchStrategy {
    /// Coarse-to-fine strategy whose stride covers about `target_spacing_km`
    /// of route per sample, based on the route's average point spacing.
    ///
    /// Dense tracks get a wider stride, sparse tracks fall back to a stride
    /// of 1 (exhaustive).
    pub fn adaptive(route: &Route, target_spacing_km: f64) -> Self {
        let segments = route.len().saturating_sub(1);
        if segments == 0 || route.total_distance_km() <= 0.0 || target_spacing_km <= 0.0 {
            return Self::default();
        }

        let avg_spacing_km = route.total_distance_km() / segments as f64;
        let stride = (target_spacing_km / avg_spacing_km).floor();
        let sample_every = if stride.is_finite() {
            (stride as usize).clamp(1, MAX_ADAPTIVE_STRIDE)
        } else {
            MAX_ADAPTIVE_STRIDE
        };

        Self::CoarseToFine { sample_every }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    pub strategy: MatchStrategy,
}

/// The route point closest to a query coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearestPoint {
    pub point: RoutePoint,
    /// Index of `point` within the route.
    pub index: usize,
    pub distance_km: f64,
}

/// Find the nearest route point using the default options.
pub fn nearest_point(coord: Coordinate, route: &Route) -> NearestPoint {
    nearest(coord, route, &MatchOptions::default())
}

/// Find the route point minimizing the great-circle distance to `coord`.
///
/// Ties resolve to the first point in route order. For many lookups against
/// one route use [`RouteMatcher`], which builds the spatial index only once.
pub fn nearest(coord: Coordinate, route: &Route, options: &MatchOptions) -> NearestPoint {
    RouteMatcher::new(route, options).nearest(coord)
}

/// Nearest-point search prepared for one route.
#[derive(Debug)]
pub struct RouteMatcher<'r> {
    route: &'r Route,
    strategy: MatchStrategy,
    index: Option<RouteIndex>,
}

impl<'r> RouteMatcher<'r> {
    pub fn new(route: &'r Route, options: &MatchOptions) -> Self {
        let index = (options.strategy == MatchStrategy::Indexed).then(|| RouteIndex::new(route));
        Self {
            route,
            strategy: options.strategy,
            index,
        }
    }

    pub fn nearest(&self, coord: Coordinate) -> NearestPoint {
        if let Some(index) = &self.index {
            return index.nearest(coord, self.route);
        }

        let points = self.route.points();
        let index = match self.strategy {
            MatchStrategy::CoarseToFine { sample_every } => {
                let stride = sample_every.max(1);
                let coarse = coarse_index(coord, points, stride);

                // The stride may have stepped over the true minimum.
                let start = coarse.saturating_sub(stride);
                let end = (coarse + stride + 1).min(points.len());
                scan(coord, points, start, end).0
            }
            MatchStrategy::Exhaustive | MatchStrategy::Indexed => {
                scan(coord, points, 0, points.len()).0
            }
        };

        let point = points[index];
        NearestPoint {
            point,
            index,
            distance_km: haversine_km(coord, point.coordinate),
        }
    }
}

fn coarse_index(coord: Coordinate, points: &[RoutePoint], stride: usize) -> usize {
    let mut best_index = 0;
    let mut best_distance = f64::INFINITY;

    for (index, point) in points.iter().enumerate().step_by(stride) {
        let distance = haversine_km(coord, point.coordinate);
        if distance < best_distance {
            best_distance = distance;
            best_index = index;
        }
    }

    best_index
}

/// First strict minimum in `points[start..end]`.
fn scan(coord: Coordinate, points: &[RoutePoint], start: usize, end: usize) -> (usize, f64) {
    let mut best_index = start;
    let mut best_distance = f64::INFINITY;

    for (offset, point) in points[start..end].iter().enumerate() {
        let distance = haversine_km(coord, point.coordinate);
        if distance < best_distance {
            best_distance = distance;
            best_index = start + offset;
        }
    }

    (best_index, best_distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::build_route;

    /// Straight route along the equator with one point every `step` degrees.
    fn equator_route(count: usize, step: f64) -> Route {
        let coords: Vec<Coordinate> = (0..count)
            .map(|i| Coordinate::new(0.0, i as f64 * step))
            .collect();
        build_route(&coords).unwrap()
    }

    #[test]
    fn test_single_point_route_always_matches() {
        let route = build_route(&[Coordinate::new(10.0, 10.0)]).unwrap();
        let nearest = nearest_point(Coordinate::new(-30.0, 100.0), &route);
        assert_eq!(nearest.index, 0);
        assert_eq!(nearest.point, route.points()[0]);
    }

    #[test]
    fn test_finds_minimum_between_samples() {
        let route = equator_route(100, 0.01);
        // Index 37 is not a multiple of the stride.
        let query = Coordinate::new(0.001, 0.37);
        let coarse = nearest_point(query, &route);
        let exact = nearest(
            query,
            &route,
            &MatchOptions {
                strategy: MatchStrategy::Exhaustive,
            },
        );
        assert_eq!(coarse.index, 37);
        assert_eq!(exact.index, 37);
        assert!((coarse.distance_km - 0.001_f64.to_radians() * 6371.0).abs() < 1e-6);
    }

    #[test]
    fn test_last_point_reachable() {
        let route = equator_route(13, 0.1);
        let nearest = nearest_point(Coordinate::new(0.0, 1.3), &route);
        assert_eq!(nearest.index, 12);
    }

    #[test]
    fn test_ties_resolve_to_first_in_route_order() {
        // Out-and-back: the same coordinates appear twice.
        let coords: Vec<Coordinate> = [0.0, 0.1, 0.2, 0.1, 0.0]
            .iter()
            .map(|lon| Coordinate::new(0.0, *lon))
            .collect();
        let route = build_route(&coords).unwrap();
        let query = Coordinate::new(0.01, 0.1);

        for strategy in [
            MatchStrategy::default(),
            MatchStrategy::Exhaustive,
            MatchStrategy::Indexed,
        ] {
            let nearest = nearest(query, &route, &MatchOptions { strategy });
            assert_eq!(nearest.index, 1, "{:?}", strategy);
        }
    }

    #[test]
    fn test_zero_stride_behaves_like_exhaustive() {
        let route = equator_route(20, 0.05);
        let query = Coordinate::new(0.2, 0.63);
        let options = MatchOptions {
            strategy: MatchStrategy::CoarseToFine { sample_every: 0 },
        };
        let exact = MatchOptions {
            strategy: MatchStrategy::Exhaustive,
        };
        assert_eq!(nearest(query, &route, &options), nearest(query, &route, &exact));
    }

    #[test]
    fn test_prepared_matcher_agrees_with_one_off_lookups() {
        let route = equator_route(300, 0.003);
        for strategy in [MatchStrategy::default(), MatchStrategy::Exhaustive, MatchStrategy::Indexed] {
            let options = MatchOptions { strategy };
            let matcher = RouteMatcher::new(&route, &options);
            for lon in [0.0, 0.1234, 0.5, 0.899, 1.2] {
                let query = Coordinate::new(0.004, lon);
                assert_eq!(matcher.nearest(query), nearest(query, &route, &options), "{:?}", strategy);
            }
        }
    }

    #[test]
    fn test_adaptive_stride_follows_spacing() {
        // ~111 m between points: 1 km target gives a stride of 8.
        let dense = equator_route(200, 0.001);
        assert_eq!(
            MatchStrategy::adaptive(&dense, 1.0),
            MatchStrategy::CoarseToFine { sample_every: 8 }
        );

        // ~11 km between points: stride collapses to 1.
        let sparse = equator_route(10, 0.1);
        assert_eq!(
            MatchStrategy::adaptive(&sparse, 1.0),
            MatchStrategy::CoarseToFine { sample_every: 1 }
        );

        let single = equator_route(1, 0.1);
        assert_eq!(MatchStrategy::adaptive(&single, 1.0), MatchStrategy::default());
    }

    #[test]
    fn test_adaptive_stride_is_capped() {
        let very_dense = equator_route(1000, 0.00001);
        assert_eq!(
            MatchStrategy::adaptive(&very_dense, 5.0),
            MatchStrategy::CoarseToFine {
                sample_every: MAX_ADAPTIVE_STRIDE
            }
        );
    }
}
