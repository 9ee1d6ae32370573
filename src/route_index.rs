//! R-tree over route points for exact nearest-point lookups on long routes.
//!
//! Points are stored as unit vectors on the sphere. Chord length grows with
//! great-circle distance, so the Euclidean nearest neighbor in 3D is also the
//! haversine nearest neighbor, up to rounding. Candidates within a hair of
//! the best chord are re-ranked by `haversine_km` and route index, which keeps
//! the answer identical to a full scan.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::haversine::{Coordinate, haversine_km};
use crate::matcher::NearestPoint;
use crate::route::Route;

/// Chord slack on the unit sphere when collecting tie candidates, about
/// 0.6 m on Earth. Covers rounding in both the chord and haversine.
const CHORD_SLACK: f64 = 1e-7;

/// A route point with its index, positioned on the unit sphere.
#[derive(Debug, Clone, Copy)]
struct IndexedPoint {
    idx: usize,
    position: [f64; 3],
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        let dz = self.position[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

fn unit_vector(coord: Coordinate) -> [f64; 3] {
    let lat = coord.lat.to_radians();
    let lon = coord.lon.to_radians();
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

/// Spatial index over the points of one route.
///
/// Build once per route and share it across POIs; lookups borrow the route
/// the index was built from.
#[derive(Debug, Clone)]
pub struct RouteIndex {
    tree: RTree<IndexedPoint>,
}

impl RouteIndex {
    pub fn new(route: &Route) -> Self {
        let points: Vec<IndexedPoint> = route
            .points()
            .iter()
            .enumerate()
            .map(|(idx, point)| IndexedPoint {
                idx,
                position: unit_vector(point.coordinate),
            })
            .collect();

        let tree = RTree::bulk_load(points);
        tracing::debug!(points = tree.size(), "indexed route");
        Self { tree }
    }

    /// Nearest point of `route` to `coord`. Ties resolve to the first point
    /// in route order, as with a full scan.
    ///
    /// `route` must be the route this index was built from.
    pub fn nearest(&self, coord: Coordinate, route: &Route) -> NearestPoint {
        let points = route.points();
        let query = unit_vector(coord);

        let Some(closest) = self.tree.nearest_neighbor(&query) else {
            // Routes are never empty; an empty tree only comes from misuse.
            return NearestPoint {
                point: points[0],
                index: 0,
                distance_km: haversine_km(coord, points[0].coordinate),
            };
        };

        let radius = closest.distance_2(&query).sqrt() + CHORD_SLACK;
        let mut best_index = closest.idx;
        let mut best_distance = haversine_km(coord, points[best_index].coordinate);

        for candidate in self.tree.locate_within_distance(query, radius * radius) {
            let distance = haversine_km(coord, points[candidate.idx].coordinate);
            if distance < best_distance || (distance == best_distance && candidate.idx < best_index) {
                best_distance = distance;
                best_index = candidate.idx;
            }
        }

        NearestPoint {
            point: points[best_index],
            index: best_index,
            distance_km: best_distance,
        }
    }
}
