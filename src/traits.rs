//! Seams to the external collaborators of the planner core.
//!
//! The core only needs an ordered coordinate sequence and a list of POIs.
//! Concrete sources (GPX files, Overpass, fixtures) implement these traits.

use crate::error::{PoiSourceError, Result};
use crate::haversine::Coordinate;
use crate::poi::Poi;
use crate::route::BoundingBox;

/// A decoded track: display name plus ordered coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub name: String,
    pub coordinates: Vec<Coordinate>,
}

/// Supplies the ordered coordinates of a route.
pub trait RouteSource {
    fn load_track(&self) -> Result<Track>;
}

/// Supplies POIs inside a bounding box.
///
/// Implementations own any retry or failover policy. An empty result is a
/// valid answer, not an error.
pub trait PoiSource {
    fn pois_in(&self, bounds: &BoundingBox) -> std::result::Result<Vec<Poi>, PoiSourceError>;
}

impl PoiSource for Vec<Poi> {
    fn pois_in(&self, bounds: &BoundingBox) -> std::result::Result<Vec<Poi>, PoiSourceError> {
        Ok(self
            .iter()
            .filter(|poi| bounds.contains(poi.coordinate))
            .cloned()
            .collect())
    }
}
