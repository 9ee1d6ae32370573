//! Points of interest (fuel stations, shops) offered as resupply stops.

use serde::{Deserialize, Serialize};

use crate::haversine::Coordinate;

/// What kind of resupply a POI offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoiCategory {
    Fuel,
    Supermarket,
}

/// Descriptive attributes. Opaque to the matching core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiAttributes {
    pub name: String,
    pub brand: String,
    pub category: PoiCategory,
    pub opening_hours: String,
    pub has_shop: bool,
}

impl PoiAttributes {
    /// Name with the brand appended when it adds information.
    pub fn display_name(&self) -> String {
        if !self.brand.is_empty() && self.brand != self.name {
            format!("{} ({})", self.name, self.brand)
        } else {
            self.name.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    /// Stable identifier (OSM element id for Overpass results).
    pub id: i64,
    pub coordinate: Coordinate,
    pub attributes: PoiAttributes,
}

impl Poi {
    /// A fuel station with default attributes.
    pub fn fuel(id: i64, coordinate: Coordinate, name: impl Into<String>) -> Self {
        Self {
            id,
            coordinate,
            attributes: PoiAttributes {
                name: name.into(),
                brand: String::new(),
                category: PoiCategory::Fuel,
                opening_hours: "Unknown".to_string(),
                has_shop: false,
            },
        }
    }

    /// Google Maps link pointing at the POI.
    pub fn maps_url(&self) -> String {
        format!(
            "https://www.google.com/maps?q={},{}",
            self.coordinate.lat, self.coordinate.lon
        )
    }
}
