//! Overpass API adapter for fuel station and shop lookups.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::PoiSourceError;
use crate::haversine::Coordinate;
use crate::poi::{Poi, PoiAttributes, PoiCategory};
use crate::route::BoundingBox;
use crate::traits::PoiSource;

pub const DEFAULT_ENDPOINTS: [&str; 3] = [
    "https://overpass-api.de/api/interpreter",
    "https://lz4.overpass-api.de/api/interpreter",
    "https://z.overpass-api.de/api/interpreter",
];

#[derive(Debug, Clone)]
pub struct OverpassConfig {
    /// Equivalent interpreter endpoints, tried in order.
    pub endpoints: Vec<String>,
    /// HTTP timeout per endpoint.
    pub timeout_secs: u64,
    /// Server-side query timeout (`[timeout:N]`).
    pub query_timeout_secs: u64,
    /// Also fetch supermarkets and convenience stores.
    pub include_supermarkets: bool,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|url| url.to_string()).collect(),
            timeout_secs: 90,
            query_timeout_secs: 60,
            include_supermarkets: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OverpassClient {
    config: OverpassConfig,
    client: reqwest::blocking::Client,
}

impl OverpassClient {
    pub fn new(config: OverpassConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OverpassConfig {
        &self.config
    }

    fn query_endpoint(&self, endpoint: &str, query: &str) -> Result<Vec<Poi>, reqwest::Error> {
        let body = self
            .client
            .post(endpoint)
            .form(&[("data", query)])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OverpassResponse>())?;

        Ok(parse_response(body))
    }
}

impl PoiSource for OverpassClient {
    fn pois_in(&self, bounds: &BoundingBox) -> Result<Vec<Poi>, PoiSourceError> {
        if self.config.endpoints.is_empty() {
            return Err(PoiSourceError::NoEndpoints);
        }

        let query = build_query(
            bounds,
            self.config.include_supermarkets,
            self.config.query_timeout_secs,
        );

        let mut last_error = String::new();
        for endpoint in &self.config.endpoints {
            match self.query_endpoint(endpoint, &query) {
                Ok(pois) => {
                    tracing::debug!(endpoint = %endpoint, pois = pois.len(), "overpass query succeeded");
                    return Ok(pois);
                }
                Err(err) => {
                    tracing::warn!(endpoint = %endpoint, error = %err, "overpass endpoint failed");
                    last_error = err.to_string();
                }
            }
        }

        Err(PoiSourceError::AllEndpointsFailed { last: last_error })
    }
}

/// Overpass QL selecting fuel stations (and optionally shops) inside `bounds`.
pub fn build_query(bounds: &BoundingBox, include_supermarkets: bool, timeout_secs: u64) -> String {
    let bbox = format!(
        "({},{},{},{})",
        bounds.south, bounds.west, bounds.north, bounds.east
    );

    let mut selectors = vec![r#""amenity"="fuel""#];
    if include_supermarkets {
        selectors.push(r#""shop"="supermarket""#);
        selectors.push(r#""shop"="convenience""#);
    }

    let mut query = format!("[out:json][timeout:{}];\n(\n", timeout_secs);
    for selector in selectors {
        for kind in ["node", "way"] {
            query.push_str(&format!("  {}[{}]{};\n", kind, selector, bbox));
        }
    }
    query.push_str(");\nout center;\n");
    query
}

#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub center: Option<OverpassCenter>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct OverpassCenter {
    pub lat: f64,
    pub lon: f64,
}

/// Convert raw Overpass elements into POIs.
///
/// Nodes carry their own position, ways use their computed center. Elements
/// with neither (e.g. relations without `out center`) are skipped.
pub fn parse_response(response: OverpassResponse) -> Vec<Poi> {
    response
        .elements
        .into_iter()
        .filter_map(|element| {
            let coordinate = match (&element.kind[..], element.lat, element.lon, &element.center) {
                ("node", Some(lat), Some(lon), _) => Coordinate::new(lat, lon),
                (_, _, _, Some(center)) => Coordinate::new(center.lat, center.lon),
                _ => return None,
            };

            Some(Poi {
                id: element.id,
                coordinate,
                attributes: attributes_from_tags(&element.tags),
            })
        })
        .collect()
}

fn attributes_from_tags(tags: &HashMap<String, String>) -> PoiAttributes {
    let tag = |key: &str| tags.get(key).map(String::as_str);

    let is_supermarket = matches!(tag("shop"), Some("supermarket" | "convenience"));
    let (category, default_name) = if is_supermarket {
        (PoiCategory::Supermarket, "Unnamed Supermarket")
    } else {
        (PoiCategory::Fuel, "Unnamed Gas Station")
    };

    let has_shop = matches!(tag("shop"), Some(shop) if shop != "no")
        || tag("building") == Some("retail")
        || tag("convenience") == Some("yes");

    PoiAttributes {
        name: tag("name").unwrap_or(default_name).to_string(),
        brand: tag("brand").unwrap_or_default().to_string(),
        category,
        opening_hours: tag("opening_hours").unwrap_or("Unknown").to_string(),
        has_shop,
    }
}
