//! resupply-planner core
//!
//! Matches points of interest against a GPS route and reports the stops
//! reachable within a detour, plus the stretches of route without any.

pub mod error;
pub mod haversine;
pub mod route;
pub mod route_index;
pub mod matcher;
pub mod poi;
pub mod stops;
pub mod gaps;
pub mod traits;
pub mod gpx_source;
pub mod overpass;
pub mod report;
pub mod session;

pub use error::{PlannerError, PoiSourceError, Result};
pub use gaps::{DEFAULT_GAP_THRESHOLD_KM, Gap, find_gaps};
pub use haversine::{Coordinate, haversine_km};
pub use matcher::{MatchOptions, MatchStrategy, RouteMatcher, nearest, nearest_point};
pub use poi::{Poi, PoiAttributes, PoiCategory};
pub use route::{BoundingBox, Route, RoutePoint, bounding_box, build_route};
pub use stops::{MatchResult, filter_along_route, narrow};
