//! Error types for the planner core and its collaborators.

use thiserror::Error;

/// Errors raised while building a query or running the matching pipeline.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("route has no points")]
    EmptyRoute,

    #[error("invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("max detour must be a positive distance, got {0} km")]
    InvalidDetour(f64),

    #[error("total distance {total_km} km is shorter than last stop at {last_stop_km} km")]
    InconsistentTotalDistance { total_km: f64, last_stop_km: f64 },

    #[error("GPX parsing error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("POI source error: {0}")]
    PoiSource(#[from] PoiSourceError),
}

/// Failures of a remote POI collaborator.
#[derive(Debug, Error)]
pub enum PoiSourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no POI endpoints configured")]
    NoEndpoints,

    #[error("all POI endpoints failed: {last}")]
    AllEndpointsFailed { last: String },
}

pub type Result<T> = std::result::Result<T, PlannerError>;
