//! Query session: one route, one POI fetch, many detour settings.
//!
//! Widening the detour beyond what was fetched re-queries the POI source
//! with a larger bounding box. Narrowing (or widening within the fetched
//! range) only re-filters the cached POIs.

use serde::Serialize;

use crate::error::Result;
use crate::gaps::{DEFAULT_GAP_THRESHOLD_KM, Gap, find_gaps};
use crate::matcher::MatchOptions;
use crate::poi::Poi;
use crate::route::{Route, bounding_box};
use crate::stops::{MatchResult, filter_along_route, validate_detour};
use crate::traits::PoiSource;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Initial maximum detour in km.
    pub max_detour_km: f64,
    /// Extra buffer added to the detour when sizing the POI query box.
    pub buffer_margin_km: f64,
    pub gap_threshold_km: f64,
    pub match_options: MatchOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_detour_km: 1.0,
            buffer_margin_km: 0.5,
            gap_threshold_km: DEFAULT_GAP_THRESHOLD_KM,
            match_options: MatchOptions::default(),
        }
    }
}

/// What a detour change required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetourUpdate {
    /// POIs were fetched again for a larger area.
    Refetched,
    /// Cached POIs were filtered again.
    Refiltered,
}

/// Stops and gaps for the current detour setting.
#[derive(Debug, Clone, Serialize)]
pub struct Plan<'a> {
    pub stops: Vec<MatchResult<'a>>,
    pub gaps: Vec<Gap>,
    pub total_distance_km: f64,
}

#[derive(Debug)]
pub struct QuerySession<S: PoiSource> {
    source: S,
    config: SessionConfig,
    route: Route,
    pois: Vec<Poi>,
    queried_detour_km: f64,
}

impl<S: PoiSource> QuerySession<S> {
    /// Fetch POIs around `route` for the configured detour.
    pub fn load(source: S, route: Route, config: SessionConfig) -> Result<Self> {
        validate_detour(config.max_detour_km)?;
        let pois = fetch(&source, &route, config.max_detour_km, config.buffer_margin_km)?;
        let queried_detour_km = config.max_detour_km;

        Ok(Self {
            source,
            config,
            route,
            pois,
            queried_detour_km,
        })
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn pois(&self) -> &[Poi] {
        &self.pois
    }

    pub fn max_detour_km(&self) -> f64 {
        self.config.max_detour_km
    }

    /// Largest detour the cached POIs are known to cover.
    pub fn queried_detour_km(&self) -> f64 {
        self.queried_detour_km
    }

    /// Change the detour, fetching POIs again only if it grew past the
    /// fetched range. On a failed fetch the session is left unchanged.
    pub fn set_max_detour(&mut self, max_detour_km: f64) -> Result<DetourUpdate> {
        validate_detour(max_detour_km)?;

        let update = if max_detour_km > self.queried_detour_km {
            self.pois = fetch(
                &self.source,
                &self.route,
                max_detour_km,
                self.config.buffer_margin_km,
            )?;
            self.queried_detour_km = max_detour_km;
            DetourUpdate::Refetched
        } else {
            DetourUpdate::Refiltered
        };

        self.config.max_detour_km = max_detour_km;
        tracing::debug!(max_detour_km, ?update, "detour changed");
        Ok(update)
    }

    /// Match the cached POIs and compute gaps for the current detour.
    pub fn plan(&self) -> Result<Plan<'_>> {
        let stops = filter_along_route(
            &self.pois,
            &self.route,
            self.config.max_detour_km,
            &self.config.match_options,
        )?;
        let total_distance_km = self.route.total_distance_km();
        let gaps = find_gaps(&stops, total_distance_km, self.config.gap_threshold_km)?;

        Ok(Plan {
            stops,
            gaps,
            total_distance_km,
        })
    }
}

fn fetch<S: PoiSource>(source: &S, route: &Route, detour_km: f64, margin_km: f64) -> Result<Vec<Poi>> {
    let bounds = bounding_box(route, detour_km + margin_km);
    let pois = source.pois_in(&bounds)?;
    tracing::info!(pois = pois.len(), detour_km, "fetched POIs");
    Ok(pois)
}
