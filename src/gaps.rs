//! Supply gap detection.
//!
//! A gap is a stretch of route longer than a threshold with no qualifying
//! stop, including the stretches before the first and after the last stop.

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::stops::MatchResult;

/// Stretch length, in km, above which a missing stop is reported.
pub const DEFAULT_GAP_THRESHOLD_KM: f64 = 15.0;

/// Anything with a position along the route.
pub trait RoutePosition {
    fn distance_along_route_km(&self) -> f64;
}

impl RoutePosition for MatchResult<'_> {
    fn distance_along_route_km(&self) -> f64 {
        self.distance_along_route_km
    }
}

impl RoutePosition for f64 {
    fn distance_along_route_km(&self) -> f64 {
        *self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub from_km: f64,
    pub to_km: f64,
    pub distance_km: f64,
    /// Index of the stop the gap follows. `None` for the gap before the
    /// first stop (or the whole route when there are no stops).
    pub after_stop: Option<usize>,
}

impl Gap {
    fn new(from_km: f64, to_km: f64, after_stop: Option<usize>) -> Self {
        Self {
            from_km,
            to_km,
            distance_km: to_km - from_km,
            after_stop,
        }
    }

    /// Signed stop index, with `-1` meaning "before the first stop".
    pub fn after_stop_index(&self) -> i64 {
        self.after_stop.map(|index| index as i64).unwrap_or(-1)
    }
}

/// [`find_gaps`] with [`DEFAULT_GAP_THRESHOLD_KM`].
pub fn find_gaps_default<P: RoutePosition>(stops: &[P], total_distance_km: f64) -> Result<Vec<Gap>> {
    find_gaps(stops, total_distance_km, DEFAULT_GAP_THRESHOLD_KM)
}

/// Find every interval between consecutive stops (and the route ends) that is
/// strictly longer than `threshold_km`.
///
/// `stops` must be ordered by route position. Gaps come out in route order.
pub fn find_gaps<P: RoutePosition>(
    stops: &[P],
    total_distance_km: f64,
    threshold_km: f64,
) -> Result<Vec<Gap>> {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Ok(if total_distance_km > threshold_km {
            vec![Gap::new(0.0, total_distance_km, None)]
        } else {
            Vec::new()
        });
    };

    let last_km = last.distance_along_route_km();
    if total_distance_km < last_km {
        tracing::error!(total_distance_km, last_km, "stop lies beyond the end of the route");
        return Err(PlannerError::InconsistentTotalDistance {
            total_km: total_distance_km,
            last_stop_km: last_km,
        });
    }

    let mut gaps = Vec::new();

    let first_km = first.distance_along_route_km();
    if first_km > threshold_km {
        gaps.push(Gap::new(0.0, first_km, None));
    }

    for (index, pair) in stops.windows(2).enumerate() {
        let from_km = pair[0].distance_along_route_km();
        let to_km = pair[1].distance_along_route_km();
        if to_km - from_km > threshold_km {
            gaps.push(Gap::new(from_km, to_km, Some(index)));
        }
    }

    if total_distance_km - last_km > threshold_km {
        gaps.push(Gap::new(last_km, total_distance_km, Some(stops.len() - 1)));
    }

    Ok(gaps)
}
