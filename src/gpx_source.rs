//! GPX route source.
//!
//! Reads track points in document order across all tracks and segments.
//! Files that only contain a planned `<rte>` fall back to its route points.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::{PlannerError, Result};
use crate::haversine::Coordinate;
use crate::traits::{RouteSource, Track};

const UNNAMED_ROUTE: &str = "Unnamed Route";

/// Loads a [`Track`] from a GPX file on disk.
#[derive(Debug, Clone)]
pub struct GpxRouteSource {
    path: PathBuf,
}

impl GpxRouteSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RouteSource for GpxRouteSource {
    fn load_track(&self) -> Result<Track> {
        let file = File::open(&self.path)?;
        let track = read_track(BufReader::new(file))?;
        tracing::debug!(
            path = %self.path.display(),
            name = %track.name,
            points = track.coordinates.len(),
            "loaded GPX track"
        );
        Ok(track)
    }
}

/// Parse GPX content into a named, validated coordinate sequence.
pub fn read_track<R: Read>(reader: R) -> Result<Track> {
    let data = gpx::read(reader).map_err(out_of_range)?;

    let name = data
        .tracks
        .iter()
        .find_map(|track| non_empty(track.name.as_deref()))
        .or_else(|| non_empty(data.metadata.as_ref().and_then(|meta| meta.name.as_deref())))
        .unwrap_or(UNNAMED_ROUTE)
        .to_string();

    let mut waypoints: Vec<&gpx::Waypoint> = data
        .tracks
        .iter()
        .flat_map(|track| track.segments.iter())
        .flat_map(|segment| segment.points.iter())
        .collect();

    if waypoints.is_empty() {
        waypoints = data.routes.iter().flat_map(|route| route.points.iter()).collect();
    }

    if waypoints.is_empty() {
        return Err(PlannerError::EmptyRoute);
    }

    let coordinates = waypoints
        .into_iter()
        .map(|waypoint| {
            let point = waypoint.point();
            Coordinate::validated(point.y(), point.x())
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Track { name, coordinates })
}

fn non_empty(name: Option<&str>) -> Option<&str> {
    name.map(str::trim).filter(|name| !name.is_empty())
}

/// The parser range-checks each attribute before we see the point, so only
/// the offending component is known. The other one is reported as NaN.
fn out_of_range(err: gpx::errors::GpxError) -> PlannerError {
    match err {
        gpx::errors::GpxError::LonLatOutOfBoundsError(field, _, value) => {
            if field.eq_ignore_ascii_case("latitude") {
                PlannerError::InvalidCoordinate {
                    lat: value,
                    lon: f64::NAN,
                }
            } else {
                PlannerError::InvalidCoordinate {
                    lat: f64::NAN,
                    lon: value,
                }
            }
        }
        other => PlannerError::Gpx(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <metadata><name>Metadata Name</name></metadata>
  <trk>
    <name>Col de la Bonette</name>
    <trkseg>
      <trkpt lat="44.3" lon="6.8"></trkpt>
      <trkpt lat="44.31" lon="6.81"></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="44.32" lon="6.82"></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

    #[test]
    fn test_reads_points_across_segments() {
        let track = read_track(TRACK.as_bytes()).unwrap();
        assert_eq!(track.name, "Col de la Bonette");
        assert_eq!(
            track.coordinates,
            vec![
                Coordinate::new(44.3, 6.8),
                Coordinate::new(44.31, 6.81),
                Coordinate::new(44.32, 6.82),
            ]
        );
    }

    #[test]
    fn test_name_falls_back_to_metadata() {
        let gpx = TRACK.replace("<name>Col de la Bonette</name>", "");
        let track = read_track(gpx.as_bytes()).unwrap();
        assert_eq!(track.name, "Metadata Name");
    }

    #[test]
    fn test_unnamed_route() {
        let gpx = TRACK
            .replace("<name>Col de la Bonette</name>", "")
            .replace("<metadata><name>Metadata Name</name></metadata>", "");
        let track = read_track(gpx.as_bytes()).unwrap();
        assert_eq!(track.name, "Unnamed Route");
    }

    #[test]
    fn test_blank_names_fall_back() {
        let gpx = TRACK
            .replace("<name>Col de la Bonette</name>", "<name></name>")
            .replace("<name>Metadata Name</name>", "<name> </name>");
        let track = read_track(gpx.as_bytes()).unwrap();
        assert_eq!(track.name, "Unnamed Route");

        let gpx = TRACK.replace("<name>Col de la Bonette</name>", "<name></name>");
        assert_eq!(read_track(gpx.as_bytes()).unwrap().name, "Metadata Name");
    }

    #[test]
    fn test_latitude_out_of_range() {
        let gpx = TRACK.replace(r#"lat="44.31""#, r#"lat="91.0""#);
        match read_track(gpx.as_bytes()) {
            Err(PlannerError::InvalidCoordinate { lat, lon }) => {
                assert_eq!(lat, 91.0);
                assert!(lon.is_nan());
            }
            other => panic!("expected InvalidCoordinate, got {:?}", other),
        }
    }

    #[test]
    fn test_longitude_out_of_range() {
        let gpx = TRACK.replace(r#"lon="6.82""#, r#"lon="200.0""#);
        match read_track(gpx.as_bytes()) {
            Err(PlannerError::InvalidCoordinate { lon, .. }) => assert_eq!(lon, 200.0),
            other => panic!("expected InvalidCoordinate, got {:?}", other),
        }
    }

    #[test]
    fn test_route_points_fallback() {
        let gpx = r#"<?xml version="1.0"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <rte>
    <rtept lat="10.0" lon="20.0"></rtept>
    <rtept lat="10.5" lon="20.5"></rtept>
  </rte>
</gpx>"#;
        let track = read_track(gpx.as_bytes()).unwrap();
        assert_eq!(track.coordinates.len(), 2);
    }

    #[test]
    fn test_empty_track_is_an_error() {
        let gpx = r#"<?xml version="1.0"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk><trkseg></trkseg></trk>
</gpx>"#;
        assert!(matches!(read_track(gpx.as_bytes()), Err(PlannerError::EmptyRoute)));
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        assert!(matches!(
            read_track("not xml at all".as_bytes()),
            Err(PlannerError::Gpx(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = GpxRouteSource::new("/nonexistent/route.gpx");
        assert!(matches!(source.load_track(), Err(PlannerError::Io(_))));
    }
}
