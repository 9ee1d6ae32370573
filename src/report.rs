//! Plain-text export of a stop list.

use std::fmt::{self, Write};

use crate::gaps::Gap;
use crate::stops::MatchResult;

const RULE_WIDTH: usize = 60;

/// Render stops and gap warnings as a human-readable report.
pub fn render_report(
    stops: &[MatchResult<'_>],
    gaps: &[Gap],
    total_distance_km: f64,
    route_name: Option<&str>,
) -> String {
    let mut out = String::new();
    if let Err(err) = write_report(&mut out, stops, gaps, total_distance_km, route_name) {
        tracing::error!(%err, "failed to format report");
    }
    out
}

fn write_report(
    out: &mut String,
    stops: &[MatchResult<'_>],
    gaps: &[Gap],
    total_distance_km: f64,
    route_name: Option<&str>,
) -> fmt::Result {
    let route_name = route_name.filter(|name| !name.trim().is_empty());
    writeln!(out, "Resupply Stops - {}", route_name.unwrap_or("Route"))?;
    writeln!(out, "{}\n", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "Total route distance: {:.1} km", total_distance_km)?;
    writeln!(out, "Stops found: {}", stops.len())?;
    if !gaps.is_empty() {
        writeln!(out, "Gaps without stops: {}", gaps.len())?;
    }
    writeln!(out)?;
    writeln!(out, "{}\n", "-".repeat(RULE_WIDTH))?;

    for gap in gaps_after(gaps, None) {
        write_gap(out, gap)?;
    }

    for (index, stop) in stops.iter().enumerate() {
        let pct = if total_distance_km > 0.0 {
            stop.distance_along_route_km / total_distance_km * 100.0
        } else {
            0.0
        };

        writeln!(out, "{}. {}", index + 1, stop.poi.attributes.display_name())?;
        writeln!(
            out,
            "   At km {:.1} ({:.0}% of route)",
            stop.distance_along_route_km, pct
        )?;
        writeln!(out, "   Detour: {:.0}m off route", stop.detour_km * 1000.0)?;
        writeln!(out, "   Google Maps: {}\n", stop.poi.maps_url())?;

        for gap in gaps_after(gaps, Some(index)) {
            write_gap(out, gap)?;
        }
    }

    Ok(())
}

fn gaps_after(gaps: &[Gap], after: Option<usize>) -> impl Iterator<Item = &Gap> {
    gaps.iter().filter(move |gap| gap.after_stop == after)
}

fn write_gap(out: &mut String, gap: &Gap) -> fmt::Result {
    writeln!(
        out,
        "   !! {:.1} km without stops (km {:.1} -> km {:.1})\n",
        gap.distance_km, gap.from_km, gap.to_km
    )
}

/// Suggested file name for an exported report.
pub fn report_file_name(route_name: Option<&str>) -> String {
    let name = route_name.filter(|name| !name.trim().is_empty());
    format!("{}_resupply_stops.txt", name.unwrap_or("route"))
}
