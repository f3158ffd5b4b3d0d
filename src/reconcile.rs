//! The reconciliation engine: coverage comparison, track matching, location
//! resolution and the one hard-coded station-split repair.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};
use strum_macros::Display;

use crate::{
    error::{ReconcileError, Result},
    models::{OsmPlatform, OsmStation, PlkPlatform, ReportPlatform},
    slug::slug,
};

/// The persisted report: platforms grouped under their slugified station
/// name. A `BTreeMap` keeps the file byte-stable across runs.
pub type Report = BTreeMap<String, Vec<ReportPlatform>>;

// The register splits Warszawa Zachodnia in two: platform 9 sits on a
// different infrastructure section and is listed as its own station.
const WARSAW_WEST: &str = "warszawa-zachodnia";
const WARSAW_WEST_PLATFORM_9: &str = "warszawa-zachodnia-peron-9";

// ------------------------------------------------------------------------------------------------
// --- Track normalization
// ------------------------------------------------------------------------------------------------

/// Normalizes a register track reference: trim, cut the list at the first
/// `,` or `/`, strip everything that is not a digit. Idempotent.
pub fn normalize_track(track: &str) -> String {
    let head = track.trim().split([',', '/']).next().unwrap_or("");
    strip_non_digits(head)
}

fn strip_non_digits(track: &str) -> String {
    track.chars().filter(char::is_ascii_digit).collect()
}

// ------------------------------------------------------------------------------------------------
// --- Coverage comparison
// ------------------------------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum CoverageBucket {
    #[strum(serialize = "no OSM coverage")]
    NoCoverage,
    #[strum(serialize = "missing platforms")]
    MissingPlatforms,
    #[strum(serialize = "more platforms in OSM")]
    MoreInOsm,
}

#[derive(Clone, Debug)]
pub struct StationMismatch {
    pub station_name: String,
    pub plk_count: usize,
    pub osm_count: usize,
    pub bucket: CoverageBucket,
}

/// Coverage findings for one run. These are data-quality observations, not
/// errors: the engine counts them and the presentation layer prints them.
#[derive(Debug, Default)]
pub struct CoverageStats {
    pub mismatches: Vec<StationMismatch>,
    pub stations_with_no_platforms: usize,
    pub stations_with_missing_platforms: usize,
    pub stations_with_more_platforms: usize,
    pub single_platform_stations_with_no_coverage: usize,
    pub duplicate_track_stations: Vec<String>,
}

/// Compares per-station platform counts between the register and OSM, and
/// flags stations whose register entries collapse onto the same normalized
/// track. Mismatching stations land in exactly one bucket.
pub fn compare(plk_platforms: &[PlkPlatform], osm_platforms: &[OsmPlatform]) -> CoverageStats {
    let plk_groups = group_by_station(plk_platforms, |p| p.station_name());
    let osm_groups = group_by_station(osm_platforms, |p| p.station_name());

    let mut stats = CoverageStats::default();
    for (station, platforms) in &plk_groups {
        let plk_count = platforms.len();
        let osm_count = osm_groups.get(station).map_or(0, Vec::len);

        if plk_count != osm_count {
            let bucket = if osm_count == 0 {
                stats.stations_with_no_platforms += 1;
                if plk_count == 1 {
                    stats.single_platform_stations_with_no_coverage += 1;
                }
                CoverageBucket::NoCoverage
            } else if plk_count > osm_count {
                stats.stations_with_missing_platforms += 1;
                CoverageBucket::MissingPlatforms
            } else {
                stats.stations_with_more_platforms += 1;
                CoverageBucket::MoreInOsm
            };
            stats.mismatches.push(StationMismatch {
                station_name: (*station).to_string(),
                plk_count,
                osm_count,
                bucket,
            });
        }

        let distinct_tracks: FxHashSet<String> = platforms
            .iter()
            .map(|platform| normalize_track(platform.track()))
            .collect();
        if distinct_tracks.len() < plk_count {
            stats.duplicate_track_stations.push((*station).to_string());
        }
    }

    stats.mismatches
        .sort_by(|a, b| a.station_name.cmp(&b.station_name));
    stats.duplicate_track_stations.sort();
    stats
}

// ------------------------------------------------------------------------------------------------
// --- Matching
// ------------------------------------------------------------------------------------------------

/// Finds the OSM platform for a register platform within one station.
///
/// Two complete passes: first raw track equality over the whole group, then
/// normalized register track against the digits-only OSM track. First match
/// wins within a pass; several OSM nodes sharing a track is a known
/// ambiguity that is left to the reader of the report.
pub fn match_platform<'a>(
    plk: &PlkPlatform,
    osm_group: &[&'a OsmPlatform],
) -> Option<&'a OsmPlatform> {
    if let Some(exact) = osm_group
        .iter()
        .find(|osm| osm.track() == plk.track())
        .copied()
    {
        return Some(exact);
    }
    let wanted = normalize_track(plk.track());
    osm_group
        .iter()
        .find(|osm| strip_non_digits(osm.track()) == wanted)
        .copied()
}

// ------------------------------------------------------------------------------------------------
// --- Report building
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ReconcileStats {
    pub total_platforms: usize,
    pub osm_platforms: usize,
    pub missing_platforms: usize,
    pub missing_stations: usize,
}

/// Resolves every register platform to a location: the matched OSM platform
/// coordinate, or the station node coordinate (axes swapped to (lon, lat)),
/// or nothing. Stations whose raw names slugify identically merge under one
/// key; that is accepted.
pub fn build_report(
    plk_platforms: &[PlkPlatform],
    osm_platforms: &[OsmPlatform],
    stations: &FxHashMap<String, OsmStation>,
) -> (Report, ReconcileStats) {
    let plk_groups = group_by_station(plk_platforms, |p| p.station_name());
    let osm_groups = group_by_station(osm_platforms, |p| p.station_name());

    let mut station_names: Vec<&str> = plk_groups.keys().copied().collect();
    station_names.sort_unstable();

    let mut report = Report::new();
    let mut stats = ReconcileStats {
        total_platforms: plk_platforms.len(),
        osm_platforms: osm_platforms.len(),
        ..ReconcileStats::default()
    };

    for station in station_names {
        let group = &plk_groups[station];
        let osm_group = osm_groups.get(station).map_or(&[][..], Vec::as_slice);

        let mut label_counts: FxHashMap<&str, usize> = FxHashMap::default();
        for platform in group {
            *label_counts.entry(platform.platform()).or_default() += 1;
        }

        let entries = report.entry(slug(station)).or_default();
        for plk in group {
            let (location, exact_location) = match match_platform(plk, osm_group) {
                Some(osm) => (Some(osm.location()), true),
                None => {
                    stats.missing_platforms += 1;
                    match stations.get(station) {
                        Some(osm_station) => {
                            let (lat, lon) = osm_station.location();
                            (Some((lon, lat)), false)
                        }
                        None => {
                            stats.missing_stations += 1;
                            (None, false)
                        }
                    }
                }
            };

            let track = normalize_track(plk.track());
            let global_id = format!("{}_{}", plk.platform(), track);
            entries.push(ReportPlatform::new(
                plk.station_name().to_string(),
                plk.operator().to_string(),
                plk.platform().to_string(),
                track,
                location,
                exact_location,
                label_counts.get(plk.platform()) == Some(&1),
                global_id,
            ));
        }
    }

    (report, stats)
}

/// Merges the register's split Warszawa Zachodnia entries: the stand-alone
/// platform 9 group replaces platform 9 of the base station. Hard-coded to
/// these two keys; both must be present.
pub fn fix_warsaw_west(report: &mut Report) -> Result<()> {
    let peron_9 = report
        .remove(WARSAW_WEST_PLATFORM_9)
        .ok_or(ReconcileError::MissingMergeKey(WARSAW_WEST_PLATFORM_9))?;
    let base = report
        .get_mut(WARSAW_WEST)
        .ok_or(ReconcileError::MissingMergeKey(WARSAW_WEST))?;
    base.retain(|entry| entry.platform() != "9");
    base.extend(peron_9);
    Ok(())
}

/// Builds the report and applies the Warszawa Zachodnia repair.
pub fn reconcile(
    plk_platforms: &[PlkPlatform],
    osm_platforms: &[OsmPlatform],
    stations: &FxHashMap<String, OsmStation>,
) -> Result<(Report, ReconcileStats)> {
    let (mut report, stats) = build_report(plk_platforms, osm_platforms, stations);
    fix_warsaw_west(&mut report)?;
    Ok((report, stats))
}

// ------------------------------------------------------------------------------------------------
// --- Helper Functions
// ------------------------------------------------------------------------------------------------

fn group_by_station<'a, T>(
    items: &'a [T],
    station: impl Fn(&'a T) -> &'a str,
) -> FxHashMap<&'a str, Vec<&'a T>> {
    let mut groups: FxHashMap<&str, Vec<&T>> = FxHashMap::default();
    for item in items {
        groups.entry(station(item)).or_default().push(item);
    }
    groups
}
