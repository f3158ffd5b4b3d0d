//! Report serialization and console presentation of the run's findings.

use std::{
    fs::File,
    io::{BufWriter, Write},
};

use crate::{
    error::Result,
    reconcile::{CoverageStats, ReconcileStats, Report},
};

pub const REPORT_FILE: &str = "platforms-report.json";

pub fn dump_report(report: &Report, path: &str) -> Result<()> {
    log::info!("Writing {path}...");
    let file = File::create(path)?;
    write_report(report, BufWriter::new(file))
}

fn write_report<W: Write>(report: &Report, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

pub fn print_coverage(stats: &CoverageStats) {
    for mismatch in &stats.mismatches {
        println!(
            "Station: {} (PLK: {}, OSM: {}) - {}",
            mismatch.station_name, mismatch.plk_count, mismatch.osm_count, mismatch.bucket
        );
    }
    for station in &stats.duplicate_track_stations {
        println!("Station: {station} lists several platforms on the same track");
    }

    println!();
    println!(
        "Stations with no platforms in OSM: {}",
        stats.stations_with_no_platforms
    );
    println!(
        "Stations with missing platforms: {}",
        stats.stations_with_missing_platforms
    );
    println!(
        "Stations with more platforms in OSM than PLK: {}",
        stats.stations_with_more_platforms
    );
    println!(
        "Single-platform stations with no OSM coverage: {}",
        stats.single_platform_stations_with_no_coverage
    );
}

pub fn print_stats(stats: &ReconcileStats) {
    println!("Stats");
    println!("PLK has {} platforms", stats.total_platforms);
    println!("OSM has {} platforms", stats.osm_platforms);
    if stats.total_platforms > 0 {
        let gap = stats.total_platforms as i64 - stats.osm_platforms as i64;
        println!(
            "OSM is missing {} platforms, which is {:.2}% of PLK platforms",
            gap,
            100.0 * gap as f64 / stats.total_platforms as f64
        );
    }
    println!("Platforms without a track match: {}", stats.missing_platforms);
    println!(
        "Platforms without even a station node: {}",
        stats.missing_stations
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use crate::models::ReportPlatform;
    use serde_json::json;

    #[test]
    fn persisted_shape_omits_the_global_id() {
        let mut report = Report::new();
        report.insert(
            "krakow-glowny".to_string(),
            vec![ReportPlatform::new(
                "Kraków Główny".to_string(),
                "PLK".to_string(),
                "2".to_string(),
                "4".to_string(),
                Some((19.9475, 50.0683)),
                true,
                false,
                "2_4".to_string(),
            )],
        );
        report.insert(
            "teresin".to_string(),
            vec![ReportPlatform::new(
                "Teresin".to_string(),
                "PLK".to_string(),
                "1".to_string(),
                "4".to_string(),
                None,
                false,
                true,
                "1_4".to_string(),
            )],
        );

        let mut buffer = Vec::new();
        write_report(&report, &mut buffer).unwrap();
        let written: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_json_eq!(
            written,
            json!({
                "krakow-glowny": [{
                    "station_name": "Kraków Główny",
                    "operator": "PLK",
                    "platform": "2",
                    "track": "4",
                    "location": [19.9475, 50.0683],
                    "exact_location": true,
                    "single_track_platform": false
                }],
                "teresin": [{
                    "station_name": "Teresin",
                    "operator": "PLK",
                    "platform": "1",
                    "track": "4",
                    "location": null,
                    "exact_location": false,
                    "single_track_platform": true
                }]
            })
        );
    }
}
