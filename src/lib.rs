#![doc = include_str!("../README.md")]
mod error;
mod models;
mod osm;
mod parsing;
mod patches;
mod reconcile;
mod report;
mod slug;

pub use error::{ReconcileError, Result};
pub use models::*;
pub use osm::{Element, fetch_platforms, fetch_stations};
pub use parsing::error::ParsingError;
pub use parsing::{DEFAULT_OPERATOR, OTHERS_FILE, PLK_FILE, load_platforms};
pub use reconcile::{
    CoverageBucket, CoverageStats, ReconcileStats, Report, StationMismatch, build_report, compare,
    fix_warsaw_west, match_platform, normalize_track, reconcile,
};
pub use report::{REPORT_FILE, dump_report, print_coverage, print_stats};
pub use slug::slug;
