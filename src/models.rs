use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::osm::Element;

// ------------------------------------------------------------------------------------------------
// --- PlkPlatform
// ------------------------------------------------------------------------------------------------

/// One platform edge as listed in the PKP PLK register.
///
/// The `track` field is the raw register value and may be a comma or slash
/// delimited list of tracks served by the platform.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlkPlatform {
    operator: String,
    station_name: String,
    platform: String,
    track: String,
}

impl PlkPlatform {
    pub fn new(operator: String, station_name: String, platform: String, track: String) -> Self {
        Self {
            operator,
            station_name,
            platform,
            track,
        }
    }

    // Getters/Setters

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn station_name(&self) -> &str {
        &self.station_name
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn track(&self) -> &str {
        &self.track
    }

    /// Replaces the platform label and track with corrected register values.
    pub(crate) fn set_correction(&mut self, platform: String, track: String) {
        self.platform = platform;
        self.track = track;
    }
}

// ------------------------------------------------------------------------------------------------
// --- OsmPlatform
// ------------------------------------------------------------------------------------------------

/// A stop-position node from OSM, reduced to the fields the reconciliation
/// uses. One node may stand for several physical tracks aggregated under a
/// single track-reference tag.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OsmPlatform {
    station_name: String,
    track: String,
    location: (f64, f64), // (lon, lat)
}

impl OsmPlatform {
    pub fn new(station_name: String, track: String, location: (f64, f64)) -> Self {
        Self {
            station_name,
            track,
            location,
        }
    }

    /// Reduces raw stop-position elements to platforms. Elements without a
    /// centroid carry no usable location and are skipped.
    pub fn from_elements(elements: &[Element]) -> Vec<Self> {
        elements
            .iter()
            .filter_map(|element| {
                let Some(location) = element.centroid() else {
                    log::warn!(
                        "Skipping stop-position node without a centroid: {}",
                        element.tag("name")
                    );
                    return None;
                };
                Some(Self::new(
                    element.tag("name").to_string(),
                    element.tag("_track_ref").to_string(),
                    location,
                ))
            })
            .collect()
    }

    // Getters/Setters

    pub fn station_name(&self) -> &str {
        &self.station_name
    }

    pub fn track(&self) -> &str {
        &self.track
    }

    /// (longitude, latitude)
    pub fn location(&self) -> (f64, f64) {
        self.location
    }
}

// ------------------------------------------------------------------------------------------------
// --- OsmStation
// ------------------------------------------------------------------------------------------------

/// A station or halt node from OSM. The location is stored as (lat, lon),
/// the opposite order of [`OsmPlatform`], and must be swapped when used as a
/// platform location fallback.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OsmStation {
    station_name: String,
    location: (f64, f64), // (lat, lon)
}

impl OsmStation {
    pub fn new(station_name: String, location: (f64, f64)) -> Self {
        Self {
            station_name,
            location,
        }
    }

    /// Reduces raw station/halt elements to stations. Elements without a
    /// point coordinate are skipped.
    pub fn from_elements(elements: &[Element]) -> Vec<Self> {
        elements
            .iter()
            .filter_map(|element| {
                let Some(location) = element.point() else {
                    log::warn!(
                        "Skipping station node without a coordinate: {}",
                        element.tag("name")
                    );
                    return None;
                };
                Some(Self::new(element.tag("name").to_string(), location))
            })
            .collect()
    }

    /// Builds the by-name station lookup. When OSM holds several nodes with
    /// the same name the last one wins.
    pub fn by_name(stations: Vec<Self>) -> FxHashMap<String, Self> {
        stations
            .into_iter()
            .map(|station| (station.station_name.clone(), station))
            .collect()
    }

    // Getters/Setters

    pub fn station_name(&self) -> &str {
        &self.station_name
    }

    /// (latitude, longitude)
    pub fn location(&self) -> (f64, f64) {
        self.location
    }
}

// ------------------------------------------------------------------------------------------------
// --- ReportPlatform
// ------------------------------------------------------------------------------------------------

/// One register platform resolved to a best-effort location.
///
/// `global_id` is kept in memory but not persisted; it is derived from the
/// platform label and normalized track only, so it is not unique across
/// stations.
#[derive(Clone, Debug, Serialize)]
pub struct ReportPlatform {
    station_name: String,
    operator: String,
    platform: String,
    track: String,
    location: Option<(f64, f64)>, // (lon, lat)
    exact_location: bool,
    single_track_platform: bool,
    #[serde(skip_serializing)]
    global_id: String,
}

impl ReportPlatform {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        station_name: String,
        operator: String,
        platform: String,
        track: String,
        location: Option<(f64, f64)>,
        exact_location: bool,
        single_track_platform: bool,
        global_id: String,
    ) -> Self {
        Self {
            station_name,
            operator,
            platform,
            track,
            location,
            exact_location,
            single_track_platform,
            global_id,
        }
    }

    // Getters/Setters

    pub fn station_name(&self) -> &str {
        &self.station_name
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn track(&self) -> &str {
        &self.track
    }

    pub fn location(&self) -> Option<(f64, f64)> {
        self.location
    }

    pub fn exact_location(&self) -> bool {
        self.exact_location
    }

    pub fn single_track_platform(&self) -> bool {
        self.single_track_platform
    }

    pub fn global_id(&self) -> &str {
        &self.global_id
    }
}
