//! Overpass API client for the platform and station node collections.
//!
//! Each fetch is backed by its own cache file: the file is reused while its
//! last-modified time is less than an hour old, otherwise the query is sent
//! again and the raw response body is persisted verbatim. Mapping the raw
//! elements into crate models is the caller's job.

use std::{
    fs,
    path::Path,
    time::{Duration, SystemTime},
};

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::Result;

const OVERPASS_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

pub const PLATFORMS_CACHE: &str = "platforms-osm.json";
pub const STATIONS_CACHE: &str = "stations-osm.json";

const CACHE_MAX_AGE: Duration = Duration::from_secs(3600);

// Stop-position nodes in Poland (area 3600049715), excluding the WKD network,
// enriched with a `_track_ref` tag collected from the adjacent track ways.
const PLATFORMS_QUERY: &str = r#"
[out:json];

area(id:3600049715)->.searchArea; // Poland

node["railway"="stop"]["network"!="WKD"]["operator"!="WKD"](area.searchArea);
foreach {
way(bn)[railway] -> .ways;
if (ways.count(ways) > 0) {
    convert result
            ::id = id(),
            ::geom = center(geom()),
            _track_ref = ways.u(t["railway:track_ref"]),
            :: = ::;
(._;>;);
out geom;
}
}
"#;

// Station and halt nodes in Poland, including disused ones.
const STATIONS_QUERY: &str = r#"
[out:json];
area(id:3600049715)->.searchArea; // Poland
(
  node["railway"="station"](area.searchArea);
  node["railway"="halt"](area.searchArea);
  node["disused:railway"="station"](area.searchArea);
  node["disused:railway"="halt"](area.searchArea);
);
out geom;
"#;

// ------------------------------------------------------------------------------------------------
// --- Element
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<Element>,
}

/// A raw node from an Overpass response. Plain nodes carry `lat`/`lon`;
/// `convert` results carry a point geometry instead.
#[derive(Clone, Debug, Deserialize)]
pub struct Element {
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    tags: FxHashMap<String, String>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Clone, Debug, Deserialize)]
struct Geometry {
    coordinates: (f64, f64), // (lon, lat)
}

impl Element {
    /// Tag value, or the empty string when the tag is absent.
    pub fn tag(&self, key: &str) -> &str {
        self.tags.get(key).map_or("", String::as_str)
    }

    /// Node coordinate as (lat, lon).
    pub fn point(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.lon?))
    }

    /// Converted centroid as (lon, lat).
    pub fn centroid(&self) -> Option<(f64, f64)> {
        self.geometry.as_ref().map(|geometry| geometry.coordinates)
    }
}

// ------------------------------------------------------------------------------------------------
// --- Fetching
// ------------------------------------------------------------------------------------------------

pub async fn fetch_platforms() -> Result<Vec<Element>> {
    fetch_with_cache(Path::new(PLATFORMS_CACHE), PLATFORMS_QUERY).await
}

pub async fn fetch_stations() -> Result<Vec<Element>> {
    fetch_with_cache(Path::new(STATIONS_CACHE), STATIONS_QUERY).await
}

fn cache_is_fresh(path: &Path) -> bool {
    let Ok(modified) = fs::metadata(path).and_then(|metadata| metadata.modified()) else {
        return false;
    };
    match SystemTime::now().duration_since(modified) {
        Ok(age) => age < CACHE_MAX_AGE,
        // A modification time in the future counts as fresh.
        Err(_) => true,
    }
}

async fn fetch_with_cache(cache_file: &Path, query: &str) -> Result<Vec<Element>> {
    if cache_is_fresh(cache_file) {
        log::info!("Loading OSM data from cache: {}", cache_file.display());
        let raw = fs::read_to_string(cache_file)?;
        let response: OverpassResponse = serde_json::from_str(&raw)?;
        return Ok(response.elements);
    }

    log::info!(
        "Fetching OSM data from the Overpass API for {}",
        cache_file.display()
    );
    let client = reqwest::Client::new();
    let raw = client
        .post(OVERPASS_ENDPOINT)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(format!("data={query}"))
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    fs::write(cache_file, &raw)?;

    let response: OverpassResponse = serde_json::from_str(&raw)?;
    Ok(response.elements)
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use super::*;
    use pretty_assertions::assert_eq;
    use test_log::test;

    const RESPONSE_FIXTURE: &str = r#"
        {
            "version": 0.6,
            "elements": [
                {
                    "type": "result",
                    "id": 4257544903,
                    "geometry": {"type": "Point", "coordinates": [21.0013, 52.1985]},
                    "tags": {"name": "Warszawa Gdańska", "railway": "stop", "_track_ref": "3"}
                },
                {
                    "type": "node",
                    "id": 30066707,
                    "lat": 52.2287,
                    "lon": 21.0031,
                    "tags": {"name": "Warszawa Gdańska", "railway": "station"}
                }
            ]
        }"#;

    fn scratch_file(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("perony-{}-{name}", std::process::id()))
    }

    #[test]
    fn decodes_converted_and_plain_nodes() {
        let response: OverpassResponse = serde_json::from_str(RESPONSE_FIXTURE).unwrap();
        assert_eq!(2, response.elements.len());

        let platform = &response.elements[0];
        assert_eq!("Warszawa Gdańska", platform.tag("name"));
        assert_eq!("3", platform.tag("_track_ref"));
        assert_eq!(Some((21.0013, 52.1985)), platform.centroid());
        assert_eq!(None, platform.point());

        let station = &response.elements[1];
        assert_eq!(Some((52.2287, 21.0031)), station.point());
        assert_eq!(None, station.centroid());
        assert_eq!("", station.tag("_track_ref"));
    }

    #[test]
    fn missing_cache_is_not_fresh() {
        assert!(!cache_is_fresh(Path::new("does-not-exist.json")));
    }

    #[test]
    fn recently_written_cache_is_fresh() {
        let path = scratch_file("fresh.json");
        fs::write(&path, "{}").unwrap();
        assert!(cache_is_fresh(&path));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn old_cache_is_stale() {
        let path = scratch_file("stale.json");
        fs::write(&path, "{}").unwrap();
        let stale = SystemTime::now() - (CACHE_MAX_AGE + Duration::from_secs(60));
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_times(fs::FileTimes::new().set_modified(stale))
            .unwrap();
        assert!(!cache_is_fresh(&path));
        fs::remove_file(&path).unwrap();
    }

    #[test(tokio::test)]
    async fn fresh_cache_is_served_without_a_request() {
        let path = scratch_file("cached.json");
        fs::write(&path, RESPONSE_FIXTURE).unwrap();
        // The query is junk: a hit on the network would fail loudly.
        let elements = fetch_with_cache(&path, "not a query").await.unwrap();
        assert_eq!(2, elements.len());
        fs::remove_file(&path).unwrap();
    }
}
