use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use xmin_core::model::poi::CategoryRuleSet;
use xmin_core::model::roi::ModeSpeeds;
use xmin_osm::model::ingest::RetryPolicy;
use xmin_osm::model::overpass::QueryBounds;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failure reading {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("failure decoding {0}: {1}")]
    DecodeError(String, String),
    #[error("unsupported configuration file type: {0}")]
    UnsupportedFileType(String),
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        ServerSection {
            host: String::from("0.0.0.0"),
            port: 8000,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DataSection {
    /// population grid table (one row per cell, planar centroids)
    pub grid_csv: String,
    pub grid_delimiter: char,
    /// district polygons as a GeoJSON feature collection
    pub districts_geojson: String,
    pub cell_size_meters: f64,
}

impl Default for DataSection {
    fn default() -> Self {
        DataSection {
            grid_csv: String::from("data/population_grid.csv"),
            grid_delimiter: ';',
            districts_geojson: String::from("data/districts.geojson"),
            cell_size_meters: 100.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OverpassSection {
    pub url: String,
    /// client-side request timeout
    pub timeout_seconds: u64,
    /// server-side timeout written into the query prologue
    pub query_timeout_seconds: u64,
    /// pause between category fetches during warm-up
    pub cooldown_seconds: u64,
    pub retry: RetryPolicy,
}

impl Default for OverpassSection {
    fn default() -> Self {
        OverpassSection {
            url: String::from("https://overpass-api.de/api/interpreter"),
            timeout_seconds: 120,
            query_timeout_seconds: 60,
            cooldown_seconds: 5,
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RoutingSection {
    pub url: String,
    pub timeout_seconds: u64,
    /// departure time sent with every matrix request
    pub departure: NaiveDateTime,
}

impl Default for RoutingSection {
    fn default() -> Self {
        RoutingSection {
            url: String::from("http://localhost:8080"),
            timeout_seconds: 120,
            departure: chrono::NaiveDate::from_ymd_opt(2026, 1, 1)
                .and_then(|d| d.and_hms_opt(8, 0, 0))
                .unwrap_or(NaiveDateTime::UNIX_EPOCH),
        }
    }
}

/// full application configuration, decodable from TOML or JSON by file
/// extension. every section has a default so a partial file is enough.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AppConfiguration {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub data: DataSection,
    #[serde(default = "default_city_bounds")]
    pub city_bounds: QueryBounds,
    #[serde(default)]
    pub overpass: OverpassSection,
    #[serde(default)]
    pub routing: RoutingSection,
    #[serde(default)]
    pub speeds: ModeSpeeds,
    #[serde(default)]
    pub category_rules: CategoryRuleSet,
}

/// study area the POI cache is warmed for (south, west, north, east).
fn default_city_bounds() -> QueryBounds {
    QueryBounds {
        south: 51.0679,
        west: 6.9357,
        north: 51.3221,
        east: 7.4343,
    }
}

impl Default for AppConfiguration {
    fn default() -> Self {
        AppConfiguration {
            server: Default::default(),
            data: Default::default(),
            city_bounds: default_city_bounds(),
            overpass: Default::default(),
            routing: Default::default(),
            speeds: Default::default(),
            category_rules: Default::default(),
        }
    }
}

impl TryFrom<&String> for AppConfiguration {
    type Error = ConfigError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        if f.ends_with(".toml") {
            let s = std::fs::read_to_string(f)
                .map_err(|e| ConfigError::ReadError(f.clone(), e))?;
            toml::from_str(&s).map_err(|e| ConfigError::DecodeError(f.clone(), e.to_string()))
        } else if f.ends_with(".json") {
            let s = std::fs::read_to_string(f)
                .map_err(|e| ConfigError::ReadError(f.clone(), e))?;
            serde_json::from_str(&s)
                .map_err(|e| ConfigError::DecodeError(f.clone(), e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFileType(f.clone()))
        }
    }
}
