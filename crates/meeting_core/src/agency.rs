use std::fs;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrapeError};
use crate::schema::{Classification, Location};

pub const START_URL: &str =
    "https://www.burleigh.gov/government/boardscommittees/planning-zoning-commission/";

/// Static facts about the agency that the page itself never states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AgencyConfig {
    /// Short identifier used as the first segment of every meeting id.
    pub slug: String,
    pub name: String,
    /// IANA zone the naive start times are expressed in.
    pub timezone: String,
    pub title: String,
    pub classification: Classification,
    pub location: Location,
    pub start_url: String,
}

impl Default for AgencyConfig {
    fn default() -> Self {
        Self {
            slug: "bisnd_bcpc".to_string(),
            name: "Burleigh County Planning Commission".to_string(),
            timezone: "America/Chicago".to_string(),
            title: "Planning & Zoning Commission Monthly Meeting".to_string(),
            classification: Classification::Commission,
            location: Location {
                name: "Tom Baker Room".to_string(),
                address: "City/County Building, 221 N 5th St, Bismarck".to_string(),
            },
            start_url: START_URL.to_string(),
        }
    }
}

impl AgencyConfig {
    /// Read an override file. `.toml` is parsed as TOML, `.yaml`/`.yml` as
    /// YAML; fields the file leaves out keep their defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let config_err = |message: String| ScrapeError::Config {
            path: path.display().to_string(),
            message,
        };

        let raw = fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("toml") => toml::from_str(&raw).map_err(|e| config_err(e.to_string())),
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&raw).map_err(|e| config_err(e.to_string()))
            }
            _ => Err(config_err(
                "unsupported config extension (expected .toml, .yaml or .yml)".to_string(),
            )),
        }
    }
}
