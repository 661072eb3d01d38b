//! Configuration loading and defaults.

use crate::model::{Scenario, Zone};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum size in bytes for a catalog file.
pub const MAX_CATALOG_FILE_BYTES: usize = 4 * 1024 * 1024;

/// Maximum number of weapons accepted from one catalog (bound input size).
pub const MAX_CATALOG_WEAPONS: usize = 10_000;

/// Default DPS window in seconds.
pub const DEFAULT_DURATION_SECS: f64 = 10.0;

/// Default share of pellets assumed to hit, in percent.
pub const DEFAULT_PELLET_HIT_PERCENT: f64 = 100.0;

/// Settings file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "weapon-ranker.toml";

/// Contents of `weapon-ranker.toml`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Catalog file (`.js`, `.json` or `.toml`).
    pub catalog: Option<PathBuf>,
    #[serde(default)]
    pub scenario: ScenarioSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioSettings {
    #[serde(default = "default_duration_secs")]
    pub duration_secs: f64,
    #[serde(default)]
    pub zone: Zone,
    #[serde(default = "default_pellet_hit_percent")]
    pub pellet_hit_percent: f64,
}

fn default_duration_secs() -> f64 {
    DEFAULT_DURATION_SECS
}

fn default_pellet_hit_percent() -> f64 {
    DEFAULT_PELLET_HIT_PERCENT
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            zone: Zone::None,
            pellet_hit_percent: DEFAULT_PELLET_HIT_PERCENT,
        }
    }
}

impl ScenarioSettings {
    /// Apply per-invocation overrides and sanitize the result.
    pub fn resolve(
        &self,
        duration_secs: Option<f64>,
        zone: Option<Zone>,
        pellet_hit_percent: Option<f64>,
    ) -> Scenario {
        Scenario::sanitized(
            duration_secs.unwrap_or(self.duration_secs),
            zone.unwrap_or(self.zone),
            pellet_hit_percent.unwrap_or(self.pellet_hit_percent),
        )
    }
}

impl Settings {
    pub fn from_toml_str(s: &str) -> Result<Self, String> {
        toml::from_str(s).map_err(|e| e.to_string())
    }

    /// Load settings from `path`, or from [`DEFAULT_CONFIG_FILE`] if it exists.
    /// A missing default file yields default settings; a missing explicit file is an error.
    /// A relative `catalog` is taken relative to the settings file's directory.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !explicit && !path.is_file() {
            return Ok(Self::default());
        }
        let s = fs::read_to_string(&path)
            .map_err(|e| format!("cannot read config {}: {}", path.display(), e))?;
        let mut settings = Self::from_toml_str(&s)?;
        if let (Some(catalog), Some(dir)) = (&settings.catalog, path.parent()) {
            if catalog.is_relative() {
                settings.catalog = Some(dir.join(catalog));
            }
        }
        tracing::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let s = Settings::from_toml_str("").unwrap();
        assert!(s.catalog.is_none());
        assert_eq!(s.scenario.duration_secs, DEFAULT_DURATION_SECS);
        assert_eq!(s.scenario.zone, Zone::None);
        assert_eq!(s.scenario.pellet_hit_percent, DEFAULT_PELLET_HIT_PERCENT);
    }

    #[test]
    fn scenario_table_and_overrides() {
        let s = Settings::from_toml_str(
            r#"
            catalog = "data/weapons.json"
            [scenario]
            duration_secs = 20
            zone = "head"
            "#,
        )
        .unwrap();
        assert_eq!(s.catalog, Some(PathBuf::from("data/weapons.json")));
        let sc = s.scenario.resolve(None, None, Some(50.0));
        assert_eq!(sc.duration_secs, 20.0);
        assert_eq!(sc.zone, Zone::Head);
        assert_eq!(sc.pellet_hit_percent, 50.0);
        let sc = s.scenario.resolve(Some(5.0), Some(Zone::Limb), None);
        assert_eq!(sc.duration_secs, 5.0);
        assert_eq!(sc.zone, Zone::Limb);
    }

    #[test]
    fn relative_catalog_follows_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "catalog = \"data/weapons.json\"\n").unwrap();
        let s = Settings::load(Some(&path)).unwrap();
        assert_eq!(s.catalog, Some(dir.path().join("data/weapons.json")));

        let abs = dir.path().join("elsewhere.js");
        fs::write(&path, format!("catalog = {:?}\n", abs.to_str().unwrap())).unwrap();
        let s = Settings::load(Some(&path)).unwrap();
        assert_eq!(s.catalog, Some(abs));
    }

    #[test]
    fn bad_zone_is_rejected() {
        assert!(Settings::from_toml_str("[scenario]\nzone = \"elbow\"").is_err());
    }
}
