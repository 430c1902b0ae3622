//! Tunable defaults for sight and path finding, loaded from JSON.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::{
    error::SettingsError,
    path_find::{find_path, Connectivity, PathableMap},
    util::{Distance, Position},
    vision::FieldOfView,
    BoundedMap,
};

const DEFAULT_SIGHT_RADIUS: i32 = 8;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SightSettings {
    pub radius: i32,
}

impl Default for SightSettings {
    fn default() -> Self {
        Self {
            radius: DEFAULT_SIGHT_RADIUS,
        }
    }
}

impl SightSettings {
    /// A fresh viewer that sees `radius` tiles around itself.
    pub fn viewer(&self) -> FieldOfView {
        FieldOfView::new(self.radius)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PathSettings {
    pub connectivity: Connectivity,
    pub distance: Distance,
}

impl PathSettings {
    /// [find_path] with the configured movement and distance metric.
    pub fn find_path<T>(&self, map: &T, start: Position, dest: Position) -> Vec<Position>
    where
        T: BoundedMap + PathableMap,
    {
        find_path(map, start, dest, self.connectivity, self.distance)
    }
}

/// Settings for viewers and path finding.  Missing fields take their default values.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub sight: SightSettings,
    pub path: PathSettings,
}

impl Settings {
    /// Parse and validate settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file.
    ///
    /// A missing file yields the default settings; any other failure is returned.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();

        if !path.exists() {
            warn!("{} not found, using default settings", path.display());
            return Ok(Self::default());
        }

        let settings = Self::from_json(&fs::read_to_string(path)?)?;

        info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.sight.radius < 0 {
            return Err(SettingsError::Invalid(format!(
                "sight radius ({}) is negative",
                self.sight.radius
            )));
        }

        Ok(())
    }
}
