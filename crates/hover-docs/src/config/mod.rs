//! Settings, one file per category. [`DocSettings`] aggregates them and
//! merges JSON or TOML payloads over the defaults.
//!
//! A payload may nest the categories (`{"display": {...}}`), use the flat
//! option names at the top level (`{"showOnHover": false}`), or put either
//! form under the [`SETTINGS_SECTION_KEY`] key. Unknown keys are ignored and
//! a category that fails to parse leaves the previous values in place.

pub(crate) mod display;
pub(crate) mod extraction;
pub(crate) mod logging;

use std::path::{Path, PathBuf};

pub use display::{DisplaySettings, DisplayStyle};
use display::DisplaySettingsPatch;
use extraction::ExtractionSettingsPatch;
pub use extraction::{
    DocstringDelimiters, ExtractionSettings, MAX_FULL_LOAD_THRESHOLD_KB, MAX_TAB_WIDTH, MAX_WINDOW_RADIUS,
    MIN_FULL_LOAD_THRESHOLD_KB, MIN_TAB_WIDTH, MIN_WINDOW_RADIUS,
};
use logging::LoggingSettingsPatch;
pub use logging::{LogLevel, LoggingSettings};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub const SETTINGS_SECTION_KEY: &str = "hover-docs";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML settings: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocSettings {
    pub display: DisplaySettings,
    pub extraction: ExtractionSettings,
    pub logging: LoggingSettings,
}

impl DocSettings {
    pub fn from_payload(payload: Option<&Value>) -> Self {
        let mut settings = Self::default();
        if let Some(payload) = payload {
            settings = settings.merged_with_payload(payload);
        }
        settings
    }

    pub fn merged_with_payload(
        &self,
        payload: &Value,
    ) -> Self {
        let mut merged = self.clone();

        for scope in payload_candidates(payload) {
            merged.apply_flat(&scope);
            if let Some(patch) = category_patch::<DisplaySettingsPatch>(&scope, "display") {
                merged.display.apply_patch(patch);
            }
            if let Some(patch) = category_patch::<ExtractionSettingsPatch>(&scope, "extraction") {
                merged.extraction.apply_patch(patch);
            }
            if let Some(patch) = category_patch::<LoggingSettingsPatch>(&scope, "logging") {
                merged.logging.apply_patch(patch);
            }
        }

        merged.normalize();
        merged
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let table: toml::Value = toml::from_str(source)?;
        let payload = serde_json::to_value(table)?;
        Ok(Self::from_payload(Some(&payload)))
    }

    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let payload: Value = serde_json::from_str(source)?;
        Ok(Self::from_payload(Some(&payload)))
    }

    /// Settings file by extension: `.json` is JSON, anything else TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&source)
        } else {
            Self::from_toml_str(&source)
        }
    }

    /// Flat option names at the top of `scope`.
    fn apply_flat(
        &mut self,
        scope: &Value,
    ) {
        if let Ok(patch) = serde_json::from_value::<DisplaySettingsPatch>(scope.clone()) {
            self.display.apply_patch(patch);
        }
        if let Ok(patch) = serde_json::from_value::<ExtractionSettingsPatch>(scope.clone()) {
            self.extraction.apply_patch(patch);
        }
        if let Ok(patch) = serde_json::from_value::<LoggingSettingsPatch>(scope.clone()) {
            self.logging.apply_patch(patch);
        }
    }

    fn normalize(&mut self) {
        self.extraction.normalize();
    }
}

fn category_patch<T: DeserializeOwned>(
    scope: &Value,
    key: &str,
) -> Option<T> {
    let value = scope.get(key)?;
    serde_json::from_value(value.clone()).ok()
}

fn payload_candidates(payload: &Value) -> Vec<Value> {
    let mut candidates = Vec::new();
    candidates.push(payload.clone());
    if let Some(scoped) = payload.get(SETTINGS_SECTION_KEY) {
        candidates.push(scoped.clone());
    }
    candidates
}

#[cfg(test)]
#[path = "../../tests/src/config/settings_tests.rs"]
mod tests;
