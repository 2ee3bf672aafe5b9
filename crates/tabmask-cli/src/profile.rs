use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tabmask_core::RuleSet;
use tabmask_mask::{BlankSampling, Locale, MaskOptions, OnColumnError};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("cannot read profile: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML profile: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON profile: {0}")]
    Json(#[from] serde_json::Error),
}

/// Masking profile: run options plus one rule per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MaskProfile {
    #[serde(default = "default_keep_mapping")]
    pub keep_mapping: bool,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub blank_sampling: BlankSampling,
    #[serde(default)]
    pub on_error: OnColumnError,
    #[serde(default)]
    pub columns: RuleSet,
}

fn default_keep_mapping() -> bool {
    true
}

/// Command-line values that take precedence over the profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileOverrides {
    pub no_keep_mapping: bool,
    pub seed: Option<u64>,
    pub on_error: Option<OnColumnError>,
}

impl MaskProfile {
    /// Load a profile; `.json` files are JSON, everything else TOML.
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(toml::from_str(&content)?)
        }
    }

    pub fn options(&self, overrides: ProfileOverrides) -> MaskOptions {
        MaskOptions {
            keep_mapping: self.keep_mapping && !overrides.no_keep_mapping,
            seed: overrides.seed.or(self.seed),
            locale: self.locale,
            blank_sampling: self.blank_sampling,
            on_error: overrides.on_error.unwrap_or(self.on_error),
        }
    }
}

pub fn profile_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(MaskProfile)
}
