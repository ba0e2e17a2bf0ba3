//! Layout Profiles - Named, Versioned Barcode Settings

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::layout::LayoutConfig;
use crate::print::CmykColor;

pub type ProfileId = String;

/// Identifier of the profile that ships with the engine.
pub const DEFAULT_PROFILE_ID: &str = "ean13-standard";

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Failed to read profiles: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid profile {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutProfile {
    pub id: ProfileId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub profile_version: String,
    pub engine_min_version: String,
    /// Font the human-readable digits are set in
    #[serde(default = "default_font_name")]
    pub font_name: String,
    #[serde(default)]
    pub bar_color: CmykColor,
    #[serde(default)]
    pub layout: LayoutConfig,
}

fn default_font_name() -> String { "MyriadPro-Regular".to_string() }

impl Default for LayoutProfile {
    fn default() -> Self {
        Self {
            id: DEFAULT_PROFILE_ID.to_string(),
            name: "EAN-13 Standard".to_string(),
            description: "Production artwork settings: K100 bars, Myriad Pro digits".to_string(),
            profile_version: "1.0.0".to_string(),
            engine_min_version: crate::MIN_ENGINE_VERSION.to_string(),
            font_name: default_font_name(),
            bar_color: CmykColor::registration_black(),
            layout: LayoutConfig::default(),
        }
    }
}

/// Profile registry - loads and caches profiles
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: BTreeMap<ProfileId, LayoutProfile>,
}

impl ProfileRegistry {
    /// Empty registry, without the built-in profile.
    pub fn new() -> Self {
        Self { profiles: BTreeMap::new() }
    }

    /// Built-in profile plus every `*.json` profile in `dir`.
    ///
    /// A missing directory is not an error. A file that exists but does
    /// not parse is, so a typo never silently falls back to defaults.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ProfileError> {
        let mut registry = Self::default();
        if !dir.exists() {
            return Ok(registry);
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "json") {
                let content = fs::read_to_string(&path)?;
                let profile = serde_json::from_str::<LayoutProfile>(&content).map_err(|source| {
                    ProfileError::Parse { path: path.display().to_string(), source }
                })?;
                tracing::debug!(profile = %profile.id, path = %path.display(), "loaded layout profile");
                registry.register(profile);
            }
        }
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&LayoutProfile> {
        self.profiles.get(id)
    }

    pub fn list(&self) -> Vec<&LayoutProfile> {
        self.profiles.values().collect()
    }

    pub fn register(&mut self, profile: LayoutProfile) {
        self.profiles.insert(profile.id.clone(), profile);
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(LayoutProfile::default());
        registry
    }
}
