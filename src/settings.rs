use bevy::prelude::*;
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::{fs, path::Path};

const SETTINGS_PATH: &str = "portraits.ron";

/// What happens when a second swap is scheduled before the first was consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingSwapPolicy {
    /// The newer dialogue wins and the older pending swap is abandoned.
    #[default]
    Overwrite,
    /// The pending swap stays and the newer one is abandoned.
    KeepFirst,
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortraitSettings {
    pub question_portraits: bool,
    pub pending_swap_policy: PendingSwapPolicy,
    pub log_conversions: bool,
    pub propagate_string_tables: bool,
    /// Asset path prefixes of string tables to rewrite. Empty means every table.
    pub string_table_prefixes: Vec<String>,
}

impl Default for PortraitSettings {
    fn default() -> Self {
        Self {
            question_portraits: true,
            pending_swap_policy: PendingSwapPolicy::Overwrite,
            log_conversions: true,
            propagate_string_tables: true,
            string_table_prefixes: Vec::new(),
        }
    }
}

impl PortraitSettings {
    pub fn wants_string_table(&self, path: &str) -> bool {
        self.propagate_string_tables
            && (self.string_table_prefixes.is_empty()
                || self
                    .string_table_prefixes
                    .iter()
                    .any(|prefix| path.starts_with(prefix.as_str())))
    }
}

pub(crate) fn load_settings() -> PortraitSettings {
    load_persisted_settings().unwrap_or_else(|error| {
        warn!("{error}");
        PortraitSettings::default()
    })
}

fn load_persisted_settings() -> Result<PortraitSettings, String> {
    let Some(content) = read_settings_source()? else {
        return Ok(PortraitSettings::default());
    };
    parse_settings(&content)
}

fn parse_settings(content: &str) -> Result<PortraitSettings, String> {
    ron::from_str::<PortraitSettings>(content)
        .map_err(|error| format!("failed to parse '{SETTINGS_PATH}' as portrait settings RON: {error}"))
}

#[cfg(not(target_arch = "wasm32"))]
fn read_settings_source() -> Result<Option<String>, String> {
    let path = Path::new(SETTINGS_PATH);
    if !path.exists() {
        return Ok(None);
    }

    fs::read_to_string(path)
        .map(Some)
        .map_err(|error| format!("failed to read '{}': {}", path.display(), error))
}

#[cfg(target_arch = "wasm32")]
fn read_settings_source() -> Result<Option<String>, String> {
    Ok(None)
}
