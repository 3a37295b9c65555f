//! Sort settings, loadable from TOML
//!
//! ```toml
//! ordering = "quantity"
//! merge_first = true
//! record_actions = false
//!
//! [player_sort_range]
//! start = 9
//! end = 36
//! ```

use crate::ordering::OrderingKey;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use void_inventory::{SlotRange, PLAYER_SLOT_COUNT};

/// Settings errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// User-facing sort settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortSettings {
    /// Ordering applied by a plain sort request
    pub ordering: OrderingKey,
    /// Consolidate same-item stacks before ordering
    pub merge_first: bool,
    /// Keep a journal of primitive actions in reports
    pub record_actions: bool,
    /// Player slots to sort instead of the main grid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_sort_range: Option<SlotRange>,
}

impl Default for SortSettings {
    fn default() -> Self {
        Self {
            ordering: OrderingKey::default(),
            merge_first: true,
            record_actions: false,
            player_sort_range: None,
        }
    }
}

impl SortSettings {
    /// Parse and validate settings from TOML
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let settings = Self::from_toml_str(&std::fs::read_to_string(path)?)?;
        log::debug!("loaded sort settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Check the player range lies inside the player layout
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(range) = self.player_sort_range {
            if range.start >= range.end {
                return Err(ConfigError::Invalid(format!(
                    "player_sort_range {}..{} is empty",
                    range.start, range.end
                )));
            }
            if range.end > PLAYER_SLOT_COUNT {
                return Err(ConfigError::Invalid(format!(
                    "player_sort_range {}..{} exceeds the {} player slots",
                    range.start, range.end, PLAYER_SLOT_COUNT
                )));
            }
        }
        Ok(())
    }

    pub fn with_ordering(mut self, ordering: OrderingKey) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_merge_first(mut self, merge_first: bool) -> Self {
        self.merge_first = merge_first;
        self
    }

    pub fn with_recording(mut self, record_actions: bool) -> Self {
        self.record_actions = record_actions;
        self
    }

    pub fn with_player_sort_range(mut self, range: SlotRange) -> Self {
        self.player_sort_range = Some(range);
        self
    }
}
