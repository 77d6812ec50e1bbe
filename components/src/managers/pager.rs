// Pager Manager
// YAML configuration for the paged container

use std::time::Duration;

use serde::Deserialize;

use crate::core::{DEFAULT_ANIMATION_DURATION, DEFAULT_DECELERATION_DURATION};
use crate::elements::paged_container::{PagedContainer, PagerConfig};

/// Pager configuration from YAML (durations in milliseconds)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PagerConfigYaml {
    #[serde(default = "default_animation_ms")]
    pub animation_ms: u64,
    #[serde(default = "default_deceleration_ms")]
    pub deceleration_ms: u64,
}

fn default_animation_ms() -> u64 {
    DEFAULT_ANIMATION_DURATION.as_millis() as u64
}

fn default_deceleration_ms() -> u64 {
    DEFAULT_DECELERATION_DURATION.as_millis() as u64
}

impl Default for PagerConfigYaml {
    fn default() -> Self {
        Self {
            animation_ms: default_animation_ms(),
            deceleration_ms: default_deceleration_ms(),
        }
    }
}

/// Convert YAML pager configuration to widget configuration
pub fn convert_pager_config(config: &PagerConfigYaml) -> PagerConfig {
    PagerConfig {
        animation_duration: Duration::from_millis(config.animation_ms),
        deceleration_duration: Duration::from_millis(config.deceleration_ms),
    }
}

pub fn create_pager_from_config(config: &PagerConfigYaml) -> PagedContainer {
    PagedContainer::new(convert_pager_config(config))
}
