//! # Navigation Settings
//!
//! Tunables for the navigation core with a clear override hierarchy:
//! defaults → TOML file → env vars. Embedders that don't want file config
//! can use `NavSettings::default()` and set fields directly.
//!
//! All file fields are `Option<T>` so a sparse TOML only overrides what it
//! names.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::scene::Rgba;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StrataConfig {
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub mask: MaskConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NavigationConfig {
    /// Milliseconds before a stalled animation or instantiation is abandoned.
    /// `0` disables the timeout entirely (unbounded waits).
    pub transition_timeout_ms: Option<u64>,
    pub page_cache_capacity: Option<usize>,
    pub popup_cache_capacity: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MaskConfig {
    /// RGBA fill for the modal mask, components in 0.0..=1.0.
    pub color: Option<[f32; 4]>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_TRANSITION_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_PAGE_CACHE_CAPACITY: usize = 8;
pub const DEFAULT_POPUP_CACHE_CAPACITY: usize = 8;
pub const DEFAULT_MASK_COLOR: Rgba = [0.0, 0.0, 0.0, 0.6];

// ============================================================================
// Resolved Settings (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct NavSettings {
    /// `None` = wait forever on animations and instantiation.
    pub transition_timeout: Option<Duration>,
    pub page_cache_capacity: usize,
    pub popup_cache_capacity: usize,
    pub mask_color: Rgba,
}

impl Default for NavSettings {
    fn default() -> Self {
        Self {
            transition_timeout: Some(Duration::from_millis(DEFAULT_TRANSITION_TIMEOUT_MS)),
            page_cache_capacity: DEFAULT_PAGE_CACHE_CAPACITY,
            popup_cache_capacity: DEFAULT_POPUP_CACHE_CAPACITY,
            mask_color: DEFAULT_MASK_COLOR,
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading & Resolution
// ============================================================================

/// Load a `StrataConfig` from a TOML file. A missing file is not an error —
/// it resolves to all-defaults, same as an empty TOML.
pub fn load_from(path: &Path) -> Result<StrataConfig, ConfigError> {
    if !path.exists() {
        info!("no strata config at {}, using defaults", path.display());
        return Ok(StrataConfig::default());
    }
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: StrataConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("loaded strata config from {}", path.display());
    debug!("config: {config:?}");
    Ok(config)
}

/// Collapse defaults → file → env vars into concrete settings.
///
/// Env overrides: `STRATA_TRANSITION_TIMEOUT_MS`,
/// `STRATA_PAGE_CACHE_CAPACITY`, `STRATA_POPUP_CACHE_CAPACITY`.
pub fn resolve(config: &StrataConfig) -> NavSettings {
    resolve_with(config, |var| std::env::var(var).ok())
}

/// Same as [`resolve`] with the env lookup injected, so precedence is
/// testable without mutating process state.
fn resolve_with(config: &StrataConfig, env: impl Fn(&str) -> Option<String>) -> NavSettings {
    let timeout_ms = env_parse::<u64>(&env, "STRATA_TRANSITION_TIMEOUT_MS")
        .or(config.navigation.transition_timeout_ms)
        .unwrap_or(DEFAULT_TRANSITION_TIMEOUT_MS);

    NavSettings {
        transition_timeout: match timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        },
        page_cache_capacity: env_parse(&env, "STRATA_PAGE_CACHE_CAPACITY")
            .or(config.navigation.page_cache_capacity)
            .unwrap_or(DEFAULT_PAGE_CACHE_CAPACITY),
        popup_cache_capacity: env_parse(&env, "STRATA_POPUP_CACHE_CAPACITY")
            .or(config.navigation.popup_cache_capacity)
            .unwrap_or(DEFAULT_POPUP_CACHE_CAPACITY),
        mask_color: config.mask.color.unwrap_or(DEFAULT_MASK_COLOR),
    }
}

/// An env value that fails to parse is ignored, falling through to the
/// file value or default.
fn env_parse<T: std::str::FromStr>(env: &impl Fn(&str) -> Option<String>, var: &str) -> Option<T> {
    env(var).and_then(|v| v.parse().ok())
}
