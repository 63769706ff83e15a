//! Configuration types and parsing.
//!
//! The schema is small and serialization-friendly. User files are merged over
//! the embedded default `config.toml`, so every field always has a value.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use toml::Table;

use crate::error::{Error, Result};
use crate::links::PlayerOption;

/// Embedded default configuration TOML, compiled into the binary.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../../config.toml");

/// File name of the persisted caption state inside the state directory.
const STATE_FILE: &str = "reelpanel/state.json";

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Path where config was found, if any.
    pub source: Option<PathBuf>,
    /// Whether defaults were used (no config file found).
    pub used_defaults: bool,
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// How external URLs are opened.
    pub navigator: NavigatorConfig,

    /// Where caption state is persisted.
    pub store: StoreConfig,

    /// External players offered for streams.
    pub players: PlayersConfig,

    /// Caption settings page behavior.
    pub captions: CaptionsConfig,
}

impl Config {
    /// Load configuration from the embedded default TOML string.
    pub fn from_default_toml() -> Result<Self> {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TOML)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, merging with embedded defaults.
    ///
    /// Returns an error if the file doesn't exist or can't be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::load_with_defaults(&content)
    }

    /// Parse both the default and the user TOML as tables, deep-merge them
    /// (user values win), then deserialize the result.
    pub fn load_with_defaults(user_toml: &str) -> Result<Self> {
        let mut base: Table = toml::from_str(DEFAULT_CONFIG_TOML)?;
        let user: Table = toml::from_str(user_toml)?;

        deep_merge_toml(&mut base, user);

        let config: Config = base.try_into()?;
        Ok(config)
    }

    /// Find and load configuration using the XDG lookup chain.
    ///
    /// An explicit path is used strictly: missing or broken files are errors.
    /// Otherwise the search paths are tried in order; a file that exists but
    /// fails to load is an error too. Only when no file exists at all are the
    /// embedded defaults used.
    pub fn find_and_load(explicit_path: Option<&Path>) -> Result<ConfigLoadResult> {
        // --config is strict: a missing or broken file never falls back
        if let Some(path) = explicit_path {
            let config = Self::load(path)?;
            return Ok(ConfigLoadResult {
                config,
                source: Some(path.to_path_buf()),
                used_defaults: false,
            });
        }

        let search_paths = Self::config_search_paths();

        // First existing file wins; later candidates are not consulted even if
        // that file turns out to be broken.
        for path in &search_paths {
            if !path.exists() {
                continue;
            }
            match Self::load(path) {
                Ok(config) => {
                    return Ok(ConfigLoadResult {
                        config,
                        source: Some(path.clone()),
                        used_defaults: false,
                    });
                }
                Err(e) => {
                    tracing::error!("Config file {:?} exists but failed to load: {}", path, e);
                    return Err(e);
                }
            }
        }

        // Nothing on disk at all
        tracing::info!("No config file found, using built-in default config");
        tracing::debug!(
            "Searched: {}",
            search_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(ConfigLoadResult {
            config: Self::from_default_toml()?,
            source: None,
            used_defaults: true,
        })
    }

    /// Get the list of paths to search for config files.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. $XDG_CONFIG_HOME/reelpanel/config.toml
        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg_config).join("reelpanel/config.toml"));
        }

        // 2. ~/.config/reelpanel/config.toml
        if let Ok(home) = env::var("HOME") {
            paths.push(PathBuf::from(home).join(".config/reelpanel/config.toml"));
        }

        // 3. ./config.toml (cwd)
        paths.push(PathBuf::from("config.toml"));

        paths
    }

    /// Validate the configuration, returning errors for invalid values.
    ///
    /// This performs strict validation - any invalid value causes an error.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.navigator.command.trim().is_empty() {
            errors.push("navigator.command: must not be empty".to_string());
        }

        // Player ids must name a known external player
        let valid_players: Vec<&str> = PlayerOption::ALL.iter().map(|p| p.id()).collect();
        for id in &self.players.enabled {
            if PlayerOption::from_id(id).is_none() {
                errors.push(format!(
                    "players.enabled: invalid value '{}', expected one of: {}",
                    id,
                    valid_players.join(", ")
                ));
            }
        }

        // `path = ""` would resolve to the cwd itself
        if let Some(path) = &self.store.path
            && path.as_os_str().is_empty()
        {
            errors.push("store.path: must not be empty when set".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::ConfigValidation(errors))
        }
    }

    /// Non-fatal issues worth reporting.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.players.enabled.is_empty() {
            warnings.push(
                "players.enabled: no external players listed; the \"open in\" dropdown is hidden"
                    .to_string(),
            );
        }

        // Duplicates are harmless (options() collapses them) but likely a typo
        let mut seen = Vec::new();
        for id in &self.players.enabled {
            if seen.contains(&id) {
                warnings.push(format!("players.enabled: '{}' listed more than once", id));
            } else {
                seen.push(id);
            }
        }

        warnings
    }

    /// Human-readable summary of the configuration.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push("Navigator:".to_string());
        if self.navigator.args.is_empty() {
            lines.push(format!("  command: {}", self.navigator.command));
        } else {
            lines.push(format!(
                "  command: {} {}",
                self.navigator.command,
                self.navigator.args.join(" ")
            ));
        }

        lines.push("\nStore:".to_string());
        lines.push(format!(
            "  path: {}",
            self.store.resolved_path().display()
        ));

        lines.push("\nPlayers:".to_string());
        if self.players.enabled.is_empty() {
            lines.push("  (none)".to_string());
        }
        for id in &self.players.enabled {
            lines.push(format!("  - {}", id));
        }

        lines.push("\nCaptions:".to_string());
        lines.push(format!(
            "  overlay_back_link: {}",
            self.captions.overlay_back_link
        ));

        lines.join("\n")
    }
}

/// Deep merge two TOML tables, with `overlay` values taking precedence.
///
/// For nested tables, recursively merges. For arrays and other values,
/// the overlay value completely replaces the base value.
fn deep_merge_toml(base: &mut Table, overlay: Table) {
    for (key, overlay_value) in overlay {
        match (base.get_mut(&key), overlay_value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                // Both sides are tables: merge key by key
                deep_merge_toml(base_table, overlay_table);
            }
            (_, overlay_value) => {
                // Scalars and arrays from the user replace the default outright
                base.insert(key, overlay_value);
            }
        }
    }
}

/// How external URLs are handed to the OS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigatorConfig {
    /// Program to run with the URL as its last argument.
    pub command: String,
    /// Extra arguments placed before the URL.
    pub args: Vec<String>,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            command: "xdg-open".to_string(),
            args: Vec::new(),
        }
    }
}

/// Caption state persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// State file. `None` picks the XDG state directory.
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Resolve the state file location.
    ///
    /// Order: explicit `path`, `$XDG_STATE_HOME/reelpanel/state.json`,
    /// `~/.local/state/reelpanel/state.json`, then `./reelpanel/state.json`.
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        if let Ok(state_home) = env::var("XDG_STATE_HOME")
            && !state_home.is_empty()
        {
            return PathBuf::from(state_home).join(STATE_FILE);
        }
        if let Ok(home) = env::var("HOME") {
            return PathBuf::from(home).join(".local/state").join(STATE_FILE);
        }
        PathBuf::from(STATE_FILE)
    }
}

/// External players listed in the download menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayersConfig {
    /// Player ids in dropdown order.
    pub enabled: Vec<String>,
}

impl Default for PlayersConfig {
    fn default() -> Self {
        Self {
            enabled: PlayerOption::ALL.iter().map(|p| p.id().to_string()).collect(),
        }
    }
}

impl PlayersConfig {
    /// Known players in configured order, skipping unknown ids and repeats.
    pub fn options(&self) -> Vec<PlayerOption> {
        let mut options = Vec::new();
        for option in self.enabled.iter().filter_map(|id| PlayerOption::from_id(id)) {
            if !options.contains(&option) {
                options.push(option);
            }
        }
        options
    }
}

/// Caption settings page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionsConfig {
    /// Back link leads to the captions overlay instead of the captions menu.
    pub overlay_back_link: bool,
}
