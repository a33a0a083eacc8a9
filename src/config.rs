//! Configuration management for dugout.
//!
//! Supports layered configuration: defaults → project → user → env
//!
//! The `[quirks]` section pins down three behaviors inherited from the
//! shipped application that read like latent bugs but are load-bearing for
//! existing users. Each defaults to the legacy behavior; flipping a flag
//! opts into the corrected one. See the field docs for what each flag
//! controls.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub league: LeagueConfig,
    #[serde(default)]
    pub quirks: QuirksConfig,
}

impl AppConfig {
    /// Load configuration with hierarchy: defaults → project → user → env
    pub fn load(project_root: Option<&PathBuf>) -> Result<Self, ConfigError> {
        use config::{Config, Environment, File};

        let mut builder = Config::builder();

        // 1. Start with defaults
        builder = builder.add_source(
            config::File::from_str(
                include_str!("../default_config.toml"),
                config::FileFormat::Toml,
            )
            .required(false),
        );

        // 2. Project-specific config (.dugout.toml in project root)
        if let Some(root) = project_root {
            let project_config = root.join(".dugout.toml");
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }
        }

        // 3. User config (~/.config/dugout/config.toml)
        if let Some(config_dir) = directories::ProjectDirs::from("com", "dugout", "dugout") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(File::from(user_config).required(false));
            }
        }

        // 4. Environment variables (DUGOUT_*)
        builder = builder.add_source(
            Environment::with_prefix("DUGOUT")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration with default settings only
    pub fn load_defaults() -> Self {
        Self::default()
    }
}

/// League-level defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueConfig {
    /// Display name used when a saved league has not been named yet
    #[serde(default = "default_league_name")]
    pub name: String,
    /// Roster capacity applied to teams created without an explicit limit
    #[serde(default = "default_max_roster")]
    pub default_max_roster: usize,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            name: default_league_name(),
            default_max_roster: default_max_roster(),
        }
    }
}

fn default_league_name() -> String {
    "League".to_string()
}

fn default_max_roster() -> usize {
    26
}

/// Preserved legacy behaviors, each behind a named flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuirksConfig {
    /// `remove_team` matches by exact case while `find_team` is
    /// case-insensitive. `false` makes removal use the lookup normalization.
    #[serde(default = "default_true")]
    pub case_sensitive_removal: bool,
    /// `find_player` inspects only the first team's roster before giving up.
    /// `false` scans every team.
    #[serde(default = "default_true")]
    pub first_team_player_scan: bool,
    /// Barset builders abandon the entire traversal and return the failure
    /// sentinel on the first team with zero recorded hits. `false` skips the
    /// offending team and keeps going.
    #[serde(default = "default_true")]
    pub abort_barset_on_zero_hits: bool,
}

impl Default for QuirksConfig {
    fn default() -> Self {
        Self {
            case_sensitive_removal: true,
            first_team_player_scan: true,
            abort_barset_on_zero_hits: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.league.name, "League");
        assert_eq!(config.league.default_max_roster, 26);
        assert!(config.quirks.case_sensitive_removal);
        assert!(config.quirks.first_team_player_scan);
        assert!(config.quirks.abort_barset_on_zero_hits);
    }

    #[test]
    fn test_project_config_overrides_quirks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".dugout.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[quirks]\nfirst_team_player_scan = false\n\n[league]\ndefault_max_roster = 9"
        )
        .unwrap();

        let root = dir.path().to_path_buf();
        let config = AppConfig::load(Some(&root)).unwrap();
        assert!(!config.quirks.first_team_player_scan);
        // untouched flags keep their defaults
        assert!(config.quirks.case_sensitive_removal);
        assert_eq!(config.league.default_max_roster, 9);
    }
}
