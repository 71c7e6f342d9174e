//! TOML configuration for the command-line adapter.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use samurai_tower_system_campaign::DEFAULT_MAX_TURNS;
use serde::Deserialize;

/// File read from the working directory when no `--config` is given.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "samurai-tower.toml";

/// Settings shared by every subcommand.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CliConfig {
    /// Name stored on the profile.
    pub(crate) player_name: String,
    /// Tick cap per level.
    pub(crate) max_turns: u32,
    /// Draw the floor after each level.
    pub(crate) print_floor: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            player_name: "Samurai".to_owned(),
            max_turns: DEFAULT_MAX_TURNS,
            print_floor: true,
        }
    }
}

impl CliConfig {
    /// Reads `path`, or the default file if present, or falls back to defaults.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::read(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse configuration toml contents")
    }
}
