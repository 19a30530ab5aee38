mod anthropic;
mod basic;

pub use anthropic::{API_KEY_ENV, AnthropicConfig, AnthropicResolvedConfig};
pub use basic::BasicConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Vendor API settings for the generation endpoints (see `anthropic` table in config.toml).
    #[serde(default)]
    pub anthropic: AnthropicConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "ATELIER_";

impl Config {
    /// Builds a Figment that merges defaults, `config.toml` (if present) and `ATELIER_*`
    /// environment variables, in that order.
    pub fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads configuration; a missing `config.toml` is not an error.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn anthropic(&self) -> AnthropicResolvedConfig {
        self.anthropic.resolve()
    }
}
