use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::AccountId;

fn default_base_url() -> String {
    "https://marketplace.example.com".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_request_delay_ms() -> u64 {
    1500
}

/// Marketplace endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketplaceConfig {
    pub base_url: String,

    /// Records requested per ledger/inventory page.
    pub page_size: u32,

    /// Delay between paginated requests, to stay under the marketplace's
    /// rate limits.
    pub request_delay_ms: u64,

    /// Session cookie value for authenticated endpoints. Optional; public
    /// inventory pages work without it.
    pub session_cookie: Option<String>,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            request_delay_ms: default_request_delay_ms(),
            session_cookie: None,
        }
    }
}

impl MarketplaceConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// Configuration loaded from `lootledger.toml`.
///
/// The analysis engine itself never reads config; it only parameterizes the
/// fetch layer and the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The account whose ledger is analyzed. Entries purchased by this id
    /// are "my purchases"; everything else is "my sales".
    pub account_id: AccountId,

    /// Game whose inventory context is fetched for holdings matching.
    #[serde(default = "default_game_id")]
    pub game_id: String,

    #[serde(default = "default_context_id")]
    pub context_id: String,

    #[serde(default)]
    pub marketplace: MarketplaceConfig,
}

fn default_game_id() -> String {
    "730".to_string()
}

fn default_context_id() -> String {
    "2".to_string()
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load config from a file, failing with a pointer at the file when it
    /// does not exist. There is no usable default: the account id has no
    /// sensible fallback.
    pub fn load_required(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Config file not found: {} (an [account_id] is required)",
                path.display()
            );
        }
        Self::load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config: Config = toml::from_str(r#"account_id = "76561198000000000""#).unwrap();
        assert_eq!(config.account_id, AccountId::from("76561198000000000"));
        assert_eq!(config.game_id, "730");
        assert_eq!(config.context_id, "2");
        assert_eq!(config.marketplace.page_size, 100);
        assert_eq!(config.marketplace.request_delay(), Duration::from_millis(1500));
        assert!(config.marketplace.session_cookie.is_none());
    }

    #[test]
    fn marketplace_section_overrides_defaults() {
        let config: Config = toml::from_str(
            r#"
account_id = "me"

[marketplace]
base_url = "http://localhost:9999"
page_size = 10
request_delay_ms = 0
session_cookie = "abc123"
"#,
        )
        .unwrap();
        assert_eq!(config.marketplace.base_url, "http://localhost:9999");
        assert_eq!(config.marketplace.page_size, 10);
        assert!(config.marketplace.request_delay().is_zero());
        assert_eq!(config.marketplace.session_cookie.as_deref(), Some("abc123"));
    }

    #[test]
    fn missing_account_id_is_an_error() {
        assert!(toml::from_str::<Config>("game_id = \"730\"").is_err());
    }
}
