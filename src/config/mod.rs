use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::infrastructure::abi::{DEFAULT_ETHERSCAN_URL, DEFAULT_SOURCIFY_URL};

pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
        }
    }
}

/// Defaults for the EIP-712 domain when a request does not override them
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    pub name: String,
    pub version: String,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            name: "pseudo712".to_string(),
            version: "1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkConfig {
    pub chain_id: Option<u64>,
    pub rpc_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    #[default]
    Etherscan,
    Sourcify,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub kind: ResolverKind,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            kind: ResolverKind::default(),
            base_url: None,
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl ResolverConfig {
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| match self.kind {
                ResolverKind::Etherscan => DEFAULT_ETHERSCAN_URL.to_string(),
                ResolverKind::Sourcify => DEFAULT_SOURCIFY_URL.to_string(),
            })
    }

    /// Configured key, falling back to `ETHERSCAN_API_KEY`
    pub fn api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var("ETHERSCAN_API_KEY").ok())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub domain: DomainConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    match toml::from_str::<Config>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "ignoring unparseable config");
            Config::default()
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("PSEUDO712_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("pseudo712").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("pseudo712").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "pseudo712", "pseudo712")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
