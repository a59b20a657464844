use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8780;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_REDIS_HOST: &str = "127.0.0.1";
pub const DEFAULT_REDIS_PORT: u16 = 36379;

/// Top-level config (chronod.toml + CHRONOD_* env overrides).
///
/// Read once at startup; every field has a default so the service comes up
/// with no file present at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChronodConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub redis: RedisConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// Key/value service the user store talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_host")]
    pub host: String,
    #[serde(default = "default_redis_port")]
    pub port: u16,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_REDIS_HOST.to_string(),
            port: DEFAULT_REDIS_PORT,
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_redis_host() -> String {
    DEFAULT_REDIS_HOST.to_string()
}
fn default_redis_port() -> u16 {
    DEFAULT_REDIS_PORT
}

impl ChronodConfig {
    /// Load config from a TOML file with CHRONOD_* env var overrides.
    ///
    /// Falls back to ~/.chronod/chronod.toml when no path is given.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: ChronodConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("CHRONOD_").split("_"))
            .extract()
            .map_err(|e| crate::error::ChronodError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.chronod/chronod.toml", home)
}
