//! `chronod-core` — process configuration and shared constants.

pub mod config;
pub mod error;

pub use config::{
    ChronodConfig, RedisConfig, ServerConfig, DEFAULT_BIND, DEFAULT_PORT, DEFAULT_REDIS_HOST,
    DEFAULT_REDIS_PORT,
};
pub use error::{ChronodError, Result};
