use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::info;

use crate::error::{Result, UserError};

/// Credential storage backend.
///
/// Object safe so the server holds a `Box<dyn UserStore>` and tests can
/// substitute [`crate::MemoryUserStore`] without touching handlers.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Register a user. Names that are already taken are refused.
    async fn create_user(&self, name: &str, secret: &str) -> Result<()>;

    /// Whether a user with this name is registered.
    async fn user_exists(&self, name: &str) -> Result<bool>;

    /// Remove a user. Unknown names report not-found.
    async fn delete_user(&self, name: &str) -> Result<()>;
}

/// Redis-backed store: one key per user, name mapped to secret.
pub struct RedisUserStore {
    conn: redis::aio::MultiplexedConnection,
}

impl RedisUserStore {
    /// Connect to the key/value service and verify it answers PING.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let client = redis::Client::open(format!("redis://{host}:{port}/"))?;
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        info!(%host, port, "connected to key/value store");
        Ok(Self { conn })
    }
}

#[async_trait]
impl UserStore for RedisUserStore {
    async fn create_user(&self, name: &str, secret: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        // SET NX answers nil when the key already exists, which folds the
        // existence check and the write into one atomic step.
        let written: Option<String> = redis::cmd("SET")
            .arg(name)
            .arg(secret)
            .arg("NX")
            .query_async(&mut conn)
            .await?;
        if written.is_none() {
            return Err(UserError::AlreadyExists(name.to_string()));
        }
        Ok(())
    }

    async fn user_exists(&self, name: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let exists: bool = conn.exists(name).await?;
        Ok(exists)
    }

    async fn delete_user(&self, name: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn.del(name).await?;
        if removed == 0 {
            return Err(UserError::NotFound(name.to_string()));
        }
        Ok(())
    }
}
