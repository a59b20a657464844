use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Result, UserError};
use crate::store::UserStore;

/// In-process store with the same contract as the Redis one. Nothing
/// survives a restart, which is exactly what tests want.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, String>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, name: &str, secret: &str) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(name) {
            return Err(UserError::AlreadyExists(name.to_string()));
        }
        users.insert(name.to_string(), secret.to_string());
        Ok(())
    }

    async fn user_exists(&self, name: &str) -> Result<bool> {
        Ok(self.users.lock().unwrap().contains_key(name))
    }

    async fn delete_user(&self, name: &str) -> Result<()> {
        if self.users.lock().unwrap().remove(name).is_none() {
            return Err(UserError::NotFound(name.to_string()));
        }
        Ok(())
    }
}
