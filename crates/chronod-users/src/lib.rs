//! `chronod-users` — user credential storage over an external key/value
//! service, with an in-memory stand-in for tests and local development.

pub mod error;
pub mod memory;
pub mod store;

pub use error::{Result, UserError};
pub use memory::MemoryUserStore;
pub use store::{RedisUserStore, UserStore};
