//! `chronod-server` — HTTP surface and process bootstrap for the scheduling
//! core. The router lives in the library so integration tests drive the same
//! code path the binary serves.

pub mod app;
pub mod error;
pub mod http;
