pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod migration;
pub mod ui;

pub use error::{MigrateError, Result};
