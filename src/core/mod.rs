//! Core client logic: API access, configuration and session management

pub mod api;
pub mod config;
pub mod session;
#[cfg(test)]
mod testing;

pub use config::ApiConfig;
