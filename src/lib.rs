pub mod auth;
pub mod cli;
pub mod compare;
pub mod config;
mod metrics;
mod server;
pub mod store;
pub mod verify;

pub use config::Opts;
