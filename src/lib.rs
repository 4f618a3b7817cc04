//! Relays `点赞` chat commands to the `send_like` action of a OneBot HTTP API.

pub mod command;
pub mod config;
pub mod consts;
mod error;
pub mod event;
pub mod host;
pub mod http;
pub mod plugin;
pub mod telemetry;

pub use config::Config;
pub use error::Error;
pub use plugin::{EventHandler, Plugin, Registry};
