//! Error types

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Application errors for configuration and hosting.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The configuration file could not be read or did not have the expected shape.
    #[error("Could not load config file {}", path.display())]
    #[diagnostic(code(sendlike::config_load))]
    LoadConfig {
        /// The path of the configuration file.
        path: PathBuf,
        /// The underlying figment error.
        #[source]
        source: Box<figment::Error>,
    },
    /// The default configuration file could not be written.
    #[error("Could not create default config file {}", path.display())]
    #[diagnostic(code(sendlike::config_create))]
    CreateConfig {
        /// The path of the configuration file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Reading events from or writing replies to the host failed.
    #[error("Host I/O error")]
    HostIo(#[from] std::io::Error),
}
