//! Error type shared by configuration loading and the terminal front end.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("failed to load config file {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    InvalidConfig {
        section: &'static str,
        key: &'static str,
        reason: String,
    },

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
