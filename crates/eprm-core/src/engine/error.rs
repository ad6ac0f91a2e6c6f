use thiserror::Error;

use super::config::ConfigError;
use super::uncertainty::UncertaintyError;
use crate::core::io::traits::PropertyError;
use std::path::PathBuf;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid experiment configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Property boundary failure: {source}")]
    Property {
        #[from]
        source: PropertyError,
    },

    #[error("Uncertainty quantification failed: {source}")]
    Uncertainty {
        #[from]
        source: UncertaintyError,
    },

    #[error("No sequence files found in {dir:?}")]
    NoSequenceFiles { dir: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
