//! Fatal resource errors.

use thiserror::Error;

/// Errors from loading the dictionary, the seed-word corpus or the config.
///
/// These abort [`GameManager::initialize`](crate::GameManager::initialize);
/// row-level corpus problems are skipped instead and never surface here.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Seed-word corpus has no usable rows")]
    EmptyCorpus,

    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    InvalidConfig(&'static str),
}
