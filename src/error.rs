// src/error.rs

use thiserror::Error;

/// Errors raised by the key-value backing store and the (de)serialization
/// steps around it. These never reach a read-path caller: the gateway and the
/// invalidation router downgrade them to log lines and fall back to direct
/// computation or TTL expiry.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("store error: {0}")]
    Store(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("deserialization error: {0}")]
    Deserialization(String),
}

pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Errors from the durable-store queries behind stats aggregators and the
/// dashboard source. Unlike cache errors these are fatal to the request that
/// triggered them and propagate unchanged.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("source error: {0}")]
    Source(String),
}

pub type StatsResult<T> = std::result::Result<T, StatsError>;
