//! Counter store subsystem.
//!
//! # Responsibilities
//! - Define the `CounterStore` contract (ping, get, set, incr)
//! - Decode raw counter values into tallies
//! - Seed missing counters at bootstrap
//!
//! # Design Decisions
//! - Each call is one independent round trip; no retries, no caching
//! - Absent keys are `None` from `get`, an error only when a tally is
//!   required
//! - Concurrent increments rely on the store's own atomicity

pub mod redis;

use async_trait::async_trait;
use thiserror::Error;

pub use self::redis::RedisStore;

/// Errors that can occur during counter store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying store command failed (connection, protocol, I/O).
    #[error("store command failed: {0}")]
    Command(#[from] ::redis::RedisError),

    /// A counter that must exist was absent.
    #[error("counter {key:?} does not exist")]
    Missing { key: String },

    /// A counter held a value that is not a base-10 integer.
    #[error("counter {key:?} holds non-numeric value {raw:?}")]
    NonNumeric { key: String, raw: String },
}

/// Result type for counter store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Remote key-value service holding the vote tallies.
///
/// Implementations issue one best-effort round trip per call and surface
/// whatever the store returns; callers decide whether a failure is fatal.
#[async_trait]
pub trait CounterStore: Send + Sync + std::fmt::Debug {
    /// Round-trip liveness check.
    async fn ping(&self) -> StoreResult<()>;

    /// Fetch the raw value of a key, or `None` when the key is absent.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Overwrite a key with an integer value.
    async fn set(&self, key: &str, value: i64) -> StoreResult<()>;

    /// Atomically add `delta` to a key and return the new value.
    /// An absent key counts from zero.
    async fn incr(&self, key: &str, delta: i64) -> StoreResult<i64>;
}

/// Read a counter that is required to exist and decode it as a tally.
///
/// A missing key or a non-numeric value is an error; both invariants are
/// established at bootstrap and only an external writer can break them.
pub async fn read_tally(store: &dyn CounterStore, key: &str) -> StoreResult<i64> {
    match store.get(key).await? {
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(value) => Ok(value),
            Err(_) => Err(StoreError::NonNumeric {
                key: key.to_string(),
                raw,
            }),
        },
        None => Err(StoreError::Missing {
            key: key.to_string(),
        }),
    }
}

/// Initialize any absent counter keys to zero.
///
/// Existing values are left untouched so a restart never discards tallies.
pub async fn seed(store: &dyn CounterStore, keys: &[&str]) -> StoreResult<()> {
    for key in keys {
        if store.get(key).await?.is_none() {
            store.set(key, 0).await?;
            tracing::info!(key = %key, "Seeded missing counter");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_error_names_the_key() {
        let err = StoreError::Missing {
            key: "Cats".to_string(),
        };
        assert_eq!(err.to_string(), "counter \"Cats\" does not exist");
    }

    #[test]
    fn non_numeric_error_carries_the_raw_value() {
        let err = StoreError::NonNumeric {
            key: "Dogs".to_string(),
            raw: "not-a-number".to_string(),
        };
        assert!(err.to_string().contains("Dogs"));
        assert!(err.to_string().contains("not-a-number"));
    }
}
