// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! The token cache boundary: a get/set-with-expiry key-value interface.
//!
//! The harness stores its bearer token under a single key with a fixed TTL.
//! [`InMemoryTokenCache`] is the default backing store; a Redis-backed
//! implementation is available behind the `redis` feature.

use std::{
    collections::HashMap,
    fmt::Debug,
    sync::Mutex,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use thiserror::Error;

/// A typed error for cache backend failures.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The backing store failed to execute the operation.
    #[error("Cache backend error: {0}")]
    Backend(String),
}

/// A key-value cache with per-entry expiry.
///
/// Implementations must be safe for concurrent use; the harness shares one
/// cache instance across all workers.
#[async_trait]
pub trait TokenCache: Debug + Send + Sync {
    /// Returns the unexpired value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key`, expiring after `ttl`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Removes the entry stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// A process-local token cache with per-entry deadlines.
///
/// Expired entries are dropped lazily on read.
#[derive(Debug, Default)]
pub struct InMemoryTokenCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl InMemoryTokenCache {
    /// Creates a new empty [`InMemoryTokenCache`] instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenCache for InMemoryTokenCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CacheError::Backend(e.to_string()))?;

        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries
            .lock()
            .map_err(|e| CacheError::Backend(e.to_string()))?
            .insert(key.to_owned(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries
            .lock()
            .map_err(|e| CacheError::Backend(e.to_string()))?
            .remove(key);
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn test_get_missing_key_returns_none() {
        let cache = InMemoryTokenCache::new();
        assert_eq!(cache.get("jwt").await.unwrap(), None);
    }

    #[rstest]
    #[tokio::test]
    async fn test_set_then_get_returns_value() {
        let cache = InMemoryTokenCache::new();
        cache
            .set("jwt", "token-1".to_string(), Duration::from_secs(3600))
            .await
            .unwrap();

        assert_eq!(cache.get("jwt").await.unwrap(), Some("token-1".to_string()));
    }

    #[rstest]
    #[tokio::test]
    async fn test_expired_entry_is_dropped_on_read() {
        let cache = InMemoryTokenCache::new();
        cache
            .set("jwt", "token-1".to_string(), Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(cache.get("jwt").await.unwrap(), None);
    }

    #[rstest]
    #[tokio::test]
    async fn test_set_overwrites_existing_entry() {
        let cache = InMemoryTokenCache::new();
        cache
            .set("jwt", "token-1".to_string(), Duration::from_secs(3600))
            .await
            .unwrap();
        cache
            .set("jwt", "token-2".to_string(), Duration::from_secs(3600))
            .await
            .unwrap();

        assert_eq!(cache.get("jwt").await.unwrap(), Some("token-2".to_string()));
    }

    #[rstest]
    #[tokio::test]
    async fn test_delete_removes_entry() {
        let cache = InMemoryTokenCache::new();
        cache
            .set("jwt", "token-1".to_string(), Duration::from_secs(3600))
            .await
            .unwrap();
        cache.delete("jwt").await.unwrap();

        assert_eq!(cache.get("jwt").await.unwrap(), None);
    }
}
