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

//! Bearer token acquisition and caching.
//!
//! The provider consults the cache first (key `"jwt"`), and only performs a
//! credential exchange on a miss. Concurrent cold-cache callers coalesce into
//! a single in-flight exchange: the exchange lock is taken, then the cache is
//! re-checked before any network call, so the loser of the race reads the
//! winner's token instead of re-authenticating.

use std::{collections::HashMap, sync::Arc, time::Duration};

use barrage_infrastructure::cache::TokenCache;
use barrage_network::http::HttpClient;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{config::AuthConfig, error::BenchError};

/// Cache key under which the bearer token is stored.
pub const TOKEN_CACHE_KEY: &str = "jwt";
/// Time-to-live for a cached token.
pub const TOKEN_TTL: Duration = Duration::from_secs(3600);

/// Expiry skew: a token this close to its deadline counts as expired.
const TOKEN_EXPIRY_SKEW_SECS: i64 = 30;

/// An opaque bearer credential with its expiry instant.
///
/// Immutable once issued; safe to share across workers without locking.
#[derive(Debug, Clone)]
pub struct Token {
    /// The raw access token value.
    pub access_token: String,
    /// When the token stops being usable.
    pub expires_at: DateTime<Utc>,
}

impl Token {
    /// Creates a new [`Token`] expiring `ttl` from now.
    ///
    /// # Panics
    ///
    /// Panics if `ttl` overflows the chrono duration range (not reachable for
    /// the TTLs used here).
    #[must_use]
    pub fn new(access_token: String, ttl: Duration) -> Self {
        Self {
            access_token,
            expires_at: Utc::now() + chrono::Duration::from_std(ttl).expect("TTL out of range"),
        }
    }

    /// Returns `true` if the token is expired or within the expiry skew.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() + chrono::Duration::seconds(TOKEN_EXPIRY_SKEW_SECS) >= self.expires_at
    }

    /// Returns the `Authorization` header value for this token.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// The JSON structure of a successful credential exchange response.
#[derive(Debug, Deserialize)]
struct ExchangeResponse {
    access_token: String,
}

/// Obtains and caches the bearer token shared by all workers for a run.
#[derive(Debug)]
pub struct TokenProvider {
    client: HttpClient,
    config: AuthConfig,
    cache: Arc<dyn TokenCache>,
    exchange_lock: Mutex<()>,
}

impl TokenProvider {
    /// Creates a new [`TokenProvider`] instance.
    #[must_use]
    pub fn new(client: HttpClient, config: AuthConfig, cache: Arc<dyn TokenCache>) -> Self {
        Self {
            client,
            config,
            cache,
            exchange_lock: Mutex::new(()),
        }
    }

    /// Returns a valid bearer token, from cache when possible.
    ///
    /// A warm cache produces zero network calls. On a miss, concurrent
    /// callers coalesce into a single credential exchange.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Auth`] if the exchange fails or returns no
    /// usable token, or [`BenchError::Cache`] if the cache backend fails.
    pub async fn get(&self) -> Result<Token, BenchError> {
        if let Some(cached) = self.cache.get(TOKEN_CACHE_KEY).await? {
            tracing::debug!("Token cache hit");
            return Ok(Token::new(cached, TOKEN_TTL));
        }

        let _guard = self.exchange_lock.lock().await;

        // Re-check under the lock: a concurrent caller may have exchanged
        // while this one waited
        if let Some(cached) = self.cache.get(TOKEN_CACHE_KEY).await? {
            tracing::debug!("Token cache hit after exchange wait");
            return Ok(Token::new(cached, TOKEN_TTL));
        }

        self.exchange().await
    }

    /// Forces a new credential exchange, overwriting the cached token.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Auth`] if the exchange fails or returns no
    /// usable token, or [`BenchError::Cache`] if the cache backend fails.
    pub async fn refresh(&self) -> Result<Token, BenchError> {
        let _guard = self.exchange_lock.lock().await;
        self.exchange().await
    }

    async fn exchange(&self) -> Result<Token, BenchError> {
        tracing::debug!("Exchanging credentials at {}", self.config.url);

        let form = serde_urlencoded::to_string([
            ("username", self.config.username.as_str()),
            ("password", self.config.password.as_str()),
        ])
        .map_err(|e| BenchError::Auth(format!("failed to encode credentials: {e}")))?;

        let headers = HashMap::from([(
            "content-type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        )]);

        let response = self
            .client
            .request(
                Method::POST,
                self.config.url.clone(),
                Some(headers),
                Some(Bytes::from(form)),
                None,
            )
            .await
            .map_err(|e| BenchError::Auth(format!("credential exchange failed: {e}")))?;

        if !response.is_success() {
            return Err(BenchError::Auth(format!(
                "credential exchange returned status {}",
                response.status
            )));
        }

        let parsed: ExchangeResponse = serde_json::from_slice(&response.body)
            .map_err(|e| BenchError::Auth(format!("invalid exchange response: {e}")))?;

        self.cache
            .set(TOKEN_CACHE_KEY, parsed.access_token.clone(), TOKEN_TTL)
            .await?;

        tracing::info!("Obtained bearer token, cached for {}s", TOKEN_TTL.as_secs());

        Ok(Token::new(parsed.access_token, TOKEN_TTL))
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
    fn test_fresh_token_is_not_expired() {
        let token = Token::new("abc".to_string(), TOKEN_TTL);
        assert!(!token.is_expired());
    }

    #[rstest]
    fn test_token_within_skew_is_expired() {
        let token = Token::new("abc".to_string(), Duration::from_secs(10));
        assert!(token.is_expired());
    }

    #[rstest]
    fn test_bearer_header_value() {
        let token = Token::new("abc123".to_string(), TOKEN_TTL);
        assert_eq!(token.bearer(), "Bearer abc123");
    }
}
