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

//! Run configuration, constructed once at startup and passed by reference.
//!
//! There is deliberately no module-level mutable state: everything
//! environment-derived lands in [`BenchConfig`] before the run starts.

use crate::env::{get_env_var, get_env_var_parsed};

/// Default base URL for the verb endpoints.
pub const DEFAULT_BASE_URL: &str = "https://httpbin.org";
/// Default number of workers (W).
pub const DEFAULT_WORKERS: usize = 4;
/// Default iterations per worker (I).
pub const DEFAULT_ITERATIONS: usize = 10;
/// Default admission limit (K).
pub const DEFAULT_CONCURRENCY: usize = 25;
/// Default per-call timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Credential exchange configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// The credential exchange endpoint.
    pub url: String,
    /// Username form field value.
    pub username: String,
    /// Password form field value.
    pub password: String,
}

/// Configuration for one benchmark run.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Base URL for the verb endpoints.
    pub base_url: String,
    /// Absolute URL for the multipart upload; `None` disables the upload call.
    pub upload_url: Option<String>,
    /// Credential exchange settings; `None` runs unauthenticated.
    pub auth: Option<AuthConfig>,
    /// Number of workers (W).
    pub workers: usize,
    /// Iterations per worker (I).
    pub iterations: usize,
    /// Admission limit: maximum calls in flight (K).
    pub concurrency: usize,
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            upload_url: None,
            auth: None,
            workers: DEFAULT_WORKERS,
            iterations: DEFAULT_ITERATIONS,
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl BenchConfig {
    /// Builds a [`BenchConfig`] from `BARRAGE_*` environment variables,
    /// falling back to defaults for anything unset.
    ///
    /// Authentication is enabled when `BARRAGE_AUTH_URL` is set, in which
    /// case `BARRAGE_AUTH_USERNAME` and `BARRAGE_AUTH_PASSWORD` are required.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable fails to parse, or if the auth
    /// URL is set without the matching credentials.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let auth = match std::env::var("BARRAGE_AUTH_URL") {
            Ok(url) => Some(AuthConfig {
                url,
                username: get_env_var("BARRAGE_AUTH_USERNAME")?,
                password: get_env_var("BARRAGE_AUTH_PASSWORD")?,
            }),
            Err(_) => None,
        };

        Ok(Self {
            base_url: std::env::var("BARRAGE_BASE_URL").unwrap_or(defaults.base_url),
            upload_url: std::env::var("BARRAGE_UPLOAD_URL").ok(),
            auth,
            workers: get_env_var_parsed("BARRAGE_WORKERS")?.unwrap_or(defaults.workers),
            iterations: get_env_var_parsed("BARRAGE_ITERATIONS")?.unwrap_or(defaults.iterations),
            concurrency: get_env_var_parsed("BARRAGE_CONCURRENCY")?.unwrap_or(defaults.concurrency),
            timeout_secs: get_env_var_parsed("BARRAGE_TIMEOUT_SECS")?
                .unwrap_or(defaults.timeout_secs),
        })
    }

    /// Validates the shape of the run.
    ///
    /// # Errors
    ///
    /// Returns an error if workers, iterations or concurrency is zero.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.workers == 0 {
            anyhow::bail!("workers must be at least 1");
        }
        if self.iterations == 0 {
            anyhow::bail!("iterations must be at least 1");
        }
        if self.concurrency == 0 {
            anyhow::bail!("concurrency must be at least 1");
        }
        Ok(())
    }
}
