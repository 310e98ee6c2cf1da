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

//! Error structures and enumerations for the benchmark harness.
//!
//! Two layers with different blast radii: [`CallFailure`] classifies a single
//! failed call and is always fully recovered at the invoker boundary, while
//! [`BenchError`] aborts a run and is only produced before workers spawn
//! (authentication, configuration) or at the join barrier (worker loss).

use barrage_infrastructure::cache::CacheError;
use thiserror::Error;

/// Classifies why a single call failed.
///
/// Produced at the invoker boundary and carried in a failed
/// [`crate::call::CallResult`]; never raised past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CallFailure {
    /// A connection or transport failure (DNS, refused connection, reset).
    #[error("network error")]
    Network,
    /// The call did not complete within its deadline.
    #[error("request timed out")]
    Timeout,
    /// The call completed with a non-2xx status.
    #[error("HTTP status {0}")]
    HttpStatus(u16),
}

/// A typed error enumeration for the benchmark harness.
#[derive(Debug, Clone, Error)]
pub enum BenchError {
    /// The credential exchange failed or returned no usable token. Fatal to
    /// the run: no worker is spawned after this.
    #[error("Authentication failed: {0}")]
    Auth(String),
    /// The run configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
    /// The token cache backend failed.
    #[error("Cache error: {0}")]
    Cache(String),
    /// A worker task was lost before producing its results.
    #[error("Worker task failed: {0}")]
    Task(String),
}

impl From<CacheError> for BenchError {
    fn from(error: CacheError) -> Self {
        Self::Cache(error.to_string())
    }
}
