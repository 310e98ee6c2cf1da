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

//! The bounded dispatcher: a counting semaphore gating call admission.
//!
//! All workers share one dispatcher, so the admission limit K holds across
//! the whole run, not per worker. A permit is acquired before a call starts
//! and released when its future completes or unwinds; release is tied to
//! permit drop so it holds on every exit path.

use std::{future::Future, sync::Arc};

use tokio::sync::Semaphore;

/// Gates concurrently-executing calls behind a fixed-size admission limiter.
///
/// Cloning is cheap and shares the underlying semaphore.
#[derive(Debug, Clone)]
pub struct BoundedDispatcher {
    semaphore: Arc<Semaphore>,
    limit: usize,
}

impl BoundedDispatcher {
    /// Creates a new [`BoundedDispatcher`] admitting at most `limit`
    /// concurrent calls.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        assert!(limit > 0, "admission limit must be at least 1");
        Self {
            semaphore: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    /// Returns the admission limit K.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Runs `fut` once a permit is available, releasing the permit when the
    /// future resolves (on success, failure or unwind alike).
    ///
    /// # Panics
    ///
    /// Panics if the internal semaphore is closed, which cannot happen under
    /// normal operation (the dispatcher never closes it).
    pub async fn run<F>(&self, fut: F) -> F::Output
    where
        F: Future,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .expect("semaphore unexpectedly closed");
        fut.await
    }

    /// Admits every future in `calls` through the limiter and collects their
    /// outputs. At most K futures execute concurrently; excess calls wait for
    /// a permit in first-come-first-admitted order.
    pub async fn dispatch<F>(&self, calls: Vec<F>) -> Vec<F::Output>
    where
        F: Future,
    {
        futures::future::join_all(calls.into_iter().map(|fut| self.run(fut))).await
    }
}
