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

//! The batch runner and aggregator.
//!
//! A run moves through `Idle -> Authenticating -> Running -> Finalized`
//! (or `Failed` on a fatal authentication error). Workers are spawned and
//! joined in one place: the aggregator holds every join handle and cannot
//! observe partial tallies, so the final [`RunStats`] is computed strictly
//! after the last call has resolved. Cancellation is not supported: a started
//! run proceeds to completion or to a fatal authentication failure.

use std::{sync::Arc, time::Instant};

use barrage_infrastructure::cache::TokenCache;
use barrage_network::http::HttpClient;

use crate::{
    call::{CallResult, CallSpec, verb_suite},
    config::BenchConfig,
    dispatcher::BoundedDispatcher,
    error::BenchError,
    invoker::Invoker,
    stats::RunStats,
    token::{Token, TokenProvider},
};

/// Lifecycle states for one benchmark run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum RunState {
    /// Constructed, not yet started.
    Idle,
    /// Obtaining the bearer token.
    Authenticating,
    /// Workers are issuing calls.
    Running,
    /// All calls resolved and stats computed.
    Finalized,
    /// Aborted on a fatal error before or during the run.
    Failed,
}

/// Runs one fixed benchmark batch and aggregates its results.
#[derive(Debug)]
pub struct BatchRunner {
    config: BenchConfig,
    invoker: Invoker,
    token_provider: Option<TokenProvider>,
    dispatcher: BoundedDispatcher,
    suite_override: Option<Vec<CallSpec>>,
    state: RunState,
}

impl BatchRunner {
    /// Creates a new [`BatchRunner`] instance from the given config, wiring
    /// the shared HTTP client, invoker, token provider and dispatcher.
    ///
    /// # Panics
    ///
    /// Panics if `config.concurrency` is zero; call
    /// [`BenchConfig::validate`] first to reject that shape with an error
    /// instead.
    #[must_use]
    pub fn new(config: BenchConfig, cache: Arc<dyn TokenCache>) -> Self {
        let client = HttpClient::new(Default::default(), Some(config.timeout_secs));
        let invoker = Invoker::new(client.clone(), config.base_url.clone());
        let token_provider = config
            .auth
            .clone()
            .map(|auth| TokenProvider::new(client, auth, cache));
        let dispatcher = BoundedDispatcher::new(config.concurrency);

        Self {
            config,
            invoker,
            token_provider,
            dispatcher,
            suite_override: None,
            state: RunState::Idle,
        }
    }

    /// Replaces the default verb suite with a custom call multiset.
    ///
    /// The suite is still fixed for the run's duration; this only changes
    /// which specs make up one iteration.
    #[must_use]
    pub fn with_suite(mut self, suite: Vec<CallSpec>) -> Self {
        self.suite_override = Some(suite);
        self
    }

    /// Returns the current run state.
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Returns the run configuration.
    #[must_use]
    pub const fn config(&self) -> &BenchConfig {
        &self.config
    }

    fn transition(&mut self, next: RunState) {
        tracing::debug!("Run state {} -> {next}", self.state);
        self.state = next;
    }

    /// Executes the batch: authenticate once, spawn W workers issuing
    /// I iterations of the verb suite each, join them all, finalize stats.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Config`] for an invalid run shape,
    /// [`BenchError::Auth`] (fatal, before any worker spawns) if the
    /// credential exchange fails, or [`BenchError::Task`] if a worker is
    /// lost before producing results.
    pub async fn run(&mut self) -> Result<RunStats, BenchError> {
        self.config
            .validate()
            .map_err(|e| BenchError::Config(e.to_string()))?;

        self.transition(RunState::Authenticating);
        let token = match &self.token_provider {
            Some(provider) => match provider.get().await {
                Ok(token) => Some(token),
                Err(e) => {
                    self.transition(RunState::Failed);
                    return Err(e);
                }
            },
            None => {
                tracing::debug!("No auth configured, running unauthenticated");
                None
            }
        };

        self.transition(RunState::Running);
        let suite = Arc::new(
            self.suite_override
                .clone()
                .unwrap_or_else(|| verb_suite(self.config.upload_url.as_deref())),
        );
        let total = self.config.workers * self.config.iterations * suite.len();
        tracing::info!(
            "Issuing {total} calls: {} workers x {} iterations x {} verbs, limit {}",
            self.config.workers,
            self.config.iterations,
            suite.len(),
            self.dispatcher.limit(),
        );

        let started = Instant::now();

        let handles: Vec<_> = (0..self.config.workers)
            .map(|worker_id| {
                let worker = Worker {
                    id: worker_id,
                    iterations: self.config.iterations,
                    suite: suite.clone(),
                    invoker: self.invoker.clone(),
                    dispatcher: self.dispatcher.clone(),
                    token: token.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        // Join barrier: stats must not be read until every call has resolved
        let mut results = Vec::with_capacity(total);
        for (worker_id, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(worker_results) => results.extend(worker_results),
                Err(e) => {
                    self.transition(RunState::Failed);
                    return Err(BenchError::Task(format!("worker {worker_id} lost: {e}")));
                }
            }
        }

        let stats = RunStats::from_results(&results, started.elapsed());
        self.transition(RunState::Finalized);
        tracing::info!("{stats}");

        Ok(stats)
    }
}

/// One spawned worker: issues its share of the batch through the shared
/// dispatcher and returns every result to the aggregator.
#[derive(Debug)]
struct Worker {
    id: usize,
    iterations: usize,
    suite: Arc<Vec<CallSpec>>,
    invoker: Invoker,
    dispatcher: BoundedDispatcher,
    token: Option<Token>,
}

impl Worker {
    async fn run(self) -> Vec<CallResult> {
        tracing::debug!("Worker {} submitting {} calls", self.id, self.iterations * self.suite.len());

        let mut calls = Vec::with_capacity(self.iterations * self.suite.len());
        for _ in 0..self.iterations {
            for spec in self.suite.iter() {
                let invoker = self.invoker.clone();
                let spec = spec.clone();
                let token = self.token.clone();
                calls.push(async move { invoker.invoke(&spec, token.as_ref()).await });
            }
        }

        self.dispatcher.dispatch(calls).await
    }
}
