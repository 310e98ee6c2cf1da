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

//! The bounded-concurrency batch request runner at the core of barrage.
//!
//! A benchmark run proceeds through four stages: authenticate once (the token
//! provider consults the cache and performs at most one credential exchange),
//! spawn a fixed number of workers, fan each worker's fixed call multiset out
//! through the bounded dispatcher, and join every worker before finalizing
//! [`stats::RunStats`]. The dispatcher's counting semaphore is the only
//! admission control: at most K calls are in flight at any moment regardless
//! of worker count.
//!
//! Failure semantics are deliberately asymmetric. Per-call failures
//! (timeouts, transport errors, non-2xx statuses) are classified into
//! [`error::CallFailure`] at the invoker boundary and tallied; they never
//! propagate and never abort a batch. A failed credential exchange is fatal
//! to the whole run before any worker spawns. Nothing is retried.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod call;
pub mod config;
pub mod dispatcher;
pub mod env;
pub mod error;
pub mod invoker;
pub mod runner;
pub mod stats;
pub mod token;
