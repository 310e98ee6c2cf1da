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

//! Cache and database infrastructure for the barrage benchmark harness.
//!
//! The `barrage-infrastructure` crate provides the token cache boundary the
//! harness stores its bearer token behind, plus the relational pool handle
//! opened at startup. The cache is a minimal get/set-with-expiry key-value
//! interface: the harness only ever stores one token under one key, so the
//! trait stays deliberately small.
//!
//! # Feature flags
//!
//! - `redis`: Enables the Redis-backed token cache implementation.
//! - `postgres`: Enables the PostgreSQL connection pool (reserved for future
//!   persistence of run results; call logic never touches it).

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod cache;

#[cfg(feature = "redis")]
pub mod redis;

#[cfg(feature = "postgres")]
pub mod sql;
