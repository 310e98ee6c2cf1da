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

//! Network communication machinery for the barrage benchmark harness.
//!
//! The `barrage-network` crate provides the shared HTTP client used by every
//! worker in a benchmark run. It wraps [`reqwest`] with a single pooled
//! client, default headers, per-call timeout override, and multipart upload
//! support, and maps transport failures into a small typed error taxonomy
//! that keeps timeouts distinguishable from other network errors.
//!
//! Non-2xx responses are **not** errors at this layer: the status code is
//! carried in [`http::HttpResponse`] and classified by the caller. This keeps
//! the transport boundary thin and leaves failure semantics to the domain.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod http;
