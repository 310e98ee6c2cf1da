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

use clap::Parser;

/// Main CLI structure for parsing command-line arguments and options.
///
/// Every option falls back to its `BARRAGE_*` environment variable and then
/// to the built-in default; flags always win.
#[derive(Debug, Parser)]
#[clap(version, about, author)]
pub struct BarrageCli {
    /// Number of workers (W).
    #[arg(long)]
    pub workers: Option<usize>,
    /// Iterations per worker (I).
    #[arg(long)]
    pub iterations: Option<usize>,
    /// Maximum calls in flight across all workers (K).
    #[arg(long)]
    pub concurrency: Option<usize>,
    /// Base URL for the verb endpoints.
    #[arg(long)]
    pub base_url: Option<String>,
    /// Per-call timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,
    /// Skip the multipart upload call even when an upload URL is configured.
    #[arg(long)]
    pub skip_upload: bool,
}
