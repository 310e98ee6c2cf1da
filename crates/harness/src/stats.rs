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

//! Aggregated statistics for one completed run.

use std::{fmt, time::Duration};

use crate::call::CallResult;

/// Totals and timing for one run, finalized once at the join barrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStats {
    /// Number of calls issued (always W × I × V).
    pub total_issued: usize,
    /// Number of calls that completed with a 2xx status.
    pub total_succeeded: usize,
    /// Number of calls that failed for any reason.
    pub total_failed: usize,
    /// Wall-clock duration of the running phase.
    pub elapsed: Duration,
}

impl RunStats {
    /// Tallies the given results into a finalized [`RunStats`].
    #[must_use]
    pub fn from_results(results: &[CallResult], elapsed: Duration) -> Self {
        let total_issued = results.len();
        let total_succeeded = results.iter().filter(|r| r.succeeded).count();

        Self {
            total_issued,
            total_succeeded,
            total_failed: total_issued - total_succeeded,
            elapsed,
        }
    }

    /// Returns the run throughput in requests per second.
    #[must_use]
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total_issued as f64 / secs
        } else {
            0.0
        }
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "completed in {:.2}s: issued={}, succeeded={}, failed={} ({:.2} req/s)",
            self.elapsed.as_secs_f64(),
            self.total_issued,
            self.total_succeeded,
            self.total_failed,
            self.throughput(),
        )
    }
}
