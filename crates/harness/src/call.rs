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

//! Call descriptions and per-call outcomes.
//!
//! One [`CallSpec`] per verb replaces the near-identical per-verb functions of
//! a naive harness: the invoker reads the spec, so the failure boundary lives
//! in exactly one place. Specs are constructed once at batch build time and
//! are read-only for the run's duration.

use bytes::Bytes;
use reqwest::Method;

use crate::error::CallFailure;

/// Multipart field name for the fixed upload call.
pub const UPLOAD_FIELD: &str = "file";
/// File name reported for the fixed upload call.
pub const UPLOAD_FILE_NAME: &str = "upload.txt";
/// Content type of the fixed upload payload.
pub const UPLOAD_CONTENT_TYPE: &str = "text/plain";
/// The fixed upload payload.
pub const UPLOAD_PAYLOAD: &[u8] = b"cdn test";

/// How a call is issued on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// A plain verb call: method plus path against the base URL.
    Standard,
    /// The fixed multipart upload against an absolute URL.
    Upload,
}

/// An immutable description of one outbound call.
#[derive(Debug, Clone)]
pub struct CallSpec {
    /// Short name used in logs ("GET", "UPLOAD", ...).
    pub label: String,
    /// The HTTP method.
    pub method: Method,
    /// Path relative to the base URL, or the absolute URL for uploads.
    pub path: String,
    /// Whether the bearer token is attached when one is available.
    pub authenticated: bool,
    /// Optional request body.
    pub body: Option<Bytes>,
    /// How the call is issued.
    pub kind: CallKind,
}

impl CallSpec {
    /// Creates a new standard [`CallSpec`] instance.
    #[must_use]
    pub fn new(label: &str, method: Method, path: &str) -> Self {
        Self {
            label: label.to_owned(),
            method,
            path: path.to_owned(),
            authenticated: true,
            body: None,
            kind: CallKind::Standard,
        }
    }

    /// Creates the fixed multipart upload [`CallSpec`] against `upload_url`.
    ///
    /// The upload carries no bearer token.
    #[must_use]
    pub fn upload(upload_url: &str) -> Self {
        Self {
            label: "UPLOAD".to_owned(),
            method: Method::POST,
            path: upload_url.to_owned(),
            authenticated: false,
            body: None,
            kind: CallKind::Upload,
        }
    }

    /// Returns the spec with the given request body attached.
    #[must_use]
    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }
}

/// Returns the fixed verb multiset issued once per iteration.
///
/// The suite covers GET, POST, PUT, PATCH, DELETE and HEAD against the
/// standard httpbin-style endpoints, plus the multipart upload when an upload
/// URL is configured.
#[must_use]
pub fn verb_suite(upload_url: Option<&str>) -> Vec<CallSpec> {
    let mut suite = vec![
        CallSpec::new("GET", Method::GET, "/get"),
        CallSpec::new("POST", Method::POST, "/post"),
        CallSpec::new("PUT", Method::PUT, "/put"),
        CallSpec::new("PATCH", Method::PATCH, "/patch"),
        CallSpec::new("DELETE", Method::DELETE, "/delete"),
        CallSpec::new("HEAD", Method::HEAD, "/get"),
    ];
    if let Some(url) = upload_url {
        suite.push(CallSpec::upload(url));
    }
    suite
}

/// The outcome of one invocation.
///
/// Produced by the invoker, consumed exactly once by the aggregator.
#[derive(Debug, Clone)]
pub struct CallResult {
    /// Whether the call completed with a 2xx status.
    pub succeeded: bool,
    /// The response body for successful calls.
    pub payload: Option<Bytes>,
    /// The failure classification for failed calls.
    pub failure: Option<CallFailure>,
}

impl CallResult {
    /// Creates a successful [`CallResult`] with the given payload.
    #[must_use]
    pub const fn ok(payload: Option<Bytes>) -> Self {
        Self {
            succeeded: true,
            payload,
            failure: None,
        }
    }

    /// Creates a failed [`CallResult`] with the given classification.
    #[must_use]
    pub const fn failed(failure: CallFailure) -> Self {
        Self {
            succeeded: false,
            payload: None,
            failure: Some(failure),
        }
    }
}
