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

//! The HTTP verb invoker: one call, one total failure boundary.
//!
//! Every outcome of a single invocation, including transport errors and
//! timeouts, becomes a [`CallResult`]; nothing propagates past this module.
//! A failing call therefore cannot abort the batch. Each invocation is a
//! single attempt: retries are intentionally absent so that throughput
//! numbers measure the endpoint, not the retry policy.

use std::collections::HashMap;

use barrage_network::http::{HttpClient, HttpClientError};
use bytes::Bytes;

use crate::{
    call::{
        CallKind, CallResult, CallSpec, UPLOAD_CONTENT_TYPE, UPLOAD_FIELD, UPLOAD_FILE_NAME,
        UPLOAD_PAYLOAD,
    },
    error::CallFailure,
    token::Token,
};

/// Issues described calls against the shared client.
#[derive(Debug, Clone)]
pub struct Invoker {
    client: HttpClient,
    base_url: String,
}

impl Invoker {
    /// Creates a new [`Invoker`] instance.
    #[must_use]
    pub fn new(client: HttpClient, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Issues the call described by `spec`, attaching the bearer token when
    /// the spec is authenticated and a token is present.
    ///
    /// Never fails: every outcome is folded into the returned [`CallResult`].
    pub async fn invoke(&self, spec: &CallSpec, token: Option<&Token>) -> CallResult {
        let outcome = match spec.kind {
            CallKind::Standard => {
                let url = format!("{}{}", self.base_url, spec.path);
                let headers = token
                    .filter(|_| spec.authenticated)
                    .map(|t| HashMap::from([("authorization".to_string(), t.bearer())]));
                self.client
                    .request(spec.method.clone(), url, headers, spec.body.clone(), None)
                    .await
            }
            CallKind::Upload => {
                self.client
                    .post_multipart(
                        spec.path.clone(),
                        UPLOAD_FIELD.to_string(),
                        UPLOAD_FILE_NAME.to_string(),
                        UPLOAD_CONTENT_TYPE,
                        Bytes::from_static(UPLOAD_PAYLOAD),
                        None,
                    )
                    .await
            }
        };

        match outcome {
            Ok(response) if response.is_success() => CallResult::ok(Some(response.body)),
            Ok(response) => {
                tracing::debug!("{} returned status {}", spec.label, response.status);
                CallResult::failed(CallFailure::HttpStatus(response.status.as_u16()))
            }
            Err(HttpClientError::TimeoutError(e)) => {
                tracing::debug!("{} timed out: {e}", spec.label);
                CallResult::failed(CallFailure::Timeout)
            }
            Err(HttpClientError::Error(e)) => {
                tracing::debug!("{} failed: {e}", spec.label);
                CallResult::failed(CallFailure::Network)
            }
        }
    }
}
