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

//! A shared asynchronous HTTP client implementation over [`reqwest`].
//!
//! This module defines and implements the [`HttpClient`] used by all benchmark
//! workers. The client owns a single `reqwest` client (and thereby a single
//! connection pool) which is safe for concurrent use; cloning an [`HttpClient`]
//! is cheap and shares the underlying pool.
//!
//! Transport failures map onto [`HttpClientError`]: a request that exceeds its
//! deadline becomes [`HttpClientError::TimeoutError`], any other connection or
//! protocol failure becomes [`HttpClientError::Error`]. Responses with non-2xx
//! statuses are returned as [`HttpResponse`] values, never as errors.

use std::{collections::HashMap, sync::Arc, time::Duration};

use bytes::Bytes;
use reqwest::{
    Method, StatusCode,
    multipart::{Form, Part},
};
use thiserror::Error;

/// User agent sent with every request unless overridden by a default header.
pub const BARRAGE_USER_AGENT: &str = concat!("barrage/", env!("CARGO_PKG_VERSION"));

/// A typed error for HTTP transport failures.
///
/// Only transport-level conditions surface here; response status handling is
/// the caller's concern.
#[derive(Debug, Clone, Error)]
pub enum HttpClientError {
    /// A connection or protocol failure (DNS, refused connection, reset, etc).
    #[error("HTTP error occurred: {0}")]
    Error(String),

    /// The request did not complete within its deadline.
    #[error("HTTP request timed out: {0}")]
    TimeoutError(String),
}

impl From<reqwest::Error> for HttpClientError {
    fn from(source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::TimeoutError(source.to_string())
        } else {
            Self::Error(source.to_string())
        }
    }
}

/// Represents the response for a completed HTTP request.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The response headers as a map of key-value pairs.
    pub headers: HashMap<String, String>,
    /// The body of the response as raw bytes.
    pub body: Bytes,
}

impl HttpResponse {
    /// Returns `true` if the status code is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Internal client wrapping the `reqwest` client and default headers.
///
/// Requests are issued with the default headers merged under any per-call
/// headers (per-call values win on key collision).
#[derive(Debug)]
pub struct InnerHttpClient {
    client: reqwest::Client,
    headers: HashMap<String, String>,
}

impl Default for InnerHttpClient {
    fn default() -> Self {
        Self::new(HashMap::new(), None)
    }
}

impl InnerHttpClient {
    /// Creates a new [`InnerHttpClient`] with the given default `headers` and
    /// optional default request timeout in seconds.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest` client cannot be constructed
    /// (static TLS/runtime misconfiguration).
    #[must_use]
    pub fn new(headers: HashMap<String, String>, timeout_secs: Option<u64>) -> Self {
        let mut builder = reqwest::Client::builder().user_agent(BARRAGE_USER_AGENT);
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().expect("Failed to build reqwest client");

        Self { client, headers }
    }

    /// Sends an HTTP request and collects the full response body.
    ///
    /// A `timeout_secs` value overrides the client default for this call only.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails at the transport level or exceeds
    /// its deadline. Non-2xx statuses are returned in the [`HttpResponse`].
    pub async fn send_request(
        &self,
        method: Method,
        url: String,
        headers: Option<HashMap<String, String>>,
        body: Option<Bytes>,
        timeout_secs: Option<u64>,
    ) -> Result<HttpResponse, HttpClientError> {
        tracing::trace!("Sending {method} {url}");

        let mut request = self.client.request(method, &url);

        for (key, value) in &self.headers {
            request = request.header(key.as_str(), value.as_str());
        }
        if let Some(headers) = headers {
            for (key, value) in headers {
                request = request.header(key, value);
            }
        }
        if let Some(secs) = timeout_secs {
            request = request.timeout(Duration::from_secs(secs));
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        self.collect_response(response).await
    }

    /// Sends a multipart POST with a single file part.
    ///
    /// # Errors
    ///
    /// Returns an error if `content_type` is not a valid MIME type, or if the
    /// request fails at the transport level or exceeds its deadline.
    pub async fn send_multipart(
        &self,
        url: String,
        field_name: String,
        file_name: String,
        content_type: &str,
        data: Bytes,
        timeout_secs: Option<u64>,
    ) -> Result<HttpResponse, HttpClientError> {
        tracing::trace!("Sending multipart POST {url}");

        let part = Part::bytes(data.to_vec())
            .file_name(file_name)
            .mime_str(content_type)
            .map_err(|e| HttpClientError::Error(e.to_string()))?;
        let form = Form::new().part(field_name, part);

        let mut request = self.client.post(&url).multipart(form);
        if let Some(secs) = timeout_secs {
            request = request.timeout(Duration::from_secs(secs));
        }

        let response = request.send().await?;
        self.collect_response(response).await
    }

    async fn collect_response(
        &self,
        response: reqwest::Response,
    ) -> Result<HttpResponse, HttpClientError> {
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_owned())))
            .collect();
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// A shared HTTP client for issuing benchmark requests.
///
/// Cloning is cheap: all clones share the same inner client and connection
/// pool, which `reqwest` guarantees to be safe for concurrent use.
#[derive(Clone, Debug, Default)]
pub struct HttpClient {
    inner: Arc<InnerHttpClient>,
}

impl HttpClient {
    /// Creates a new [`HttpClient`] with the given default `headers` and
    /// optional default request timeout in seconds.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest` client cannot be constructed, see
    /// [`InnerHttpClient::new`].
    #[must_use]
    pub fn new(headers: HashMap<String, String>, timeout_secs: Option<u64>) -> Self {
        Self {
            inner: Arc::new(InnerHttpClient::new(headers, timeout_secs)),
        }
    }

    /// Sends an HTTP request, see [`InnerHttpClient::send_request`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails at the transport level or exceeds
    /// its deadline.
    pub async fn request(
        &self,
        method: Method,
        url: String,
        headers: Option<HashMap<String, String>>,
        body: Option<Bytes>,
        timeout_secs: Option<u64>,
    ) -> Result<HttpResponse, HttpClientError> {
        self.inner
            .send_request(method, url, headers, body, timeout_secs)
            .await
    }

    /// Sends a multipart POST with a single file part, see
    /// [`InnerHttpClient::send_multipart`].
    ///
    /// # Errors
    ///
    /// Returns an error if the part is invalid or the request fails at the
    /// transport level.
    pub async fn post_multipart(
        &self,
        url: String,
        field_name: String,
        file_name: String,
        content_type: &str,
        data: Bytes,
        timeout_secs: Option<u64>,
    ) -> Result<HttpResponse, HttpClientError> {
        self.inner
            .send_multipart(url, field_name, file_name, content_type, data, timeout_secs)
            .await
    }
}
