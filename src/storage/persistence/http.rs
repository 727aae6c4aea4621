//! HTTP text store.
//!
//! Proxies the store contract to a remote tir server:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | read | `GET /texts/:id` |
//! | upsert | `GET /texts/:id`, then `POST /texts` or `PATCH /texts/:id` |
//! | delete | `DELETE /texts/:id` |
//! | list | `GET /texts?format=application/json` |
//!
//! A bearer token is sent with every request when an API secret is set.
//!
//! # Limitations
//!
//! The server has separate create and update routes, so upsert reads first
//! to pick one. Two clients upserting the same new ID can both see 404 and
//! both POST; the loser's error (a 409 surfaces as [`Error::Conflict`]) is
//! returned as-is.
//!
//! The server's create route assigns its own ID and its update route merges
//! non-empty fields, so what comes back from upsert is the server's record,
//! not necessarily the one sent.

use crate::config::StoreTimeouts;
use crate::models::{Comparator, Direction, Text, TextId, sort};
use crate::storage::metrics::{record_operation_metrics, status_of};
use crate::storage::traits::TextStore;
use crate::{Error, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{Method, StatusCode, Url, header};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::instrument;

/// Text store backed by a remote tir server.
#[derive(Debug)]
pub struct HttpStore {
    base_url: Url,
    api_secret: Option<SecretString>,
    client: Client,
    ping_timeout: Duration,
}

/// Builds a blocking HTTP client with the store's timeouts.
///
/// Every request is bounded by the operation timeout; connecting is bounded
/// by the ping timeout.
///
/// # Errors
///
/// Returns [`Error::BackendUnavailable`] if the client cannot be built, for
/// instance when the TLS backend fails to initialize.
pub fn build_http_client(timeouts: StoreTimeouts) -> Result<Client> {
    Client::builder()
        .timeout(timeouts.operation)
        .connect_timeout(timeouts.ping)
        .build()
        .map_err(|e| {
            tracing::warn!(backend = "http", error = %e, "Failed to build HTTP client");
            Error::BackendUnavailable {
                backend: "http".to_string(),
                cause: format!("cannot build client: {e}"),
            }
        })
}

impl HttpStore {
    /// Creates a store for the server at `base_url` without contacting it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `base_url` is not an absolute URL
    /// that can have path segments appended, and
    /// [`Error::BackendUnavailable`] if no HTTP client can be built.
    pub fn new(
        base_url: &str,
        api_secret: Option<SecretString>,
        timeouts: StoreTimeouts,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::InvalidInput(format!("invalid base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidInput(format!(
                "invalid base URL '{base_url}': cannot have a path"
            )));
        }

        Ok(Self {
            base_url,
            api_secret,
            client: build_http_client(timeouts)?,
            ping_timeout: timeouts.ping,
        })
    }

    /// Creates a store and checks that the server is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a bad URL and
    /// [`Error::BackendUnavailable`] if the server does not answer within the
    /// ping timeout.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use tiir::{HttpStore, StoreTimeouts};
    ///
    /// let store = HttpStore::connect("https://tir.example.com", None, StoreTimeouts::default())?;
    /// # Ok::<(), tiir::Error>(())
    /// ```
    pub fn connect(
        base_url: &str,
        api_secret: Option<SecretString>,
        timeouts: StoreTimeouts,
    ) -> Result<Self> {
        let store = Self::new(base_url, api_secret, timeouts)?;
        store.probe()?;
        tracing::debug!(base_url = %store.base_url, "Connected to tir server");
        Ok(store)
    }

    /// Returns the server's base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a list request bounded by the ping timeout.
    ///
    /// Any HTTP response counts as reachable; only transport failures fail.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackendUnavailable`] on timeout or connection failure.
    pub fn probe(&self) -> Result<()> {
        let url = self.list_url()?;
        self.request(Method::GET, url)
            .timeout(self.ping_timeout)
            .send()
            .map_err(|e| {
                tracing::warn!(backend = "http", error = %e, "tir server probe failed");
                Error::BackendUnavailable {
                    backend: "http".to_string(),
                    cause: e.to_string(),
                }
            })?;
        Ok(())
    }

    /// `{base}/texts` or `{base}/texts/{id}`.
    fn endpoint(&self, id: Option<&TextId>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                Error::InvalidInput(format!("invalid base URL '{}'", self.base_url))
            })?;
            segments.pop_if_empty().push("texts");
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }

    fn list_url(&self) -> Result<Url> {
        let mut url = self.endpoint(None)?;
        url.query_pairs_mut()
            .append_pair("format", "application/json");
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(header::CONTENT_TYPE, "application/json");
        match &self.api_secret {
            Some(secret) => builder.bearer_auth(secret.expose_secret()),
            None => builder,
        }
    }

    /// Sends `request`, classifying transport failures.
    fn send(&self, operation: &'static str, request: RequestBuilder) -> Result<Response> {
        request.send().map_err(|e| {
            let error_kind = if e.is_timeout() {
                "timeout"
            } else if e.is_connect() {
                "connect"
            } else if e.is_request() {
                "request"
            } else {
                "unknown"
            };
            tracing::error!(
                backend = "http",
                operation,
                base_url = %self.base_url,
                error = %e,
                error_kind = error_kind,
                "Request to tir server failed"
            );
            Error::OperationFailed {
                operation: format!("http_{operation}"),
                cause: format!("{error_kind} error: {e}"),
            }
        })
    }
}

/// Turns a non-2xx response into an error carrying the response body.
fn check_status(operation: &'static str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    tracing::warn!(
        backend = "http",
        operation,
        status = %status,
        body = %body,
        "tir server returned error status"
    );
    let message = format!("server responded {}: {body}", status.as_u16());
    if status == StatusCode::CONFLICT {
        return Err(Error::Conflict(message));
    }
    Err(Error::OperationFailed {
        operation: format!("http_{operation}"),
        cause: message,
    })
}

fn decode<T: DeserializeOwned>(operation: &'static str, response: Response) -> Result<T> {
    response.json().map_err(|e| Error::OperationFailed {
        operation: format!("http_{operation}"),
        cause: format!("error decoding response: {e}"),
    })
}

/// Decodes a single text and rejects it if it fails validation.
fn decode_text(operation: &'static str, response: Response) -> Result<Text> {
    let text: Text = decode(operation, response)?;
    text.validate().map_err(|e| Error::OperationFailed {
        operation: format!("http_{operation}"),
        cause: format!("result is invalid text: {e}"),
    })?;
    Ok(text)
}

impl TextStore for HttpStore {
    #[instrument(skip(self), fields(operation = "read", backend = "http", text.id = %id))]
    fn read(&self, id: &TextId) -> Result<Text> {
        let start = Instant::now();
        let result = (|| {
            let url = self.endpoint(Some(id))?;
            let response = self.send("read", self.request(Method::GET, url))?;
            if response.status() == StatusCode::NOT_FOUND {
                return Err(Error::NotFound(id.clone()));
            }
            decode_text("read", check_status("read", response)?)
        })();

        record_operation_metrics("http", "read", start, status_of(&result));
        result
    }

    #[instrument(skip(self, text), fields(operation = "upsert", backend = "http", text.id = %text.id))]
    fn upsert(&self, text: Text) -> Result<Text> {
        let start = Instant::now();
        let result = (|| {
            let (method, url) = match self.read(&text.id) {
                Ok(_) => (Method::PATCH, self.endpoint(Some(&text.id))?),
                Err(e) if e.is_not_found() => (Method::POST, self.endpoint(None)?),
                Err(e) => return Err(e.context("unexpected error")),
            };
            tracing::debug!(method = %method, "Writing text to tir server");

            let response = self.send("upsert", self.request(method, url).json(&text))?;
            decode_text("upsert", check_status("upsert", response)?)
        })();

        record_operation_metrics("http", "upsert", start, status_of(&result));
        result
    }

    #[instrument(skip(self), fields(operation = "delete", backend = "http", text.id = %id))]
    fn delete(&self, id: &TextId) -> Result<Text> {
        let start = Instant::now();
        let result = (|| {
            let url = self.endpoint(Some(id))?;
            let response = self.send("delete", self.request(Method::DELETE, url))?;
            if response.status() == StatusCode::NOT_FOUND {
                return Err(Error::NotFound(id.clone()));
            }
            decode("delete", check_status("delete", response)?)
        })();

        record_operation_metrics("http", "delete", start, status_of(&result));
        result
    }

    #[instrument(skip(self, comparator), fields(operation = "list", backend = "http"))]
    fn list(&self, comparator: Comparator, direction: Direction) -> Result<Vec<Text>> {
        let start = Instant::now();
        let result = (|| {
            let request = self
                .request(Method::GET, self.list_url()?)
                .header(header::ACCEPT, "application/json");
            let response = check_status("list", self.send("list", request)?)?;
            let mut texts: Vec<Text> = decode("list", response)?;
            sort(&mut texts, comparator, direction);
            Ok(texts)
        })();

        record_operation_metrics("http", "list", start, status_of(&result));
        result
    }

    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
