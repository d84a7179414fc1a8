//! Request dispatcher for the marketing API.
//!
//! # Design
//! `Client` is a cheap handle around immutable configuration and a shared
//! `Transport`. One call runs build → send → classify → decode:
//!
//! - `build_request` turns a `Request` descriptor into a complete
//!   `HttpRequest` (URL with query string, JSON content type, basic auth).
//!   It does no I/O, so the wire shape can be checked in isolation.
//! - The transport future is raced against the caller's
//!   `CancellationToken`; losing the race drops the in-flight exchange.
//! - `classify` decides success or failure from status and body.
//! - On success the body is decoded into a temporary, back-references are
//!   wired through `Resource::attach`, and only then is the output slot
//!   written.
//!
//! Nothing is cached between calls; concurrent calls share only the
//! transport's connection pool.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::classify::{classify, Outcome};
use crate::config::ClientConfig;
use crate::error::{ApiError, TransportError};
use crate::http::{HttpMethod, HttpRequest};
use crate::params::{encode_query, QueryParams};
use crate::resource::{ParentKeys, Resource};
use crate::transport::{ReqwestTransport, Transport};

/// The service ignores the username half of the basic-auth pair.
pub const AUTH_USERNAME: &str = "chimp";

/// One logical call, described before it is sent.
pub struct Request<'a> {
    pub method: HttpMethod,
    /// Path relative to the endpoint, starting with `/`.
    pub path: String,
    pub params: Option<&'a dyn QueryParams>,
    /// Pre-serialized JSON payload.
    pub body: Option<String>,
    pub parent: ParentKeys,
}

impl<'a> Request<'a> {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: None,
            body: None,
            parent: ParentKeys::default(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn params(mut self, params: &'a dyn QueryParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Attach an optional typed parameter source.
    pub fn query<P: QueryParams>(mut self, params: Option<&'a P>) -> Self {
        self.params = params.map(|p| p as &dyn QueryParams);
        self
    }

    /// Serialize `body` as the JSON payload.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let encoded = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.body = Some(encoded);
        Ok(self)
    }

    pub fn parent(mut self, parent: ParentKeys) -> Self {
        self.parent = parent;
        self
    }
}

struct Inner {
    endpoint: String,
    authorization: String,
    debug: AtomicBool,
    transport: Arc<dyn Transport>,
}

/// Handle to the API. Clones share the same configuration and transport.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.inner.endpoint)
            .field("debug", &self.debug())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Client for `api_key`, with the endpoint derived from its datacenter.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ApiError> {
        Self::from_config(ClientConfig::new(api_key))
    }

    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_config(ClientConfig::from_env()?)
    }

    pub fn from_config(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.timeout, &config.user_agent)
            .map_err(|e| ApiError::Config(e.to_string()))?;
        Self::with_transport(config, Arc::new(transport))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self, ApiError> {
        let endpoint = config.resolve_endpoint()?;
        let credentials = STANDARD.encode(format!("{AUTH_USERNAME}:{}", config.api_key));
        Ok(Self {
            inner: Arc::new(Inner {
                endpoint,
                authorization: format!("Basic {credentials}"),
                debug: AtomicBool::new(config.debug),
                transport,
            }),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    pub fn debug(&self) -> bool {
        self.inner.debug.load(Ordering::Relaxed)
    }

    /// Toggle body logging for every clone of this client.
    pub fn set_debug(&self, debug: bool) {
        self.inner.debug.store(debug, Ordering::Relaxed);
    }

    /// Build the wire request for `request` without sending it.
    pub fn build_request(&self, request: &Request<'_>) -> HttpRequest {
        let mut url = format!("{}{}", self.inner.endpoint, request.path);
        if let Some(query) = request.params.and_then(encode_query) {
            url.push('?');
            url.push_str(&query);
        }
        HttpRequest {
            method: request.method,
            url,
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("authorization".to_string(), self.inner.authorization.clone()),
            ],
            body: request.body.clone(),
        }
    }

    /// Run `request` and discard any response body.
    pub async fn execute(&self, cancel: &CancellationToken, request: Request<'_>) -> Result<(), ApiError> {
        self.dispatch(cancel, &request).await.map(|_| ())
    }

    /// Run `request` and decode a non-empty success body into `out`.
    ///
    /// `out` is only written when decoding succeeds. An empty 2xx body
    /// leaves it as it was.
    pub async fn execute_into<T>(
        &self,
        cancel: &CancellationToken,
        request: Request<'_>,
        out: &mut T,
    ) -> Result<(), ApiError>
    where
        T: DeserializeOwned + Resource,
    {
        match self.dispatch(cancel, &request).await? {
            Outcome::Empty => Ok(()),
            Outcome::Body(body) => {
                let mut decoded: T =
                    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
                decoded.attach(self, &request.parent);
                *out = decoded;
                Ok(())
            }
        }
    }

    /// `execute_into` over a default value.
    pub async fn fetch<T>(&self, cancel: &CancellationToken, request: Request<'_>) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Resource + Default,
    {
        let mut out = T::default();
        self.execute_into(cancel, request, &mut out).await?;
        Ok(out)
    }

    /// Bodiless call whose only interesting result is whether it worked.
    pub async fn execute_ok(
        &self,
        cancel: &CancellationToken,
        method: HttpMethod,
        path: impl Into<String>,
    ) -> Result<bool, ApiError> {
        self.execute(cancel, Request::new(method, path)).await?;
        Ok(true)
    }

    /// `GET /ping`.
    pub async fn ping(&self, cancel: &CancellationToken) -> Result<Ping, ApiError> {
        self.fetch(cancel, Request::get("/ping")).await
    }

    async fn dispatch(&self, cancel: &CancellationToken, request: &Request<'_>) -> Result<Outcome, ApiError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled.into());
        }

        let http = self.build_request(request);
        let debug = self.debug();
        if debug {
            debug!(method = %http.method, url = %http.url, body = ?http.body, "sending request");
        } else {
            debug!(method = %http.method, path = %request.path, "sending request");
        }

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(method = %request.method, path = %request.path, "request cancelled");
                return Err(TransportError::Cancelled.into());
            }
            result = self.inner.transport.send(http) => result?,
        };

        if debug {
            debug!(status = response.status, body = %response.body, "received response");
        } else {
            debug!(status = response.status, len = response.body.len(), "received response");
        }

        let outcome = classify(response);
        if let Err(err) = &outcome {
            warn!(method = %request.method, path = %request.path, error = %err, "request failed");
        }
        outcome
    }
}

/// Body of `GET /ping`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ping {
    #[serde(default)]
    pub health_status: String,
}

impl Resource for Ping {}
