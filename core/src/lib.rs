//! Async client for the Mailchimp marketing API (v3.0).
//!
//! # Overview
//! Every typed operation funnels through one dispatcher on `Client`: it
//! builds the request (endpoint, path, query string, JSON body, basic
//! auth), sends it over a pluggable `Transport`, classifies the response
//! and decodes success bodies into typed entities. Entities that expose
//! follow-on operations (`campaign.send(..)`, `store.products(..)`) come
//! back wired to the client that fetched them.
//!
//! # Design
//! - The wire types in `http` are plain data; `Transport` is the only seam
//!   that performs I/O, so tests script it with a recording double.
//! - All calls take a `CancellationToken`. Cancelling it aborts the
//!   in-flight exchange and yields `ApiError::Transport(Cancelled)`.
//! - Errors are values: validation, transport, structured API problem,
//!   raw HTTP failure, decode and serialization failures are distinct
//!   variants of `ApiError`.
//!
//! ```no_run
//! # async fn run() -> Result<(), chimp_core::ApiError> {
//! use chimp_core::{CancellationToken, Client};
//!
//! let client = Client::new("0123456789abcdef-us6")?;
//! let cancel = CancellationToken::new();
//! let campaigns = client.get_campaigns(&cancel, None).await?;
//! for campaign in &campaigns.campaigns {
//!     println!("{} {}", campaign.id, campaign.status);
//! }
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod params;
pub mod resource;
pub mod resources;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use client::{Client, Ping, Request};
pub use config::ClientConfig;
pub use error::{ApiError, FieldError, ProblemDetail, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{
    BasicQueryParams, CampaignQueryParams, ExtendedQueryParams, ListQueryParams, MemberQueryParams, QueryParams,
    SearchMembersQueryParams,
};
pub use resource::{Link, ParentKeys, Resource};
pub use tokio_util::sync::CancellationToken;
pub use transport::{ReqwestTransport, Transport};
