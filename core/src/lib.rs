//! Typed client for the iTwins REST service.
//!
//! # Overview
//! Builds `HttpRequest` values for every iTwins operation (iTwins,
//! favorites, recents, repositories, repository resources, exports and
//! images), executes them through a pluggable `Transport`, and normalizes
//! each response into a uniform `ApiResponse` envelope.
//!
//! # Design
//! - `ITwinsClient` is stateless and does no I/O: `build_*` methods only.
//! - `ITwinsAccessClient` composes builder, transport and normalizer; one
//!   method per operation, one HTTP round-trip per call.
//! - 4xx answers are business errors and keep their status and error.
//!   Transport failures, 5xx answers and undecodable success bodies all
//!   become the same internal-error envelope.
//! - Pagination is not followed automatically; `ApiResponse::next_link`
//!   exposes the HAL `next` href.

pub mod access;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod query;
pub mod transport;
pub mod types;

pub use access::ITwinsAccessClient;
pub use client::ITwinsClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL, URL_PREFIX_ENV};
pub use envelope::{normalize, normalize_empty, ApiErrorBody, ApiResponse, ErrorDetail, Link, Links};
pub use error::ClientError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use query::{BaseQueryArg, ITwinsQueryArg, QueryArg, QueryScope, RepositoryQueryArg, ResultMode};
pub use transport::{Transport, UreqTransport};
pub use types::*;
