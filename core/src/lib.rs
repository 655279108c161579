//! Synchronous API client core for the requirements automation backend.
//!
//! # Overview
//! Builds `HttpRequest` values and reads `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `JobApi` is stateless; it holds only the base address.
//! - Each backend operation is split into `build_*` (produces request) and
//!   `read_*` (consumes response), so the I/O boundary is explicit.
//! - Configuration is an explicit `ClientConfig` value; resolving it from
//!   the environment is a single opt-in call.
//! - Job and run documents stay opaque JSON; the mock-server crate defines
//!   its own shapes and integration tests catch drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use client::JobApi;
pub use config::{ClientConfig, API_BASE_ENV, DEFAULT_API_BASE};
pub use error::{ApiError, ApiResult, Operation};
pub use http::{FilePart, HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use types::{ArtifactList, HealthStatus, JobDocument, JobId, RunDocument, RunId};
