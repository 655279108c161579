//! Async HTTP client for the requirements automation backend.
//!
//! # Overview
//! Hosts the I/O that `jobapi-core` leaves out: `JobApiClient` builds each
//! request with `JobApi`, executes it through a `Transport`, and reads the
//! response back with `JobApi`.
//!
//! ```rust,no_run
//! use jobapi_client::{file_part_from_path, ClientConfig, JobApiClient};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let client = JobApiClient::new(&ClientConfig::from_env());
//! let job = client.upload_file(file_part_from_path("requirements.csv").await?).await?;
//! if let Some(id) = job.id() {
//!     client.parse_job(id).await?;
//!     client.generate_job(id).await?;
//!     client.execute_job(id).await?;
//!     println!("{}", client.allure_index_url(id));
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod transport;

pub use client::{file_part_from_path, JobApiClient};
pub use transport::{ReqwestTransport, Transport};

pub use jobapi_core::{
    ApiError, ApiResult, ArtifactList, ClientConfig, FilePart, HealthStatus, JobDocument, JobId,
    Operation, RunDocument, RunId,
};
