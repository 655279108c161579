//! Async client for the requirements automation backend.
//!
//! # Design
//! `JobApiClient` pairs the I/O-free `JobApi` with a `Transport`. Every
//! request-issuing operation is `build_*`, one `send`, then `read_*`; no
//! retries, no timeout override, and no ordering between calls. Chaining
//! upload → parse → generate → execute is left to the caller.

use std::path::Path;

use jobapi_core::{
    ApiResult, ArtifactList, ClientConfig, FilePart, HealthStatus, JobApi, JobDocument, JobId,
    RunDocument, RunId,
};

use crate::transport::{ReqwestTransport, Transport};

#[derive(Debug, Clone)]
pub struct JobApiClient<T = ReqwestTransport> {
    api: JobApi,
    transport: T,
}

impl JobApiClient<ReqwestTransport> {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl<T: Transport> JobApiClient<T> {
    pub fn with_transport(config: &ClientConfig, transport: T) -> Self {
        Self {
            api: JobApi::from_config(config),
            transport,
        }
    }

    pub fn api(&self) -> &JobApi {
        &self.api
    }

    /// Upload a requirements file; the backend answers with the new job.
    pub async fn upload_file(&self, file: FilePart) -> ApiResult<JobDocument> {
        let response = self.transport.send(self.api.build_upload(file)).await?;
        self.api.read_upload(response)
    }

    pub async fn parse_job(&self, job_id: JobId) -> ApiResult<JobDocument> {
        let response = self.transport.send(self.api.build_parse(job_id)).await?;
        self.api.read_parse(response)
    }

    pub async fn generate_job(&self, job_id: JobId) -> ApiResult<JobDocument> {
        let response = self.transport.send(self.api.build_generate(job_id)).await?;
        self.api.read_generate(response)
    }

    pub async fn execute_job(&self, job_id: JobId) -> ApiResult<RunDocument> {
        let response = self.transport.send(self.api.build_execute(job_id)).await?;
        self.api.read_execute(response)
    }

    pub async fn health(&self) -> ApiResult<HealthStatus> {
        let response = self.transport.send(self.api.build_health()).await?;
        self.api.read_health(response)
    }

    pub async fn list_artifacts(&self, job_id: JobId) -> ApiResult<ArtifactList> {
        let response = self.transport.send(self.api.build_list_artifacts(job_id)).await?;
        self.api.read_list_artifacts(response)
    }

    /// No request is issued.
    pub fn allure_index_url(&self, job_id: JobId) -> String {
        self.api.allure_index_url(job_id)
    }

    pub fn allure_run_report_url(&self, job_id: JobId, run_id: RunId, path: &str) -> String {
        self.api.allure_run_report_url(job_id, run_id, path)
    }
}

/// Read a requirements file from disk into an upload part, tagging the
/// spreadsheet formats the backend accepts with their MIME type.
pub async fn file_part_from_path(path: impl AsRef<Path>) -> std::io::Result<FilePart> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let part = FilePart::upload(file_name, bytes);
    Ok(match content_type_for(path) {
        Some(content_type) => part.with_content_type(content_type),
        None => part,
    })
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "csv" => Some("text/csv"),
        "xls" => Some("application/vnd.ms-excel"),
        "xlsx" => Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        _ => None,
    }
}
