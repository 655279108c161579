//! In-memory stand-in for the requirements automation backend.
//!
//! Serves the same routes as the real service with canned behavior: parse
//! turns each data row of the uploaded CSV into a requirement, generate
//! records artifacts, execute records a passing run, and the Allure routes
//! serve a placeholder report for the latest run.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Requirement {
    pub id: u64,
    pub job_id: u64,
    pub title: String,
    pub priority: Option<String>,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Artifact {
    pub id: u64,
    pub job_id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunStep {
    pub name: String,
    pub status: String,
    pub log: String,
    pub order_index: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Run {
    pub id: u64,
    pub job_id: u64,
    pub status: String,
    pub summary: Option<String>,
    pub allure_results_path: Option<String>,
    pub allure_report_path: Option<String>,
    pub steps: Vec<RunStep>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Job {
    pub id: u64,
    pub filename: String,
    pub original_path: String,
    pub status: String,
    pub notes: Option<String>,
    pub requirements: Vec<Requirement>,
    pub artifacts: Vec<Artifact>,
    pub runs: Vec<Run>,
    #[serde(skip)]
    content: String,
}

#[derive(Debug, Default)]
pub struct Backend {
    jobs: BTreeMap<u64, Job>,
    next_job_id: u64,
    next_requirement_id: u64,
    next_artifact_id: u64,
    next_run_id: u64,
}

impl Backend {
    fn job_mut(&mut self, id: u64) -> Result<&mut Job, ApiFailure> {
        self.jobs
            .get_mut(&id)
            .ok_or(ApiFailure::not_found("Job not found"))
    }

    fn artifact(&mut self, job_id: u64, kind: &str, path: String) -> Artifact {
        self.next_artifact_id += 1;
        Artifact {
            id: self.next_artifact_id,
            job_id,
            kind: kind.to_string(),
            path,
        }
    }
}

pub type Db = Arc<RwLock<Backend>>;

/// Error response shaped like the backend's: `{code, status, message}`.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: &'static str,
}

impl ApiFailure {
    fn not_found(message: &'static str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message,
        }
    }

    fn bad_request(message: &'static str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = json!({
            "code": self.status.as_u16(),
            "status": self.status.canonical_reason().unwrap_or_default(),
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Backend::default()));
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/upload", post(upload))
        .route("/api/parse/{id}", post(parse_job))
        .route("/api/generate/{id}", post(generate_job))
        .route("/api/execute/{id}", post(execute_job))
        .route("/api/artifacts/{id}", get(list_artifacts))
        .route("/api/jobs/{id}/allure/{*path}", get(latest_allure_file))
        .route("/api/allure/{job_id}/{run_id}/report/{*path}", get(run_allure_file))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Healthy",
        "service": "Requirements Automation API",
        "health": "ok",
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "message": "Healthy" }))
}

async fn upload(State(db): State<Db>, mut multipart: Multipart) -> Result<Json<Job>, ApiFailure> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiFailure::bad_request("Malformed multipart body"))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| ApiFailure::bad_request("Malformed multipart body"))?;
        file = Some((filename, bytes));
    }

    let (filename, bytes) = file.ok_or(ApiFailure::bad_request("No file part in the request"))?;
    if filename.is_empty() {
        return Err(ApiFailure::bad_request("Empty filename"));
    }

    let mut backend = db.write().await;
    backend.next_job_id += 1;
    let id = backend.next_job_id;
    let job = Job {
        id,
        original_path: format!("storage/uploads/{filename}"),
        filename,
        status: "uploaded".to_string(),
        notes: None,
        requirements: Vec::new(),
        artifacts: Vec::new(),
        runs: Vec::new(),
        content: String::from_utf8_lossy(&bytes).into_owned(),
    };
    tracing::debug!(job_id = id, filename = %job.filename, "job uploaded");
    backend.jobs.insert(id, job.clone());
    Ok(Json(job))
}

/// Split uploaded CSV text into `(title, priority)` rows. The first non-empty
/// line is the header; `title` and `priority` columns are located by name,
/// with the first column standing in for a missing `title`.
fn parse_rows(content: &str) -> Vec<(String, Option<String>)> {
    let mut lines = content.lines().map(str::trim).filter(|line| !line.is_empty());
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let columns: Vec<String> = header.split(',').map(|c| c.trim().to_lowercase()).collect();
    let title_idx = columns.iter().position(|c| c == "title").unwrap_or(0);
    let priority_idx = columns.iter().position(|c| c == "priority");

    lines
        .filter_map(|line| {
            let cells: Vec<&str> = line.split(',').map(str::trim).collect();
            let title = cells.get(title_idx).filter(|t| !t.is_empty())?.to_string();
            let priority = priority_idx
                .and_then(|idx| cells.get(idx))
                .filter(|p| !p.is_empty())
                .map(|p| p.to_string());
            Some((title, priority))
        })
        .collect()
}

async fn parse_job(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Job>, ApiFailure> {
    let mut backend = db.write().await;
    let rows = parse_rows(&backend.job_mut(id)?.content);

    let mut requirements = Vec::with_capacity(rows.len());
    for (title, priority) in rows {
        backend.next_requirement_id += 1;
        requirements.push(Requirement {
            id: backend.next_requirement_id,
            job_id: id,
            title,
            priority,
            status: "parsed".to_string(),
        });
    }
    let artifact = backend.artifact(id, "parsed", format!("storage/artifacts/job_{id}/parsed.json"));

    let job = backend.job_mut(id)?;
    job.requirements = requirements;
    job.artifacts.push(artifact);
    job.status = "parsed".to_string();
    Ok(Json(job.clone()))
}

async fn generate_job(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Job>, ApiFailure> {
    let mut backend = db.write().await;
    let requirement_count = backend.job_mut(id)?.requirements.len();

    let base = format!("storage/generated/job_{id}");
    let mut artifacts = vec![
        backend.artifact(id, "pom", format!("{base}/pages")),
        backend.artifact(id, "testcases", format!("{base}/testcases.json")),
    ];
    for n in 1..=requirement_count {
        artifacts.push(backend.artifact(id, "script", format!("{base}/tests/test_req_{n}.py")));
    }

    let job = backend.job_mut(id)?;
    job.artifacts.extend(artifacts);
    job.status = "generated".to_string();
    Ok(Json(job.clone()))
}

async fn execute_job(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Run>, ApiFailure> {
    let mut backend = db.write().await;
    let generated = backend
        .job_mut(id)?
        .artifacts
        .iter()
        .any(|a| a.kind == "testcases");
    if !generated {
        return Err(ApiFailure::not_found(
            "No generated tests found; run generation first.",
        ));
    }

    backend.next_run_id += 1;
    let run_id = backend.next_run_id;
    let steps = [
        ("prepare", "Preparation complete"),
        ("pytest", "Executing pytest"),
        ("allure", "Allure report generation attempted"),
    ]
    .into_iter()
    .zip(0..)
    .map(|((name, log), order_index)| RunStep {
        name: name.to_string(),
        status: "passed".to_string(),
        log: log.to_string(),
        order_index,
    })
    .collect();
    let run = Run {
        id: run_id,
        job_id: id,
        status: "passed".to_string(),
        summary: Some("Pytest return code: 0".to_string()),
        allure_results_path: Some(format!("storage/allure-results/job_{id}_run_{run_id}")),
        allure_report_path: Some(format!("storage/allure-report/job_{id}_run_{run_id}")),
        steps,
    };

    backend.job_mut(id)?.runs.push(run.clone());
    tracing::debug!(job_id = id, run_id, "run recorded");
    Ok(Json(run))
}

async fn list_artifacts(State(db): State<Db>, Path(id): Path<u64>) -> Json<Vec<Artifact>> {
    let backend = db.read().await;
    let artifacts = backend
        .jobs
        .get(&id)
        .map(|job| job.artifacts.clone())
        .unwrap_or_default();
    Json(artifacts)
}

fn report_page(run: &Run, path: &str) -> Result<Html<String>, ApiFailure> {
    if path != "index.html" {
        return Err(ApiFailure::not_found("File not found"));
    }
    Ok(Html(format!(
        "<!DOCTYPE html><html><head><title>Allure Report</title></head>\
         <body><h1>Job {} run {}: {}</h1></body></html>",
        run.job_id, run.id, run.status
    )))
}

async fn latest_allure_file(
    State(db): State<Db>,
    Path((id, path)): Path<(u64, String)>,
) -> Result<Html<String>, ApiFailure> {
    let backend = db.read().await;
    let run = backend
        .jobs
        .get(&id)
        .and_then(|job| job.runs.iter().max_by_key(|run| run.id))
        .ok_or(ApiFailure::not_found("No runs found for job"))?;
    report_page(run, &path)
}

async fn run_allure_file(
    State(db): State<Db>,
    Path((job_id, run_id, path)): Path<(u64, u64, String)>,
) -> Result<Html<String>, ApiFailure> {
    let backend = db.read().await;
    let run = backend
        .jobs
        .get(&job_id)
        .and_then(|job| job.runs.iter().find(|run| run.id == run_id))
        .ok_or(ApiFailure::not_found("Run not found"))?;
    report_page(run, &path)
}
