use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Artifact, Job, Run};
use tower::ServiceExt;

const BOUNDARY: &str = "mock-server-test-boundary";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn multipart_request(field: &str, filename: &str, content: &str) -> Request<String> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {content}\r\n\
         --{BOUNDARY}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(body)
        .unwrap()
}

fn post(uri: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(String::new())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- health ---

#[tokio::test]
async fn health_reports_healthy() {
    let resp = app().oneshot(get("/api/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["message"], "Healthy");
}

// --- upload ---

#[tokio::test]
async fn upload_creates_job() {
    let resp = app()
        .oneshot(multipart_request("file", "reqs.csv", "title\nLogin works"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let job: Job = body_json(resp).await;
    assert_eq!(job.id, 1);
    assert_eq!(job.filename, "reqs.csv");
    assert_eq!(job.status, "uploaded");
    assert!(job.requirements.is_empty());
}

#[tokio::test]
async fn upload_without_file_field_returns_400() {
    let resp = app()
        .oneshot(multipart_request("attachment", "reqs.csv", "title"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["message"], "No file part in the request");
}

#[tokio::test]
async fn upload_with_empty_filename_returns_400() {
    let resp = app()
        .oneshot(multipart_request("file", "", "title"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- triggers on unknown jobs ---

#[tokio::test]
async fn parse_unknown_job_returns_404() {
    let resp = app().oneshot(post("/api/parse/42")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["code"], 404);
    assert_eq!(body["message"], "Job not found");
}

#[tokio::test]
async fn generate_unknown_job_returns_404() {
    let resp = app().oneshot(post("/api/generate/42")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_job_id_returns_400() {
    let resp = app().oneshot(post("/api/parse/not-a-number")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn artifacts_of_unknown_job_is_empty() {
    let resp = app().oneshot(get("/api/artifacts/42")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let artifacts: Vec<Artifact> = body_json(resp).await;
    assert!(artifacts.is_empty());
}

#[tokio::test]
async fn allure_without_runs_returns_404() {
    let resp = app()
        .oneshot(get("/api/jobs/1/allure/index.html"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full pipeline ---

#[tokio::test]
async fn pipeline_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // upload
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(multipart_request(
            "file",
            "reqs.csv",
            "title,priority\nLogin works,high\nLogout works,low",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let job: Job = body_json(resp).await;
    let id = job.id;

    // execute before generate — rejected
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(post(&format!("/api/execute/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["message"], "No generated tests found; run generation first.");

    // parse
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(post(&format!("/api/parse/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let job: Job = body_json(resp).await;
    assert_eq!(job.status, "parsed");
    assert_eq!(job.requirements.len(), 2);
    assert_eq!(job.requirements[0].title, "Login works");
    assert_eq!(job.requirements[0].priority.as_deref(), Some("high"));

    // generate
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(post(&format!("/api/generate/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let job: Job = body_json(resp).await;
    assert_eq!(job.status, "generated");
    let scripts = job.artifacts.iter().filter(|a| a.kind == "script").count();
    assert_eq!(scripts, 2);

    // execute
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(post(&format!("/api/execute/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let run: Run = body_json(resp).await;
    assert_eq!(run.job_id, id);
    assert_eq!(run.status, "passed");
    let step_names: Vec<&str> = run.steps.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(step_names, ["prepare", "pytest", "allure"]);

    // artifacts — parsed, pom, testcases, two scripts
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/api/artifacts/{id}")))
        .await
        .unwrap();
    let artifacts: Vec<Artifact> = body_json(resp).await;
    assert_eq!(artifacts.len(), 5);
    assert_eq!(artifacts[0].kind, "parsed");

    // latest report
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/api/jobs/{id}/allure/index.html")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_bytes(resp).await;
    let html = std::str::from_utf8(&html).unwrap();
    assert!(html.contains(&format!("Job {id} run {}", run.id)));

    // per-run report
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/api/allure/{id}/{}/report/index.html", run.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // unknown report file
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/api/jobs/{id}/allure/missing.js")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
