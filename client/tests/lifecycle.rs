//! Full job lifecycle against the live mock server.
//!
//! Starts the mock server on a random port, then drives upload → parse →
//! generate → execute over real HTTP and finally opens the report URL the
//! client constructs.

use jobapi_client::{ApiError, ClientConfig, FilePart, JobApiClient, JobId};

async fn start_mock_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { mock_server::run(listener).await });
    format!("http://{addr}")
}

#[tokio::test]
async fn pipeline_lifecycle() {
    let base = start_mock_server().await;
    let client = JobApiClient::new(&ClientConfig::new(format!("{base}/")));

    // Step 1: health.
    let health = client.health().await.unwrap();
    assert_eq!(health.0["message"], "Healthy");

    // Step 2: upload.
    let file = FilePart::upload(
        "requirements.csv",
        b"title,priority\nLogin works,high\nSearch returns results,medium\n".to_vec(),
    )
    .with_content_type("text/csv");
    let job = client.upload_file(file).await.unwrap();
    assert_eq!(job.status(), Some("uploaded"));
    assert_eq!(job.0["filename"], "requirements.csv");
    let id = job.id().expect("uploaded job has an id");

    // Step 3: execute out of order — the backend rejects it, the client just relays.
    let err = client.execute_job(id).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("run generation first"));

    // Step 4: parse.
    let job = client.parse_job(id).await.unwrap();
    assert_eq!(job.status(), Some("parsed"));
    assert_eq!(job.0["requirements"].as_array().unwrap().len(), 2);

    // Step 5: generate.
    let job = client.generate_job(id).await.unwrap();
    assert_eq!(job.status(), Some("generated"));

    // Step 6: execute.
    let run = client.execute_job(id).await.unwrap();
    assert_eq!(run.job_id(), Some(id));
    assert_eq!(run.status(), Some("passed"));
    let run_id = run.id().expect("run has an id");

    // Step 7: artifacts — parsed, pom, testcases, one script per requirement.
    let artifacts = client.list_artifacts(id).await.unwrap();
    assert_eq!(artifacts.len(), 5);

    // Step 8: the constructed report URLs resolve.
    let url = client.allure_index_url(id);
    assert_eq!(url, format!("{base}/api/jobs/{id}/allure/index.html"));
    let page = reqwest::get(&url).await.unwrap();
    assert_eq!(page.status().as_u16(), 200);
    assert!(page.text().await.unwrap().contains(&format!("run {run_id}")));

    let url = client.allure_run_report_url(id, run_id, "index.html");
    assert_eq!(reqwest::get(&url).await.unwrap().status().as_u16(), 200);
}

#[tokio::test]
async fn unknown_job_is_request_failure() {
    let base = start_mock_server().await;
    let client = JobApiClient::new(&ClientConfig::new(base));

    let err = client.parse_job(JobId(999)).await.unwrap_err();
    match err {
        ApiError::RequestFailed { status, body, .. } => {
            assert_eq!(status, 404);
            assert!(body.contains("Job not found"));
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn upload_without_filename_is_rejected() {
    let base = start_mock_server().await;
    let client = JobApiClient::new(&ClientConfig::new(base));

    let err = client
        .upload_file(FilePart::upload("", b"title\n".to_vec()))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
}
