use assert_cmd::Command;
use assert_cmd::cargo;
use docque::api::{ApiClient, DocumentApi, ErrorKind};
use docque::config::Settings;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::tempdir;

fn docque(url: &str) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("docque"));
    cmd.env_remove("DOCQUE_API_URL")
        .env_remove("DOCQUE_TIMEOUT_MS")
        .env_remove("DOCQUE_MAX_ATTEMPTS")
        .arg("--api-url")
        .arg(url);
    cmd
}

#[test]
fn test_upload_then_list_round_trip() {
    let mut server = Server::new();
    let url = server.url();

    let _mock_upload = server
        .mock("POST", "/documents/upload")
        .match_body(Matcher::Regex(r#"filename="notes.txt""#.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "message": "Document uploaded and processed successfully",
                "document_id": "doc-42",
                "filename": "notes.txt",
                "content_length": 11,
                "chunks_created": 1
            }"#,
        )
        .expect(1)
        .create();

    let _mock_list = server
        .mock("GET", "/documents/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"documents": [{
                "id": "doc-42",
                "filename": "notes.txt",
                "upload_date": "2024-05-01T12:00:00",
                "content_length": 11,
                "chunks_count": 1
            }]}"#,
        )
        .create();

    let dir = tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, "hello world").unwrap();

    docque(&url)
        .arg("upload")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("Uploaded notes.txt as doc-42"));

    docque(&url)
        .arg("list")
        .assert()
        .success()
        .stdout(contains("doc-42"))
        .stdout(contains("notes.txt"));
}

#[test]
fn test_list_recovers_after_transient_failures() {
    let mut server = Server::new();
    let url = server.url();

    let unavailable = server
        .mock("GET", "/documents/")
        .with_status(503)
        .expect(2)
        .create();
    let ok = server
        .mock("GET", "/documents/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"documents": []}"#)
        .expect(1)
        .create();

    docque(&url)
        .arg("--max-attempts")
        .arg("3")
        .arg("list")
        .assert()
        .success()
        .stdout(contains("No documents uploaded."));

    unavailable.assert();
    ok.assert();
}

#[test]
fn test_blank_query_rejected_before_network() {
    let mut server = Server::new();
    let url = server.url();

    let mock = server.mock("POST", "/query/").expect(0).create();

    docque(&url)
        .arg("query")
        .arg("   ")
        .assert()
        .failure()
        .stderr(contains("Query cannot be empty"));

    mock.assert();
}

#[test]
fn test_json_upload_rejected_before_network() {
    let mut server = Server::new();
    let url = server.url();

    let upload = server.mock("POST", "/documents/upload").expect(0).create();
    let list = server.mock("GET", "/documents/").expect(0).create();

    let dir = tempdir().unwrap();
    let file = dir.path().join("data.json");
    std::fs::write(&file, r#"{"a": 1}"#).unwrap();

    docque(&url)
        .arg("upload")
        .arg(&file)
        .assert()
        .failure()
        .stderr(contains("Unsupported file type"))
        .stderr(contains("1 of 1 upload(s) failed."));

    upload.assert();
    list.assert();
}

#[test]
fn test_delete_not_found_is_reported_once_and_list_refreshed() {
    let mut server = Server::new();
    let url = server.url();

    let delete = server
        .mock("DELETE", "/documents/doc-1")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "Document not found", "status_code": 404}"#)
        .expect(1)
        .create();
    let list = server
        .mock("GET", "/documents/")
        .with_status(200)
        .with_body(r#"{"documents": []}"#)
        .expect(1)
        .create();

    docque(&url)
        .arg("delete")
        .arg("doc-1")
        .assert()
        .failure()
        .stdout(contains("0 document(s) on the server after refresh."))
        .stderr(contains("Document not found"));

    delete.assert();
    list.assert();
}

#[test]
fn test_delete_failure_does_not_report_list_when_refresh_fails() {
    let mut server = Server::new();
    let url = server.url();

    let delete = server
        .mock("DELETE", "/documents/doc-1")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "Document not found", "status_code": 404}"#)
        .expect(1)
        .create();
    let list = server
        .mock("GET", "/documents/")
        .with_status(503)
        .expect(1)
        .create();

    docque(&url)
        .arg("--max-attempts")
        .arg("1")
        .arg("delete")
        .arg("doc-1")
        .assert()
        .failure()
        .stdout(contains("after refresh").not())
        .stderr(contains(
            "Could not refresh document list: Listing documents failed after 1 attempt: HTTP 503: Service Unavailable",
        ))
        .stderr(contains("Document not found"));

    delete.assert();
    list.assert();
}

#[test]
fn test_query_prints_answer_and_sources() {
    let mut server = Server::new();
    let url = server.url();

    let _mock = server
        .mock("POST", "/query/")
        .match_body(Matcher::Json(serde_json::json!({
            "query": "What is in the notes?",
            "max_results": 2
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"answer": "A greeting.", "sources": ["notes.txt (chunk 1)"], "confidence": 1.0}"#,
        )
        .create();

    docque(&url)
        .arg("query")
        .arg("What is in the notes?")
        .arg("--max-results")
        .arg("2")
        .assert()
        .success()
        .stdout(contains("A greeting."))
        .stdout(contains("notes.txt (chunk 1)"))
        .stdout(contains("Confidence: 100%"));
}

#[test]
fn test_health() {
    let mut server = Server::new();
    let url = server.url();

    let _mock = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"status": "healthy"}"#)
        .create();

    docque(&url)
        .arg("health")
        .assert()
        .success()
        .stdout(contains("Backend status: healthy"));
}

#[test]
fn test_health_services_reports_degraded_backend() {
    let mut server = Server::new();
    let url = server.url();

    let _mock = server
        .mock("GET", "/health/services")
        .with_status(200)
        .with_body(
            r#"{"status": "degraded", "services": {
                "document_processor": {"status": "healthy", "embedding_dimension": 384},
                "llm_service": {"status": "unhealthy", "error": "missing key"}
            }}"#,
        )
        .create();

    docque(&url)
        .arg("health")
        .arg("--services")
        .assert()
        .failure()
        .stdout(contains("Backend status: degraded"))
        .stdout(contains("llm_service: unhealthy (missing key)"))
        .stderr(contains("llm_service unhealthy"));
}

#[tokio::test]
async fn test_library_upload_then_list_contains_new_id() {
    let mut server = Server::new_async().await;

    let _upload = server
        .mock("POST", "/documents/upload")
        .with_status(200)
        .with_body(r#"{"id": "fresh-id", "filename": "a.txt", "message": "ok"}"#)
        .create_async()
        .await;
    let _list = server
        .mock("GET", "/documents/")
        .with_status(200)
        .with_body(
            r#"{"documents": [
                {"id": "old-id", "filename": "b.pdf", "upload_date": "2024-01-01T00:00:00"},
                {"id": "fresh-id", "filename": "a.txt", "upload_date": "2024-01-02T00:00:00"}
            ]}"#,
        )
        .create_async()
        .await;

    let client = ApiClient::new(Settings {
        base_url: server.url(),
        ..Settings::default()
    })
    .unwrap();

    let receipt = client.upload_document(b"text".to_vec(), "a.txt").await.unwrap();
    let documents = client.list_documents().await.unwrap();

    assert!(documents.iter().any(|d| d.id == receipt.id));
}

#[tokio::test]
async fn test_library_client_error_single_attempt() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/query/")
        .with_status(400)
        .with_body(r#"{"detail": "Query cannot be empty"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = ApiClient::new(Settings {
        base_url: server.url(),
        max_attempts: 5,
        ..Settings::default()
    })
    .unwrap();

    let err = client.submit_query("hello", 5).await.unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.kind, ErrorKind::Client);
    assert_eq!(err.status, 400);
    assert_eq!(err.message, "Query cannot be empty");
}
