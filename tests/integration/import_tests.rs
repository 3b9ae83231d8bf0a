//! Integration tests for the batch importer
//!
//! A wiremock server stands in for the knowledge-base bulk import endpoint.

use chrono::Utc;
use qa_harvest::config::{ImportConfig, ImportTarget};
use qa_harvest::extract::QaPair;
use qa_harvest::import::{BatchImporter, ImportSummary};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROUTE: &str = "/api/v1/bulk-import";

fn target(endpoint: String, batch_size: usize, dry_run: bool) -> ImportTarget {
    let config = ImportConfig {
        endpoint,
        api_key_env: "QA_HARVEST_IMPORT_KEY".to_string(),
        api_key_header: "x-api-key".to_string(),
        env_file: None,
        batch_size,
        timeout_secs: 5,
        dry_run,
    };
    ImportTarget::resolve_with(&config, |_| Some("secret".to_string()))
        .expect("credential should resolve")
}

fn entries(n: usize) -> Vec<QaPair> {
    (0..n)
        .map(|i| QaPair {
            question: format!("What about claim number {}?", i),
            answer: "Claims are handled by the underwriter".to_string(),
            source_url: "https://marineins.com/blog/claims".to_string(),
            domain: "marineins.com".to_string(),
            confidence: 0.75,
            tags: vec!["insurance".to_string(), "marine".to_string()],
            created_at: Utc::now(),
        })
        .collect()
}

#[tokio::test]
async fn test_batches_are_partitioned_and_summed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .and(header("x-api-key", "secret"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"imported": 10, "duplicates": 2})),
        )
        .expect(3)
        .mount(&server)
        .await;

    let target = target(format!("{}{}", server.uri(), ROUTE), 100, false);
    let summary = BatchImporter::new(&target)
        .unwrap()
        .import_all(&entries(250))
        .await;

    assert_eq!(
        summary,
        ImportSummary {
            batches: 3,
            imported: 30,
            duplicates: 6,
            failed: 0,
        }
    );

    let requests = server.received_requests().await.unwrap();
    let sizes: Vec<usize> = requests
        .iter()
        .map(|r| {
            let body: Value = serde_json::from_slice(&r.body).unwrap();
            body["entries"].as_array().unwrap().len()
        })
        .collect();
    assert_eq!(sizes, vec![100, 100, 50]);
}

#[tokio::test]
async fn test_request_body_carries_entries_and_dry_run() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"imported": 0})))
        .mount(&server)
        .await;

    let target = target(format!("{}{}", server.uri(), ROUTE), 100, true);
    BatchImporter::new(&target)
        .unwrap()
        .import_all(&entries(2))
        .await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["dryRun"], true);
    assert_eq!(body["entries"][0]["question"], "What about claim number 0?");
    assert_eq!(body["entries"][0]["domain"], "marineins.com");
    assert_eq!(body["entries"][1]["confidence"], 0.75);
}

#[tokio::test]
async fn test_duplicate_key_rejection_is_not_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .respond_with(ResponseTemplate::new(409).set_body_string(
            r#"{"error":"duplicate key value violates unique constraint \"kb_question_key\""}"#,
        ))
        .mount(&server)
        .await;

    let target = target(format!("{}{}", server.uri(), ROUTE), 100, false);
    let summary = BatchImporter::new(&target)
        .unwrap()
        .import_all(&entries(5))
        .await;

    assert_eq!(summary.batches, 1);
    assert_eq!(summary.imported, 0);
    assert_eq!(summary.failed, 0);
}

#[tokio::test]
async fn test_server_error_counts_batch_as_failed_and_continues() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"imported": 3, "duplicates": 0})),
        )
        .mount(&server)
        .await;

    let target = target(format!("{}{}", server.uri(), ROUTE), 3, false);
    let summary = BatchImporter::new(&target)
        .unwrap()
        .import_all(&entries(8))
        .await;

    // First batch of 3 fails, the remaining batches of 3 and 2 go through
    assert_eq!(summary.batches, 3);
    assert_eq!(summary.failed, 3);
    assert_eq!(summary.imported, 6);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_unreachable_endpoint_counts_every_batch_as_failed() {
    let target = target("http://127.0.0.1:1/api/v1/bulk-import".to_string(), 2, false);
    let summary = BatchImporter::new(&target)
        .unwrap()
        .import_all(&entries(5))
        .await;

    assert_eq!(summary.batches, 3);
    assert_eq!(summary.failed, 5);
    assert_eq!(summary.imported, 0);
}

#[tokio::test]
async fn test_empty_import_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let target = target(format!("{}{}", server.uri(), ROUTE), 100, false);
    let summary = BatchImporter::new(&target).unwrap().import_all(&[]).await;
    assert_eq!(summary, ImportSummary::default());
}

#[tokio::test]
async fn test_invalid_success_body_counts_as_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let target = target(format!("{}{}", server.uri(), ROUTE), 100, false);
    let summary = BatchImporter::new(&target)
        .unwrap()
        .import_all(&entries(4))
        .await;

    assert_eq!(summary.failed, 4);
}
