//! Tests of the REST store against a local fake of the hosted table
//!
//! The fake speaks enough PostgREST to exercise the client: it checks the
//! authentication headers, enforces the unique columns and answers with the
//! same error bodies the hosted table returns.

#![cfg(feature = "rest-store")]

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use enroll::prelude::*;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

const API_KEY: &str = "anon-test-key";

// =============================================================================
// Fake table
// =============================================================================

#[derive(Clone, Default)]
struct FakeTable {
    rows: Arc<Mutex<Vec<Value>>>,
    headers: Arc<Mutex<Vec<HeaderMap>>>,
}

impl FakeTable {
    fn rows(&self) -> Vec<Value> {
        self.rows.lock().unwrap().clone()
    }

    fn last_headers(&self) -> HeaderMap {
        self.headers.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

fn conflict(column: &str, constraint: &str, value: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::CONFLICT,
        Json(json!({
            "code": "23505",
            "details": format!("Key ({})=({}) already exists.", column, value),
            "hint": null,
            "message": format!("duplicate key value violates unique constraint \"{}\"", constraint),
        })),
    )
}

async fn insert_rows(
    State(table): State<FakeTable>,
    headers: HeaderMap,
    Json(batch): Json<Vec<Value>>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    table.headers.lock().unwrap().push(headers.clone());

    if headers.get("apikey").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid API key" })),
        ));
    }

    let mut rows = table.rows.lock().unwrap();
    for row in &batch {
        if rows.iter().any(|r| r["email"] == row["email"]) {
            return Err(conflict(
                "email",
                "enrollments_email_key",
                row["email"].as_str().unwrap_or_default(),
            ));
        }
        if rows
            .iter()
            .any(|r| r["payment_transaction_id"] == row["payment_transaction_id"])
        {
            return Err(conflict(
                "payment_transaction_id",
                "enrollments_payment_transaction_id_key",
                row["payment_transaction_id"].as_str().unwrap_or_default(),
            ));
        }
    }
    rows.extend(batch);
    Ok(StatusCode::CREATED)
}

/// Serve the fake table on an ephemeral port, returning its base url
async fn spawn_fake_table(table: FakeTable) -> String {
    let app = Router::new()
        .route("/rest/v1/enrollments", post(insert_rows))
        .with_state(table);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn config_for(base_url: &str, api_key: &str) -> EnrollmentConfig {
    let mut config = EnrollmentConfig::default_config();
    config.store.url = Some(base_url.to_string());
    config.store.api_key = Some(api_key.to_string());
    config
}

fn flow_for(base_url: &str, api_key: &str) -> EnrollmentFlow<HeadlessView> {
    EnrollmentFlow::builder(HeadlessView::new())
        .with_config(config_for(base_url, api_key))
        .with_provenance(Provenance::new("https://workshop.example.com/", "integration-test"))
        .build()
        .unwrap()
}

fn details(email: &str) -> DetailsForm {
    DetailsForm {
        full_name: "Tanvir Hasan".to_string(),
        email: email.to_string(),
        whatsapp_number: "+880 1712 345678".to_string(),
        enrollment_package: "3_days_workshop".to_string(),
        website: String::new(),
    }
}

fn payment(transaction_id: &str) -> PaymentForm {
    PaymentForm {
        bkash_number: "01898765432".to_string(),
        transaction_id: transaction_id.to_string(),
    }
}

async fn enroll(
    flow: &mut EnrollmentFlow<HeadlessView>,
    email: &str,
    transaction_id: &str,
) -> FlowOutcome {
    flow.submit_details(&details(email)).unwrap();
    flow.submit_payment(&payment(transaction_id)).await.unwrap()
}

// =============================================================================
// Wire format
// =============================================================================

mod wire_tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_sends_auth_headers_and_single_row_array() {
        let table = FakeTable::default();
        let base_url = spawn_fake_table(table.clone()).await;
        let mut flow = flow_for(&base_url, API_KEY);

        let outcome = enroll(&mut flow, "tanvir@example.com", "9K8J7H6G5F").await;
        assert!(matches!(outcome, FlowOutcome::Enrolled(_)));

        let headers = table.last_headers();
        assert_eq!(headers["apikey"], API_KEY);
        assert_eq!(headers["authorization"], format!("Bearer {}", API_KEY));
        assert_eq!(headers["prefer"], "return=minimal");
        assert!(
            headers["content-type"]
                .to_str()
                .unwrap()
                .starts_with("application/json")
        );

        let rows = table.rows();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row["full_name"], "Tanvir Hasan");
        assert_eq!(row["email"], "tanvir@example.com");
        assert_eq!(row["whatsapp_number"], "8801712345678");
        assert_eq!(row["enrollment_package"], "3_days_workshop");
        assert_eq!(row["package_price"], 3000);
        assert_eq!(row["status"], "payment_submitted");
        assert_eq!(row["payment_method"], "bKash");
        assert_eq!(row["payer_bkash_number"], "01898765432");
        assert_eq!(row["payment_transaction_id"], "9K8J7H6G5F");
        assert_eq!(row["source_page"], "https://workshop.example.com/");
        assert_eq!(row["user_agent"], "integration-test");
        assert!(row["payment_submitted_at"].is_string());
    }

    #[tokio::test]
    async fn test_store_used_directly() {
        let table = FakeTable::default();
        let base_url = spawn_fake_table(table.clone()).await;
        let store = RestEnrollmentStore::new(&base_url, API_KEY, "enrollments").unwrap();
        assert_eq!(store.backend(), "rest");

        let mut flow = EnrollmentFlow::builder(HeadlessView::new())
            .with_store(store)
            .build()
            .unwrap();
        assert!(!flow.view().store_warning);

        let outcome = enroll(&mut flow, "direct@example.com", "DIRECT0001").await;
        assert!(matches!(outcome, FlowOutcome::Enrolled(_)));
        assert_eq!(table.rows().len(), 1);
    }
}

// =============================================================================
// Failures
// =============================================================================

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_email_is_reported_with_detail() {
        let table = FakeTable::default();
        let base_url = spawn_fake_table(table.clone()).await;

        enroll(&mut flow_for(&base_url, API_KEY), "tanvir@example.com", "TXN0000001").await;

        let mut flow = flow_for(&base_url, API_KEY);
        let outcome = enroll(&mut flow, "tanvir@example.com", "TXN0000002").await;

        let FlowOutcome::SubmissionFailed(err) = outcome else {
            panic!("expected a failed submission");
        };
        assert!(err.is_duplicate());
        assert_eq!(
            err.user_message(),
            "This email is already enrolled. Please use a different email."
        );
        assert_eq!(
            flow.view().last_alert(),
            Some(
                "This email is already enrolled. Please use a different email.\n\n\
                 Error: duplicate key value violates unique constraint \"enrollments_email_key\""
            )
        );
        assert_eq!(flow.phase(), FlowPhase::AwaitingPayment);
        assert!(!flow.view().submit_busy);
        assert_eq!(table.rows().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_transaction_is_reported() {
        let table = FakeTable::default();
        let base_url = spawn_fake_table(table.clone()).await;

        enroll(&mut flow_for(&base_url, API_KEY), "first@example.com", "TXN0000001").await;

        let mut flow = flow_for(&base_url, API_KEY);
        let outcome = enroll(&mut flow, "second@example.com", "TXN0000001").await;

        let FlowOutcome::SubmissionFailed(err) = outcome else {
            panic!("expected a failed submission");
        };
        assert!(matches!(err, SubmissionError::DuplicateTransactionId { .. }));
        assert_eq!(
            err.user_message(),
            "This transaction ID has already been used. Please check your transaction ID."
        );

        // same details, fresh transaction id
        let outcome = flow.submit_payment(&payment("TXN0000002")).await.unwrap();
        assert!(matches!(outcome, FlowOutcome::Enrolled(_)));
        assert_eq!(table.rows().len(), 2);
    }

    #[tokio::test]
    async fn test_wrong_key_gets_generic_message() {
        let table = FakeTable::default();
        let base_url = spawn_fake_table(table.clone()).await;
        let mut flow = flow_for(&base_url, "wrong-key");

        let outcome = enroll(&mut flow, "tanvir@example.com", "TXN0000001").await;

        let FlowOutcome::SubmissionFailed(err) = outcome else {
            panic!("expected a failed submission");
        };
        assert!(matches!(err, SubmissionError::RemoteWrite { .. }));
        assert_eq!(
            flow.view().last_alert(),
            Some("Failed to submit enrollment. Please try again.\n\nError: Invalid API key")
        );
        assert!(table.rows().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_store_is_a_transport_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let store =
            RestEnrollmentStore::new(&format!("http://{}", addr), API_KEY, "enrollments").unwrap();
        let mut flow = EnrollmentFlow::builder(HeadlessView::new())
            .with_store(store)
            .build()
            .unwrap();

        let outcome = enroll(&mut flow, "tanvir@example.com", "TXN0000001").await;
        let FlowOutcome::SubmissionFailed(err) = outcome else {
            panic!("expected a failed submission");
        };
        assert!(!err.is_duplicate());
        assert_eq!(
            err.user_message(),
            "Failed to submit enrollment. Please try again."
        );
        assert_eq!(flow.phase(), FlowPhase::AwaitingPayment);
    }

    #[tokio::test]
    async fn test_truncated_error_body_keeps_status_and_read_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while !request.ends_with(b"]") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            // announces more bytes than it sends, then hangs up
            socket
                .write_all(
                    b"HTTP/1.1 409 Conflict\r\ncontent-type: application/json\r\n\
                      content-length: 200\r\n\r\n{\"code\":\"235",
                )
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let store =
            RestEnrollmentStore::new(&format!("http://{}", addr), API_KEY, "enrollments").unwrap();
        let mut flow = EnrollmentFlow::builder(HeadlessView::new())
            .with_store(store)
            .build()
            .unwrap();

        let outcome = enroll(&mut flow, "tanvir@example.com", "TXN0000001").await;
        let FlowOutcome::SubmissionFailed(err) = outcome else {
            panic!("expected a failed submission");
        };
        assert!(matches!(err, SubmissionError::RemoteWrite { .. }));
        assert!(err.detail().starts_with("409 Conflict"));
        assert!(err.detail().contains("failed to read response body"));
    }
}
