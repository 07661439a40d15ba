//! End-to-end API journey over a real on-disk database.
//!
//! Extraction and LLM access are mocked; everything else (auth tokens,
//! migrations, repositories, routing, error mapping) is the real stack.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use famcare::api::{api_router, ApiContext};
use famcare::pipeline::extraction::{
    ExtractionConfig, MockOcrEngine, MockPageTextSource, MockPdfPageRenderer, TextExtractionEngine,
};
use famcare::pipeline::structuring::MockLlmClient;

const LLM_RESPONSE: &str = r#"{"name": "Szczepienie przypominajace",
    "date": "2025-12-01", "appointment_type": "Vaccination",
    "summary": "Booster shot", "doctor": "dr Lewandowska",
    "confidence_score": 93}"#;

/// Engine with no embedded text layer: forces the OCR fallback path.
fn scanned_document_engine() -> TextExtractionEngine {
    TextExtractionEngine::new(
        Box::new(MockPageTextSource::empty()),
        Box::new(MockPdfPageRenderer::new(2)),
        Some(Box::new(MockOcrEngine::new(
            "Szczepienie: 2025-12-01, dr Lewandowska, punkt szczepien",
        ))),
        ExtractionConfig::default(),
    )
}

fn test_app() -> (Router, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let ctx = ApiContext::new(
        tmp.path().join("famcare.db"),
        Arc::new(scanned_document_engine()),
        Arc::new(MockLlmClient::with_response(LLM_RESPONSE)),
        "gpt-3.5-turbo".to_string(),
    );
    (api_router(ctx), tmp)
}

async fn response_json(response: axum::http::Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(t) = token {
        builder = builder.header("Authorization", format!("Bearer {t}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn pdf_upload(token: &str, filename: &str, content: &[u8]) -> Request<Body> {
    let boundary = "famcare-flow-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/parse-pdf")
        .header("Authorization", format!("Bearer {token}"))
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn scanned_pdf_journey() {
    let (app, _tmp) = test_app();

    // Anyone can say hello
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/hello")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Create the account and log in
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/auth/create-test-user", None, "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            None,
            r#"{"email": "test@example.com"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let login = response_json(resp).await;
    let token = login["access_token"].as_str().unwrap().to_string();
    assert_eq!(login["token_type"], "bearer");

    // Upload a scan with no text layer; OCR fallback carries it
    let resp = app
        .clone()
        .oneshot(pdf_upload(&token, "szczepienie.pdf", b"%PDF-1.4 scanned"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let parsed = response_json(resp).await;
    assert_eq!(parsed["appointment_type"], "Vaccination");
    assert_eq!(parsed["date"], "2025-12-01");

    // The record shows up in the listing, without raw bytes
    let resp = app
        .clone()
        .oneshot(json_request("GET", "/parsed-appointments", Some(&token), ""))
        .await
        .unwrap();
    let listing = response_json(resp).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
    assert!(listing[0].get("raw_file_data").is_none());

    // A second login issues a fresh token; the old one stays valid
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            None,
            r#"{"email": "test@example.com"}"#,
        ))
        .await
        .unwrap();
    let second = response_json(resp).await;
    assert_ne!(second["access_token"], token);

    let resp = app
        .oneshot(json_request("GET", "/auth/me", Some(&token), ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn queue_sync_journey() {
    let (app, _tmp) = test_app();

    let resp = app
        .clone()
        .oneshot(json_request("POST", "/auth/create-test-user", None, "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            None,
            r#"{"email": "test@example.com"}"#,
        ))
        .await
        .unwrap();
    let token = response_json(resp).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let payload = r#"{"appointments": [
        {"queue_id": "sync-1", "place": "Poradnia", "provider": "NZOZ",
         "phone": "+48 22 000 00 00", "address": "ul. Prosta 5",
         "locality": "Gdansk", "date": "2025-10-01", "benefit": "dermatologia",
         "waiting_people": 8, "average_wait_days": 21,
         "latitude": 54.35, "longitude": 18.64}
    ]}"#;

    // First sync inserts, second sync updates
    for expected_new in [1, 0] {
        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/upcoming-appointments/upload",
                Some(&token),
                payload,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let report = response_json(resp).await;
        assert_eq!(report["new_records"], expected_new);
    }

    let resp = app
        .clone()
        .oneshot(json_request(
            "GET",
            "/upcoming-appointments?benefit=dermat",
            Some(&token),
            "",
        ))
        .await
        .unwrap();
    let listing = response_json(resp).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
    assert_eq!(listing[0]["queue_id"], "sync-1");
    assert_eq!(listing[0]["is_active"], true);
}
