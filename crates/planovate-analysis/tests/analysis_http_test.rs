//! Integration tests for the HTTP analysis backend against a mock server.

use planovate_analysis::{AnalysisConfig, AnalysisStatus, HttpAnalysisBackend};
use planovate_core::{AnalysisBackend, AnalysisRequest, Error, ImagePayload, Priority};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(budget: Option<f64>, location: Option<&str>) -> AnalysisRequest {
    AnalysisRequest {
        current_image: ImagePayload::new("before.jpg", "image/jpeg", b"before-bytes".to_vec()),
        ideal_image: ImagePayload::new("after.png", "image/png", b"after-bytes".to_vec()),
        budget,
        location: location.map(str::to_string),
        title: Some("Living Room".to_string()),
    }
}

fn backend(server: &MockServer) -> HttpAnalysisBackend {
    HttpAnalysisBackend::new(AnalysisConfig::new(server.uri()).with_timeout_secs(10))
        .expect("Failed to create backend")
}

fn success_body() -> serde_json::Value {
    serde_json::json!({
        "score": 0.65,
        "estimated_cost": 72000,
        "optimized": true,
        "currency": "INR",
        "plan": [
            {"task": "repaint", "priority": "high", "cost": 20000, "description": "Walls"},
            {"task": "flooring", "priority": "Low", "cost": 30000, "description": "Tiles"}
        ],
        "explanation": "Needs repair."
    })
}

async fn received_body(server: &MockServer) -> String {
    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1, "Expected exactly one request");
    String::from_utf8_lossy(&requests[0].body).to_string()
}

#[tokio::test]
async fn test_analyze_success_decodes_plan_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(body_string_contains("name=\"old_image\""))
        .and(body_string_contains("name=\"new_image\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .expect(1)
        .mount(&server)
        .await;

    let result = backend(&server)
        .analyze(&request(None, None))
        .await
        .expect("Analysis should succeed");

    assert_eq!(result.score, 0.65);
    assert_eq!(result.estimated_cost, 72000.0);
    assert!(result.optimized);
    assert_eq!(result.plan.len(), 2);
    assert_eq!(result.plan[0].task, "repaint");
    assert_eq!(result.plan[0].priority, Priority::High);
    assert_eq!(result.plan[1].priority, Priority::Low);
}

#[tokio::test]
async fn test_analyze_sends_optional_fields_when_present() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .mount(&server)
        .await;

    backend(&server)
        .analyze(&request(Some(20000.0), Some("Pune")))
        .await
        .unwrap();

    let body = received_body(&server).await;
    assert!(body.contains("name=\"budget\""));
    assert!(body.contains("20000"));
    assert!(body.contains("name=\"location\""));
    assert!(body.contains("Pune"));
    assert!(body.contains("filename=\"before.jpg\""));
    assert!(body.contains("before-bytes"));
    // The title stays on the client.
    assert!(!body.contains("Living Room"));
}

#[tokio::test]
async fn test_analyze_omits_optional_fields_when_absent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .mount(&server)
        .await;

    backend(&server).analyze(&request(None, None)).await.unwrap();

    let body = received_body(&server).await;
    assert!(!body.contains("name=\"budget\""));
    assert!(!body.contains("name=\"location\""));
}

#[tokio::test]
async fn test_analyze_missing_currency_defaults_to_inr() {
    let server = MockServer::start().await;
    let mut body = success_body();
    body.as_object_mut().unwrap().remove("currency");
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let result = backend(&server).analyze(&request(None, None)).await.unwrap();
    assert_eq!(result.currency, "INR");
}

#[tokio::test]
async fn test_analyze_surfaces_service_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"detail": "Unsupported file type: .bmp"})),
        )
        .mount(&server)
        .await;

    let err = backend(&server)
        .analyze(&request(None, None))
        .await
        .unwrap_err();

    match &err {
        Error::Analysis { status, detail } => {
            assert_eq!(*status, Some(400));
            assert_eq!(detail, "Unsupported file type: .bmp");
        }
        other => panic!("Expected Analysis error, got {:?}", other),
    }
    assert_eq!(AnalysisStatus::of(&err), Some(AnalysisStatus::RejectedInput));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_analyze_generic_message_without_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = backend(&server)
        .analyze(&request(None, None))
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Analysis error: Analysis failed: Internal Server Error"
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_analyze_rejects_malformed_result() {
    let server = MockServer::start().await;
    let mut body = success_body();
    body["score"] = serde_json::json!(2.5);
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let err = backend(&server)
        .analyze(&request(None, None))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Analysis { .. }));
    assert!(err.to_string().contains("Malformed analysis result"));
}

#[tokio::test]
async fn test_analyze_rejects_unparseable_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = backend(&server)
        .analyze(&request(None, None))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Failed to parse analysis response"));
}

#[tokio::test]
async fn test_analyze_unreachable_service() {
    // Reserve a port, then release it so nothing is listening there.
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let backend = HttpAnalysisBackend::new(AnalysisConfig::new(uri).with_timeout_secs(2)).unwrap();
    let err = backend.analyze(&request(None, None)).await.unwrap_err();

    match &err {
        Error::Analysis { status, detail } => {
            assert!(status.is_none());
            assert!(detail.starts_with("Analysis request failed"));
        }
        other => panic!("Expected Analysis error, got {:?}", other),
    }
    assert_eq!(AnalysisStatus::of(&err), Some(AnalysisStatus::Unreachable));
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})))
        .mount(&server)
        .await;

    assert!(backend(&server).health_check().await.unwrap());
}

#[tokio::test]
async fn test_health_check_unhealthy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(!backend(&server).health_check().await.unwrap());
}
