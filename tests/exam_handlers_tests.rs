mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{Harness, body, math_exam, status};
use exams::api::ApiContext;
use exams::core::models::{Exam, ExamFields};
use exams::errors::ExamError;
use exams::store::{ExamStore, MemoryBlobStore};
use serde_json::json;

struct DownStore;

#[async_trait]
impl ExamStore for DownStore {
    async fn put(&self, _exam: &Exam) -> Result<(), ExamError> {
        Err(ExamError::StoreFailure("down".to_string()))
    }
    async fn scan(&self) -> Result<Vec<Exam>, ExamError> {
        Err(ExamError::StoreFailure("down".to_string()))
    }
    async fn get(&self, _id: &str) -> Result<Option<Exam>, ExamError> {
        Err(ExamError::StoreFailure("down".to_string()))
    }
    async fn replace(&self, _id: &str, _fields: &ExamFields) -> Result<ExamFields, ExamError> {
        Err(ExamError::StoreFailure("down".to_string()))
    }
    async fn delete(&self, _id: &str) -> Result<(), ExamError> {
        Err(ExamError::StoreFailure("down".to_string()))
    }
}

#[tokio::test]
async fn test_create_read_delete_scenario() {
    let h = Harness::new();

    let created = h.call("POST", "/exams", Some(math_exam())).await;
    assert_eq!(status(&created), 200);
    let exam = body(&created);
    let id = exam["id"].as_str().expect("generated id").to_string();
    assert!(uuid::Uuid::parse_str(&id).is_ok());

    let mut expected = math_exam();
    expected["id"] = json!(id);
    assert_eq!(exam, expected);

    let fetched = h.call("GET", &format!("/exams/{id}"), None).await;
    assert_eq!(status(&fetched), 200);
    assert_eq!(body(&fetched), exam);

    let deleted = h.call("DELETE", &format!("/exams/{id}"), None).await;
    assert_eq!(status(&deleted), 200);
    assert_eq!(body(&deleted), json!({"message": "Exam deleted"}));

    let missing = h.call("GET", &format!("/exams/{id}"), None).await;
    assert_eq!(status(&missing), 404);
    assert_eq!(body(&missing)["error"], "not_found");
}

#[tokio::test]
async fn test_create_ignores_client_supplied_id() {
    let h = Harness::new();
    let mut payload = math_exam();
    payload["id"] = json!("chosen-by-client");

    let created = body(&h.call("POST", "/exams", Some(payload)).await);
    assert_ne!(created["id"], "chosen-by-client");
}

#[tokio::test]
async fn test_update_is_a_full_replace() {
    let h = Harness::new();
    let id = body(&h.call("POST", "/exams", Some(math_exam())).await)["id"]
        .as_str()
        .unwrap()
        .to_string();

    let update = json!({"examSubject": "Physics", "numberOfStudents": 12});
    let updated = h.call("PUT", &format!("/exams/{id}"), Some(update.clone())).await;
    assert_eq!(status(&updated), 200);
    // Only the attributes now holding a value come back, without the id.
    assert_eq!(body(&updated), update);

    let stored = body(&h.call("GET", &format!("/exams/{id}"), None).await);
    assert_eq!(
        stored,
        json!({"id": id, "examSubject": "Physics", "numberOfStudents": 12})
    );
    assert!(stored.get("professor").is_none());
    assert!(stored.get("examClass").is_none());
}

#[tokio::test]
async fn test_read_all_counts_creates_minus_deletes() {
    let h = Harness::new();
    let mut ids = Vec::new();
    for n in 0..5 {
        let mut payload = math_exam();
        payload["examClass"] = json!(format!("CS{n}"));
        let created = body(&h.call("POST", "/exams", Some(payload)).await);
        ids.push(created["id"].as_str().unwrap().to_string());
    }
    for id in &ids[..2] {
        assert_eq!(status(&h.call("DELETE", &format!("/exams/{id}"), None).await), 200);
    }

    let listed = h.call("GET", "/exams", None).await;
    assert_eq!(status(&listed), 200);
    assert_eq!(body(&listed).as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let h = Harness::new();
    let response = h.call("DELETE", "/exams/never-existed", None).await;
    assert_eq!(status(&response), 200);
}

#[tokio::test]
async fn test_unauthorized_requests_never_reach_the_store() {
    let h = Harness::new();
    let no_auth = json!({});
    let wrong = json!({"Authorization": "Bearer not.a.token"});

    for headers in [no_auth, wrong] {
        let response = h
            .call_with("POST", "/exams", headers.clone(), Some(math_exam().to_string()))
            .await;
        assert_eq!(status(&response), 401);
        assert_eq!(body(&response)["error"], "unauthorized");

        let response = h.call_with("GET", "/exams", headers, None).await;
        assert_eq!(status(&response), 401);
    }
    assert!(h.exams.is_empty().await);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let h = Harness::new();

    let response = h
        .call_with("POST", "/exams", h.auth(), Some("{not json".to_string()))
        .await;
    assert_eq!(status(&response), 400);
    assert_eq!(body(&response)["error"], "bad_request");

    let response = h.call_with("PUT", "/exams/abc", h.auth(), None).await;
    assert_eq!(status(&response), 400);
    assert!(h.exams.is_empty().await);
}

#[tokio::test]
async fn test_non_object_body_is_bad_request() {
    let h = Harness::new();

    for raw in [r#"["Physics","2024-02-02"]"#, "\"Physics\"", "null"] {
        let response = h
            .call_with("POST", "/exams", h.auth(), Some(raw.to_string()))
            .await;
        assert_eq!(status(&response), 400, "{raw}");
        assert_eq!(body(&response)["error"], "bad_request");

        let response = h
            .call_with("PUT", "/exams/abc", h.auth(), Some(raw.to_string()))
            .await;
        assert_eq!(status(&response), 400, "{raw}");
    }
    assert!(h.exams.is_empty().await);
}

#[tokio::test]
async fn test_store_failure_is_internal_error_on_every_route() {
    let h = Harness::new();
    let ctx = ApiContext::new(
        h.ctx.verifier.clone(),
        Arc::new(DownStore),
        Arc::new(MemoryBlobStore::new()),
    );
    let payload = math_exam().to_string();

    for (method, path, body_text) in [
        ("POST", "/exams", Some(payload.clone())),
        ("GET", "/exams", None),
        ("GET", "/exams/abc", None),
        ("PUT", "/exams/abc", Some(payload.clone())),
        ("DELETE", "/exams/abc", None),
    ] {
        let event = json!({
            "httpMethod": method,
            "path": path,
            "headers": h.auth(),
            "body": body_text
        });
        let response = exams::api::handle_request(&ctx, &event).await;
        assert_eq!(status(&response), 500, "{method} {path}");
        assert_eq!(
            body(&response),
            json!({"error": "store_failure", "details": "down"}),
            "{method} {path}"
        );
    }
}

#[tokio::test]
async fn test_path_parameters_take_precedence() {
    let h = Harness::new();
    let id = body(&h.call("POST", "/exams", Some(math_exam())).await)["id"]
        .as_str()
        .unwrap()
        .to_string();

    let event = json!({
        "httpMethod": "GET",
        "path": "/stage/exams/ignored",
        "pathParameters": {"id": id},
        "headers": h.auth()
    });
    let response = exams::api::handle_request(&h.ctx, &event).await;
    assert_eq!(status(&response), 200);
    assert_eq!(body(&response)["id"], json!(id));
}

#[tokio::test]
async fn test_preflight_and_unknown_routes() {
    let h = Harness::new();

    let preflight = h.call_with("OPTIONS", "/exams", json!({}), None).await;
    assert_eq!(status(&preflight), 200);
    assert_eq!(preflight["headers"]["Access-Control-Allow-Origin"], "*");

    let unknown = h.call("GET", "/students", None).await;
    assert_eq!(status(&unknown), 404);

    let missing_id = h.call("DELETE", "/exams", None).await;
    assert_eq!(status(&missing_id), 400);
}
