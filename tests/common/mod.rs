#![allow(dead_code)]

use std::sync::Arc;

use exams::api::ApiContext;
use exams::api::auth::TokenVerifier;
use exams::store::{MemoryBlobStore, MemoryExamStore};
use serde_json::{Value, json};

pub const SECRET: &str = "test-secret";

pub struct Harness {
    pub ctx: ApiContext,
    pub exams: Arc<MemoryExamStore>,
    pub blobs: Arc<MemoryBlobStore>,
    pub token: String,
}

impl Harness {
    pub fn new() -> Self {
        let verifier = TokenVerifier::new(SECRET);
        let claims = json!({"sub": "prof-a"}).as_object().cloned().unwrap();
        let token = verifier.issue(&claims).unwrap();
        let exams = Arc::new(MemoryExamStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let ctx = ApiContext::new(verifier, exams.clone(), blobs.clone());
        Self {
            ctx,
            exams,
            blobs,
            token,
        }
    }

    pub fn auth(&self) -> Value {
        json!({"Authorization": format!("Bearer {}", self.token)})
    }

    pub async fn call(&self, method: &str, path: &str, body: Option<Value>) -> Value {
        self.call_with(method, path, self.auth(), body.map(|b| b.to_string()))
            .await
    }

    pub async fn call_with(
        &self,
        method: &str,
        path: &str,
        headers: Value,
        body: Option<String>,
    ) -> Value {
        let event = json!({
            "httpMethod": method,
            "path": path,
            "headers": headers,
            "body": body
        });
        exams::api::handle_request(&self.ctx, &event).await
    }
}

pub fn status(response: &Value) -> u64 {
    response["statusCode"].as_u64().unwrap()
}

pub fn body(response: &Value) -> Value {
    serde_json::from_str(response["body"].as_str().unwrap()).unwrap()
}

pub fn math_exam() -> Value {
    json!({
        "examSubject": "Math",
        "examDate": "2024-01-01",
        "professor": "A",
        "assistant": "B",
        "numberOfStudents": 30,
        "examLocation": "Hall1",
        "examClass": "CS1"
    })
}
