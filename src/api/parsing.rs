use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::ExamError;

/// An API Gateway proxy request, normalized across the REST (v1) and HTTP
/// (v2) payload formats.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    pub method: String,
    pub path: String,
    pub headers: Value,
    pub path_parameters: HashMap<String, String>,
    pub query: HashMap<String, String>,
    /// Body as delivered by the gateway; decoded on demand by [`Self::body_bytes`].
    pub body: Option<String>,
    pub is_base64_encoded: bool,
}

impl ApiRequest {
    /// # Errors
    ///
    /// Returns `BadRequest` if the method is missing.
    pub fn from_event(payload: &Value) -> Result<Self, ExamError> {
        let method = v_str(payload, &["httpMethod"])
            .or_else(|| v_str(payload, &["requestContext", "http", "method"]))
            .ok_or_else(|| ExamError::BadRequest("Missing HTTP method".to_string()))?
            .to_ascii_uppercase();

        let path = v_str(payload, &["path"])
            .or_else(|| v_str(payload, &["rawPath"]))
            .unwrap_or("/")
            .to_string();

        let headers = payload
            .get("headers")
            .filter(|h| h.is_object())
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));

        let path_parameters = string_map(payload.get("pathParameters"));

        let mut query = string_map(payload.get("queryStringParameters"));
        if query.is_empty() {
            if let Some(raw) = v_str(payload, &["rawQueryString"]) {
                query = parse_query_string(raw);
            }
        }

        let body = v_str(payload, &["body"]).map(str::to_string);
        let is_base64_encoded = payload
            .get("isBase64Encoded")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Ok(Self {
            method,
            path,
            headers,
            path_parameters,
            query,
            body,
            is_base64_encoded,
        })
    }

    /// Path segments with percent-encoding removed.
    #[must_use]
    pub fn segments(&self) -> Vec<String> {
        self.path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                urlencoding::decode(s)
                    .map(|d| d.into_owned())
                    .unwrap_or_else(|_| s.to_string())
            })
            .collect()
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        get_header_value(&self.headers, name)
    }

    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// The body bytes, base64-decoded when the gateway flagged them. An absent
    /// body is empty.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` if a base64 body does not decode.
    pub fn body_bytes(&self) -> Result<Vec<u8>, ExamError> {
        match self.body.as_deref() {
            None => Ok(Vec::new()),
            Some(raw) if self.is_base64_encoded => STANDARD
                .decode(raw)
                .map_err(|e| ExamError::BadRequest(format!("Invalid base64 body: {e}"))),
            Some(raw) => Ok(raw.as_bytes().to_vec()),
        }
    }

    /// Deserializes the body as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` if the body is missing, does not parse, or is
    /// not a JSON object.
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T, ExamError> {
        let body = self.body_bytes()?;
        if body.is_empty() {
            return Err(ExamError::BadRequest("Missing request body".to_string()));
        }
        let object: Map<String, Value> = serde_json::from_slice(&body)
            .map_err(|e| ExamError::BadRequest(format!("Invalid JSON body: {e}")))?;
        serde_json::from_value(Value::Object(object))
            .map_err(|e| ExamError::BadRequest(format!("Invalid JSON body: {e}")))
    }
}

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

fn string_map(value: Option<&Value>) -> HashMap<String, String> {
    value
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

fn parse_query_string(raw: &str) -> HashMap<String, String> {
    raw.split('&')
        .filter(|kv| !kv.is_empty())
        .map(|kv| {
            let (k, v) = kv.split_once('=').unwrap_or((kv, ""));
            let decode = |s: &str| {
                let s = s.replace('+', " ");
                urlencoding::decode(&s)
                    .map(|d| d.into_owned())
                    .unwrap_or(s)
            };
            (decode(k), decode(v))
        })
        .collect()
}
