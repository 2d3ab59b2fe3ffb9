//! DynamoDB stream logger.
//!
//! Decodes the images of each change record and logs them. Nothing else
//! happens downstream; a record that does not decode is logged and skipped.

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::api::parsing::{v_path, v_str};
use crate::errors::ExamError;
use crate::infrastructure::aws::attributes::parse_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Insert,
    Modify,
    Remove,
}

impl MutationKind {
    #[must_use]
    pub fn parse(event_name: &str) -> Option<Self> {
        match event_name {
            "INSERT" => Some(Self::Insert),
            "MODIFY" => Some(Self::Modify),
            "REMOVE" => Some(Self::Remove),
            _ => None,
        }
    }
}

/// A change record with its images converted to plain JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedChange {
    pub kind: MutationKind,
    pub new_image: Option<Value>,
    pub old_image: Option<Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Converts a DynamoDB-JSON image (`{"name": {"S": "x"}}`) into plain JSON.
///
/// # Errors
///
/// Returns `BadRequest` if the image is not an object of typed attributes.
pub fn unmarshall(image: &Value) -> Result<Value, ExamError> {
    let map = image
        .as_object()
        .ok_or_else(|| ExamError::BadRequest("image is not an object".to_string()))?;
    map.iter()
        .map(|(k, v)| unmarshall_attribute(v).map(|v| (k.clone(), v)))
        .collect::<Result<Map<_, _>, _>>()
        .map(Value::Object)
}

fn unmarshall_attribute(attr: &Value) -> Result<Value, ExamError> {
    let bad = |msg: String| ExamError::BadRequest(msg);
    let obj = attr
        .as_object()
        .filter(|o| o.len() == 1)
        .ok_or_else(|| bad(format!("not a typed attribute: {attr}")))?;
    let Some((tag, inner)) = obj.iter().next() else {
        return Err(bad("empty attribute".to_string()));
    };

    let number = |v: &Value| -> Result<Value, ExamError> {
        let raw = v
            .as_str()
            .ok_or_else(|| bad(format!("number is not a string: {v}")))?;
        parse_number(raw)
            .map(Value::Number)
            .map_err(|e| bad(e.detail().to_string()))
    };

    match tag.as_str() {
        "S" | "B" => inner
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| bad(format!("{tag} is not a string"))),
        "N" => number(inner),
        "BOOL" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| bad("BOOL is not a boolean".to_string())),
        "NULL" => Ok(Value::Null),
        "M" => unmarshall(inner),
        "L" => as_list(tag, inner)?
            .iter()
            .map(unmarshall_attribute)
            .collect::<Result<_, _>>()
            .map(Value::Array),
        "SS" | "BS" => Ok(Value::Array(as_list(tag, inner)?.clone())),
        "NS" => as_list(tag, inner)?
            .iter()
            .map(number)
            .collect::<Result<_, _>>()
            .map(Value::Array),
        other => Err(bad(format!("unknown attribute type {other}"))),
    }
}

fn as_list<'a>(tag: &str, v: &'a Value) -> Result<&'a Vec<Value>, ExamError> {
    v.as_array()
        .ok_or_else(|| ExamError::BadRequest(format!("{tag} is not a list")))
}

/// Decodes one stream record according to its `eventName`.
///
/// # Errors
///
/// Returns `BadRequest` for unknown event names or undecodable images.
pub fn decode_record(record: &Value) -> Result<DecodedChange, ExamError> {
    let event_name = v_str(record, &["eventName"])
        .ok_or_else(|| ExamError::BadRequest("record has no eventName".to_string()))?;
    let kind = MutationKind::parse(event_name)
        .ok_or_else(|| ExamError::BadRequest(format!("unknown eventName {event_name}")))?;

    let image = |name: &str| -> Result<Value, ExamError> {
        let raw = v_path(record, &["dynamodb", name])
            .ok_or_else(|| ExamError::BadRequest(format!("{event_name} record missing {name}")))?;
        unmarshall(raw)
    };

    let (new_image, old_image) = match kind {
        MutationKind::Insert => (Some(image("NewImage")?), None),
        MutationKind::Modify => (Some(image("NewImage")?), Some(image("OldImage")?)),
        MutationKind::Remove => (None, Some(image("OldImage")?)),
    };

    Ok(DecodedChange {
        kind,
        new_image,
        old_image,
    })
}

/// Logs every record of a stream batch. Failures are counted, never propagated.
pub fn log_stream_batch(payload: &Value) -> StreamSummary {
    let mut summary = StreamSummary::default();
    let records = payload
        .get("Records")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for record in records {
        let event_id = v_str(record, &["eventID"]).unwrap_or("unknown");
        match decode_record(record) {
            Ok(change) => {
                summary.processed += 1;
                match change.kind {
                    MutationKind::Insert => {
                        info!(event_id = %event_id, new = ?change.new_image, "New item inserted");
                    }
                    MutationKind::Modify => {
                        info!(
                            event_id = %event_id,
                            new = ?change.new_image,
                            old = ?change.old_image,
                            "Item updated"
                        );
                    }
                    MutationKind::Remove => {
                        info!(event_id = %event_id, old = ?change.old_image, "Item deleted");
                    }
                }
            }
            Err(e) => {
                summary.failed += 1;
                warn!(event_id = %event_id, "Skipping undecodable stream record: {}", e);
            }
        }
    }

    summary
}
