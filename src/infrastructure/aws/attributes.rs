//! Conversions between plain JSON and DynamoDB attribute values.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Number, Value};

use crate::core::models::{Exam, ExamFields};
use crate::errors::ExamError;

pub type Item = HashMap<String, AttributeValue>;

#[must_use]
pub fn to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), to_attribute(v)))
                .collect(),
        ),
    }
}

/// # Errors
///
/// Returns `StoreFailure` for unparseable numbers or attribute types this
/// SDK version does not know.
pub fn from_attribute(attr: &AttributeValue) -> Result<Value, ExamError> {
    Ok(match attr {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => Value::Number(parse_number(n)?),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(items) => {
            Value::Array(items.iter().map(from_attribute).collect::<Result<_, _>>()?)
        }
        AttributeValue::M(map) => Value::Object(map_to_object(map)?),
        AttributeValue::Ss(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(items) => Value::Array(
            items
                .iter()
                .map(|n| parse_number(n).map(Value::Number))
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::B(blob) => Value::String(STANDARD.encode(blob.as_ref())),
        AttributeValue::Bs(blobs) => Value::Array(
            blobs
                .iter()
                .map(|b| Value::String(STANDARD.encode(b.as_ref())))
                .collect(),
        ),
        other => {
            return Err(ExamError::StoreFailure(format!(
                "unsupported attribute value: {other:?}"
            )));
        }
    })
}

/// Parses a DynamoDB number string, preferring integers.
pub(crate) fn parse_number(raw: &str) -> Result<Number, ExamError> {
    let raw = raw.trim();
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Ok(Number::from(u));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| ExamError::StoreFailure(format!("invalid number attribute: {raw}")))
}

fn map_to_object(map: &Item) -> Result<Map<String, Value>, ExamError> {
    map.iter()
        .map(|(k, v)| from_attribute(v).map(|v| (k.clone(), v)))
        .collect()
}

/// # Errors
///
/// Returns `StoreFailure` if the item lacks a string `id` or holds
/// undecodable attributes.
pub fn item_to_exam(item: &Item) -> Result<Exam, ExamError> {
    let object = map_to_object(item)?;
    serde_json::from_value(Value::Object(object))
        .map_err(|e| ExamError::StoreFailure(format!("malformed exam item: {e}")))
}

/// # Errors
///
/// Returns `StoreFailure` if the attributes do not decode.
pub fn item_to_fields(item: &Item) -> Result<ExamFields, ExamError> {
    let object = map_to_object(item)?;
    serde_json::from_value(Value::Object(object))
        .map_err(|e| ExamError::StoreFailure(format!("malformed exam attributes: {e}")))
}

#[must_use]
pub fn exam_to_item(exam: &Exam) -> Item {
    let mut item = Item::new();
    item.insert("id".to_string(), AttributeValue::S(exam.id.clone()));
    for (name, value) in exam.fields.entries() {
        if let Some(value) = value {
            item.insert(name.to_string(), to_attribute(value));
        }
    }
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_keep_integer_form() {
        assert_eq!(from_attribute(&AttributeValue::N("30".into())).unwrap(), json!(30));
        assert_eq!(from_attribute(&AttributeValue::N("2.5".into())).unwrap(), json!(2.5));
        assert!(from_attribute(&AttributeValue::N("abc".into())).is_err());
    }

    #[test]
    fn nested_values_convert_both_ways() {
        let value = json!({"a": [1, "x", null, true], "b": {"c": "d"}});
        assert_eq!(from_attribute(&to_attribute(&value)).unwrap(), value);
    }

    #[test]
    fn exam_item_skips_absent_fields() {
        let exam = Exam {
            id: "e1".into(),
            fields: ExamFields {
                exam_subject: Some(json!("Math")),
                number_of_students: Some(json!(30)),
                ..ExamFields::default()
            },
        };
        let item = exam_to_item(&exam);
        assert_eq!(item.len(), 3);
        assert_eq!(item.get("numberOfStudents"), Some(&AttributeValue::N("30".into())));
        assert_eq!(item_to_exam(&item).unwrap(), exam);
    }

    #[test]
    fn item_without_id_is_rejected() {
        let mut item = Item::new();
        item.insert("professor".into(), AttributeValue::S("A".into()));
        assert!(matches!(item_to_exam(&item), Err(ExamError::StoreFailure(_))));
    }
}
