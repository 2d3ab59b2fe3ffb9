use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The caller-supplied part of an exam. Values are opaque JSON scalars and
/// are stored exactly as received.
///
/// An explicit JSON `null` reads the same as an absent field, so it is never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_subject: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_date: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professor: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_students: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_location: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_class: Option<Value>,
}

impl ExamFields {
    /// Attribute names of the mutable fields, in update order.
    pub const NAMES: [&'static str; 7] = [
        "examSubject",
        "examDate",
        "professor",
        "assistant",
        "numberOfStudents",
        "examLocation",
        "examClass",
    ];

    /// Pairs each attribute name with its value, absent ones included.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, Option<&Value>); 7] {
        [
            (Self::NAMES[0], self.exam_subject.as_ref()),
            (Self::NAMES[1], self.exam_date.as_ref()),
            (Self::NAMES[2], self.professor.as_ref()),
            (Self::NAMES[3], self.assistant.as_ref()),
            (Self::NAMES[4], self.number_of_students.as_ref()),
            (Self::NAMES[5], self.exam_location.as_ref()),
            (Self::NAMES[6], self.exam_class.as_ref()),
        ]
    }

    /// The exam date as a calendar day, if it starts with `YYYY-MM-DD`.
    #[must_use]
    pub fn exam_day(&self) -> Option<chrono::NaiveDate> {
        let raw = self.exam_date.as_ref()?.as_str()?;
        let day = raw.get(..10)?;
        chrono::NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub id: String,
    #[serde(flatten)]
    pub fields: ExamFields,
}

impl Exam {
    /// Creates a new exam with a freshly generated v4 UUID.
    #[must_use]
    pub fn new(fields: ExamFields) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            fields,
        }
    }
}

/// A queued message naming the action to run plus its free-form payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEnvelope {
    pub task: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl TaskEnvelope {
    #[must_use]
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            payload: Map::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }
}
