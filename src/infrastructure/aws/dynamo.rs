use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use tracing::{debug, info};

use super::attributes::{self, Item};
use crate::core::models::{Exam, ExamFields};
use crate::errors::ExamError;
use crate::store::ExamStore;

/// Exam table backed by DynamoDB, partition key `id`.
#[derive(Debug, Clone)]
pub struct DynamoExamStore {
    client: DynamoClient,
    table: String,
}

impl DynamoExamStore {
    #[must_use]
    pub fn new(client: DynamoClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    #[must_use]
    pub fn from_shared(shared: &aws_config::SdkConfig, table: impl Into<String>) -> Self {
        Self::new(DynamoClient::new(shared), table)
    }

    fn key(id: &str) -> AttributeValue {
        AttributeValue::S(id.to_string())
    }
}

/// Builds `SET #f0 = :f0, ... REMOVE #f3, ...` covering all mutable fields,
/// so a replace never leaves a stale attribute behind.
pub(crate) fn replace_expression(
    fields: &ExamFields,
) -> (String, HashMap<String, String>, HashMap<String, AttributeValue>) {
    let mut names = HashMap::new();
    let mut values = HashMap::new();
    let mut set = Vec::new();
    let mut remove = Vec::new();

    for (i, (name, value)) in fields.entries().into_iter().enumerate() {
        let placeholder = format!("#f{i}");
        names.insert(placeholder.clone(), name.to_string());
        match value {
            Some(value) => {
                let value_ref = format!(":f{i}");
                set.push(format!("{placeholder} = {value_ref}"));
                values.insert(value_ref, attributes::to_attribute(value));
            }
            None => remove.push(placeholder),
        }
    }

    let mut clauses = Vec::new();
    if !set.is_empty() {
        clauses.push(format!("SET {}", set.join(", ")));
    }
    if !remove.is_empty() {
        clauses.push(format!("REMOVE {}", remove.join(", ")));
    }

    (clauses.join(" "), names, values)
}

#[async_trait]
impl ExamStore for DynamoExamStore {
    async fn put(&self, exam: &Exam) -> Result<(), ExamError> {
        debug!(table = %self.table, id = %exam.id, "put_item");
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(attributes::exam_to_item(exam)))
            .send()
            .await?;
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<Exam>, ExamError> {
        let mut exams = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let resp = self
                .client
                .scan()
                .table_name(&self.table)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await?;

            for item in resp.items() {
                exams.push(attributes::item_to_exam(item)?);
            }

            match resp.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        info!(table = %self.table, count = exams.len(), "Scanned exams");
        Ok(exams)
    }

    async fn get(&self, id: &str) -> Result<Option<Exam>, ExamError> {
        let resp = self
            .client
            .get_item()
            .table_name(&self.table)
            .key("id", Self::key(id))
            .send()
            .await?;

        resp.item().map(attributes::item_to_exam).transpose()
    }

    async fn replace(&self, id: &str, fields: &ExamFields) -> Result<ExamFields, ExamError> {
        let (expression, names, values) = replace_expression(fields);
        debug!(table = %self.table, id = %id, expression = %expression, "update_item");

        let resp = self
            .client
            .update_item()
            .table_name(&self.table)
            .key("id", Self::key(id))
            .update_expression(expression)
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values((!values.is_empty()).then_some(values))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await?;

        match resp.attributes() {
            Some(attrs) => attributes::item_to_fields(attrs),
            None => Ok(ExamFields::default()),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), ExamError> {
        self.client
            .delete_item()
            .table_name(&self.table)
            .key("id", Self::key(id))
            .send()
            .await?;
        Ok(())
    }
}
