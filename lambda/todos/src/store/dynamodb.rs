//! DynamoDB-backed [`TodoStore`].
//!
//! Items are flat: `id` (S, partition key), `title` (S), `description` (S)
//! and `completed` (BOOL).

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use tracing::debug;

use super::TodoStore;
use crate::error::StoreError;
use crate::model::{Todo, TodoChanges};

type Item = HashMap<String, AttributeValue>;

pub(crate) struct DynamoDbStore {
    client: Client,
    table_name: String,
}

impl DynamoDbStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl TodoStore for DynamoDbStore {
    async fn scan(&self, title: Option<&str>) -> Result<Vec<Todo>, StoreError> {
        debug!(table = %self.table_name, ?title, "scan");
        let mut request = self.client.scan().table_name(&self.table_name);
        if let Some(title) = title {
            request = request
                .filter_expression("#title = :title")
                .expression_attribute_names("#title", "title")
                .expression_attribute_values(":title", AttributeValue::S(title.to_string()));
        }

        let output = request.send().await.map_err(map_scan_error)?;
        output
            .items
            .unwrap_or_default()
            .iter()
            .map(item_to_todo)
            .collect()
    }

    async fn put(&self, todo: &Todo) -> Result<(), StoreError> {
        debug!(table = %self.table_name, id = %todo.id, "put_item");
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(todo_to_item(todo)))
            .send()
            .await
            .map_err(map_put_item_error)?;
        Ok(())
    }

    async fn update(&self, id: &str, changes: &TodoChanges) -> Result<TodoChanges, StoreError> {
        debug!(table = %self.table_name, %id, "update_item");
        let update = UpdateExpression::from_changes(changes);
        let output = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .update_expression(update.expression)
            .set_expression_attribute_names(Some(update.names))
            .set_expression_attribute_values(Some(update.values))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await
            .map_err(map_update_item_error)?;

        attributes_to_changes(&output.attributes.unwrap_or_default())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        debug!(table = %self.table_name, %id, "delete_item");
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(map_delete_item_error)?;
        Ok(())
    }
}

fn todo_to_item(todo: &Todo) -> Item {
    let mut item = HashMap::new();
    item.insert("id".to_string(), AttributeValue::S(todo.id.clone()));
    item.insert("title".to_string(), AttributeValue::S(todo.title.clone()));
    item.insert(
        "description".to_string(),
        AttributeValue::S(todo.description.clone()),
    );
    item.insert("completed".to_string(), AttributeValue::Bool(todo.completed));
    item
}

fn item_to_todo(item: &Item) -> Result<Todo, StoreError> {
    Ok(Todo {
        id: required_string(item, "id")?,
        title: required_string(item, "title")?,
        description: optional_string(item, "description")?.unwrap_or_default(),
        completed: optional_bool(item, "completed")?.unwrap_or(false),
    })
}

fn attributes_to_changes(item: &Item) -> Result<TodoChanges, StoreError> {
    Ok(TodoChanges {
        title: optional_string(item, "title")?,
        description: optional_string(item, "description")?,
        completed: optional_bool(item, "completed")?,
    })
}

fn required_string(item: &Item, name: &str) -> Result<String, StoreError> {
    optional_string(item, name)?
        .ok_or_else(|| StoreError::Malformed(format!("missing attribute `{name}`")))
}

fn optional_string(item: &Item, name: &str) -> Result<Option<String>, StoreError> {
    item.get(name)
        .map(|v| {
            v.as_s()
                .cloned()
                .map_err(|_| StoreError::Malformed(format!("attribute `{name}` is not a string")))
        })
        .transpose()
}

fn optional_bool(item: &Item, name: &str) -> Result<Option<bool>, StoreError> {
    item.get(name)
        .map(|v| {
            v.as_bool()
                .copied()
                .map_err(|_| StoreError::Malformed(format!("attribute `{name}` is not a boolean")))
        })
        .transpose()
}

/// A `SET` expression over the present fields of a [`TodoChanges`].
#[derive(Debug, PartialEq)]
struct UpdateExpression {
    expression: String,
    names: HashMap<String, String>,
    values: Item,
}

impl UpdateExpression {
    fn from_changes(changes: &TodoChanges) -> Self {
        let mut assignments = Vec::new();
        let mut names = HashMap::new();
        let mut values = HashMap::new();

        let mut set = |attribute: &str, value: AttributeValue| {
            assignments.push(format!("#{attribute} = :{attribute}"));
            names.insert(format!("#{attribute}"), attribute.to_string());
            values.insert(format!(":{attribute}"), value);
        };

        if let Some(title) = &changes.title {
            set("title", AttributeValue::S(title.clone()));
        }
        if let Some(description) = &changes.description {
            set("description", AttributeValue::S(description.clone()));
        }
        if let Some(completed) = changes.completed {
            set("completed", AttributeValue::Bool(completed));
        }

        Self {
            expression: format!("SET {}", assignments.join(", ")),
            names,
            values,
        }
    }
}

fn map_scan_error<R: Debug + Send + Sync + 'static>(err: SdkError<ScanError, R>) -> StoreError {
    let message = match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => "Table not found".to_string(),
        ScanError::ProvisionedThroughputExceededException(_) => {
            "Throughput exceeded, please retry".to_string()
        }
        ScanError::RequestLimitExceeded(_) => "Request limit exceeded, please retry".to_string(),
        ScanError::InternalServerError(_) => "DynamoDB internal server error".to_string(),
        err => format!("Scan failed: {}", DisplayErrorContext(&err)),
    };
    StoreError::Request(message)
}

fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
) -> StoreError {
    let message = match err.into_service_error() {
        PutItemError::ResourceNotFoundException(_) => "Table not found".to_string(),
        PutItemError::ProvisionedThroughputExceededException(_) => {
            "Throughput exceeded, please retry".to_string()
        }
        PutItemError::RequestLimitExceeded(_) => {
            "Request limit exceeded, please retry".to_string()
        }
        PutItemError::InternalServerError(_) => "DynamoDB internal server error".to_string(),
        err => format!("PutItem failed: {}", DisplayErrorContext(&err)),
    };
    StoreError::Request(message)
}

fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
) -> StoreError {
    let message = match err.into_service_error() {
        UpdateItemError::ResourceNotFoundException(_) => "Table not found".to_string(),
        UpdateItemError::ProvisionedThroughputExceededException(_) => {
            "Throughput exceeded, please retry".to_string()
        }
        UpdateItemError::RequestLimitExceeded(_) => {
            "Request limit exceeded, please retry".to_string()
        }
        UpdateItemError::TransactionConflictException(_) => {
            "Transaction conflict, please retry".to_string()
        }
        UpdateItemError::InternalServerError(_) => "DynamoDB internal server error".to_string(),
        err => format!("UpdateItem failed: {}", DisplayErrorContext(&err)),
    };
    StoreError::Request(message)
}

fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
) -> StoreError {
    let message = match err.into_service_error() {
        DeleteItemError::ResourceNotFoundException(_) => "Table not found".to_string(),
        DeleteItemError::ProvisionedThroughputExceededException(_) => {
            "Throughput exceeded, please retry".to_string()
        }
        DeleteItemError::RequestLimitExceeded(_) => {
            "Request limit exceeded, please retry".to_string()
        }
        DeleteItemError::TransactionConflictException(_) => {
            "Transaction conflict, please retry".to_string()
        }
        DeleteItemError::InternalServerError(_) => "DynamoDB internal server error".to_string(),
        err => format!("DeleteItem failed: {}", DisplayErrorContext(&err)),
    };
    StoreError::Request(message)
}
