use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{Todo, TodoChanges};

mod dynamodb;
#[cfg(test)]
pub(crate) mod memory;

pub(crate) use dynamodb::DynamoDbStore;

/// The key-value table the handler reads and writes.
#[async_trait]
pub(crate) trait TodoStore: Send + Sync {
    /// Scans the table. With `title` set, only items whose title equals it are
    /// returned, in store order.
    async fn scan(&self, title: Option<&str>) -> Result<Vec<Todo>, StoreError>;

    /// Writes a complete item.
    async fn put(&self, todo: &Todo) -> Result<(), StoreError>;

    /// Sets the present fields of `changes` on the item keyed by `id` and
    /// returns the attributes as written.
    async fn update(&self, id: &str, changes: &TodoChanges) -> Result<TodoChanges, StoreError>;

    /// Deletes the item keyed by `id`.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
