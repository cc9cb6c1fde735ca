use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::TodoStore;
use crate::error::StoreError;
use crate::model::{Todo, TodoChanges};

/// In-memory table for tests. Scans return items in insertion order.
#[derive(Debug, Clone, Default)]
pub(crate) struct InMemoryStore {
    items: Arc<RwLock<Vec<Todo>>>,
}

impl InMemoryStore {
    pub fn with_todos(todos: impl IntoIterator<Item = Todo>) -> Self {
        Self {
            items: Arc::new(RwLock::new(todos.into_iter().collect())),
        }
    }

    pub async fn todos(&self) -> Vec<Todo> {
        self.items.read().await.clone()
    }
}

#[async_trait]
impl TodoStore for InMemoryStore {
    async fn scan(&self, title: Option<&str>) -> Result<Vec<Todo>, StoreError> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|todo| title.map_or(true, |title| todo.title == title))
            .cloned()
            .collect())
    }

    async fn put(&self, todo: &Todo) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|existing| existing.id == todo.id) {
            Some(existing) => *existing = todo.clone(),
            None => items.push(todo.clone()),
        }
        Ok(())
    }

    async fn update(&self, id: &str, changes: &TodoChanges) -> Result<TodoChanges, StoreError> {
        let mut items = self.items.write().await;
        // UpdateItem creates the item when the key is absent.
        let index = match items.iter().position(|todo| todo.id == id) {
            Some(index) => index,
            None => {
                items.push(Todo {
                    id: id.to_string(),
                    title: String::new(),
                    description: String::new(),
                    completed: false,
                });
                items.len() - 1
            }
        };
        let todo = &mut items[index];
        if let Some(title) = &changes.title {
            todo.title = title.clone();
        }
        if let Some(description) = &changes.description {
            todo.description = description.clone();
        }
        if let Some(completed) = changes.completed {
            todo.completed = completed;
        }
        Ok(changes.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.items.write().await.retain(|todo| todo.id != id);
        Ok(())
    }
}

/// A store whose every call fails, for error paths.
#[derive(Debug, Default)]
pub(crate) struct UnavailableStore;

#[async_trait]
impl TodoStore for UnavailableStore {
    async fn scan(&self, _title: Option<&str>) -> Result<Vec<Todo>, StoreError> {
        Err(StoreError::Request("Table not found".to_string()))
    }

    async fn put(&self, _todo: &Todo) -> Result<(), StoreError> {
        Err(StoreError::Request("Table not found".to_string()))
    }

    async fn update(&self, _id: &str, _changes: &TodoChanges) -> Result<TodoChanges, StoreError> {
        Err(StoreError::Request("Table not found".to_string()))
    }

    async fn delete(&self, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::Request("Table not found".to_string()))
    }
}
