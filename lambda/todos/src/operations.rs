//! Table operations behind the HTTP routes.
//!
//! Title is the lookup key callers use, but it is not unique: when several
//! items share a title the first one the store returns is acted on. Update and
//! delete scan first and then mutate by `id`; the two calls are not atomic.

use tracing::error;
use uuid::Uuid;

use crate::error::TodoError;
use crate::model::{NewTodo, Todo, TodoChanges, UpdateTodo};
use crate::store::TodoStore;

const TITLE_REQUIRED: TodoError = TodoError::Validation("Title is required");

pub(crate) async fn list_todos<S: TodoStore + ?Sized>(store: &S) -> Result<Vec<Todo>, TodoError> {
    store.scan(None).await.map_err(|e| {
        error!(error = %e, "Error getting todos");
        TodoError::store("Failed to retrieve todos")(e)
    })
}

pub(crate) async fn add_todo<S: TodoStore + ?Sized>(
    store: &S,
    new_todo: NewTodo,
) -> Result<Todo, TodoError> {
    let title = match new_todo.title {
        Some(title) if !title.is_empty() => title,
        _ => return Err(TITLE_REQUIRED),
    };

    let todo = Todo {
        id: Uuid::new_v4().to_string(),
        title,
        description: new_todo.description.unwrap_or_default(),
        completed: new_todo.completed.unwrap_or(false),
    };

    store.put(&todo).await.map_err(|e| {
        error!(error = %e, "Error adding todo");
        TodoError::store("Failed to add todo")(e)
    })?;
    Ok(todo)
}

pub(crate) async fn get_todo_by_title<S: TodoStore + ?Sized>(
    store: &S,
    title: &str,
) -> Result<Option<Todo>, TodoError> {
    if title.is_empty() {
        return Err(TITLE_REQUIRED);
    }

    let matches = store.scan(Some(title)).await.map_err(|e| {
        error!(error = %e, %title, "Error getting todo by title");
        TodoError::store("Failed to retrieve todo by title")(e)
    })?;
    Ok(matches.into_iter().next())
}

pub(crate) async fn update_todo<S: TodoStore + ?Sized>(
    store: &S,
    title: &str,
    update: UpdateTodo,
) -> Result<TodoChanges, TodoError> {
    if title.is_empty() {
        return Err(TITLE_REQUIRED);
    }

    let context = "Failed to update todo";
    let matches = store.scan(Some(title)).await.map_err(|e| {
        error!(error = %e, %title, "Error updating todo");
        TodoError::store(context)(e)
    })?;
    let todo = matches.into_iter().next().ok_or(TodoError::NotFound)?;

    let changes = TodoChanges::from(update);
    if changes.is_empty() {
        return Err(TodoError::Validation("No fields to update"));
    }

    store.update(&todo.id, &changes).await.map_err(|e| {
        error!(error = %e, id = %todo.id, "Error updating todo");
        TodoError::store(context)(e)
    })
}

pub(crate) async fn delete_todo<S: TodoStore + ?Sized>(
    store: &S,
    title: &str,
) -> Result<(), TodoError> {
    if title.is_empty() {
        return Err(TITLE_REQUIRED);
    }

    let context = "Failed to delete todo";
    let matches = store.scan(Some(title)).await.map_err(|e| {
        error!(error = %e, %title, "Error deleting todo");
        TodoError::store(context)(e)
    })?;
    let todo = matches.into_iter().next().ok_or(TodoError::NotFound)?;

    store.delete(&todo.id).await.map_err(|e| {
        error!(error = %e, id = %todo.id, "Error deleting todo");
        TodoError::store(context)(e)
    })
}
