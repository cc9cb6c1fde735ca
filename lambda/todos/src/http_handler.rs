use lambda_http::{Body, Error, Request, RequestExt, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::error::TodoError;
use crate::model::{NewTodo, Todo, TodoChanges, UpdateTodo};
use crate::operations::{add_todo, delete_todo, get_todo_by_title, list_todos, update_todo};
use crate::store::TodoStore;

/// Request details echoed back in every response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LogInfo<'a> {
    http_method: &'a str,
    path: &'a str,
    path_parts: Vec<&'a str>,
    title: Option<String>,
    body: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum Payload {
    Todos(Vec<Todo>),
    Todo(Option<Todo>),
    AddedTodo(Todo),
    UpdatedTodo(TodoChanges),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(flatten)]
    payload: Option<Payload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    log_info: &'a LogInfo<'a>,
}

struct Reply {
    status: u16,
    message: Option<&'static str>,
    payload: Option<Payload>,
}

impl Reply {
    fn ok(payload: Payload) -> Self {
        Self {
            status: 200,
            message: None,
            payload: Some(payload),
        }
    }
}

pub(crate) async fn function_handler<S: TodoStore + ?Sized>(
    store: &S,
    event: Request,
) -> Result<Response<Body>, Error> {
    let method = event.method().as_str();
    // REST API events prefix the uri with the stage; the raw path does not.
    let path = match event.raw_http_path() {
        "" => event.uri().path(),
        raw => raw,
    };
    let path_parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();

    let title = path_parts
        .get(1)
        .map(|segment| decode_segment(segment))
        .transpose();
    let body = parse_body(event.body().as_ref());

    let log_info = LogInfo {
        http_method: method,
        path,
        path_parts: path_parts.clone(),
        title: title.as_ref().ok().cloned().flatten(),
        body: body.as_ref().ok().cloned().flatten(),
    };
    info!(
        http_method = method,
        path,
        path_parts = ?log_info.path_parts,
        title = ?log_info.title,
        body = ?log_info.body,
        "Routing request"
    );

    let outcome = match (title, body) {
        (Ok(title), Ok(body)) => route(store, method, title.as_deref(), body).await,
        (Err(e), _) | (_, Err(e)) => Err(e),
    };

    let (status, envelope) = match outcome {
        Ok(reply) => (
            reply.status,
            Envelope {
                success: true,
                message: reply.message.map(str::to_string),
                payload: reply.payload,
                error: None,
                log_info: &log_info,
            },
        ),
        Err(e) => {
            error!(http_method = method, error = %e, cause = ?e.cause(), "Request failed");
            (
                e.status_code(),
                Envelope {
                    success: false,
                    message: Some(e.to_string()),
                    payload: None,
                    error: e.cause(),
                    log_info: &log_info,
                },
            )
        }
    };

    let body = serde_json::to_string(&envelope)?;
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::Text(body))?)
}

async fn route<S: TodoStore + ?Sized>(
    store: &S,
    method: &str,
    title: Option<&str>,
    body: Option<Value>,
) -> Result<Reply, TodoError> {
    match (method, title) {
        ("GET", Some(title)) => {
            info!("Fetching specific todo");
            let todo = get_todo_by_title(store, title).await?;
            Ok(Reply::ok(Payload::Todo(todo)))
        }
        ("GET", None) => {
            info!("Fetching all todos");
            let todos = list_todos(store).await?;
            Ok(Reply::ok(Payload::Todos(todos)))
        }
        ("POST", _) => {
            let new_todo: NewTodo = from_body(body)?;
            if is_blank(&new_todo.title) || is_blank(&new_todo.description) {
                info!("Invalid POST request body");
                return Err(TodoError::Validation(
                    "Bad Request: Missing title or description in body",
                ));
            }
            info!("Adding a new todo");
            let todo = add_todo(store, new_todo).await?;
            Ok(Reply {
                status: 201,
                message: Some("Todo added successfully"),
                payload: Some(Payload::AddedTodo(todo)),
            })
        }
        ("PUT", Some(title)) if body.is_some() => {
            info!("Updating todo");
            let update: UpdateTodo = from_body(body)?;
            let changes = update_todo(store, title, update).await?;
            Ok(Reply {
                status: 200,
                message: Some("Todo updated successfully"),
                payload: Some(Payload::UpdatedTodo(changes)),
            })
        }
        ("PUT", _) => {
            info!("Invalid PUT request: Missing title or body");
            Err(TodoError::Validation("Bad Request: Missing title or body"))
        }
        ("DELETE", Some(title)) => {
            info!("Deleting todo");
            delete_todo(store, title).await?;
            Ok(Reply {
                status: 204,
                message: Some("Todo deleted successfully"),
                payload: None,
            })
        }
        ("DELETE", None) => {
            info!("Invalid DELETE request: Missing title");
            Err(TodoError::Validation("Bad Request: Missing title"))
        }
        _ => {
            info!("Unsupported HTTP method");
            Err(TodoError::UnsupportedMethod)
        }
    }
}

fn decode_segment(segment: &str) -> Result<String, TodoError> {
    let bad_escape = segment.split('%').skip(1).any(|rest| {
        !rest
            .get(..2)
            .is_some_and(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
    });
    if bad_escape {
        return Err(TodoError::InvalidRequest(format!(
            "Invalid path encoding: malformed escape in `{segment}`"
        )));
    }
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| TodoError::InvalidRequest(format!("Invalid path encoding: {e}")))
}

fn parse_body(raw: &[u8]) -> Result<Option<Value>, TodoError> {
    if raw.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(raw)
        .map(Some)
        .map_err(|e| TodoError::InvalidRequest(format!("Invalid JSON: {e}")))
}

fn from_body<T: DeserializeOwned + Default>(body: Option<Value>) -> Result<T, TodoError> {
    match body {
        Some(body @ Value::Object(_)) => serde_json::from_value(body)
            .map_err(|e| TodoError::InvalidRequest(format!("Invalid request body: {e}"))),
        Some(_) => Err(TodoError::InvalidRequest(
            "Invalid request body: expected a JSON object".to_string(),
        )),
        None => Ok(T::default()),
    }
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, str::is_empty)
}
