use thiserror::Error;

/// Failures reported by a [`TodoStore`](crate::store::TodoStore).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub(crate) enum StoreError {
    #[error("{0}")]
    Request(String),
    #[error("Malformed item: {0}")]
    Malformed(String),
}

/// Everything that can go wrong while serving a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub(crate) enum TodoError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Todo not found")]
    NotFound,
    #[error("{context}")]
    Store {
        context: &'static str,
        source: StoreError,
    },
    #[error("Method Not Allowed")]
    UnsupportedMethod,
}

impl TodoError {
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { context, source }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::InvalidRequest(_) => 400,
            Self::NotFound => 404,
            Self::UnsupportedMethod => 405,
            Self::Store { .. } => 500,
        }
    }

    /// The underlying cause, reported next to the message.
    pub fn cause(&self) -> Option<String> {
        match self {
            Self::Store { source, .. } => Some(source.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(TodoError::Validation("Title is required").status_code(), 400);
        assert_eq!(TodoError::InvalidRequest("bad".into()).status_code(), 400);
        assert_eq!(TodoError::NotFound.status_code(), 404);
        assert_eq!(TodoError::UnsupportedMethod.status_code(), 405);
        let err = TodoError::store("Failed to add todo")(StoreError::Request("timeout".into()));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn store_error_keeps_context_and_cause() {
        let err = TodoError::store("Failed to retrieve todos")(StoreError::Malformed(
            "missing attribute `id`".into(),
        ));
        assert_eq!(err.to_string(), "Failed to retrieve todos");
        assert_eq!(
            err.cause().as_deref(),
            Some("Malformed item: missing attribute `id`")
        );
        assert_eq!(TodoError::NotFound.cause(), None);
    }
}
