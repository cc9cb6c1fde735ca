use std::env;

const DEFAULT_TABLE: &str = "Todo";
const DEFAULT_REGION: &str = "us-east-1";

/// Settings read once at cold start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub table_name: String,
    pub region: String,
}

impl Config {
    /// Reads `TODO_TABLE` and `TODO_REGION`, falling back to the defaults
    /// when unset or empty.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self {
            table_name: read("TODO_TABLE", DEFAULT_TABLE),
            region: read("TODO_REGION", DEFAULT_REGION),
        }
    }
}
