use serde::{Deserialize, Serialize};

/// A stored todo item. `id` is the table's partition key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Todo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

/// Body of a `POST` request.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct NewTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// Body of a `PUT` request. The path segment selects the item, `newTitle`
/// renames it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateTodo {
    pub new_title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// Attributes written by an update, and the attribute set the store returns
/// afterwards. Unset fields are left untouched in storage.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TodoChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }
}

impl From<UpdateTodo> for TodoChanges {
    // Empty strings carry no change.
    fn from(update: UpdateTodo) -> Self {
        Self {
            title: update.new_title.filter(|t| !t.is_empty()),
            description: update.description.filter(|d| !d.is_empty()),
            completed: update.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_body_uses_camel_case() {
        let update: UpdateTodo =
            serde_json::from_str(r#"{"newTitle":"Buy oat milk","completed":true}"#).unwrap();
        assert_eq!(update.new_title.as_deref(), Some("Buy oat milk"));
        assert_eq!(update.description, None);
        assert_eq!(update.completed, Some(true));
    }

    #[test]
    fn empty_strings_are_not_changes() {
        let changes = TodoChanges::from(UpdateTodo {
            new_title: Some(String::new()),
            description: Some(String::new()),
            completed: None,
        });
        assert!(changes.is_empty());
    }

    #[test]
    fn changes_serialize_only_present_fields() {
        let changes = TodoChanges {
            completed: Some(false),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&changes).unwrap(),
            serde_json::json!({ "completed": false })
        );
    }
}
