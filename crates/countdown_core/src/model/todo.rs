use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A single task record.
///
/// `deadline` is an absolute epoch timestamp in milliseconds. Persisted data
/// may carry `0` or `null` for "no countdown"; both load as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(
        default,
        deserialize_with = "deadline_from_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<i64>,
}

impl Todo {
    pub fn new<T: Into<String>>(title: T) -> Self {
        Self {
            id: new_todo_id(),
            title: title.into(),
            completed: false,
            deadline: None,
        }
    }

    pub fn has_deadline(&self) -> bool {
        self.deadline.is_some()
    }
}

/// Random RFC 4122 version 4 identifier in its hyphenated form.
pub fn new_todo_id() -> String {
    Uuid::new_v4().to_string()
}

fn deadline_from_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<f64> = Option::deserialize(deserializer)?;
    Ok(raw
        .filter(|value| value.is_finite() && *value != 0.0)
        .map(|value| value as i64))
}

#[cfg(test)]
mod tests {
    use super::{Todo, new_todo_id};

    #[test]
    fn new_todo_starts_active_without_deadline() {
        let todo = Todo::new("Buy milk");

        assert_eq!(todo.title, "Buy milk");
        assert!(!todo.completed);
        assert_eq!(todo.deadline, None);
        assert!(!todo.id.is_empty());
    }

    #[test]
    fn ids_carry_version_and_variant_bits() {
        let id = new_todo_id();
        let bytes: Vec<char> = id.chars().collect();

        assert_eq!(id.len(), 36);
        assert_eq!(bytes[8], '-');
        assert_eq!(bytes[13], '-');
        assert_eq!(bytes[14], '4');
        assert!(matches!(bytes[19], '8' | '9' | 'a' | 'b'));
    }

    #[test]
    fn ids_are_not_reused() {
        assert_ne!(new_todo_id(), new_todo_id());
    }

    #[test]
    fn zero_and_null_deadlines_load_as_unset() {
        let zero: Todo =
            serde_json::from_str(r#"{"id":"a","title":"x","completed":false,"deadline":0}"#)
                .unwrap();
        let null: Todo =
            serde_json::from_str(r#"{"id":"a","title":"x","completed":false,"deadline":null}"#)
                .unwrap();
        let missing: Todo = serde_json::from_str(r#"{"id":"a","title":"x"}"#).unwrap();

        assert_eq!(zero.deadline, None);
        assert_eq!(null.deadline, None);
        assert_eq!(missing.deadline, None);
        assert!(!missing.completed);
    }

    #[test]
    fn unset_deadline_is_omitted_when_serialized() {
        let todo = Todo {
            id: "a".to_string(),
            title: "Buy milk".to_string(),
            completed: false,
            deadline: None,
        };

        let value = serde_json::to_value(&todo).unwrap();
        assert!(value.get("deadline").is_none());
        assert_eq!(value["title"], "Buy milk");
    }
}
