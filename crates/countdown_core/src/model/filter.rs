use crate::model::Todo;
use std::fmt;

/// Which todos are visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// Parses a filter name, matching exactly. Anything else, including
    /// other spellings like `Active`, falls back to `All` because the value
    /// usually comes straight from a URL fragment.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "active" => Self::Active,
            "completed" => Self::Completed,
            _ => Self::All,
        }
    }

    /// Maps a route fragment of shape `/<filter>` (optionally `#/<filter>`).
    pub fn from_route(fragment: &str) -> Self {
        let trimmed = fragment.trim();
        let path = trimmed.strip_prefix('#').unwrap_or(trimmed);
        Self::parse(path.strip_prefix('/').unwrap_or(path))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn route(self) -> String {
        format!("/{}", self.as_str())
    }

    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.completed,
            Self::Completed => todo.completed,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
