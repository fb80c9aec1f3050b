use crate::error::AppError;
use crate::model::Todo;
use crate::storage::TodoRepository;
use log::{debug, warn};
use std::path::{Path, PathBuf};

const STORE_DIR_ENV_VAR: &str = "COUNTDOWN_STORE_DIR";
const APP_DIR_NAME: &str = "countdown";

/// Keeps each namespace as `<dir>/<namespace>.json`, a JSON array of todos.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::new(store_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_namespace(namespace)))
    }
}

impl TodoRepository for JsonFileStore {
    fn load(&self, namespace: &str) -> Vec<Todo> {
        let path = self.path_for(namespace);
        match read_todos(&path) {
            Ok(todos) => {
                debug!(
                    "event=store_load module=storage path={} count={}",
                    path.display(),
                    todos.len()
                );
                todos
            }
            Err(err) => {
                warn!(
                    "event=store_load module=storage status=fallback path={} error={}",
                    path.display(),
                    err
                );
                Vec::new()
            }
        }
    }

    fn save(&self, namespace: &str, todos: &[Todo]) -> Result<(), AppError> {
        let path = self.path_for(namespace);
        write_todos(&path, todos)?;
        debug!(
            "event=store_save module=storage path={} count={}",
            path.display(),
            todos.len()
        );
        Ok(())
    }
}

pub fn store_dir() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_DIR_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join(APP_DIR_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home).join(".config").join(APP_DIR_NAME))
    }
}

/// Reads a stored list. A missing file is an empty list; unreadable or
/// malformed content is reported to the caller.
pub fn read_todos(path: &Path) -> Result<Vec<Todo>, AppError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path).map_err(|err| AppError::io(err.to_string()))?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn write_todos(path: &Path, todos: &[Todo]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let content = serde_json::to_string_pretty(todos)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content).map_err(|err| AppError::io(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions).map_err(|err| AppError::io(err.to_string()))?;
    }

    Ok(())
}

fn sanitize_namespace(namespace: &str) -> String {
    let cleaned: String = namespace
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        crate::storage::DEFAULT_NAMESPACE.to_string()
    } else {
        cleaned
    }
}
