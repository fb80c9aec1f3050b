use crate::cli::Command;
use countdown_core::app::Action;
use countdown_core::error::AppError;
use countdown_core::reorder::DropPlacement;
use countdown_core::store::TodoStore;
use countdown_core::view::ListView;
use countdown_core::Filter;

/// Width of the id column; long enough to be unique in practice.
pub const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Finds the todo an id or unique id prefix refers to.
pub fn resolve_id(store: &TodoStore, raw: &str) -> Result<String, AppError> {
    let wanted = raw.trim();
    if wanted.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }
    if store.index_of(wanted).is_some() {
        return Ok(wanted.to_string());
    }

    let mut matches = store
        .todos()
        .iter()
        .filter(|todo| todo.id.starts_with(wanted));
    match (matches.next(), matches.next()) {
        (Some(todo), None) => Ok(todo.id.clone()),
        (Some(_), Some(_)) => Err(AppError::invalid_input(format!(
            "id '{wanted}' is ambiguous"
        ))),
        (None, _) => Err(AppError::not_found("todo not found")),
    }
}

/// Translates a command into the actions the app controller understands.
/// `list` and `watch` only change the route here.
pub fn command_actions(command: &Command, store: &TodoStore) -> Result<Vec<Action>, AppError> {
    let actions = match command {
        Command::Add { title } => {
            let title = title.join(" ");
            if title.trim().is_empty() {
                return Err(AppError::invalid_input("title is required"));
            }
            vec![Action::Create(title)]
        }
        Command::Toggle { id } => vec![Action::Toggle(resolve_id(store, id)?)],
        Command::ToggleAll => {
            let all_completed = ListView::project(store, Filter::All).all_completed();
            vec![Action::ToggleAll(!all_completed)]
        }
        Command::Edit { id, title } => {
            let id = resolve_id(store, id)?;
            vec![
                Action::BeginEdit(id),
                Action::EditText(title.join(" ")),
                Action::CommitEdit,
            ]
        }
        Command::Delete { id } => vec![Action::Destroy(resolve_id(store, id)?)],
        Command::ClearCompleted => vec![Action::ClearCompleted],
        Command::Deadline { id, minutes } => vec![Action::SetDeadline {
            id: resolve_id(store, id)?,
            minutes: minutes.clone(),
        }],
        Command::Move { id, before, after } => {
            let source = resolve_id(store, id)?;
            let (target, placement) = match (before, after) {
                (Some(target), _) => (target, DropPlacement::Before),
                (None, Some(target)) => (target, DropPlacement::After),
                (None, None) => {
                    return Err(AppError::invalid_input("move needs --before or --after"));
                }
            };
            vec![Action::Move {
                source,
                target: resolve_id(store, target)?,
                placement,
            }]
        }
        Command::List { filter } | Command::Watch { filter } => {
            vec![Action::Route(route_for(filter.as_deref()))]
        }
    };
    Ok(actions)
}

/// Accepts `active`, `/active` or `#/active`.
pub fn route_for(filter: Option<&str>) -> String {
    match filter {
        Some(raw) if raw.trim_start().starts_with(['/', '#']) => raw.trim().to_string(),
        Some(raw) => format!("/{}", raw.trim()),
        None => Filter::All.route(),
    }
}
