use clap::{CommandFactory, Parser};
use countdown_cli::cli::{Cli, Command, collect_overrides};
use countdown_cli::commands::{command_actions, route_for, short_id};
use countdown_cli::render::TerminalRenderer;
use countdown_core::alert::{AlertSink, NoopAlerts, alerts_from_env};
use countdown_core::clock::{SystemClock, format_millis};
use countdown_core::config::{Config, load_config_with_fallback, merge_overrides, palette_for_theme};
use countdown_core::error::AppError;
use countdown_core::logging::{default_log_level, init_logging};
use countdown_core::render::{NullRenderer, Renderer};
use countdown_core::storage::JsonFileStore;
use countdown_core::ticker::Ticker;
use countdown_core::view::pluralize;
use countdown_core::{Action, App, AppSettings, Outcome, Todo};
use crossbeam_channel::{Sender, unbounded};
use log::{info, warn};
use std::io::{self, BufRead};

type CliApp<V, A> = App<JsonFileStore, V, A, SystemClock>;

enum WatchEvent {
    Line(String),
    Tick,
    Closed,
}

fn todo_json(todo: &Todo) -> serde_json::Value {
    serde_json::json!({
        "id": todo.id,
        "title": todo.title,
        "completed": todo.completed,
        "deadline": todo.deadline,
        "deadline_at": todo.deadline.and_then(format_millis),
    })
}

fn print_todo(json: bool, verb: &str, todo: &Todo) {
    if json {
        println!("{}", todo_json(todo));
    } else {
        println!("{verb} todo: {} ({})", todo.title, short_id(&todo.id));
    }
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        match ch {
            '\\' if in_quotes => escape = true,
            '"' => in_quotes = !in_quotes,
            ch if ch.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            ch => current.push(ch),
        }
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }
    if !current.is_empty() {
        args.push(current);
    }
    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn load_settings(cli: &Cli) -> Result<Config, AppError> {
    let loaded = load_config_with_fallback();
    let overrides = collect_overrides(&cli.config_override).map_err(AppError::invalid_input)?;
    let config = merge_overrides(&loaded.config, &overrides);

    let level = config.log_level.clone().unwrap_or_else(default_log_level);
    if let Err(err) = init_logging(&level, config.log_dir.as_deref()) {
        eprintln!("WARN: logging disabled: {err}");
    }
    if let Some(err) = loaded.error {
        warn!("event=config_load module=cli status=fallback error={err}");
        eprintln!("WARN: using default config: {err}");
    }
    Ok(config)
}

fn no_effect(command: &Command) -> AppError {
    match command {
        Command::Move { .. } => AppError::invalid_input(
            "todo was not moved; pick two different todos in the unfiltered list",
        ),
        _ => AppError::not_found("todo not found"),
    }
}

/// The todo an action sequence is about, if any.
fn action_target(actions: &[Action]) -> Option<String> {
    actions.iter().find_map(|action| match action {
        Action::Toggle(id)
        | Action::BeginEdit(id)
        | Action::Destroy(id)
        | Action::SetDeadline { id, .. }
        | Action::Move { source: id, .. } => Some(id.clone()),
        _ => None,
    })
}

/// Applies one command to the app and reports what changed.
fn run_command<V, A>(app: &mut CliApp<V, A>, command: &Command, json: bool) -> Result<(), AppError>
where
    V: Renderer,
    A: AlertSink,
{
    let actions = command_actions(command, app.store())?;
    let target = action_target(&actions);
    let before = target.as_deref().and_then(|id| app.store().get(id)).cloned();
    let count_before = app.store().len();

    for action in actions {
        if app.handle(action)? == Outcome::Ignored {
            return Err(no_effect(command));
        }
    }

    let store = app.store();
    let after = target.as_deref().and_then(|id| store.get(id));
    match command {
        Command::Add { .. } => {
            if let Some(todo) = store.todos().last() {
                print_todo(json, "Added", todo);
            }
        }
        Command::Toggle { .. } => {
            if let Some(todo) = after {
                let verb = if todo.completed { "Completed" } else { "Reopened" };
                print_todo(json, verb, todo);
            }
        }
        Command::ToggleAll => {
            let completed = store.todos().iter().all(|todo| todo.completed);
            let count = store.len() as i64;
            if json {
                println!("{}", serde_json::json!({ "completed": completed, "count": count }));
            } else {
                let state = if completed { "completed" } else { "active" };
                println!("Marked {count} {} {state}", pluralize(count, "todo"));
            }
        }
        Command::Edit { .. } | Command::Delete { .. } => match (after, before.as_ref()) {
            (Some(todo), _) => print_todo(json, "Updated", todo),
            (None, Some(todo)) => print_todo(json, "Deleted", todo),
            (None, None) => {}
        },
        Command::ClearCompleted => {
            let removed = count_before.saturating_sub(store.len()) as i64;
            if json {
                println!("{}", serde_json::json!({ "removed": removed }));
            } else {
                println!("Cleared {removed} completed {}", pluralize(removed, "todo"));
            }
        }
        Command::Deadline { .. } => {
            if let Some(todo) = after {
                if json {
                    println!("{}", todo_json(todo));
                } else {
                    let at = todo
                        .deadline
                        .map(|millis| format_millis(millis).unwrap_or_else(|| millis.to_string()));
                    match at {
                        Some(at) => println!(
                            "Deadline set: {} ({}) at {at}",
                            todo.title,
                            short_id(&todo.id)
                        ),
                        None => println!(
                            "Deadline cleared: {} ({})",
                            todo.title,
                            short_id(&todo.id)
                        ),
                    }
                }
            }
        }
        Command::Move { .. } => {
            if let Some(todo) = after {
                print_todo(json, "Moved", todo);
            }
        }
        Command::List { .. } | Command::Watch { .. } => {}
    }

    Ok(())
}

fn run_once(config: &Config, command: Command, json: bool) -> Result<(), AppError> {
    let mut app = App::load(
        AppSettings::from_config(config),
        JsonFileStore::from_env()?,
        NullRenderer,
        NoopAlerts,
        SystemClock,
    );
    run_command(&mut app, &command, json)?;

    if let Command::List { .. } = command {
        let palette = palette_for_theme(config.theme.as_deref());
        let mut renderer = TerminalRenderer::new(io::stdout(), palette, json);
        renderer.print_snapshot(&app.view(), &app.deadline_report().statuses)?;
    }
    Ok(())
}

fn spawn_stdin_reader(events: Sender<WatchEvent>) -> Result<(), AppError> {
    std::thread::Builder::new()
        .name("countdown-stdin".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if events.send(WatchEvent::Line(line)).is_err() {
                    return;
                }
            }
            let _ = events.send(WatchEvent::Closed);
        })
        .map_err(|err| AppError::io(format!("failed to start input reader: {err}")))?;
    Ok(())
}

/// Runs one line typed in watch mode. Problems are reported on stderr and
/// the loop keeps going; `quit` ends it.
fn handle_line<V, A>(app: &mut CliApp<V, A>, line: &str, json: bool) -> Outcome
where
    V: Renderer,
    A: AlertSink,
{
    let line = line.trim();
    if line.is_empty() {
        return Outcome::Ignored;
    }
    if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        return Outcome::Quit;
    }
    if line == "help" || line == "?" {
        print_help();
        return Outcome::Applied;
    }

    let args = match split_command_line(line) {
        Ok(args) if !args.is_empty() => args,
        Ok(_) => return Outcome::Ignored,
        Err(err) => {
            eprintln!("ERROR: {err}");
            return Outcome::Ignored;
        }
    };

    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push("countdown".to_string());
    argv.extend(args);

    let command = match Cli::try_parse_from(argv) {
        Ok(Cli {
            command: Some(command),
            ..
        }) => command,
        Ok(_) => return Outcome::Ignored,
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            return Outcome::Ignored;
        }
    };

    match run_command(app, &command, json) {
        Ok(()) => Outcome::Applied,
        Err(err) => {
            eprintln!("ERROR: {err}");
            Outcome::Ignored
        }
    }
}

fn run_watch(config: &Config, filter: Option<String>, json: bool) -> Result<(), AppError> {
    let palette = palette_for_theme(config.theme.as_deref());
    let renderer = TerminalRenderer::new(io::stdout(), palette, json).live();
    let mut app = App::load(
        AppSettings::from_config(config),
        JsonFileStore::from_env()?,
        renderer,
        alerts_from_env(config.alert_mode()),
        SystemClock,
    );
    app.handle(Action::Route(route_for(filter.as_deref())))?;
    info!(
        "event=watch_start module=cli tick_ms={} alerts={}",
        config.tick_interval().as_millis(),
        config.alert_mode().as_str()
    );

    let (events_tx, events_rx) = unbounded();
    let mut ticker = Ticker::start(config.tick_interval(), events_tx.clone(), || WatchEvent::Tick);
    spawn_stdin_reader(events_tx)?;

    let result = app.run_with(&events_rx, |app, event| match event {
        WatchEvent::Tick => app.handle(Action::Tick),
        WatchEvent::Line(line) => Ok(handle_line(app, &line, json)),
        WatchEvent::Closed => Ok(Outcome::Quit),
    });

    ticker.stop();
    result?;
    if !json {
        println!();
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = load_settings(&cli)?;
    match cli.command {
        None => run_watch(&config, None, cli.json),
        Some(Command::Watch { filter }) => run_watch(&config, filter, cli.json),
        Some(command) => run_once(&config, command, cli.json),
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            let _ = err.print();
            return;
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}
