//! The controller that owns the todo list.
//!
//! All input, user actions and timer ticks alike, arrives as an [`Action`]
//! and is handled to completion before the next one. Every mutation
//! persists the whole list and redraws; a tick only re-evaluates deadlines
//! and drives the alert sounds.

use crate::alert::AlertSink;
use crate::clock::Clock;
use crate::config::Config;
use crate::deadline::{DEFAULT_TICKING_THRESHOLD_SECS, DeadlineScheduler, TickReport};
use crate::edit_session::EditSession;
use crate::error::AppError;
use crate::model::{Filter, Todo};
use crate::render::Renderer;
use crate::reorder::{DragSession, DropPlacement, TargetBounds, reconcile, relocate};
use crate::storage::{DEFAULT_NAMESPACE, TodoRepository};
use crate::store::{EditResult, TodoStore, parse_minutes};
use crate::view::{ListView, filtered_todos};
use crossbeam_channel::Receiver;
use log::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Create(String),
    Toggle(String),
    ToggleAll(bool),
    BeginEdit(String),
    EditText(String),
    AbortEdit,
    CommitEdit,
    Destroy(String),
    ClearCompleted,
    /// Minutes as typed; non-positive or unparsable input clears the deadline.
    SetDeadline {
        id: String,
        minutes: String,
    },
    Route(String),
    DragStart(String),
    DragOver(String),
    Drop {
        target: String,
        cursor_y: f64,
        bounds: TargetBounds,
    },
    DragEnd,
    Move {
        source: String,
        target: String,
        placement: DropPlacement,
    },
    Tick,
    Quit,
}

/// What became of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Malformed or stale input; nothing changed.
    Ignored,
    /// A drag is over a drop target; the host must suppress its default.
    SuppressDefault,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub namespace: String,
    pub ticking_threshold_secs: i64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            ticking_threshold_secs: DEFAULT_TICKING_THRESHOLD_SECS,
        }
    }
}

impl AppSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            namespace: config.namespace().to_string(),
            ticking_threshold_secs: config.ticking_threshold_secs(),
        }
    }
}

pub struct App<R, V, A, C> {
    store: TodoStore,
    filter: Filter,
    namespace: String,
    scheduler: DeadlineScheduler,
    drag: DragSession,
    editing: Option<EditSession>,
    repository: R,
    renderer: V,
    alerts: A,
    clock: C,
}

impl<R, V, A, C> App<R, V, A, C>
where
    R: TodoRepository,
    V: Renderer,
    A: AlertSink,
    C: Clock,
{
    /// Loads the persisted list once and builds the controller. Nothing is
    /// drawn until [`App::render`] or the first action.
    pub fn load(settings: AppSettings, repository: R, renderer: V, alerts: A, clock: C) -> Self {
        let store = TodoStore::from_todos(repository.load(&settings.namespace));
        info!(
            "event=app_load module=app namespace={} count={}",
            settings.namespace,
            store.len()
        );

        Self {
            store,
            filter: Filter::All,
            namespace: settings.namespace,
            scheduler: DeadlineScheduler::new(settings.ticking_threshold_secs),
            drag: DragSession::default(),
            editing: None,
            repository,
            renderer,
            alerts,
            clock,
        }
    }

    pub fn store(&self) -> &TodoStore {
        &self.store
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn renderer(&self) -> &V {
        &self.renderer
    }

    pub fn view(&self) -> ListView {
        ListView::project(&self.store, self.filter)
    }

    pub fn deadline_report(&self) -> TickReport {
        self.scheduler
            .evaluate(self.store.todos(), self.clock.now_millis())
    }

    /// Draws the first frame, then handles actions from `events` in arrival
    /// order until `Quit` arrives or every sender is gone.
    pub fn run(&mut self, events: &Receiver<Action>) -> Result<(), AppError> {
        self.render()?;
        self.run_with(events, |app, action| app.handle(action))
    }

    /// The event loop for hosts with their own event type. `on_event` maps
    /// each event onto the app; `Outcome::Quit` ends the loop. A failed
    /// event is logged and the loop carries on.
    pub fn run_with<E, F>(&mut self, events: &Receiver<E>, mut on_event: F) -> Result<(), AppError>
    where
        F: FnMut(&mut Self, E) -> Result<Outcome, AppError>,
    {
        while let Ok(event) = events.recv() {
            match on_event(self, event) {
                Ok(Outcome::Quit) => break,
                Ok(_) => {}
                Err(err) => warn!("event=action_failed module=app error={err}"),
            }
        }
        self.shutdown()
    }

    /// Pauses the ticking loop. Call once the event source is gone.
    pub fn shutdown(&mut self) -> Result<(), AppError> {
        info!("event=app_shutdown module=app namespace={}", self.namespace);
        self.alerts.set_ticking(false)
    }

    pub fn handle(&mut self, action: Action) -> Result<Outcome, AppError> {
        debug!("event=action module=app action={action:?}");
        match action {
            Action::Create(title) => match self.store.create(&title) {
                Some(todo) => {
                    debug!("event=todo_created module=app id={}", todo.id);
                    self.commit()
                }
                None => Ok(Outcome::Ignored),
            },
            Action::Toggle(id) => match self.store.toggle(&id) {
                Some(_) => self.commit(),
                None => Ok(Outcome::Ignored),
            },
            Action::ToggleAll(completed) => {
                self.store.set_completed_all(completed);
                self.commit()
            }
            Action::BeginEdit(id) => match self.store.get(&id) {
                Some(todo) => {
                    self.editing = Some(EditSession::begin(todo));
                    Ok(Outcome::Applied)
                }
                None => Ok(Outcome::Ignored),
            },
            Action::EditText(text) => match self.editing.as_mut() {
                Some(session) => {
                    session.set_text(&text);
                    Ok(Outcome::Applied)
                }
                None => Ok(Outcome::Ignored),
            },
            Action::AbortEdit => match self.editing.as_mut() {
                Some(session) => {
                    session.abort();
                    self.commit_edit()
                }
                None => Ok(Outcome::Ignored),
            },
            Action::CommitEdit => self.commit_edit(),
            Action::Destroy(id) => match self.store.destroy(&id) {
                Some(_) => self.commit(),
                None => Ok(Outcome::Ignored),
            },
            Action::ClearCompleted => {
                let removed = self.store.destroy_completed();
                debug!("event=clear_completed module=app removed={removed}");
                self.filter = Filter::All;
                self.commit()
            }
            Action::SetDeadline { id, minutes } => {
                let now = self.clock.now_millis();
                match self.store.set_deadline(&id, parse_minutes(&minutes), now) {
                    Some(_) => self.commit(),
                    None => Ok(Outcome::Ignored),
                }
            }
            Action::Route(fragment) => {
                self.filter = Filter::from_route(&fragment);
                self.render()?;
                Ok(Outcome::Applied)
            }
            Action::DragStart(id) => {
                if self.store.index_of(&id).is_some() && self.drag.start(&id, self.filter) {
                    Ok(Outcome::Applied)
                } else {
                    Ok(Outcome::Ignored)
                }
            }
            Action::DragOver(target) => {
                if self.drag.over(&target) {
                    Ok(Outcome::SuppressDefault)
                } else {
                    Ok(Outcome::Ignored)
                }
            }
            Action::Drop {
                target,
                cursor_y,
                bounds,
            } => {
                let Some(source) = self.drag.source().map(str::to_string) else {
                    return Ok(Outcome::Ignored);
                };
                let placement = DropPlacement::from_cursor(cursor_y, bounds);
                self.move_todo(&source, &target, placement)
            }
            Action::DragEnd => {
                self.drag.end();
                Ok(Outcome::Applied)
            }
            Action::Move {
                source,
                target,
                placement,
            } => self.move_todo(&source, &target, placement),
            Action::Tick => {
                self.tick()?;
                Ok(Outcome::Applied)
            }
            Action::Quit => Ok(Outcome::Quit),
        }
    }

    /// Re-evaluates every deadline, redraws the annotations and drives the
    /// alarm and ticking sounds.
    pub fn tick(&mut self) -> Result<TickReport, AppError> {
        let report = self.deadline_report();
        self.renderer.render_deadlines(&report.statuses)?;

        for id in &report.alarms {
            if let Some(todo) = self.store.get(id) {
                if let Err(err) = self.alerts.play_alarm(todo) {
                    warn!("event=alarm module=app status=error id={id} error={err}");
                }
            }
        }
        if let Err(err) = self.alerts.set_ticking(report.ticking) {
            warn!("event=ticking module=app status=error error={err}");
        }

        Ok(report)
    }

    /// Draws the current deadline annotations, then the list and footer, so
    /// the list is never drawn against a previous state's deadlines. Sounds
    /// are left to the next tick.
    pub fn render(&mut self) -> Result<(), AppError> {
        let report = self.deadline_report();
        self.renderer.render_deadlines(&report.statuses)?;
        let view = self.view();
        self.renderer.render_list(&view)
    }

    pub fn save(&self) -> Result<(), AppError> {
        self.repository.save(&self.namespace, self.store.todos())
    }

    fn commit(&mut self) -> Result<Outcome, AppError> {
        self.save()?;
        self.render()?;
        Ok(Outcome::Applied)
    }

    fn commit_edit(&mut self) -> Result<Outcome, AppError> {
        let Some(session) = self.editing.take() else {
            return Ok(Outcome::Ignored);
        };

        match session.commit(&mut self.store) {
            EditResult::Renamed(todo) => {
                debug!("event=todo_renamed module=app id={}", todo.id);
                self.commit()
            }
            EditResult::Destroyed(todo) => {
                debug!("event=todo_destroyed module=app id={}", todo.id);
                self.commit()
            }
            EditResult::Unchanged => {
                self.render()?;
                Ok(Outcome::Applied)
            }
            EditResult::NotFound => Ok(Outcome::Ignored),
        }
    }

    fn move_todo(
        &mut self,
        source: &str,
        target: &str,
        placement: DropPlacement,
    ) -> Result<Outcome, AppError> {
        if !crate::reorder::reorder_enabled(self.filter) {
            debug!(
                "event=reorder_disabled module=app filter={}",
                self.filter.as_str()
            );
            return Ok(Outcome::Ignored);
        }

        let visible: Vec<String> = filtered_todos(&self.store, self.filter)
            .into_iter()
            .map(|todo: Todo| todo.id)
            .collect();
        let Some(new_visible) = relocate(&visible, source, target, placement) else {
            return Ok(Outcome::Ignored);
        };

        let order = reconcile(&self.store.ids(), &new_visible);
        if !self.store.reorder(&order) {
            return Ok(Outcome::Ignored);
        }
        self.commit()
    }
}
