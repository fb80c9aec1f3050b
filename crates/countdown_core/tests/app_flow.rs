use countdown_core::alert::{AlertEvent, RecordingAlerts};
use countdown_core::clock::ManualClock;
use countdown_core::deadline::Urgency;
use countdown_core::render::RecordingRenderer;
use countdown_core::reorder::{DropPlacement, TargetBounds};
use countdown_core::storage::{JsonFileStore, MemoryStore, TodoRepository};
use countdown_core::{Action, App, AppSettings, Filter, Outcome, Todo};
use pretty_assertions::assert_eq;

const NOW: i64 = 1_700_000_000_000;
const NAMESPACE: &str = "todos-test";

type TestApp = App<MemoryStore, RecordingRenderer, RecordingAlerts, ManualClock>;

struct Harness {
    app: TestApp,
    repository: MemoryStore,
    renderer: RecordingRenderer,
    alerts: RecordingAlerts,
    clock: ManualClock,
}

fn todo(id: &str, title: &str) -> Todo {
    Todo {
        id: id.to_string(),
        title: title.to_string(),
        completed: false,
        deadline: None,
    }
}

fn harness(todos: Vec<Todo>) -> Harness {
    let repository = MemoryStore::with_todos(NAMESPACE, todos);
    let renderer = RecordingRenderer::new();
    let alerts = RecordingAlerts::new();
    let clock = ManualClock::new(NOW);
    let settings = AppSettings {
        namespace: NAMESPACE.to_string(),
        ..AppSettings::default()
    };

    let app = App::load(
        settings,
        repository.clone(),
        renderer.clone(),
        alerts.clone(),
        clock.clone(),
    );
    Harness {
        app,
        repository,
        renderer,
        alerts,
        clock,
    }
}

fn visible_ids(renderer: &RecordingRenderer) -> Vec<String> {
    renderer
        .last_list()
        .map(|view| view.todos.into_iter().map(|todo| todo.id).collect())
        .unwrap_or_default()
}

fn row() -> TargetBounds {
    TargetBounds {
        top: 0.0,
        height: 40.0,
    }
}

#[test]
fn create_persists_and_renders() {
    let mut h = harness(Vec::new());

    let outcome = h.app.handle(Action::Create("  Buy milk ".into())).unwrap();

    assert_eq!(outcome, Outcome::Applied);
    let stored = h.repository.load(NAMESPACE);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Buy milk");
    let view = h.renderer.last_list().unwrap();
    assert_eq!(view.active_count, 1);
    assert_eq!(view.footer_summary(), "1 item left");
}

#[test]
fn blank_create_changes_nothing() {
    let mut h = harness(Vec::new());

    assert_eq!(h.app.handle(Action::Create("   ".into())).unwrap(), Outcome::Ignored);
    assert_eq!(h.repository.save_count(), 0);
    assert_eq!(h.renderer.list_renders(), 0);
    assert!(h.app.store().is_empty());
}

#[test]
fn toggle_moves_todo_to_completed_view() {
    let mut h = harness(vec![todo("a", "Buy milk")]);

    h.app.handle(Action::Toggle("a".into())).unwrap();
    h.app.handle(Action::Route("/active".into())).unwrap();
    assert!(visible_ids(&h.renderer).is_empty());

    h.app.handle(Action::Route("/completed".into())).unwrap();
    assert_eq!(visible_ids(&h.renderer), vec!["a"]);
    assert!(h.repository.load(NAMESPACE)[0].completed);
}

#[test]
fn unknown_ids_are_ignored() {
    let mut h = harness(vec![todo("a", "Buy milk")]);

    for action in [
        Action::Toggle("zzz".into()),
        Action::Destroy("zzz".into()),
        Action::SetDeadline {
            id: "zzz".into(),
            minutes: "5".into(),
        },
        Action::BeginEdit("zzz".into()),
        Action::CommitEdit,
    ] {
        assert_eq!(h.app.handle(action).unwrap(), Outcome::Ignored);
    }
    assert_eq!(h.repository.save_count(), 0);
}

#[test]
fn toggle_all_then_clear_completed_resets_filter() {
    let mut h = harness(vec![todo("a", "one"), todo("b", "two")]);

    h.app.handle(Action::Route("/completed".into())).unwrap();
    h.app.handle(Action::ToggleAll(true)).unwrap();
    assert!(h.renderer.last_list().unwrap().all_completed());

    h.app.handle(Action::ClearCompleted).unwrap();

    assert_eq!(h.app.filter(), Filter::All);
    assert!(h.app.store().is_empty());
    assert!(!h.renderer.last_list().unwrap().show_footer());
}

#[test]
fn edit_session_commit_abort_and_blank() {
    let mut h = harness(vec![todo("a", "Buy milk"), todo("b", "Walk dog")]);

    h.app.handle(Action::BeginEdit("a".into())).unwrap();
    h.app.handle(Action::EditText("Buy oat milk".into())).unwrap();
    h.app.handle(Action::CommitEdit).unwrap();
    assert_eq!(h.app.store().get("a").unwrap().title, "Buy oat milk");

    h.app.handle(Action::BeginEdit("a".into())).unwrap();
    h.app.handle(Action::EditText("nope".into())).unwrap();
    h.app.handle(Action::AbortEdit).unwrap();
    assert_eq!(h.app.store().get("a").unwrap().title, "Buy oat milk");
    assert!(h.app.editing().is_none());

    h.app.handle(Action::BeginEdit("b".into())).unwrap();
    h.app.handle(Action::EditText("  ".into())).unwrap();
    h.app.handle(Action::CommitEdit).unwrap();
    assert!(h.app.store().get("b").is_none());
    assert_eq!(h.repository.load(NAMESPACE).len(), 1);
}

#[test]
fn set_deadline_parses_minutes() {
    let mut h = harness(vec![todo("a", "Tea")]);

    h.app
        .handle(Action::SetDeadline {
            id: "a".into(),
            minutes: "3".into(),
        })
        .unwrap();
    assert_eq!(h.app.store().get("a").unwrap().deadline, Some(NOW + 180_000));

    h.app
        .handle(Action::SetDeadline {
            id: "a".into(),
            minutes: "soon".into(),
        })
        .unwrap();
    assert_eq!(h.app.store().get("a").unwrap().deadline, None);
}

#[test]
fn tick_walks_through_urgency_states() {
    let mut h = harness(vec![Todo {
        deadline: Some(NOW + 90_000),
        ..todo("a", "Tea")
    }]);

    let report = h.app.tick().unwrap();
    assert_eq!(report.statuses[0].urgency, Urgency::Normal);
    assert!(!h.alerts.is_ticking());

    h.clock.advance(30_000);
    let report = h.app.tick().unwrap();
    assert_eq!(report.statuses[0].seconds_left, 60);
    assert_eq!(report.statuses[0].urgency, Urgency::Alert);
    assert!(h.alerts.is_ticking());

    h.clock.advance(60_000);
    h.app.handle(Action::Tick).unwrap();
    assert_eq!(h.alerts.alarms(), vec!["a"]);

    h.clock.advance(1_000);
    let report = h.app.tick().unwrap();
    assert_eq!(report.statuses[0].urgency, Urgency::Overdue);
    assert!(!h.alerts.is_ticking());
    assert_eq!(
        h.alerts.events(),
        vec![
            AlertEvent::TickingStarted,
            AlertEvent::Alarm("a".into()),
            AlertEvent::TickingPaused,
        ]
    );

    let annotations = h.renderer.last_deadlines().unwrap();
    assert_eq!(annotations[0].seconds_left, -1);
}

#[test]
fn completing_a_todo_silences_it() {
    let mut h = harness(vec![Todo {
        deadline: Some(NOW + 10_000),
        ..todo("a", "Tea")
    }]);

    h.app.tick().unwrap();
    assert!(h.alerts.is_ticking());

    h.app.handle(Action::Toggle("a".into())).unwrap();
    let report = h.app.tick().unwrap();

    assert!(report.statuses.is_empty());
    assert!(!h.alerts.is_ticking());
}

#[test]
fn render_refreshes_annotations_without_sound() {
    let mut h = harness(vec![Todo {
        deadline: Some(NOW),
        ..todo("a", "Tea")
    }]);

    h.app.render().unwrap();

    assert_eq!(h.renderer.last_deadlines().unwrap().len(), 1);
    assert!(h.alerts.events().is_empty());
}

#[test]
fn drag_and_drop_reorders_under_all() {
    let mut h = harness(vec![todo("a", "one"), todo("b", "two"), todo("c", "three")]);

    assert_eq!(h.app.handle(Action::DragStart("c".into())).unwrap(), Outcome::Applied);
    assert_eq!(
        h.app.handle(Action::DragOver("a".into())).unwrap(),
        Outcome::SuppressDefault
    );
    h.app
        .handle(Action::Drop {
            target: "a".into(),
            cursor_y: 5.0,
            bounds: row(),
        })
        .unwrap();
    h.app.handle(Action::DragEnd).unwrap();

    assert_eq!(h.app.store().ids(), vec!["c", "a", "b"]);
    assert_eq!(visible_ids(&h.renderer), vec!["c", "a", "b"]);
    let stored: Vec<String> = h
        .repository
        .load(NAMESPACE)
        .into_iter()
        .map(|todo| todo.id)
        .collect();
    assert_eq!(stored, vec!["c", "a", "b"]);
}

#[test]
fn drop_below_midpoint_places_after() {
    let mut h = harness(vec![todo("a", "one"), todo("b", "two"), todo("c", "three")]);

    h.app.handle(Action::DragStart("a".into())).unwrap();
    h.app
        .handle(Action::Drop {
            target: "b".into(),
            cursor_y: 30.0,
            bounds: row(),
        })
        .unwrap();

    assert_eq!(h.app.store().ids(), vec!["b", "a", "c"]);
}

#[test]
fn reordering_is_disabled_under_other_filters() {
    let mut h = harness(vec![todo("a", "one"), todo("b", "two")]);
    h.app.handle(Action::Route("/active".into())).unwrap();

    assert_eq!(h.app.handle(Action::DragStart("b".into())).unwrap(), Outcome::Ignored);
    assert_eq!(h.app.handle(Action::DragOver("a".into())).unwrap(), Outcome::Ignored);
    assert_eq!(
        h.app
            .handle(Action::Move {
                source: "b".into(),
                target: "a".into(),
                placement: DropPlacement::Before,
            })
            .unwrap(),
        Outcome::Ignored
    );
    assert_eq!(h.app.store().ids(), vec!["a", "b"]);
}

#[test]
fn dropping_on_itself_is_ignored() {
    let mut h = harness(vec![todo("a", "one"), todo("b", "two")]);

    h.app.handle(Action::DragStart("a".into())).unwrap();
    let outcome = h
        .app
        .handle(Action::Drop {
            target: "a".into(),
            cursor_y: 30.0,
            bounds: row(),
        })
        .unwrap();

    assert_eq!(outcome, Outcome::Ignored);
    assert_eq!(h.repository.save_count(), 0);
}

#[test]
fn run_processes_queue_until_quit() {
    let mut h = harness(Vec::new());
    let (tx, rx) = crossbeam_channel::unbounded();

    tx.send(Action::Create("one".into())).unwrap();
    tx.send(Action::Create("two".into())).unwrap();
    tx.send(Action::Tick).unwrap();
    tx.send(Action::Quit).unwrap();
    tx.send(Action::Create("never".into())).unwrap();

    h.app.run(&rx).unwrap();

    assert_eq!(h.app.store().len(), 2);
    assert_eq!(h.repository.save_count(), 2);
}

#[test]
fn run_with_maps_host_events_and_pauses_ticking_on_exit() {
    enum HostEvent {
        Line(&'static str),
        Tick,
        Closed,
    }

    let mut h = harness(vec![Todo {
        deadline: Some(NOW + 30_000),
        ..todo("a", "tea")
    }]);
    let (tx, rx) = crossbeam_channel::unbounded();
    tx.send(HostEvent::Tick).unwrap();
    tx.send(HostEvent::Line("biscuits")).unwrap();
    tx.send(HostEvent::Line("")).unwrap();
    tx.send(HostEvent::Closed).unwrap();
    tx.send(HostEvent::Line("never")).unwrap();

    h.app
        .run_with(&rx, |app, event| match event {
            HostEvent::Line(title) => app.handle(Action::Create(title.to_string())),
            HostEvent::Tick => app.handle(Action::Tick),
            HostEvent::Closed => Ok(Outcome::Quit),
        })
        .unwrap();

    assert_eq!(h.app.store().len(), 2);
    assert_eq!(
        h.alerts.events(),
        vec![AlertEvent::TickingStarted, AlertEvent::TickingPaused]
    );
}

#[test]
fn json_store_round_trips_app_state() {
    let dir = tempfile::tempdir().unwrap();
    let repository = JsonFileStore::new(dir.path());
    let clock = ManualClock::new(NOW);

    let mut app = App::load(
        AppSettings::default(),
        repository.clone(),
        RecordingRenderer::new(),
        RecordingAlerts::new(),
        clock.clone(),
    );
    app.handle(Action::Create("first".into())).unwrap();
    app.handle(Action::Create("second".into())).unwrap();
    let first_id = app.store().todos()[0].id.clone();
    app.handle(Action::SetDeadline {
        id: first_id,
        minutes: "10".into(),
    })
    .unwrap();
    let before = app.store().todos().to_vec();

    let reloaded = App::load(
        AppSettings::default(),
        repository,
        RecordingRenderer::new(),
        RecordingAlerts::new(),
        clock,
    );

    assert_eq!(reloaded.store().todos(), before.as_slice());
}
