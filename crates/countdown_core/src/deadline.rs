//! Countdown evaluation for todos with a deadline.
//!
//! Every tick, each active todo with a deadline is classified from the
//! seconds left until its deadline:
//!
//! | seconds left     | urgency   | sound                         |
//! |------------------|-----------|-------------------------------|
//! | `< 0`            | overdue   | none                          |
//! | `0..=threshold`  | alert     | keeps the ticking loop going  |
//! | `> threshold`    | normal    | none                          |
//!
//! Landing exactly on `0` additionally rings the one-shot alarm. The ticking
//! loop is a single shared sound: it plays while any todo is in alert.

use crate::model::Todo;
use crate::view::pluralize;

pub const DEFAULT_TICKING_THRESHOLD_SECS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Urgency {
    Normal,
    Alert,
    Overdue,
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Alert => "alert",
            Self::Overdue => "overdue",
        }
    }

    /// Marker class used by renderers; empty for `Normal`.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Normal => "",
            Self::Alert => "alert",
            Self::Overdue => "overdue",
        }
    }
}

/// `ceil((deadline - now) / 1000)` on integer milliseconds.
pub fn seconds_left(deadline_millis: i64, now_millis: i64) -> i64 {
    let remaining = deadline_millis.saturating_sub(now_millis);
    -(remaining.saturating_neg().div_euclid(1000))
}

pub fn classify(seconds_left: i64, threshold_secs: i64) -> Urgency {
    if seconds_left < 0 {
        Urgency::Overdue
    } else if seconds_left <= threshold_secs {
        Urgency::Alert
    } else {
        Urgency::Normal
    }
}

pub fn rings_alarm(seconds_left: i64) -> bool {
    seconds_left == 0
}

/// "45 seconds", "1 second", "3 minutes". Sign is ignored; anything from a
/// minute up is rounded up to whole minutes.
pub fn pretty_duration(seconds_left: i64) -> String {
    let seconds = seconds_left.saturating_abs();
    if seconds < 60 {
        return format!("{} {}", seconds, pluralize(seconds, "second"));
    }

    let minutes = (seconds + 59) / 60;
    format!("{} {}", minutes, pluralize(minutes, "minute"))
}

/// Per-todo result of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineStatus {
    pub todo_id: String,
    pub seconds_left: i64,
    pub urgency: Urgency,
}

impl DeadlineStatus {
    pub fn label(&self) -> String {
        if self.seconds_left < 0 {
            format!("overdue by {}", pretty_duration(self.seconds_left))
        } else {
            format!("{} left", pretty_duration(self.seconds_left))
        }
    }
}

/// Outcome of one tick across all todos.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub statuses: Vec<DeadlineStatus>,
    /// Whether the shared ticking loop should be playing.
    pub ticking: bool,
    /// Ids of todos whose countdown hit zero on this tick.
    pub alarms: Vec<String>,
}

impl TickReport {
    pub fn status_for(&self, todo_id: &str) -> Option<&DeadlineStatus> {
        self.statuses.iter().find(|status| status.todo_id == todo_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineScheduler {
    threshold_secs: i64,
}

impl Default for DeadlineScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_TICKING_THRESHOLD_SECS)
    }
}

impl DeadlineScheduler {
    pub fn new(threshold_secs: i64) -> Self {
        Self { threshold_secs }
    }

    pub fn threshold_secs(&self) -> i64 {
        self.threshold_secs
    }

    pub fn status(&self, todo: &Todo, now_millis: i64) -> Option<DeadlineStatus> {
        if todo.completed {
            return None;
        }

        let deadline = todo.deadline?;
        let seconds_left = seconds_left(deadline, now_millis);
        Some(DeadlineStatus {
            todo_id: todo.id.clone(),
            seconds_left,
            urgency: classify(seconds_left, self.threshold_secs),
        })
    }

    /// Evaluates every todo. Completed todos and todos without a deadline
    /// contribute nothing.
    pub fn evaluate(&self, todos: &[Todo], now_millis: i64) -> TickReport {
        let mut report = TickReport::default();

        for status in todos.iter().filter_map(|todo| self.status(todo, now_millis)) {
            if status.urgency == Urgency::Alert {
                report.ticking = true;
            }
            if rings_alarm(status.seconds_left) {
                report.alarms.push(status.todo_id.clone());
            }
            report.statuses.push(status);
        }

        report
    }
}
