use crate::commands::short_id;
use countdown_core::config::Palette;
use countdown_core::deadline::{DeadlineStatus, Urgency};
use countdown_core::error::AppError;
use countdown_core::render::Renderer;
use countdown_core::view::ListView;
use std::io::Write;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct TodoRow {
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "")]
    done: &'static str,
    #[tabled(rename = "title")]
    title: String,
    #[tabled(rename = "deadline")]
    deadline: String,
}

/// Draws the list as a table and keeps the countdowns on a status line.
pub struct TerminalRenderer<W: Write> {
    out: W,
    palette: Palette,
    json: bool,
    live: bool,
    view: Option<ListView>,
    statuses: Vec<DeadlineStatus>,
    status_line: String,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, palette: Palette, json: bool) -> Self {
        Self {
            out,
            palette,
            json,
            live: false,
            view: None,
            statuses: Vec::new(),
            status_line: String::new(),
        }
    }

    /// Rewrites the countdown line in place on every tick.
    pub fn live(mut self) -> Self {
        self.live = true;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Prints one complete frame: list, footer and countdowns.
    pub fn print_snapshot(
        &mut self,
        view: &ListView,
        statuses: &[DeadlineStatus],
    ) -> Result<(), AppError> {
        self.statuses = statuses.to_vec();
        if self.json {
            return self.write_json(view);
        }
        self.write_table(view)
    }

    fn annotation(&self, todo_id: &str) -> String {
        match self.statuses.iter().find(|status| status.todo_id == todo_id) {
            Some(status) => self.paint_status(status, &status.label()),
            None => "-".to_string(),
        }
    }

    fn paint_status(&self, status: &DeadlineStatus, text: &str) -> String {
        match status.urgency {
            Urgency::Normal => text.to_string(),
            Urgency::Alert => self.palette.alertize(text),
            Urgency::Overdue => self.palette.overduize(text),
        }
    }

    fn write_table(&mut self, view: &ListView) -> Result<(), AppError> {
        if self.live && !self.status_line.is_empty() {
            write!(self.out, "\r\x1b[2K")?;
            self.status_line.clear();
        }

        if view.is_empty() {
            writeln!(self.out, "{}", self.palette.mutedize("Nothing to show."))?;
        } else {
            let rows: Vec<TodoRow> = view
                .todos
                .iter()
                .map(|todo| TodoRow {
                    id: short_id(&todo.id).to_string(),
                    done: if todo.completed { "[x]" } else { "[ ]" },
                    title: if todo.completed {
                        self.palette.mutedize(&todo.title)
                    } else {
                        todo.title.clone()
                    },
                    deadline: self.annotation(&todo.id),
                })
                .collect();
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            writeln!(self.out, "{table}")?;
        }

        if view.show_footer() {
            let mut footer = format!(
                "{}  [{}]",
                view.footer_summary(),
                self.palette.accentize(view.filter.as_str())
            );
            if view.show_clear_completed() {
                footer.push_str(&format!("  ({} completed)", view.completed_count));
            }
            if !view.reorder_enabled() {
                footer.push_str("  reordering off");
            }
            writeln!(self.out, "{footer}")?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn write_json(&mut self, view: &ListView) -> Result<(), AppError> {
        let todos: Vec<serde_json::Value> = view
            .todos
            .iter()
            .map(|todo| {
                let status = self.statuses.iter().find(|status| status.todo_id == todo.id);
                serde_json::json!({
                    "id": todo.id,
                    "title": todo.title,
                    "completed": todo.completed,
                    "deadline": todo.deadline,
                    "seconds_left": status.map(|status| status.seconds_left),
                    "urgency": status.map(|status| status.urgency.as_str()),
                    "class": status.map(|status| status.urgency.css_class()).unwrap_or(""),
                })
            })
            .collect();
        let payload = serde_json::json!({
            "filter": view.filter.as_str(),
            "active_count": view.active_count,
            "completed_count": view.completed_count,
            "total_count": view.total_count,
            "todos": todos,
        });
        writeln!(self.out, "{payload}")?;
        Ok(())
    }

    fn write_status_line(&mut self) -> Result<(), AppError> {
        let titles: Vec<(String, String)> = self
            .view
            .as_ref()
            .map(|view| {
                view.todos
                    .iter()
                    .map(|todo| (todo.id.clone(), todo.title.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let parts: Vec<String> = self
            .statuses
            .iter()
            .filter_map(|status| {
                let (_, title) = titles.iter().find(|(id, _)| *id == status.todo_id)?;
                Some(self.paint_status(status, &format!("{title}: {}", status.label())))
            })
            .collect();
        let line = parts.join(" | ");

        if line == self.status_line {
            return Ok(());
        }
        write!(self.out, "\r\x1b[2K{line}")?;
        self.out.flush()?;
        self.status_line = line;
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render_list(&mut self, view: &ListView) -> Result<(), AppError> {
        self.view = Some(view.clone());
        if self.json {
            return self.write_json(view);
        }
        self.write_table(view)?;
        if self.live {
            self.write_status_line()?;
        }
        Ok(())
    }

    fn render_deadlines(&mut self, statuses: &[DeadlineStatus]) -> Result<(), AppError> {
        self.statuses = statuses.to_vec();
        if self.live && !self.json {
            self.write_status_line()?;
        }
        Ok(())
    }
}
