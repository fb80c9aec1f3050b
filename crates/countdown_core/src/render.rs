use crate::deadline::DeadlineStatus;
use crate::error::AppError;
use crate::view::ListView;
use std::cell::RefCell;
use std::rc::Rc;

/// Turns projections into something visible.
///
/// A full frame is `render_deadlines` followed by `render_list`; ticks only
/// call `render_deadlines`.
pub trait Renderer {
    /// Redraws the list and footer.
    fn render_list(&mut self, view: &ListView) -> Result<(), AppError>;

    /// Updates the countdown annotation of each todo with an active deadline.
    fn render_deadlines(&mut self, statuses: &[DeadlineStatus]) -> Result<(), AppError>;
}

impl<V: Renderer + ?Sized> Renderer for Box<V> {
    fn render_list(&mut self, view: &ListView) -> Result<(), AppError> {
        (**self).render_list(view)
    }

    fn render_deadlines(&mut self, statuses: &[DeadlineStatus]) -> Result<(), AppError> {
        (**self).render_deadlines(statuses)
    }
}

/// Draws nothing. For one-shot commands that report on their own.
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render_list(&mut self, _view: &ListView) -> Result<(), AppError> {
        Ok(())
    }

    fn render_deadlines(&mut self, _statuses: &[DeadlineStatus]) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Frames {
    lists: Vec<ListView>,
    deadlines: Vec<Vec<DeadlineStatus>>,
}

/// Keeps every frame it is asked to draw; clones share the frames.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    frames: Rc<RefCell<Frames>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list_renders(&self) -> usize {
        self.frames.borrow().lists.len()
    }

    pub fn last_list(&self) -> Option<ListView> {
        self.frames.borrow().lists.last().cloned()
    }

    pub fn last_deadlines(&self) -> Option<Vec<DeadlineStatus>> {
        self.frames.borrow().deadlines.last().cloned()
    }
}

impl Renderer for RecordingRenderer {
    fn render_list(&mut self, view: &ListView) -> Result<(), AppError> {
        self.frames.borrow_mut().lists.push(view.clone());
        Ok(())
    }

    fn render_deadlines(&mut self, statuses: &[DeadlineStatus]) -> Result<(), AppError> {
        self.frames.borrow_mut().deadlines.push(statuses.to_vec());
        Ok(())
    }
}
