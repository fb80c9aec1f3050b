use crate::error::AppError;
use crate::model::Todo;
use log::{debug, info};
use std::io::Write;
use std::sync::{Arc, Mutex};

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::DesktopAlerts;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::DesktopAlerts;

pub const DISABLE_ALERTS_ENV_VAR: &str = "COUNTDOWN_DISABLE_ALERTS";

const ALARM_CUE: &[u8] = b"\x07";
const TICK_CUE: &[u8] = b"\x07";

/// Audio side effects of the deadline scheduler.
///
/// The alarm is one-shot and fires on every call. The ticking loop is a
/// single shared resource: `set_ticking(true)` starts it or leaves it
/// running, `set_ticking(false)` pauses it.
pub trait AlertSink {
    fn play_alarm(&mut self, todo: &Todo) -> Result<(), AppError>;

    fn set_ticking(&mut self, playing: bool) -> Result<(), AppError>;
}

impl<A: AlertSink + ?Sized> AlertSink for Box<A> {
    fn play_alarm(&mut self, todo: &Todo) -> Result<(), AppError> {
        (**self).play_alarm(todo)
    }

    fn set_ticking(&mut self, playing: bool) -> Result<(), AppError> {
        (**self).set_ticking(playing)
    }
}

/// Play/pause state of the ticking loop. `update` reports only transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickingLoop {
    playing: bool,
}

impl TickingLoop {
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn update(&mut self, playing: bool) -> Option<bool> {
        if self.playing == playing {
            return None;
        }
        self.playing = playing;
        Some(playing)
    }
}

pub struct NoopAlerts;

impl AlertSink for NoopAlerts {
    fn play_alarm(&mut self, _todo: &Todo) -> Result<(), AppError> {
        Ok(())
    }

    fn set_ticking(&mut self, _playing: bool) -> Result<(), AppError> {
        Ok(())
    }
}

/// Rings the terminal bell: once per alarm, and once per tick while the
/// ticking loop plays.
pub struct TerminalBell<W: Write> {
    out: W,
    ticking: TickingLoop,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            ticking: TickingLoop::default(),
        }
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking.is_playing()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AlertSink for TerminalBell<W> {
    fn play_alarm(&mut self, todo: &Todo) -> Result<(), AppError> {
        info!("event=alarm module=alert sink=bell id={}", todo.id);
        self.out.write_all(ALARM_CUE)?;
        self.out.flush()?;
        Ok(())
    }

    fn set_ticking(&mut self, playing: bool) -> Result<(), AppError> {
        if let Some(playing) = self.ticking.update(playing) {
            debug!("event=ticking module=alert sink=bell playing={playing}");
        }
        if self.ticking.is_playing() {
            self.out.write_all(TICK_CUE)?;
            self.out.flush()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertEvent {
    Alarm(String),
    TickingStarted,
    TickingPaused,
}

/// Records alert calls; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingAlerts {
    events: Arc<Mutex<Vec<AlertEvent>>>,
    ticking: Arc<Mutex<TickingLoop>>,
}

impl RecordingAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AlertEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn alarms(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                AlertEvent::Alarm(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
            .lock()
            .map(|ticking| ticking.is_playing())
            .unwrap_or(false)
    }

    fn push(&self, event: AlertEvent) -> Result<(), AppError> {
        self.events
            .lock()
            .map_err(|_| AppError::io("alert log poisoned"))?
            .push(event);
        Ok(())
    }
}

impl AlertSink for RecordingAlerts {
    fn play_alarm(&mut self, todo: &Todo) -> Result<(), AppError> {
        self.push(AlertEvent::Alarm(todo.id.clone()))
    }

    fn set_ticking(&mut self, playing: bool) -> Result<(), AppError> {
        let transition = self
            .ticking
            .lock()
            .map_err(|_| AppError::io("alert log poisoned"))?
            .update(playing);
        match transition {
            Some(true) => self.push(AlertEvent::TickingStarted),
            Some(false) => self.push(AlertEvent::TickingPaused),
            None => Ok(()),
        }
    }
}

/// How alarms reach the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlertMode {
    #[default]
    Bell,
    Desktop,
    None,
}

impl AlertMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "bell" | "terminal" => Some(Self::Bell),
            "desktop" | "notification" | "notifications" => Some(Self::Desktop),
            "none" | "off" | "silent" => Some(Self::None),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bell => "bell",
            Self::Desktop => "desktop",
            Self::None => "none",
        }
    }
}

pub fn alerts_from_env(mode: AlertMode) -> Box<dyn AlertSink> {
    if std::env::var(DISABLE_ALERTS_ENV_VAR).is_ok() {
        return Box::new(NoopAlerts);
    }

    match mode {
        AlertMode::Bell => Box::new(TerminalBell::new(std::io::stderr())),
        AlertMode::Desktop => platform_alerts(),
        AlertMode::None => Box::new(NoopAlerts),
    }
}

#[cfg(any(target_os = "linux", windows))]
fn platform_alerts() -> Box<dyn AlertSink> {
    Box::new(DesktopAlerts::default())
}

#[cfg(not(any(target_os = "linux", windows)))]
fn platform_alerts() -> Box<dyn AlertSink> {
    log::warn!("event=alerts_fallback module=alert reason=unsupported_platform");
    Box::new(TerminalBell::new(std::io::stderr()))
}
