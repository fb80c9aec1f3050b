use crate::alert::{AlertSink, TickingLoop};
use crate::error::AppError;
use crate::model::Todo;
use log::{debug, info};
use notify_rust::{Notification, Timeout, Urgency};

#[derive(Default)]
pub struct DesktopAlerts {
    ticking: TickingLoop,
}

impl AlertSink for DesktopAlerts {
    fn play_alarm(&mut self, todo: &Todo) -> Result<(), AppError> {
        info!("event=alarm module=alert sink=desktop id={}", todo.id);
        Notification::new()
            .summary("countdown")
            .body(&format!("Time is up: {}", todo.title))
            .sound_name("alarm-clock-elapsed")
            .urgency(Urgency::Critical)
            .timeout(Timeout::Never)
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }

    fn set_ticking(&mut self, playing: bool) -> Result<(), AppError> {
        if let Some(true) = self.ticking.update(playing) {
            debug!("event=ticking module=alert sink=desktop playing=true");
            Notification::new()
                .summary("countdown")
                .body("A deadline is less than a minute away")
                .sound_name("dialog-warning")
                .show()
                .map_err(|err| AppError::io(err.to_string()))?;
        }
        Ok(())
    }
}
