use crate::alert::{AlertSink, TickingLoop};
use crate::error::AppError;
use crate::model::Todo;
use log::{debug, info};
use tauri_winrt_notification::{Sound, Toast};

#[derive(Default)]
pub struct DesktopAlerts {
    ticking: TickingLoop,
}

impl AlertSink for DesktopAlerts {
    fn play_alarm(&mut self, todo: &Todo) -> Result<(), AppError> {
        info!("event=alarm module=alert sink=desktop id={}", todo.id);
        Toast::new(Toast::POWERSHELL_APP_ID)
            .title("countdown")
            .text1("Time is up")
            .text2(&todo.title)
            .sound(Some(Sound::Reminder))
            .show()
            .map_err(|err| AppError::io(err.to_string()))
    }

    fn set_ticking(&mut self, playing: bool) -> Result<(), AppError> {
        if let Some(true) = self.ticking.update(playing) {
            debug!("event=ticking module=alert sink=desktop playing=true");
            Toast::new(Toast::POWERSHELL_APP_ID)
                .title("countdown")
                .text1("A deadline is less than a minute away")
                .sound(Some(Sound::Default))
                .show()
                .map_err(|err| AppError::io(err.to_string()))?;
        }
        Ok(())
    }
}
