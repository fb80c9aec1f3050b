use crossbeam_channel::{Receiver, Sender, bounded, select, tick};
use log::{debug, warn};
use std::thread::JoinHandle;
use std::time::Duration;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// A repeating timer that posts an event into the app's event queue.
///
/// The ticker never touches application state itself; the consumer of the
/// queue handles each tick in order with every other event.
pub struct Ticker;

impl Ticker {
    pub fn start<E>(interval: Duration, events: Sender<E>, make_event: fn() -> E) -> TickerHandle
    where
        E: Send + 'static,
    {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let thread = std::thread::Builder::new()
            .name("countdown-ticker".to_string())
            .spawn(move || run(interval, events, make_event, stop_rx));

        let thread = match thread {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!("event=ticker_spawn module=ticker status=error error={err}");
                None
            }
        };

        debug!(
            "event=ticker_start module=ticker interval_ms={}",
            interval.as_millis()
        );
        TickerHandle {
            interval,
            stop: Some(stop_tx),
            thread,
        }
    }
}

fn run<E>(interval: Duration, events: Sender<E>, make_event: fn() -> E, stop: Receiver<()>) {
    let ticks = tick(interval);
    loop {
        select! {
            recv(stop) -> _ => break,
            recv(ticks) -> _ => {
                if events.send(make_event()).is_err() {
                    // Queue consumer is gone.
                    break;
                }
            }
        }
    }
    debug!("event=ticker_stop module=ticker");
}

/// Stops the ticker when `stop` is called or the handle is dropped.
pub struct TickerHandle {
    interval: Duration,
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl TickerHandle {
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.thread
            .as_ref()
            .is_some_and(|thread| !thread.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }

    /// Stops the current timer and starts a fresh one on the same queue.
    pub fn restart<E>(&mut self, events: Sender<E>, make_event: fn() -> E) -> TickerHandle
    where
        E: Send + 'static,
    {
        self.stop();
        Ticker::start(self.interval, events, make_event)
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
