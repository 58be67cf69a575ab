use std::sync::Mutex;
use std::time::Duration;

/// Injectable backoff sleep.
pub trait Sleeper: Send {
    fn sleep(&self, duration: Duration);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Records requested sleeps without waiting.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Duration> {
        self.slept
            .lock()
            .map(|v| v.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn total(&self) -> Duration {
        self.calls().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        match self.slept.lock() {
            Ok(mut v) => v.push(duration),
            Err(poisoned) => poisoned.into_inner().push(duration),
        }
    }
}

impl<S: Sleeper + Sync> Sleeper for std::sync::Arc<S> {
    fn sleep(&self, duration: Duration) {
        self.as_ref().sleep(duration);
    }
}
