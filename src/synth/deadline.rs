use std::sync::mpsc;
use std::time::Duration;

#[derive(Debug, PartialEq, Eq)]
pub enum DeadlineOutcome<T> {
    Completed(T),
    /// The deadline passed first. The worker keeps running detached and its
    /// result is dropped when it eventually finishes.
    Expired,
    /// The worker could not be started or died without answering.
    Abandoned(String),
}

/// Runs `f` on a worker thread and waits at most `timeout` for its result.
///
/// Each call owns a fresh channel, so a late answer can only ever reach a
/// receiver that has already been dropped.
pub fn call_with_deadline<T, F>(timeout: Duration, f: F) -> DeadlineOutcome<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);
    let spawned = std::thread::Builder::new()
        .name("pagesmith-attempt".to_string())
        .spawn(move || {
            let _ = tx.send(f());
        });
    if let Err(err) = spawned {
        return DeadlineOutcome::Abandoned(format!("failed to start attempt worker: {err}"));
    }

    match rx.recv_timeout(timeout) {
        Ok(value) => DeadlineOutcome::Completed(value),
        Err(mpsc::RecvTimeoutError::Timeout) => DeadlineOutcome::Expired,
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            DeadlineOutcome::Abandoned("attempt worker exited without a result".to_string())
        }
    }
}
