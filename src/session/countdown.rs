// src/session/countdown.rs

use tokio::task::JoinHandle;

/// Result of advancing a countdown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Seconds still left.
    Running(u64),
    /// Reached zero on this tick. Reported exactly once.
    Expired,
    /// Already expired or stopped; the tick was ignored.
    Stopped,
}

/// Whole-second countdown driven by external ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining: u64,
    total: u64,
    stopped: bool,
}

impl Countdown {
    pub fn new(seconds: u64) -> Self {
        Self {
            remaining: seconds,
            total: seconds,
            stopped: false,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Seconds consumed so far.
    pub fn elapsed(&self) -> u64 {
        self.total - self.remaining
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.stopped {
            return TickOutcome::Stopped;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.stopped = true;
            TickOutcome::Expired
        } else {
            TickOutcome::Running(self.remaining)
        }
    }

    /// Freezes the countdown; later ticks are ignored.
    pub fn stop(&mut self) {
        self.stopped = true;
    }
}

/// Owns the background task that ticks a session's countdown.
/// Dropping the handle aborts the task.
#[derive(Debug)]
pub struct CountdownHandle {
    task: JoinHandle<()>,
}

impl CountdownHandle {
    pub fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    pub fn cancel(self) {
        drop(self);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_then_expires_once() {
        let mut c = Countdown::new(3);
        assert_eq!(c.tick(), TickOutcome::Running(2));
        assert_eq!(c.tick(), TickOutcome::Running(1));
        assert_eq!(c.tick(), TickOutcome::Expired);
        assert_eq!(c.tick(), TickOutcome::Stopped);
        assert_eq!(c.tick(), TickOutcome::Stopped);
        assert_eq!(c.remaining(), 0);
        assert_eq!(c.elapsed(), 3);
    }

    #[test]
    fn zero_length_expires_on_first_tick() {
        let mut c = Countdown::new(0);
        assert_eq!(c.tick(), TickOutcome::Expired);
        assert_eq!(c.tick(), TickOutcome::Stopped);
    }

    #[test]
    fn stopped_countdown_ignores_ticks() {
        let mut c = Countdown::new(10);
        c.tick();
        c.stop();
        assert_eq!(c.tick(), TickOutcome::Stopped);
        assert_eq!(c.remaining(), 9);
        assert_eq!(c.elapsed(), 1);
    }

    #[tokio::test]
    async fn cancelling_handle_aborts_task() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = CountdownHandle::new(tokio::spawn(async move {
            let _keep = tx;
            std::future::pending::<()>().await;
        }));

        handle.cancel();

        // The sender is only dropped when the aborted task is torn down.
        assert!(rx.await.is_err());
    }
}
