use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::session::event::SessionEvent;

/// Handle to a pending startup hint.
///
/// The hint fires by posting [`SessionEvent::HintElapsed`] back to the
/// controller.  Dropping the handle (or calling [`HintTimer::cancel`]) aborts
/// the timer, so a hint can never arrive after the lookup it belongs to.
#[derive(Debug)]
pub struct HintTimer {
    task: JoinHandle<()>,
}

impl HintTimer {
    /// Arms a timer that sends `HintElapsed { epoch }` after `delay`.
    pub fn schedule(delay: Duration, epoch: u64, events: UnboundedSender<SessionEvent>) -> Self {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(SessionEvent::HintElapsed { epoch });
        });
        Self { task }
    }

    /// Disarms the timer.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for HintTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = HintTimer::schedule(Duration::from_millis(2500), 3, tx);
        tokio::time::sleep(Duration::from_millis(2499)).await;
        assert!(rx.try_recv().is_err());
        tokio::time::sleep(Duration::from_millis(2)).await;
        match rx.recv().await {
            Some(SessionEvent::HintElapsed { epoch }) => assert_eq!(epoch, 3),
            other => panic!("unexpected event: {other:?}"),
        }
        drop(timer);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = HintTimer::schedule(Duration::from_millis(2500), 0, tx);
        tokio::time::sleep(Duration::from_millis(100)).await;
        timer.cancel();
        tokio::time::sleep(Duration::from_secs(10)).await;
        // The aborted task dropped its sender, so the channel is closed and empty.
        assert!(rx.recv().await.is_none());
    }
}
