use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const COPIED_DURATION: Duration = Duration::from_secs(2);

/// Tracks whether a link was just copied.
///
/// The flag reverts on its own after the configured duration. A new copy
/// restarts the countdown, and dropping the indicator cancels it. Must be
/// used from within a tokio runtime.
#[derive(Debug)]
pub struct CopyIndicator {
    state: Arc<watch::Sender<bool>>,
    timer: Option<JoinHandle<()>>,
    duration: Duration,
}

impl CopyIndicator {
    pub fn new() -> Self {
        Self::with_duration(COPIED_DURATION)
    }

    pub fn with_duration(duration: Duration) -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
            timer: None,
            duration,
        }
    }

    pub fn is_copied(&self) -> bool {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    pub fn mark_copied(&mut self) {
        self.cancel_timer();
        self.state.send_replace(true);

        let state = Arc::clone(&self.state);
        let duration = self.duration;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            state.send_replace(false);
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Default for CopyIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CopyIndicator {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    async fn settle(duration: Duration) {
        sleep(duration).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn reverts_after_duration() {
        let mut indicator = CopyIndicator::new();
        assert!(!indicator.is_copied());

        indicator.mark_copied();
        assert!(indicator.is_copied());

        settle(Duration::from_millis(1900)).await;
        assert!(indicator.is_copied());

        settle(Duration::from_millis(200)).await;
        assert!(!indicator.is_copied());
    }

    #[tokio::test(start_paused = true)]
    async fn copying_again_restarts_the_countdown() {
        let mut indicator = CopyIndicator::new();
        indicator.mark_copied();
        settle(Duration::from_millis(1500)).await;

        indicator.mark_copied();
        settle(Duration::from_millis(1500)).await;
        assert!(indicator.is_copied());

        settle(Duration::from_millis(600)).await;
        assert!(!indicator.is_copied());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_pending_revert() {
        let mut indicator = CopyIndicator::new();
        let rx = indicator.subscribe();
        indicator.mark_copied();
        drop(indicator);

        settle(COPIED_DURATION * 2).await;
        assert!(*rx.borrow());
    }
}
