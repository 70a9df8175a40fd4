//! Timed acknowledgment overlay.
//!
//! The overlay starts [`OverlayState::Visible`] and moves to
//! [`OverlayState::Hidden`] exactly once, either when its timer fires or when
//! [`AckOverlay::dismiss`] is called. Dropping the overlay cancels the timer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// How long the "Order Placed!" overlay stays up.
pub const ACK_OVERLAY_DURATION: Duration = Duration::from_millis(1800);

/// Visibility of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Visible,
    Hidden,
}

/// A single-shot overlay with a cancellable dismissal timer.
///
/// Must be created inside a Tokio runtime.
#[derive(Debug)]
pub struct AckOverlay {
    state: Arc<watch::Sender<OverlayState>>,
    timer: CancellationToken,
}

impl AckOverlay {
    /// Show the overlay and schedule it to hide after `hide_after`.
    #[must_use]
    pub fn show(hide_after: Duration) -> Self {
        let (tx, _rx) = watch::channel(OverlayState::Visible);
        let state = Arc::new(tx);
        let timer = CancellationToken::new();

        let task_state = Arc::clone(&state);
        let task_timer = timer.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = task_timer.cancelled() => {}
                () = tokio::time::sleep(hide_after) => {
                    if hide(&task_state) {
                        tracing::debug!(after_ms = ?hide_after.as_millis(), "Overlay auto-dismissed");
                    }
                }
            }
        });

        Self { state, timer }
    }

    /// Current visibility.
    #[must_use]
    pub fn state(&self) -> OverlayState {
        *self.state.borrow()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state() == OverlayState::Visible
    }

    /// Watch for the transition to hidden.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<OverlayState> {
        self.state.subscribe()
    }

    /// Hide the overlay now. Returns `false` if it was already hidden.
    pub fn dismiss(&self) -> bool {
        self.timer.cancel();
        hide(&self.state)
    }
}

impl Drop for AckOverlay {
    fn drop(&mut self) {
        self.timer.cancel();
    }
}

/// Move to hidden, notifying watchers only on the actual transition.
fn hide(state: &watch::Sender<OverlayState>) -> bool {
    state.send_if_modified(|current| {
        if *current == OverlayState::Visible {
            *current = OverlayState::Hidden;
            true
        } else {
            false
        }
    })
}
