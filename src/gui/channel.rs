//! Messages from background jobs back to the UI thread
//!
//! Jobs never touch UI state. They send a message and ask egui for a
//! repaint; the next frame drains the receiver on the UI thread.

use std::sync::mpsc;

pub struct UiSender<T> {
    tx: mpsc::Sender<T>,
    ctx: Option<egui::Context>,
}

// Manual impl: derive would require `T: Clone`
impl<T> Clone for UiSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            ctx: self.ctx.clone(),
        }
    }
}

/// Create a channel whose sends wake up `ctx`. `None` is used in tests.
pub fn ui_channel<T>(ctx: Option<egui::Context>) -> (UiSender<T>, mpsc::Receiver<T>) {
    let (tx, rx) = mpsc::channel();
    (UiSender { tx, ctx }, rx)
}

impl<T> UiSender<T> {
    pub fn send(&self, msg: T) {
        if self.tx.send(msg).is_err() {
            // The window that wanted this result is gone
            tracing::debug!("UI receiver dropped, discarding message");
            return;
        }
        if let Some(ctx) = &self.ctx {
            ctx.request_repaint();
        }
    }
}
