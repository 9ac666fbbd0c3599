//! GUI module
//!
//! egui-based graphical user interface.

mod app;
mod channel;
pub mod dialogs;
mod message_box;
pub mod play_view;

pub use channel::{UiSender, ui_channel};

use crate::config::SettingsStore;
use crate::core::instance::Instance;
use crate::core::task::TokioTaskRunner;
use anyhow::Result;
use std::sync::Arc;

/// Results posted to the main window from background jobs
#[derive(Debug)]
pub enum AppEvent {
    InstanceCreated(Instance),
    /// Shown to the user in a message box
    Error(String),
}

/// Run the GUI application
pub fn run(settings: SettingsStore) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("CRLauncher"),
        ..Default::default()
    };

    let runner = Arc::new(TokioTaskRunner::current());

    eframe::run_native(
        "CRLauncher",
        options,
        Box::new(move |cc| Ok(Box::new(app::LauncherApp::new(cc, settings, runner)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run GUI: {}", e))
}
