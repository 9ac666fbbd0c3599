//! Instance settings dialog

mod screenshots;

pub use screenshots::{PanelState, ScreenshotsLoader, ScreenshotsPanel, ScreenshotsTab};

use crate::core::instance::Instance;
use crate::core::task::TaskRunner;
use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Tab {
    #[default]
    Main,
    Screenshots,
}

pub struct InstanceSettingsDialog {
    instance: Instance,
    tab: Tab,
    screenshots: ScreenshotsTab,
    open: bool,
}

impl InstanceSettingsDialog {
    pub fn new(
        instance: Instance,
        screenshots_dir: PathBuf,
        runner: Arc<dyn TaskRunner>,
        thumbnail_size: u32,
        ctx: Option<egui::Context>,
    ) -> Self {
        Self {
            instance,
            tab: Tab::default(),
            screenshots: ScreenshotsTab::new(screenshots_dir, runner, thumbnail_size, ctx),
            open: true,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.open = false;
            return;
        }

        let mut open = self.open;
        egui::Window::new(format!("⚙ {}", self.instance.name))
            .id(egui::Id::new("instance_settings"))
            .open(&mut open)
            .collapsible(false)
            .default_size([640.0, 420.0])
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.tab, Tab::Main, "Main");
                    ui.selectable_value(&mut self.tab, Tab::Screenshots, "Screenshots");
                });
                ui.separator();

                match self.tab {
                    Tab::Main => self.main_tab(ui),
                    Tab::Screenshots => self.screenshots.show(ui),
                }
            });
        self.open &= open;

        // Keep collecting thumbnails while another tab is shown
        if self.tab != Tab::Screenshots {
            self.screenshots.poll();
        }
    }

    fn main_tab(&self, ui: &mut egui::Ui) {
        let group = if self.instance.group.is_empty() {
            "Default"
        } else {
            self.instance.group.as_str()
        };

        egui::Grid::new("instance_settings_main")
            .num_columns(2)
            .spacing([16.0, 6.0])
            .show(ui, |ui| {
                ui.label("Version:");
                ui.label(&self.instance.version);
                ui.end_row();

                ui.label("Group:");
                ui.label(group);
                ui.end_row();

                ui.label("Update to latest:");
                ui.label(if self.instance.auto_update { "Yes" } else { "No" });
                ui.end_row();

                ui.label("Created:");
                ui.label(self.instance.created_at.format("%Y-%m-%d %H:%M").to_string());
                ui.end_row();
            });
    }
}
