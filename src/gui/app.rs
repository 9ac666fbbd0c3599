//! Main GUI application
//!
//! egui application state and rendering.

use super::dialogs::{AddInstanceDialog, AddInstanceServices, InstanceSettingsDialog};
use super::message_box;
use super::play_view::{PlayView, PlayViewAction};
use super::{AppEvent, ui_channel};
use crate::config::SettingsStore;
use crate::core::icon::IconManager;
use crate::core::instance::InstanceManager;
use crate::core::task::TaskRunner;
use crate::core::version::CatalogVersionSource;
use eframe::egui;
use std::sync::Arc;
use std::sync::mpsc;

/// Main launcher application state
pub struct LauncherApp {
    /// Shared settings
    settings: SettingsStore,
    /// Instance manager
    instance_manager: Arc<InstanceManager>,
    /// Services handed to the add instance dialog
    services: AddInstanceServices,
    /// Grouped instance list
    play_view: PlayView,
    /// Open add instance dialog
    add_dialog: Option<AddInstanceDialog>,
    /// Open instance settings dialog
    settings_dialog: Option<InstanceSettingsDialog>,
    /// Results of background jobs
    events: mpsc::Receiver<AppEvent>,
    /// Error message to display
    error_message: Option<String>,
    /// Status message
    status_message: String,
}

impl LauncherApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: SettingsStore,
        runner: Arc<dyn TaskRunner>,
    ) -> Self {
        let ctx = cc.egui_ctx.clone();
        ctx.set_visuals(if settings.dark_theme() {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        let instance_manager = Arc::new(InstanceManager::new());
        let icons = Arc::new(IconManager::new());
        let (events_tx, events) = ui_channel(Some(ctx));

        let instances = instance_manager.list().unwrap_or_else(|e| {
            tracing::error!("Failed to list instances: {}", e);
            Vec::new()
        });
        let play_view = PlayView::from_instances(&instances, &icons);

        let services = AddInstanceServices {
            instances: instance_manager.clone(),
            versions: Arc::new(CatalogVersionSource::new(settings.catalog_path())),
            icons,
            runner,
            settings: settings.clone(),
            events: events_tx,
        };

        Self {
            settings,
            instance_manager,
            services,
            play_view,
            add_dialog: None,
            settings_dialog: None,
            events,
            error_message: None,
            status_message: "Ready".to_string(),
        }
    }

    fn open_add_dialog(&mut self, ctx: &egui::Context) {
        let group = self.play_view.selected_group().to_string();
        self.add_dialog = Some(AddInstanceDialog::new(
            self.services.clone(),
            &group,
            Some(ctx.clone()),
        ));
    }

    fn open_settings_dialog(&mut self, name: &str, ctx: &egui::Context) {
        // The list is optimistic; the instance may still be on its way to disk
        match self.instance_manager.load(name) {
            Ok(instance) => {
                let dir = self.instance_manager.screenshots_dir(name);
                self.settings_dialog = Some(InstanceSettingsDialog::new(
                    instance,
                    dir,
                    Arc::clone(&self.services.runner),
                    self.settings.thumbnail_size(),
                    Some(ctx.clone()),
                ));
            }
            Err(e) => self.error_message = Some(e.to_string()),
        }
    }

    fn check_async_results(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                AppEvent::InstanceCreated(instance) => {
                    self.status_message = format!("Created instance: {}", instance.name);
                }
                AppEvent::Error(e) => {
                    self.error_message = Some(e);
                }
            }
        }
    }
}

impl eframe::App for LauncherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for async results
        self.check_async_results();

        let dialog_open = self.add_dialog.is_some() || self.settings_dialog.is_some();

        // Top panel - Header
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_enabled_ui(!dialog_open, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("🌌 CRLauncher");
                    ui.separator();

                    if ui.button("➕ Add instance").clicked() {
                        self.open_add_dialog(ctx);
                    }

                    let selected = self.play_view.selected_instance().map(str::to_string);
                    if ui
                        .add_enabled(selected.is_some(), egui::Button::new("⚙ Settings"))
                        .clicked()
                    {
                        if let Some(name) = selected {
                            self.open_settings_dialog(&name, ctx);
                        }
                    }
                });
            });
        });

        // Bottom panel - Status bar
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(concat!("v", env!("CARGO_PKG_VERSION")));
                });
            });
        });

        // Central panel - Instance list
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.play_view.is_empty() {
                ui.vertical_centered(|ui| {
                    ui.add_space(50.0);
                    ui.label("No instances yet.");
                    ui.label("Click '➕ Add instance' to create one.");
                });
                return;
            }

            ui.add_enabled_ui(!dialog_open, |ui| {
                if let Some(PlayViewAction::OpenSettings(name)) = self.play_view.show(ui) {
                    self.open_settings_dialog(&name, ctx);
                }
            });
        });

        // Add instance dialog
        if let Some(dialog) = &mut self.add_dialog {
            dialog.show(ctx, &mut self.play_view);
            if !dialog.is_open() {
                self.add_dialog = None;
            }
        }

        // Instance settings dialog
        if let Some(dialog) = &mut self.settings_dialog {
            dialog.show(ctx);
            if !dialog.is_open() {
                self.settings_dialog = None;
            }
        }

        message_box::show_error(ctx, "app_error", &mut self.error_message);
    }
}
