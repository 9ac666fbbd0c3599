//! Add instance dialog
//!
//! Collects a name, group and version, then hands the instance over to the
//! instance service in the background. The instance list is updated right
//! away; creation errors arrive later as [`AppEvent`]s.

mod versions_table;

pub use versions_table::{VersionFilter, VersionsTable};

use crate::config::SettingsStore;
use crate::core::icon::{DEFAULT_INSTANCE_ICON, IconManager};
use crate::core::instance::{InstanceError, InstanceService};
use crate::core::task::TaskRunner;
use crate::core::version::VersionSource;
use crate::gui::message_box;
use crate::gui::play_view::InstanceListView;
use crate::gui::{AppEvent, UiSender};
use eframe::egui;
use std::sync::Arc;
use thiserror::Error;

/// Why the Add button did nothing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Instance name cannot be empty")]
    EmptyName,
    #[error("Cosmic version is not selected")]
    NoVersionSelected,
}

/// Services the dialog talks to
#[derive(Clone)]
pub struct AddInstanceServices {
    pub instances: Arc<dyn InstanceService>,
    pub versions: Arc<dyn VersionSource>,
    pub icons: Arc<IconManager>,
    pub runner: Arc<dyn TaskRunner>,
    pub settings: SettingsStore,
    pub events: UiSender<AppEvent>,
}

/// What gets created once the user confirms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceCreationRequest {
    pub name: String,
    pub group: String,
    pub version_id: String,
}

pub struct AddInstanceDialog {
    services: AddInstanceServices,
    table: VersionsTable,
    name: String,
    group: String,
    /// Set on the first keystroke in the name field; stops auto-fill for good
    name_edited: bool,
    pre_alphas: bool,
    experiments: bool,
    update_to_latest: bool,
    error: Option<String>,
    open: bool,
}

impl AddInstanceDialog {
    /// Open the dialog with `group` prefilled and start loading versions
    pub fn new(services: AddInstanceServices, group: &str, ctx: Option<egui::Context>) -> Self {
        let pre_alphas = true;
        let experiments = false;
        let mut table = VersionsTable::new(
            Arc::clone(&services.versions),
            Arc::clone(&services.runner),
            VersionFilter {
                pre_alphas,
                experiments,
            },
            ctx,
        );
        table.reload(false);

        Self {
            update_to_latest: services.settings.update_to_latest(),
            services,
            table,
            name: String::new(),
            group: group.to_string(),
            name_edited: false,
            pre_alphas,
            experiments,
            error: None,
            open: true,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn table(&self) -> &VersionsTable {
        &self.table
    }

    /// Filter state, as queried by the versions table
    pub fn filter(&self) -> VersionFilter {
        VersionFilter {
            pre_alphas: self.pre_alphas,
            experiments: self.experiments,
        }
    }

    pub fn update_to_latest(&self) -> bool {
        self.update_to_latest
    }

    /// Text typed into the name field by the user
    pub fn on_name_edited(&mut self, text: &str) {
        self.name = text.to_string();
        self.name_edited = true;
    }

    pub fn on_group_edited(&mut self, text: &str) {
        self.group = text.to_string();
    }

    /// Table selection moved to `view_row`
    pub fn on_selection_changed(&mut self, view_row: Option<usize>) {
        self.table.select(view_row);

        if self.name_edited {
            return;
        }

        if let Some(model_row) = self.table.selected_model_row() {
            if let Some(id) = self.table.value_at(model_row, 0) {
                self.name = id;
            }
        }
    }

    pub fn on_filter_changed(&mut self, pre_alphas: bool, experiments: bool) {
        self.pre_alphas = pre_alphas;
        self.experiments = experiments;
        self.table.set_filter(self.filter());
    }

    /// Refresh button: reload versions, skipping the cache
    pub fn on_refresh(&mut self) {
        self.table.reload(true);
    }

    /// The flag is process-wide, not per dialog
    pub fn on_update_to_latest_toggled(&mut self, value: bool) {
        self.update_to_latest = value;
        self.services.settings.set_update_to_latest(value);
    }

    pub fn on_cancel(&mut self) {
        self.open = false;
    }

    fn validate(&self) -> Result<InstanceCreationRequest, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let model_row = self
            .table
            .selected_model_row()
            .ok_or(ValidationError::NoVersionSelected)?;
        let version_id = self
            .table
            .value_at(model_row, 0)
            .ok_or(ValidationError::NoVersionSelected)?;

        Ok(InstanceCreationRequest {
            name: self.name.clone(),
            group: self.group.clone(),
            version_id,
        })
    }

    /// Add button. On success the item is added to `parent`, the dialog
    /// closes, and creation is queued. On failure the dialog stays open and
    /// shows the error.
    pub fn on_add<V: InstanceListView + ?Sized>(
        &mut self,
        parent: &mut V,
    ) -> Result<(), ValidationError> {
        let request = match self.validate() {
            Ok(request) => request,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e);
            }
        };

        let icon = self.services.icons.get_icon(DEFAULT_INSTANCE_ICON);
        parent.add_instance_item(icon, &request.name, &request.group);
        self.open = false;

        create_in_background(&self.services, request);
        Ok(())
    }

    /// Apply background results. Call once per frame.
    pub fn poll(&mut self) {
        self.table.poll();
    }

    pub fn show<V: InstanceListView + ?Sized>(&mut self, ctx: &egui::Context, parent: &mut V) {
        self.poll();

        // The error box sits on top and takes the keyboard
        if message_box::show_error(ctx, "add_instance_error", &mut self.error) {
            return self.show_window(ctx, parent, false);
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.on_cancel();
            return;
        }
        self.show_window(ctx, parent, true);
    }

    fn show_window<V: InstanceListView + ?Sized>(
        &mut self,
        ctx: &egui::Context,
        parent: &mut V,
        enabled: bool,
    ) {
        let mut open = self.open;
        let mut add_clicked = enabled && ctx.input(|i| i.key_pressed(egui::Key::Enter));

        egui::Window::new("Add New Instance")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(900.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.add_enabled_ui(enabled, |ui| {
                    self.header_ui(ui);
                    ui.add_space(6.0);
                    self.versions_ui(ui);
                    ui.add_space(6.0);
                    add_clicked |= self.buttons_ui(ui);
                });
            });

        if !open {
            self.on_cancel();
        } else if add_clicked && self.open {
            // Validation errors are kept in `self.error` and shown next frame
            let _ = self.on_add(parent);
        }
    }

    fn header_ui(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("add_instance_header")
            .num_columns(2)
            .spacing([10.0, 4.0])
            .show(ui, |ui| {
                ui.label("Name:");
                let mut name = self.name.clone();
                let response =
                    ui.add(egui::TextEdit::singleline(&mut name).desired_width(f32::INFINITY));
                if response.changed() {
                    self.on_name_edited(&name);
                }
                ui.end_row();

                ui.label("Group:");
                let mut group = self.group.clone();
                if ui
                    .add(egui::TextEdit::singleline(&mut group).desired_width(f32::INFINITY))
                    .changed()
                {
                    self.on_group_edited(&group);
                }
                ui.end_row();
            });

        let mut update = self.update_to_latest;
        if ui
            .checkbox(&mut update, "Automatically update to the latest version")
            .changed()
        {
            self.on_update_to_latest_toggled(update);
        }
    }

    fn versions_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_top(|ui| {
            let filter_width = 110.0;
            let mut clicked = None;

            ui.vertical(|ui| {
                ui.set_width(ui.available_width() - filter_width);
                clicked = self.table.show(ui);
            });

            ui.vertical(|ui| {
                ui.set_width(filter_width);
                ui.vertical_centered(|ui| {
                    ui.label("Filter");
                });
                let mut pre_alphas = self.pre_alphas;
                let mut experiments = self.experiments;
                let changed = ui.checkbox(&mut pre_alphas, "Pre-Alpha").changed()
                    | ui.checkbox(&mut experiments, "Experiments").changed();
                if changed {
                    self.on_filter_changed(pre_alphas, experiments);
                }
            });

            if clicked.is_some() {
                self.on_selection_changed(clicked);
            }
        });
    }

    /// Returns true when Add was clicked
    fn buttons_ui(&mut self, ui: &mut egui::Ui) -> bool {
        let mut add_clicked = false;

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!self.table.is_loading(), egui::Button::new("Refresh"))
                .clicked()
            {
                self.on_refresh();
            }
            if self.table.is_loading() {
                ui.spinner();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Cancel").clicked() {
                    self.on_cancel();
                }
                if ui.button("Add").clicked() {
                    add_clicked = true;
                }
            });
        });

        add_clicked
    }
}

/// Queue creation of the instance. The "update to latest" flag is read when
/// the job runs, so a toggle made after clicking Add still applies.
fn create_in_background(services: &AddInstanceServices, request: InstanceCreationRequest) {
    let instances = Arc::clone(&services.instances);
    let settings = services.settings.clone();
    let events = services.events.clone();

    services.runner.run(Box::new(move || {
        let auto_update = settings.update_to_latest();
        match instances.create_instance(
            &request.name,
            &request.group,
            &request.version_id,
            auto_update,
        ) {
            Ok(instance) => events.send(AppEvent::InstanceCreated(instance)),
            Err(e @ InstanceError::AlreadyExists(_)) => {
                let message = e.to_string();
                tracing::warn!("{}", message);
                events.send(AppEvent::Error(message));
            }
            Err(e) => tracing::error!("Unable to create new instance: {}", e),
        }
    }));
}

#[cfg(test)]
mod tests {
    use super::versions_table::testing::{StaticSource, row};
    use super::*;
    use crate::config::Config;
    use crate::core::instance::{Instance, InstanceManager};
    use crate::core::task::testing::{DeferredRunner, InlineRunner};
    use crate::core::version::{ReleaseType, VersionRow};
    use crate::gui::play_view::PlayView;
    use crate::gui::ui_channel;
    use std::sync::Mutex;
    use std::sync::mpsc;

    type Call = (String, String, String, bool);

    /// Records calls; fails with `AlreadyExists` on a repeated name
    #[derive(Default)]
    struct RecordingService {
        calls: Mutex<Vec<Call>>,
    }

    impl InstanceService for RecordingService {
        fn create_instance(
            &self,
            name: &str,
            group: &str,
            version: &str,
            auto_update: bool,
        ) -> Result<Instance, InstanceError> {
            let mut calls = self.calls.lock().unwrap();
            let exists = calls.iter().any(|c| c.0 == name);
            calls.push((name.into(), group.into(), version.into(), auto_update));
            if exists {
                return Err(InstanceError::AlreadyExists(name.to_string()));
            }
            Ok(Instance {
                name: name.to_string(),
                group: group.to_string(),
                version: version.to_string(),
                auto_update,
                created_at: chrono::Utc::now(),
            })
        }
    }

    /// Fails every creation with an I/O error
    struct BrokenService;

    impl InstanceService for BrokenService {
        fn create_instance(&self, _: &str, _: &str, _: &str, _: bool) -> Result<Instance, InstanceError> {
            Err(InstanceError::Io(std::io::Error::other("disk full")))
        }
    }

    struct Fixture {
        services: AddInstanceServices,
        events: mpsc::Receiver<AppEvent>,
    }

    fn fixture(
        instances: Arc<dyn InstanceService>,
        runner: Arc<dyn TaskRunner>,
        rows: Vec<VersionRow>,
    ) -> Fixture {
        let (events_tx, events) = ui_channel(None);
        let services = AddInstanceServices {
            instances,
            versions: Arc::new(StaticSource {
                rows,
                ..Default::default()
            }),
            icons: Arc::new(IconManager::new()),
            runner,
            settings: SettingsStore::in_memory(Config::default()),
            events: events_tx,
        };
        Fixture { services, events }
    }

    fn two_versions() -> Vec<VersionRow> {
        // Newest first in the view: view row 0 is model row 1
        vec![
            row("1.0.0", ReleaseType::Release, 1),
            row("1.1.0", ReleaseType::Release, 2),
        ]
    }

    /// Dialog whose versions have already loaded
    fn open_dialog(services: &AddInstanceServices) -> AddInstanceDialog {
        let mut dialog = AddInstanceDialog::new(services.clone(), "", None);
        dialog.poll();
        dialog
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let service = Arc::new(RecordingService::default());
        let f = fixture(service.clone(), Arc::new(InlineRunner), two_versions());
        let mut dialog = open_dialog(&f.services);
        let mut view = PlayView::new();

        dialog.on_selection_changed(Some(0));
        dialog.on_name_edited("   ");

        assert_eq!(dialog.on_add(&mut view), Err(ValidationError::EmptyName));
        assert!(dialog.is_open());
        assert_eq!(dialog.error(), Some("Instance name cannot be empty"));
        assert!(view.is_empty());
        assert!(service.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_missing_version_is_rejected() {
        let service = Arc::new(RecordingService::default());
        let f = fixture(service.clone(), Arc::new(InlineRunner), two_versions());
        let mut dialog = open_dialog(&f.services);
        let mut view = PlayView::new();

        dialog.on_name_edited("My World");

        assert_eq!(dialog.on_add(&mut view), Err(ValidationError::NoVersionSelected));
        assert!(dialog.is_open());
        assert_eq!(dialog.error(), Some("Cosmic version is not selected"));
        assert!(view.is_empty());
        assert!(service.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_selection_fills_name_until_typed() {
        let f = fixture(
            Arc::new(RecordingService::default()),
            Arc::new(InlineRunner),
            two_versions(),
        );
        let mut dialog = open_dialog(&f.services);

        dialog.on_selection_changed(Some(0));
        assert_eq!(dialog.name(), "1.1.0");
        dialog.on_selection_changed(Some(1));
        assert_eq!(dialog.name(), "1.0.0");

        dialog.on_name_edited("1.0.0x");
        dialog.on_selection_changed(Some(0));
        assert_eq!(dialog.name(), "1.0.0x");

        // Clearing the field is still a manual edit
        dialog.on_name_edited("");
        dialog.on_selection_changed(Some(1));
        assert_eq!(dialog.name(), "");
    }

    #[test]
    fn test_submits_model_row_version() {
        let service = Arc::new(RecordingService::default());
        let f = fixture(service.clone(), Arc::new(InlineRunner), two_versions());
        let mut dialog = open_dialog(&f.services);
        let mut view = PlayView::new();

        dialog.on_selection_changed(Some(0));
        dialog.on_name_edited("Foo");
        dialog.on_group_edited("Tests");
        dialog.on_add(&mut view).unwrap();

        assert!(!dialog.is_open());
        assert_eq!(view.items("Tests")[0].name, "Foo");
        assert_eq!(
            service.calls.lock().unwrap().as_slice(),
            [(
                "Foo".to_string(),
                "Tests".to_string(),
                "1.1.0".to_string(),
                false
            )]
        );
        assert!(matches!(f.events.try_recv(), Ok(AppEvent::InstanceCreated(i)) if i.version == "1.1.0"));
    }

    #[test]
    fn test_item_added_before_job_runs() {
        let service = Arc::new(RecordingService::default());
        let runner = Arc::new(DeferredRunner::default());
        let f = fixture(service.clone(), runner.clone(), two_versions());
        let mut dialog = open_dialog(&f.services);
        // Versions load through the deferred runner too
        runner.run_all();
        dialog.poll();
        let mut view = PlayView::new();

        dialog.on_selection_changed(Some(1));
        dialog.on_add(&mut view).unwrap();

        assert_eq!(view.items("")[0].name, "1.0.0");
        assert!(!dialog.is_open());
        assert!(service.calls.lock().unwrap().is_empty());

        runner.run_all();
        assert_eq!(service.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_auto_update_read_when_job_runs() {
        let service = Arc::new(RecordingService::default());
        let runner = Arc::new(DeferredRunner::default());
        let f = fixture(service.clone(), runner.clone(), two_versions());
        let mut dialog = open_dialog(&f.services);
        runner.run_all();
        dialog.poll();

        dialog.on_selection_changed(Some(0));
        dialog.on_add(&mut PlayView::new()).unwrap();

        f.services.settings.set_update_to_latest(true);
        runner.run_all();

        assert!(service.calls.lock().unwrap()[0].3);
    }

    #[test]
    fn test_name_collision_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let manager = Arc::new(InstanceManager::with_dir(dir.path()));
        let f = fixture(manager, Arc::new(InlineRunner), vec![row("1.0.0", ReleaseType::Release, 1)]);
        f.services.settings.set_update_to_latest(true);

        for _ in 0..2 {
            let mut dialog = open_dialog(&f.services);
            dialog.on_selection_changed(Some(0));
            dialog.on_name_edited("Foo");
            dialog.on_add(&mut PlayView::new()).unwrap();
        }

        assert!(matches!(f.events.try_recv(), Ok(AppEvent::InstanceCreated(i)) if i.auto_update));
        match f.events.try_recv() {
            Ok(AppEvent::Error(message)) => {
                assert_eq!(message, "Instance with name 'Foo' already exists")
            }
            other => panic!("expected collision error, got {:?}", other),
        }
    }

    #[test]
    fn test_io_failure_is_not_shown() {
        let f = fixture(Arc::new(BrokenService), Arc::new(InlineRunner), two_versions());
        let mut dialog = open_dialog(&f.services);
        dialog.on_selection_changed(Some(0));
        dialog.on_add(&mut PlayView::new()).unwrap();

        assert!(f.events.try_recv().is_err());
    }

    #[test]
    fn test_update_flag_survives_reopen() {
        let f = fixture(
            Arc::new(RecordingService::default()),
            Arc::new(InlineRunner),
            two_versions(),
        );

        let mut first = open_dialog(&f.services);
        assert!(!first.update_to_latest());
        first.on_update_to_latest_toggled(true);
        first.on_cancel();

        let second = open_dialog(&f.services);
        assert!(second.update_to_latest());
    }

    #[test]
    fn test_filters_and_refresh() {
        let service = Arc::new(RecordingService::default());
        let source = Arc::new(StaticSource {
            rows: vec![
                row("0.3.0", ReleaseType::PreAlpha, 1),
                row("0.3.1-exp", ReleaseType::Experiment, 2),
            ],
            ..Default::default()
        });
        let mut f = fixture(service, Arc::new(InlineRunner), Vec::new());
        f.services.versions = source.clone() as Arc<dyn VersionSource>;
        let mut dialog = AddInstanceDialog::new(f.services.clone(), "Modded", None);
        dialog.poll();

        assert_eq!(dialog.group(), "Modded");
        assert_eq!(
            dialog.filter(),
            VersionFilter {
                pre_alphas: true,
                experiments: false
            }
        );
        assert_eq!(dialog.table().row_count(), 1);

        dialog.on_filter_changed(true, true);
        assert_eq!(dialog.table().row_count(), 2);

        dialog.on_refresh();
        dialog.poll();
        assert!(dialog.is_open());
        assert_eq!(source.forced.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
