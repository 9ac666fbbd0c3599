//! Versions table
//!
//! Holds the rows loaded from a [`VersionSource`] (the model) and the
//! filtered, newest-first ordering shown to the user (the view). Selection
//! is a view index and must go through [`VersionsTable::convert_row_index_to_model`]
//! before reading values.

use crate::core::task::TaskRunner;
use crate::core::version::{ReleaseType, VersionRow, VersionSource};
use crate::gui::{UiSender, ui_channel};
use eframe::egui;
use std::sync::Arc;
use std::sync::mpsc;

pub const COLUMN_NAMES: [&str; 3] = ["Version", "Type", "Released"];

/// Relative column widths
const COLUMN_WIDTHS: [f32; 3] = [0.70, 0.15, 0.15];

/// Which release types are visible. Releases always are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionFilter {
    pub pre_alphas: bool,
    pub experiments: bool,
}

impl VersionFilter {
    pub fn accepts(&self, release_type: ReleaseType) -> bool {
        match release_type {
            ReleaseType::Release => true,
            ReleaseType::PreAlpha => self.pre_alphas,
            ReleaseType::Experiment => self.experiments,
        }
    }
}

struct Loaded {
    generation: u64,
    rows: Result<Vec<VersionRow>, String>,
}

pub struct VersionsTable {
    source: Arc<dyn VersionSource>,
    runner: Arc<dyn TaskRunner>,
    sender: UiSender<Loaded>,
    receiver: mpsc::Receiver<Loaded>,
    /// Bumped on every reload; results of older loads are dropped
    generation: u64,
    loading: bool,
    load_error: Option<String>,
    rows: Vec<VersionRow>,
    /// view index -> model index
    view: Vec<usize>,
    /// Selected view index
    selected: Option<usize>,
    filter: VersionFilter,
}

impl VersionsTable {
    pub fn new(
        source: Arc<dyn VersionSource>,
        runner: Arc<dyn TaskRunner>,
        filter: VersionFilter,
        ctx: Option<egui::Context>,
    ) -> Self {
        let (sender, receiver) = ui_channel(ctx);
        Self {
            source,
            runner,
            sender,
            receiver,
            generation: 0,
            loading: false,
            load_error: None,
            rows: Vec::new(),
            view: Vec::new(),
            selected: None,
            filter,
        }
    }

    /// Load rows in the background. `force_refresh` bypasses the source cache.
    pub fn reload(&mut self, force_refresh: bool) {
        self.generation += 1;
        self.loading = true;

        let generation = self.generation;
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();

        self.runner.run(Box::new(move || {
            let rows = source.load(force_refresh).map_err(|e| {
                tracing::error!("Unable to load versions: {}", e);
                e.to_string()
            });
            sender.send(Loaded { generation, rows });
        }));
    }

    /// Apply finished loads. Call once per frame on the UI thread.
    pub fn poll(&mut self) {
        while let Ok(loaded) = self.receiver.try_recv() {
            if loaded.generation != self.generation {
                continue;
            }
            self.loading = false;
            match loaded.rows {
                Ok(rows) => {
                    let selected_id = self.selected_model_row().map(|i| self.rows[i].id.clone());
                    self.rows = rows;
                    self.load_error = None;
                    self.rebuild_view();
                    self.selected = selected_id
                        .and_then(|id| self.view.iter().position(|&m| self.rows[m].id == id));
                }
                Err(e) => self.load_error = Some(e),
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_filter(&mut self, filter: VersionFilter) {
        if filter == self.filter {
            return;
        }
        let selected = self.selected_model_row();
        self.filter = filter;
        self.rebuild_view();
        // Keep the selection only if the row is still visible
        self.selected = selected.and_then(|m| self.view.iter().position(|&v| v == m));
    }

    fn rebuild_view(&mut self) {
        let mut view: Vec<usize> = (0..self.rows.len())
            .filter(|&i| self.filter.accepts(self.rows[i].release_type))
            .collect();
        view.sort_by(|&a, &b| {
            let (a, b) = (&self.rows[a], &self.rows[b]);
            b.release_time
                .cmp(&a.release_time)
                .then_with(|| b.id.cmp(&a.id))
        });
        self.view = view;
    }

    /// Number of visible rows
    pub fn row_count(&self) -> usize {
        self.view.len()
    }

    pub fn convert_row_index_to_model(&self, view_row: usize) -> Option<usize> {
        self.view.get(view_row).copied()
    }

    /// Display value of a model cell
    pub fn value_at(&self, model_row: usize, column: usize) -> Option<String> {
        let row = self.rows.get(model_row)?;
        match column {
            0 => Some(row.id.clone()),
            1 => Some(row.release_type.to_string()),
            2 => Some(row.release_time.format("%Y-%m-%d").to_string()),
            _ => None,
        }
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_model_row(&self) -> Option<usize> {
        self.selected
            .and_then(|view_row| self.convert_row_index_to_model(view_row))
    }

    /// Select a view row. Out-of-range rows clear the selection.
    pub fn select(&mut self, view_row: Option<usize>) {
        self.selected = view_row.filter(|&row| row < self.view.len());
    }

    #[cfg(test)]
    pub(crate) fn set_rows(&mut self, rows: Vec<VersionRow>) {
        self.rows = rows;
        self.selected = None;
        self.rebuild_view();
    }

    /// Draw the table. Returns the view row the user clicked, if any.
    pub fn show(&self, ui: &mut egui::Ui) -> Option<usize> {
        let mut clicked = None;
        let row_height = ui.spacing().interact_size.y;
        // Leave room for the scroll bar
        let table_width = ui.available_width() - 16.0;
        let widths = COLUMN_WIDTHS.map(|w| w * table_width);

        ui.horizontal(|ui| {
            for (name, width) in COLUMN_NAMES.iter().zip(widths) {
                ui.add_sized([width, row_height], egui::Label::new(egui::RichText::new(*name).strong()));
            }
        });
        ui.separator();

        if self.loading && self.rows.is_empty() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading versions...");
            });
            return None;
        }
        if let Some(err) = &self.load_error {
            ui.colored_label(egui::Color32::RED, format!("❌ {}", err));
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .max_height(300.0)
            .show_rows(ui, row_height, self.view.len(), |ui, range| {
                for view_row in range {
                    let model_row = self.view[view_row];
                    let is_selected = self.selected == Some(view_row);

                    ui.horizontal(|ui| {
                        for (column, width) in widths.iter().enumerate() {
                            let text = self.value_at(model_row, column).unwrap_or_default();
                            let cell = egui::SelectableLabel::new(is_selected, text);
                            if ui.add_sized([*width, row_height], cell).clicked() {
                                clicked = Some(view_row);
                            }
                        }
                    });
                }
            });

        clicked
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use chrono::{TimeZone, Utc};

    pub fn row(id: &str, release_type: ReleaseType, day: u32) -> VersionRow {
        VersionRow {
            id: id.to_string(),
            release_type,
            release_time: Utc.with_ymd_and_hms(2024, 10, day, 12, 0, 0).unwrap(),
        }
    }

    /// Fixed rows; counts loads and forced loads
    #[derive(Default)]
    pub struct StaticSource {
        pub rows: Vec<VersionRow>,
        pub forced: std::sync::atomic::AtomicUsize,
    }

    impl VersionSource for StaticSource {
        fn load(
            &self,
            force_refresh: bool,
        ) -> Result<Vec<VersionRow>, crate::core::version::VersionError> {
            if force_refresh {
                self.forced
                    .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            }
            Ok(self.rows.clone())
        }
    }
}
