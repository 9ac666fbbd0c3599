//! Screenshots tab
//!
//! Thumbnails of the instance's screenshots, loaded in the background and
//! shown as they arrive.

use crate::core::screenshot::{self, ScreenshotEntry, Thumbnail};
use crate::core::task::TaskRunner;
use crate::gui::{UiSender, ui_channel};
use crate::util;
use eframe::egui;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc;

enum LoaderMessage {
    Entry {
        generation: u64,
        entry: ScreenshotEntry,
    },
    Finished {
        generation: u64,
        result: Result<usize, String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Loading,
    Loaded,
    Failed,
}

/// A screenshot in the panel. The texture is created on first draw.
pub struct PanelEntry {
    pub path: PathBuf,
    pub size: u64,
    pending: Option<Thumbnail>,
    texture: Option<egui::TextureHandle>,
}

pub struct ScreenshotsPanel {
    entries: Vec<PanelEntry>,
    state: PanelState,
}

impl ScreenshotsPanel {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            state: PanelState::Loading,
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.state = PanelState::Loading;
    }

    fn push(&mut self, entry: ScreenshotEntry) {
        self.entries.push(PanelEntry {
            path: entry.path,
            size: entry.size,
            pending: Some(entry.thumbnail),
            texture: None,
        });
    }

    pub fn entries(&self) -> &[PanelEntry] {
        &self.entries
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    fn upload_textures(&mut self, ctx: &egui::Context) {
        for entry in &mut self.entries {
            if let Some(thumb) = entry.pending.take() {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [thumb.width as usize, thumb.height as usize],
                    &thumb.rgba,
                );
                entry.texture = Some(ctx.load_texture(
                    entry.path.to_string_lossy(),
                    image,
                    egui::TextureOptions::LINEAR,
                ));
            }
        }
    }

    /// Returns the screenshot the user clicked
    fn show(&mut self, ui: &mut egui::Ui) -> Option<PathBuf> {
        self.upload_textures(ui.ctx());
        let mut clicked = None;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for entry in &self.entries {
                        let Some(texture) = &entry.texture else {
                            continue;
                        };
                        let image = egui::Image::from_texture(
                            egui::load::SizedTexture::from_handle(texture),
                        );
                        let name = entry
                            .path
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_default();

                        let response = ui
                            .add(egui::ImageButton::new(image))
                            .on_hover_text(format!("{}\n{}", name, util::format_size(entry.size)));
                        if response.clicked() {
                            clicked = Some(entry.path.clone());
                        }
                    }
                });
            });

        clicked
    }
}

/// Scans the screenshots directory off the UI thread
pub struct ScreenshotsLoader {
    dir: PathBuf,
    runner: Arc<dyn TaskRunner>,
    max_edge: u32,
    sender: UiSender<LoaderMessage>,
    receiver: mpsc::Receiver<LoaderMessage>,
    /// Bumped per scan; late messages from older scans are dropped
    generation: u64,
}

impl ScreenshotsLoader {
    pub fn new(
        dir: PathBuf,
        runner: Arc<dyn TaskRunner>,
        max_edge: u32,
        ctx: Option<egui::Context>,
    ) -> Self {
        let (sender, receiver) = ui_channel(ctx);
        Self {
            dir,
            runner,
            max_edge,
            sender,
            receiver,
            generation: 0,
        }
    }

    /// Clear the panel and start a new scan
    pub fn execute(&mut self, panel: &mut ScreenshotsPanel) {
        self.generation += 1;
        panel.clear();

        let generation = self.generation;
        let dir = self.dir.clone();
        let max_edge = self.max_edge;
        let sender = self.sender.clone();

        self.runner.run(Box::new(move || {
            let result = screenshot::scan(&dir, max_edge, |entry| {
                sender.send(LoaderMessage::Entry { generation, entry });
            })
            .map_err(|e| {
                tracing::error!("Unable to load screenshots: {}", e);
                e.to_string()
            });

            if let Ok(count) = &result {
                tracing::debug!("Loaded {} screenshots from {:?}", count, dir);
            }
            sender.send(LoaderMessage::Finished { generation, result });
        }));
    }

    /// Move arrived entries into the panel. Call once per frame.
    pub fn poll(&mut self, panel: &mut ScreenshotsPanel) {
        while let Ok(message) = self.receiver.try_recv() {
            match message {
                LoaderMessage::Entry { generation, entry } if generation == self.generation => {
                    panel.push(entry);
                }
                LoaderMessage::Finished { generation, result } if generation == self.generation => {
                    panel.state = match result {
                        Ok(_) => PanelState::Loaded,
                        Err(_) => PanelState::Failed,
                    };
                }
                _ => {}
            }
        }
    }
}

pub struct ScreenshotsTab {
    dir: PathBuf,
    panel: ScreenshotsPanel,
    loader: ScreenshotsLoader,
}

impl ScreenshotsTab {
    /// Create the tab and start scanning `dir`
    pub fn new(
        dir: PathBuf,
        runner: Arc<dyn TaskRunner>,
        max_edge: u32,
        ctx: Option<egui::Context>,
    ) -> Self {
        let loader = ScreenshotsLoader::new(dir.clone(), runner, max_edge, ctx);
        let mut tab = Self {
            dir,
            panel: ScreenshotsPanel::new(),
            loader,
        };
        tab.load_screenshots();
        tab
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Start a fresh scan, replacing whatever is shown
    pub fn load_screenshots(&mut self) {
        self.loader.execute(&mut self.panel);
    }

    pub fn poll(&mut self) {
        self.loader.poll(&mut self.panel);
    }

    pub fn panel(&self) -> &ScreenshotsPanel {
        &self.panel
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        self.poll();

        ui.horizontal(|ui| {
            if ui.button("🔄 Reload").clicked() {
                self.load_screenshots();
            }
            if ui.button("📁 Open folder").clicked() {
                if let Err(e) = util::open_folder(&self.dir) {
                    tracing::error!("Failed to open screenshots folder: {:#}", e);
                }
            }
            if self.panel.state() == PanelState::Loading {
                ui.spinner();
            }
        });
        ui.separator();

        if self.panel.entries().is_empty() && self.panel.state() != PanelState::Loading {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.label("No screenshots");
            });
            return;
        }

        if let Some(path) = self.panel.show(ui) {
            if let Err(e) = util::open_file(&path) {
                tracing::error!("Failed to open screenshot: {:#}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::screenshot::testing::write_png;
    use crate::core::task::testing::{DeferredRunner, InlineRunner};

    fn names(tab: &ScreenshotsTab) -> Vec<String> {
        tab.panel()
            .entries()
            .iter()
            .map(|e| e.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_three_images_three_entries() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.png", "c.png"] {
            write_png(&dir.path().join(name), 16, 9);
        }
        std::fs::write(dir.path().join("readme.txt"), "not an image").unwrap();

        let mut tab = ScreenshotsTab::new(dir.path().to_path_buf(), Arc::new(InlineRunner), 64, None);
        tab.poll();

        assert_eq!(names(&tab), ["a.png", "b.png", "c.png"]);
        assert_eq!(tab.panel().state(), PanelState::Loaded);
    }

    #[test]
    fn test_reload_does_not_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.png", "c.png"] {
            write_png(&dir.path().join(name), 8, 8);
        }

        let mut tab = ScreenshotsTab::new(dir.path().to_path_buf(), Arc::new(InlineRunner), 64, None);
        tab.poll();
        tab.load_screenshots();
        tab.poll();

        assert_eq!(tab.panel().entries().len(), 3);
    }

    #[test]
    fn test_late_results_from_old_scan_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("a.png"), 8, 8);
        let runner = Arc::new(DeferredRunner::default());

        let mut tab = ScreenshotsTab::new(dir.path().to_path_buf(), runner.clone(), 64, None);
        tab.load_screenshots();
        assert_eq!(runner.pending(), 2);
        runner.run_all();
        tab.poll();

        assert_eq!(names(&tab), ["a.png"]);
    }

    #[test]
    fn test_entries_arrive_before_scan_finishes() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("a.png"), 8, 8);
        let runner = Arc::new(DeferredRunner::default());

        let mut tab = ScreenshotsTab::new(dir.path().to_path_buf(), runner.clone(), 64, None);
        tab.poll();
        assert_eq!(tab.panel().state(), PanelState::Loading);
        assert!(tab.panel().entries().is_empty());

        runner.run_all();
        tab.poll();
        assert_eq!(tab.panel().entries().len(), 1);
    }

    #[test]
    fn test_missing_directory_leaves_panel_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("screenshots");

        let mut tab = ScreenshotsTab::new(missing.clone(), Arc::new(InlineRunner), 64, None);
        tab.poll();

        assert!(tab.panel().entries().is_empty());
        assert_eq!(tab.panel().state(), PanelState::Failed);
        assert_eq!(tab.dir(), missing);
    }
}
