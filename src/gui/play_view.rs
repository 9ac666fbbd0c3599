//! Instance list
//!
//! Instances grouped by their group name, as shown on the main window.

use crate::core::icon::{Icon, IconManager};
use crate::core::instance::Instance;
use eframe::egui;
use std::collections::BTreeMap;

/// Heading used for the empty group name
const DEFAULT_GROUP_LABEL: &str = "Default";

/// Receives instances added from dialogs
pub trait InstanceListView {
    fn add_instance_item(&mut self, icon: Icon, name: &str, group: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstanceItem {
    pub icon: Icon,
    pub name: String,
}

/// Something the user asked for in the list
pub enum PlayViewAction {
    OpenSettings(String),
}

#[derive(Default)]
pub struct PlayView {
    groups: BTreeMap<String, Vec<InstanceItem>>,
    /// (group, instance name)
    selected: Option<(String, String)>,
}

impl PlayView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the list from instances on disk
    pub fn from_instances(instances: &[Instance], icons: &IconManager) -> Self {
        let mut view = Self::new();
        let icon = icons.get_icon(crate::core::icon::DEFAULT_INSTANCE_ICON);
        for instance in instances {
            view.add_instance_item(icon, &instance.name, &instance.group);
        }
        view
    }

    pub fn items(&self, group: &str) -> &[InstanceItem] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Group of the current selection (empty = default group)
    pub fn selected_group(&self) -> &str {
        self.selected.as_ref().map(|(g, _)| g.as_str()).unwrap_or("")
    }

    pub fn selected_instance(&self) -> Option<&str> {
        self.selected.as_ref().map(|(_, name)| name.as_str())
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<PlayViewAction> {
        let mut action = None;
        let mut clicked = None;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (group, items) in &self.groups {
                    let heading = if group.is_empty() {
                        DEFAULT_GROUP_LABEL
                    } else {
                        group.as_str()
                    };

                    egui::CollapsingHeader::new(heading)
                        .id_salt(("instance_group", group))
                        .default_open(true)
                        .show(ui, |ui| {
                            ui.horizontal_wrapped(|ui| {
                                for item in items {
                                    let is_selected = self.selected.as_ref().is_some_and(
                                        |(g, n)| g == group && n == &item.name,
                                    );
                                    let response = ui.add_sized(
                                        [96.0, 72.0],
                                        egui::SelectableLabel::new(
                                            is_selected,
                                            format!("{}\n{}", item.icon.glyph, item.name),
                                        ),
                                    );
                                    if response.clicked() {
                                        clicked = Some((group.clone(), item.name.clone()));
                                    }
                                    if response.double_clicked() {
                                        action = Some(PlayViewAction::OpenSettings(
                                            item.name.clone(),
                                        ));
                                    }
                                }
                            });
                        });
                }
            });

        if clicked.is_some() {
            self.selected = clicked;
        }
        action
    }
}

impl InstanceListView for PlayView {
    fn add_instance_item(&mut self, icon: Icon, name: &str, group: &str) {
        self.groups
            .entry(group.to_string())
            .or_default()
            .push(InstanceItem {
                icon,
                name: name.to_string(),
            });
    }
}
