//! Blocking error message window

use eframe::egui;

/// Show `message` as an error window. Clears it on OK or Escape.
///
/// Returns true while the message box is visible, so callers can disable
/// the window underneath it.
pub fn show_error(ctx: &egui::Context, id: &str, message: &mut Option<String>) -> bool {
    let Some(text) = message.as_deref() else {
        return false;
    };

    let mut dismissed = ctx.input(|i| i.key_pressed(egui::Key::Escape));

    egui::Window::new("Error")
        .id(egui::Id::new(id))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.set_min_width(260.0);
            ui.horizontal(|ui| {
                ui.colored_label(egui::Color32::RED, "❌");
                ui.label(text);
            });
            ui.add_space(10.0);
            ui.vertical_centered(|ui| {
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });

    if dismissed {
        *message = None;
    }
    true
}
