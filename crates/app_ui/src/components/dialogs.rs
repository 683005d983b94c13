//! Modal dialogs

use crate::theme::Theme;
use app_core::{Notice, NoticeLevel};
use egui::{Align2, Context, RichText, Window};

/// Acknowledge-only message box for a [`Notice`]
pub struct NoticeDialog<'a> {
    notice: &'a Notice,
    theme: &'a Theme,
}

impl<'a> NoticeDialog<'a> {
    pub fn new(notice: &'a Notice, theme: &'a Theme) -> Self {
        Self { notice, theme }
    }

    fn icon(&self) -> (&'static str, egui::Color32) {
        match self.notice.level {
            NoticeLevel::Info => ("ℹ", self.theme.text),
            NoticeLevel::Warning => ("⚠", self.theme.button_hover),
            NoticeLevel::Error => ("✖", self.theme.highlight),
        }
    }

    /// Draw the box; true once the user acknowledged it with OK or Enter
    pub fn show(&self, ctx: &Context) -> bool {
        let mut acknowledged = false;
        let (icon, icon_color) = self.icon();

        Window::new(self.notice.title.as_str())
            .id(egui::Id::new("notice_dialog"))
            .collapsible(false)
            .resizable(false)
            .order(egui::Order::Foreground)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_max_width(360.0);
                ui.horizontal(|ui| {
                    ui.label(RichText::new(icon).size(22.0).color(icon_color));
                    ui.label(&self.notice.message);
                });
                ui.add_space(16.0);

                ui.vertical_centered(|ui| {
                    let ok = ui.button("OK");
                    let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ok.clicked() || enter {
                        acknowledged = true;
                    }
                });
            });

        acknowledged
    }
}
