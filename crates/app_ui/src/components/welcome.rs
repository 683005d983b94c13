//! Welcome screen

use crate::theme::Theme;
use app_core::Action;
use egui::{Color32, Rect, RichText, TextureHandle, Ui};

/// Full-window landing page with a single way forward
pub struct WelcomeScreen;

impl WelcomeScreen {
    pub fn ui(ui: &mut Ui, theme: &Theme, background: Option<&TextureHandle>) -> Option<Action> {
        let rect = ui.max_rect();

        if let Some(texture) = background {
            let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            ui.painter().image(texture.id(), rect, uv, Color32::WHITE);
            // Darken so the text stays readable
            ui.painter()
                .rect_filled(rect, 0.0, Color32::from_black_alpha(150));
        }

        let mut action = None;
        ui.vertical_centered(|ui| {
            ui.add_space(rect.height() * 0.3);
            ui.label(
                RichText::new("Welcome to Foodie Fiesta!")
                    .size(36.0)
                    .strong()
                    .color(theme.text),
            );
            ui.add_space(12.0);
            ui.label(
                RichText::new("Discover delicious recipes from around the world!")
                    .size(18.0)
                    .color(theme.text_secondary),
            );
            ui.add_space(32.0);

            let start = egui::Button::new(RichText::new("Start Exploring").size(20.0).strong())
                .fill(theme.button)
                .min_size(egui::vec2(220.0, 48.0))
                .rounding(8.0);
            if ui.add(start).clicked() {
                action = Some(Action::Start);
            }
        });

        action
    }
}
