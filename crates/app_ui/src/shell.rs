//! Top-level UI: picks the screen, draws overlays and the notice dialog

use crate::components::{Explorer, ExplorerInputs, NoticeDialog, OverlayWindows, WelcomeScreen};
use crate::textures::TextureCache;
use crate::theme::Theme;
use app_core::{Action, Screen, ViewStateController};
use egui::{Context, TextureHandle};

/// UI-side state that is not part of the view state
pub struct Shell {
    theme: Theme,
    inputs: ExplorerInputs,
    textures: TextureCache,
    background: Option<TextureHandle>,
}

impl Shell {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            inputs: ExplorerInputs::default(),
            textures: TextureCache::new(),
            background: None,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_background(&mut self, background: Option<TextureHandle>) {
        self.background = background;
    }

    /// Draw one frame and collect the user's actions
    pub fn show(&mut self, ctx: &Context, controller: &ViewStateController) -> Vec<Action> {
        let mut actions = Vec::new();

        match controller.screen() {
            Screen::Welcome => {
                egui::CentralPanel::default()
                    .frame(egui::Frame::none().fill(self.theme.primary))
                    .show(ctx, |ui| {
                        actions.extend(WelcomeScreen::ui(ui, &self.theme, self.background.as_ref()));
                    });
            }
            Screen::Explorer { active_tab } => {
                let explorer = Explorer::new(controller, &self.theme);
                actions.extend(explorer.show(ctx, active_tab, &mut self.inputs, &mut self.textures));

                let overlays = OverlayWindows::new(controller, &self.theme);
                actions.extend(overlays.show(ctx, &mut self.textures));

                if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                    if let Some(top) = controller.overlays().top() {
                        actions.push(Action::CloseOverlay(top.id()));
                    }
                }
            }
        }

        // A pending notice is modal: nothing else gets through until it is dismissed
        if let Some(notice) = controller.current_notice() {
            actions.clear();
            if NoticeDialog::new(notice, &self.theme).show(ctx) {
                actions.push(Action::AcknowledgeNotice);
            }
        }

        self.textures.retain_views(&controller.live_views());
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_core::{CatalogReply, MealRecord, Tab, Thumbnail};

    fn frame(shell: &mut Shell, ctx: &Context, controller: &ViewStateController) -> Vec<Action> {
        let mut actions = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            actions = shell.show(ctx, controller);
        });
        actions
    }

    fn meal() -> MealRecord {
        let raw = serde_json::json!({
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strMealThumb": "https://img.test/t.png",
            "strIngredient1": "soy sauce",
            "strMeasure1": "3/4 cup",
        });
        MealRecord::from_raw(raw.as_object().unwrap()).unwrap()
    }

    #[test]
    fn test_welcome_frame_is_quiet() {
        let ctx = Context::default();
        let mut shell = Shell::new(Theme::default());
        let controller = ViewStateController::default();

        assert!(frame(&mut shell, &ctx, &controller).is_empty());
    }

    #[test]
    fn test_detail_texture_lives_with_overlay() {
        let ctx = Context::default();
        let mut shell = Shell::new(Theme::default());
        let mut controller = ViewStateController::default();
        controller.handle(Action::Start);
        controller.handle(Action::SelectTab(Tab::Random));

        let request = controller.handle(Action::FetchRandom).unwrap();
        controller.complete(request.ticket, Ok(CatalogReply::Meal(Some(meal()))));
        for request in controller.take_thumbnail_requests() {
            let thumbnail = Thumbnail {
                url: request.url,
                width: 8,
                height: 8,
                data: vec![200; 8 * 8 * 4],
            };
            controller.apply_thumbnail(request.target, Some(thumbnail));
        }

        frame(&mut shell, &ctx, &controller);
        assert_eq!(shell.textures.len(), 1);

        let id = controller.overlays().top().unwrap().id();
        controller.handle(Action::CloseOverlay(id));
        frame(&mut shell, &ctx, &controller);
        assert!(shell.textures.is_empty());
    }
}
