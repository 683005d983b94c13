//! Overlay windows: meal details and meal lists
//!
//! Every overlay gets its own closable window keyed by its id, so any number
//! can be open at once and each closes independently.

use super::item_grid::{CellStyle, ItemGrid};
use crate::textures::TextureCache;
use crate::theme::Theme;
use app_core::{Action, MealDetail, Overlay, OverlayPayload, Owner, ThumbnailSlot, ViewStateController};
use egui::{Context, RichText, Ui, Vec2};

const CASCADE_STEP: f32 = 28.0;

pub struct OverlayWindows<'a> {
    controller: &'a ViewStateController,
    theme: &'a Theme,
}

impl<'a> OverlayWindows<'a> {
    pub fn new(controller: &'a ViewStateController, theme: &'a Theme) -> Self {
        Self { controller, theme }
    }

    pub fn show(&self, ctx: &Context, textures: &mut TextureCache) -> Vec<Action> {
        let mut actions = Vec::new();

        for (position, overlay) in self.controller.overlays().iter().enumerate() {
            let mut open = true;
            let offset = CASCADE_STEP * (position % 8) as f32;

            egui::Window::new(overlay.title())
                .id(egui::Id::new(("overlay", overlay.id().raw())))
                .open(&mut open)
                .collapsible(false)
                .resizable(true)
                .default_pos(egui::pos2(120.0 + offset, 80.0 + offset))
                .default_size(self.default_size(overlay))
                .show(ctx, |ui| {
                    if let Some(action) = self.contents(ui, overlay, textures) {
                        actions.push(action);
                    }
                });

            if !open {
                actions.push(Action::CloseOverlay(overlay.id()));
            }
        }

        actions
    }

    fn default_size(&self, overlay: &Overlay) -> Vec2 {
        match overlay.payload() {
            OverlayPayload::Meal(_) => Vec2::new(560.0, 600.0),
            OverlayPayload::Meals(_) => Vec2::new(420.0, 480.0),
        }
    }

    fn contents(&self, ui: &mut Ui, overlay: &Overlay, textures: &mut TextureCache) -> Option<Action> {
        match overlay.payload() {
            OverlayPayload::Meal(detail) => {
                self.meal_detail(ui, detail, textures);
                None
            }
            OverlayPayload::Meals(view) => {
                let origin = Owner::Overlay(overlay.id());
                if self.controller.is_busy(origin) {
                    ui.horizontal(|ui| {
                        ui.add(egui::Spinner::new());
                        ui.label(RichText::new("Loading recipe…").color(self.theme.text_secondary));
                    });
                }

                let mut action = None;
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        let clicked = ItemGrid::new(("overlay_list", overlay.id().raw()), view, self.theme)
                            .style(CellStyle::Row)
                            .show(ui, textures);
                        action = clicked.map(|trigger| trigger.into_action(origin));
                    });
                action
            }
        }
    }

    fn meal_detail(&self, ui: &mut Ui, detail: &MealDetail, textures: &mut TextureCache) {
        let meal = detail.meal();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(meal.name()).size(22.0).strong().color(self.theme.highlight));
                    ui.add_space(8.0);
                    self.detail_image(ui, detail, textures);
                });
                ui.add_space(12.0);

                ui.label(format!("Category: {}", meal.category_label()));
                ui.label(format!("Area: {}", meal.area_label()));
                if !meal.tags().is_empty() {
                    ui.label(
                        RichText::new(format!("Tags: {}", meal.tags().join(", ")))
                            .color(self.theme.text_secondary),
                    );
                }

                ui.add_space(12.0);
                ui.label(RichText::new("Ingredients:").size(16.0).strong());
                for ingredient in meal.ingredients() {
                    ui.label(format!("• {}", ingredient.display_line()));
                }

                ui.add_space(12.0);
                ui.label(RichText::new("Instructions:").size(16.0).strong());
                ui.label(meal.instructions().unwrap_or("No instructions provided."));

                if meal.youtube_url().is_some() || meal.source_url().is_some() {
                    ui.add_space(12.0);
                    ui.horizontal(|ui| {
                        if let Some(url) = meal.youtube_url() {
                            ui.hyperlink_to("Watch on YouTube", url);
                        }
                        if let Some(url) = meal.source_url() {
                            ui.hyperlink_to("Original recipe", url);
                        }
                    });
                }
            });
    }

    fn detail_image(&self, ui: &mut Ui, detail: &MealDetail, textures: &mut TextureCache) {
        let placeholder = detail.image_size();

        match detail.image() {
            ThumbnailSlot::Loaded(thumbnail) => {
                let size = Vec2::new(thumbnail.width as f32, thumbnail.height as f32);
                let texture = textures.get_or_upload(ui.ctx(), detail.view_id(), 0, thumbnail);
                ui.image((texture.id(), size));
            }
            ThumbnailSlot::Pending | ThumbnailSlot::Loading => {
                let size = Vec2::new(placeholder.width as f32, placeholder.height as f32);
                let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
                ui.painter().rect_filled(rect, 6.0, self.theme.secondary);
                ui.put(rect, egui::Spinner::new());
            }
            ThumbnailSlot::Missing | ThumbnailSlot::NotRequested => {}
        }
    }
}
