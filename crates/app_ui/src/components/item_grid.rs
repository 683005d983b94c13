//! Generic grid renderer for list views
//! Draws any [`ListView`] as tiles, rows or plain buttons

use crate::textures::TextureCache;
use crate::theme::Theme;
use app_core::{ListCell, ListView, ThumbnailSlot, Trigger};
use egui::{Rect, Response, RichText, Sense, Ui, Vec2};

/// How each entry is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    /// Image above a centered label
    Tile,
    /// Image left of the label
    Row,
    /// Text-only button
    Button,
}

/// Grid renderer for one [`ListView`]
pub struct ItemGrid<'a> {
    id_salt: egui::Id,
    view: &'a ListView,
    style: CellStyle,
    theme: &'a Theme,
}

impl<'a> ItemGrid<'a> {
    pub fn new(id_salt: impl std::hash::Hash, view: &'a ListView, theme: &'a Theme) -> Self {
        Self {
            id_salt: egui::Id::new(id_salt),
            view,
            style: CellStyle::Tile,
            theme,
        }
    }

    pub fn style(mut self, style: CellStyle) -> Self {
        self.style = style;
        self
    }

    /// Draw the grid; returns the trigger of the clicked entry
    pub fn show(self, ui: &mut Ui, textures: &mut TextureCache) -> Option<Trigger> {
        let mut clicked = None;
        let placement = self.view.placement();

        egui::Grid::new(self.id_salt.with(self.view.id().0))
            .num_columns(placement.columns())
            .spacing(Vec2::new(10.0, 10.0))
            .show(ui, |ui| {
                for cell in self.view.cells() {
                    let response = self.render_cell(ui, cell, textures);
                    if response.clicked() {
                        clicked = cell.trigger.clone();
                    }

                    if placement.ends_row(cell.index) {
                        ui.end_row();
                    }
                }
            });

        clicked
    }

    fn image_edge(&self) -> f32 {
        self.view
            .thumbnail_size()
            .map(|s| s.width.max(s.height) as f32)
            .unwrap_or(0.0)
    }

    fn render_cell(&self, ui: &mut Ui, cell: &ListCell, textures: &mut TextureCache) -> Response {
        match self.style {
            CellStyle::Button => ui
                .add(egui::Button::new(RichText::new(&cell.label).size(14.0)).min_size(Vec2::new(180.0, 32.0)))
                .on_hover_cursor(egui::CursorIcon::PointingHand),
            CellStyle::Tile => self.render_tile(ui, cell, textures),
            CellStyle::Row => self.render_row(ui, cell, textures),
        }
    }

    fn render_tile(&self, ui: &mut Ui, cell: &ListCell, textures: &mut TextureCache) -> Response {
        let edge = self.image_edge();
        let item_size = Vec2::new(edge + 12.0, edge + 34.0);
        let (rect, response) = ui.allocate_exact_size(item_size, Sense::click());

        if ui.is_rect_visible(rect) {
            self.paint_background(ui, rect, &response);

            let image_rect = Rect::from_min_size(rect.min + Vec2::new(6.0, 6.0), Vec2::splat(edge));
            self.paint_image(ui, image_rect, cell, textures);

            let label_rect = Rect::from_min_max(
                egui::pos2(rect.min.x, image_rect.max.y + 2.0),
                rect.max,
            );
            ui.painter().text(
                label_rect.center(),
                egui::Align2::CENTER_CENTER,
                truncate(&cell.label, (edge / 7.0) as usize),
                egui::FontId::proportional(12.0),
                self.theme.text,
            );
        }

        response
            .on_hover_text(cell.label.as_str())
            .on_hover_cursor(egui::CursorIcon::PointingHand)
    }

    fn render_row(&self, ui: &mut Ui, cell: &ListCell, textures: &mut TextureCache) -> Response {
        let edge = self.image_edge();
        let width = ui.available_width().max(edge + 200.0);
        let (rect, response) = ui.allocate_exact_size(Vec2::new(width, edge + 8.0), Sense::click());

        if ui.is_rect_visible(rect) {
            self.paint_background(ui, rect, &response);

            let image_rect = Rect::from_min_size(rect.min + Vec2::new(4.0, 4.0), Vec2::splat(edge));
            self.paint_image(ui, image_rect, cell, textures);

            ui.painter().text(
                egui::pos2(image_rect.max.x + 12.0, rect.center().y),
                egui::Align2::LEFT_CENTER,
                &cell.label,
                egui::FontId::proportional(14.0),
                self.theme.text,
            );
        }

        response.on_hover_cursor(egui::CursorIcon::PointingHand)
    }

    fn paint_background(&self, ui: &Ui, rect: Rect, response: &Response) {
        let fill = if response.hovered() {
            self.theme.accent
        } else {
            self.theme.secondary
        };
        ui.painter().rect_filled(rect, 6.0, fill);
    }

    fn paint_image(&self, ui: &Ui, rect: Rect, cell: &ListCell, textures: &mut TextureCache) {
        let painter = ui.painter();

        match &cell.thumbnail {
            ThumbnailSlot::Loaded(thumbnail) => {
                let texture = textures.get_or_upload(ui.ctx(), self.view.id(), cell.index, thumbnail);
                let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                painter.image(texture.id(), rect, uv, egui::Color32::WHITE);
            }
            ThumbnailSlot::Pending | ThumbnailSlot::Loading => {
                painter.rect_filled(rect, 4.0, self.theme.primary);
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "…",
                    egui::FontId::proportional(rect.height() * 0.4),
                    self.theme.text_secondary,
                );
            }
            // Entries without an image keep their slot so rows line up
            ThumbnailSlot::Missing | ThumbnailSlot::NotRequested => {
                painter.rect_filled(rect, 4.0, self.theme.primary);
            }
        }
    }
}

/// Shorten to `max_chars` characters, ending in "..."
fn truncate(text: &str, max_chars: usize) -> String {
    let max_chars = max_chars.max(4);
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars - 3).collect();
    format!("{kept}...")
}
