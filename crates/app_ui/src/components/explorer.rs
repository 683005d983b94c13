//! Tabbed explorer screen

use super::item_grid::{CellStyle, ItemGrid};
use crate::textures::TextureCache;
use crate::theme::Theme;
use app_core::{Action, Owner, Tab, ViewStateController};
use egui::{Context, RichText, Ui};

/// Text typed into the search tabs; survives tab switches
#[derive(Debug, Default, Clone)]
pub struct ExplorerInputs {
    pub name_query: String,
    pub ingredient_query: String,
}

/// Tab bar plus the active tab's content
pub struct Explorer<'a> {
    controller: &'a ViewStateController,
    theme: &'a Theme,
}

impl<'a> Explorer<'a> {
    pub fn new(controller: &'a ViewStateController, theme: &'a Theme) -> Self {
        Self { controller, theme }
    }

    pub fn show(
        &self,
        ctx: &Context,
        active_tab: Tab,
        inputs: &mut ExplorerInputs,
        textures: &mut TextureCache,
    ) -> Vec<Action> {
        let mut actions = Vec::new();

        egui::TopBottomPanel::top("explorer_tabs")
            .frame(egui::Frame::none().fill(self.theme.secondary).inner_margin(8.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    for tab in Tab::ALL {
                        let text = RichText::new(tab.title()).size(15.0);
                        if ui.selectable_label(tab == active_tab, text).clicked() && tab != active_tab {
                            actions.push(Action::SelectTab(tab));
                        }
                    }
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.primary).inner_margin(16.0))
            .show(ctx, |ui| {
                ui.heading(RichText::new(active_tab.title()).color(self.theme.highlight));
                ui.add_space(8.0);

                let action = match active_tab {
                    Tab::SearchByName => self.search_by_name(ui, inputs),
                    Tab::SearchByIngredient => self.search_by_ingredient(ui, inputs, textures),
                    Tab::Categories => self.categories(ui, textures),
                    Tab::Random => self.random(ui),
                    Tab::Area => self.areas(ui, textures),
                };
                actions.extend(action);
            });

        actions
    }

    fn busy(&self, ui: &mut Ui, tab: Tab) -> bool {
        let busy = self.controller.is_busy(Owner::Tab(tab));
        if busy {
            ui.add(egui::Spinner::new());
        }
        busy
    }

    /// Text field plus submit button; Enter in the field submits too
    fn search_row(&self, ui: &mut Ui, tab: Tab, hint: &str, query: &mut String) -> bool {
        let mut submit = false;
        ui.horizontal(|ui| {
            let field = ui.add(
                egui::TextEdit::singleline(query)
                    .hint_text(hint)
                    .desired_width(320.0),
            );
            if field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submit = true;
            }

            let busy = self.controller.is_busy(Owner::Tab(tab));
            if ui.add_enabled(!busy, egui::Button::new("Search")).clicked() {
                submit = true;
            }
            self.busy(ui, tab);
        });
        submit
    }

    fn search_by_name(&self, ui: &mut Ui, inputs: &mut ExplorerInputs) -> Option<Action> {
        ui.label(RichText::new("Find a recipe by its name.").color(self.theme.text_secondary));
        ui.add_space(4.0);

        self.search_row(ui, Tab::SearchByName, "Meal name, e.g. Arrabiata", &mut inputs.name_query)
            .then(|| Action::SubmitNameSearch(inputs.name_query.clone()))
    }

    fn search_by_ingredient(
        &self,
        ui: &mut Ui,
        inputs: &mut ExplorerInputs,
        textures: &mut TextureCache,
    ) -> Option<Action> {
        let mut action = self
            .search_row(ui, Tab::SearchByIngredient, "Ingredient, e.g. chicken", &mut inputs.ingredient_query)
            .then(|| Action::SubmitIngredientSearch(inputs.ingredient_query.clone()));

        if let Some(view) = self.controller.ingredient_results() {
            ui.add_space(8.0);
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let clicked = ItemGrid::new("ingredient_results", view, self.theme)
                        .style(CellStyle::Row)
                        .show(ui, textures);
                    if let Some(trigger) = clicked {
                        action = Some(trigger.into_action(Owner::Tab(Tab::SearchByIngredient)));
                    }
                });
        }

        action
    }

    fn categories(&self, ui: &mut Ui, textures: &mut TextureCache) -> Option<Action> {
        let mut action = None;

        ui.horizontal(|ui| {
            let busy = self.controller.is_busy(Owner::Tab(Tab::Categories));
            if ui.add_enabled(!busy, egui::Button::new("Load Categories")).clicked() {
                action = Some(Action::FetchCategories);
            }
            self.busy(ui, Tab::Categories);
        });

        if let Some(view) = self.controller.categories() {
            ui.add_space(8.0);
            if view.is_empty() {
                ui.label(RichText::new("No categories found.").color(self.theme.text_secondary));
                return action;
            }
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if let Some(trigger) = ItemGrid::new("categories", view, self.theme).show(ui, textures) {
                        action = Some(trigger.into_action(Owner::Tab(Tab::Categories)));
                    }
                });
        }

        action
    }

    fn random(&self, ui: &mut Ui) -> Option<Action> {
        let mut action = None;

        ui.label(RichText::new("Feeling adventurous? Let the kitchen decide.").color(self.theme.text_secondary));
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let busy = self.controller.is_busy(Owner::Tab(Tab::Random));
            let button = egui::Button::new(RichText::new("Get Random Meal").size(16.0)).min_size(egui::vec2(200.0, 40.0));
            if ui.add_enabled(!busy, button).clicked() {
                action = Some(Action::FetchRandom);
            }
            self.busy(ui, Tab::Random);
        });

        action
    }

    fn areas(&self, ui: &mut Ui, textures: &mut TextureCache) -> Option<Action> {
        let mut action = None;

        ui.horizontal(|ui| {
            let busy = self.controller.is_busy(Owner::Tab(Tab::Area));
            if ui.add_enabled(!busy, egui::Button::new("Load Areas")).clicked() {
                action = Some(Action::LoadAreas);
            }
            self.busy(ui, Tab::Area);
        });

        if let Some(view) = self.controller.areas() {
            ui.add_space(8.0);
            if view.is_empty() {
                ui.label(RichText::new("No areas found.").color(self.theme.text_secondary));
                return action;
            }
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let clicked = ItemGrid::new("areas", view, self.theme)
                        .style(CellStyle::Button)
                        .show(ui, textures);
                    if let Some(trigger) = clicked {
                        action = Some(trigger.into_action(Owner::Tab(Tab::Area)));
                    }
                });
        }

        action
    }
}
