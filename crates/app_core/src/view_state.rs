//! Navigation state and action routing
//!
//! The controller owns every piece of view state: the current screen, the
//! inline contents of each tab, the overlay stack and the notice queue.
//! User actions go through [`ViewStateController::handle`], which either
//! settles them locally or returns a [`FetchRequest`]. Whoever runs the
//! request (inline, or on the background worker) hands the outcome back via
//! [`ViewStateController::complete`].

use crate::cancel::CancelToken;
use crate::catalog::{Catalog, CatalogQuery, CatalogReply};
use crate::config::AppConfig;
use crate::error::CatalogError;
use crate::listing::{ListView, ThumbnailSlot, ViewId};
use crate::model::{MealRecord, MealSummary};
use crate::thumbnail::{Thumbnail, ThumbnailLoader, ThumbnailSize};
use crate::transport::HttpTransport;
use std::collections::{HashMap, HashSet, VecDeque};

/// Browsing tabs of the explorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    SearchByName,
    SearchByIngredient,
    Categories,
    Random,
    Area,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::SearchByName,
        Tab::SearchByIngredient,
        Tab::Categories,
        Tab::Random,
        Tab::Area,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::SearchByName => "Search Meal",
            Tab::SearchByIngredient => "Search by Ingredient",
            Tab::Categories => "Categories",
            Tab::Random => "Random Meal",
            Tab::Area => "Explore by Area",
        }
    }
}

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    Explorer { active_tab: Tab },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(u64);

impl OverlayId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// The control a fetch was issued from. Busy state and cancellation are
/// tracked per owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Tab(Tab),
    Overlay(OverlayId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    MealDetail,
    CategoryMealList,
    AreaMealList,
}

/// Full recipe shown in a detail overlay
#[derive(Debug, Clone, PartialEq)]
pub struct MealDetail {
    view_id: ViewId,
    meal: MealRecord,
    image: ThumbnailSlot,
    image_size: ThumbnailSize,
}

impl MealDetail {
    fn new(view_id: ViewId, meal: MealRecord, image_size: ThumbnailSize) -> Self {
        let image = if meal.thumbnail_url().is_empty() {
            ThumbnailSlot::NotRequested
        } else {
            ThumbnailSlot::Pending
        };
        Self {
            view_id,
            meal,
            image,
            image_size,
        }
    }

    pub fn view_id(&self) -> ViewId {
        self.view_id
    }

    pub fn meal(&self) -> &MealRecord {
        &self.meal
    }

    pub fn image(&self) -> &ThumbnailSlot {
        &self.image
    }

    /// Size the image is requested at
    pub fn image_size(&self) -> ThumbnailSize {
        self.image_size
    }

    fn take_pending(&mut self) -> Option<String> {
        if self.image != ThumbnailSlot::Pending {
            return None;
        }
        self.image = ThumbnailSlot::Loading;
        Some(self.meal.thumbnail_url().to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayPayload {
    Meal(MealDetail),
    Meals(ListView),
}

/// A secondary window above the explorer
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    id: OverlayId,
    kind: OverlayKind,
    title: String,
    payload: OverlayPayload,
}

impl Overlay {
    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn payload(&self) -> &OverlayPayload {
        &self.payload
    }

    pub fn meal(&self) -> Option<&MealRecord> {
        match &self.payload {
            OverlayPayload::Meal(detail) => Some(detail.meal()),
            OverlayPayload::Meals(_) => None,
        }
    }

    pub fn meals(&self) -> Option<&ListView> {
        match &self.payload {
            OverlayPayload::Meals(view) => Some(view),
            OverlayPayload::Meal(_) => None,
        }
    }
}

/// Open overlays in the order they were opened
#[derive(Debug, Default)]
pub struct OverlayStack {
    overlays: Vec<Overlay>,
}

impl OverlayStack {
    fn push(&mut self, overlay: Overlay) {
        self.overlays.push(overlay);
    }

    fn close(&mut self, id: OverlayId) -> Option<Overlay> {
        let pos = self.overlays.iter().position(|o| o.id == id)?;
        Some(self.overlays.remove(pos))
    }

    pub fn get(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.id == id)
    }

    pub fn contains(&self, id: OverlayId) -> bool {
        self.get(id).is_some()
    }

    /// Most recently opened
    pub fn top(&self) -> Option<&Overlay> {
        self.overlays.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.iter()
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut Overlay> {
        self.overlays.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Message the user has to acknowledge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Info, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Error, title, message)
    }

    fn with_level(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// User actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Leave the welcome screen
    Start,
    SelectTab(Tab),
    SubmitNameSearch(String),
    SubmitIngredientSearch(String),
    FetchCategories,
    ViewCategoryMeals(String),
    FetchRandom,
    LoadAreas,
    SelectArea(String),
    /// Detail trigger of a meal list entry
    OpenMeal { id: String, origin: Owner },
    CloseOverlay(OverlayId),
    AcknowledgeNotice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// A catalog call the controller wants run
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub owner: Owner,
    pub query: CatalogQuery,
    pub cancel: CancelToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailTarget {
    pub view: ViewId,
    pub index: usize,
}

/// A thumbnail the controller wants loaded
#[derive(Debug, Clone)]
pub struct ThumbnailRequest {
    pub target: ThumbnailTarget,
    pub url: String,
    pub size: ThumbnailSize,
    pub cancel: CancelToken,
}

/// Layout knobs the controller needs
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub category_columns: usize,
    pub area_columns: usize,
    pub meal_list_columns: usize,
    pub detail_size: ThumbnailSize,
    pub category_size: ThumbnailSize,
    pub list_size: ThumbnailSize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ViewConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            category_columns: config.layout.category_columns,
            area_columns: config.layout.area_columns,
            meal_list_columns: config.layout.meal_list_columns,
            detail_size: ThumbnailSize::square(config.thumbnails.detail_size),
            category_size: ThumbnailSize::square(config.thumbnails.category_size),
            list_size: ThumbnailSize::square(config.thumbnails.list_size),
        }
    }
}

struct PendingFetch {
    owner: Owner,
    query: CatalogQuery,
    cancel: CancelToken,
}

/// Inline contents of the tabs that keep results on screen
#[derive(Debug, Default)]
struct TabContents {
    ingredient_results: Option<ListView>,
    categories: Option<ListView>,
    areas: Option<ListView>,
}

impl TabContents {
    fn slot(&mut self, tab: Tab) -> Option<&mut Option<ListView>> {
        match tab {
            Tab::SearchByIngredient => Some(&mut self.ingredient_results),
            Tab::Categories => Some(&mut self.categories),
            Tab::Area => Some(&mut self.areas),
            Tab::SearchByName | Tab::Random => None,
        }
    }

    fn views_mut(&mut self) -> [(Tab, Option<&mut ListView>); 3] {
        [
            (Tab::SearchByIngredient, self.ingredient_results.as_mut()),
            (Tab::Categories, self.categories.as_mut()),
            (Tab::Area, self.areas.as_mut()),
        ]
    }
}

/// Owns navigation state and routes actions to catalog queries
pub struct ViewStateController {
    config: ViewConfig,
    screen: Screen,
    tabs: TabContents,
    overlays: OverlayStack,
    notices: VecDeque<Notice>,
    pending: HashMap<FetchTicket, PendingFetch>,
    owner_tokens: HashMap<Owner, CancelToken>,
    next_id: u64,
}

impl ViewStateController {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            config,
            screen: Screen::Welcome,
            tabs: TabContents::default(),
            overlays: OverlayStack::default(),
            notices: VecDeque::new(),
            pending: HashMap::new(),
            owner_tokens: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn active_tab(&self) -> Option<Tab> {
        match self.screen {
            Screen::Welcome => None,
            Screen::Explorer { active_tab } => Some(active_tab),
        }
    }

    pub fn overlays(&self) -> &OverlayStack {
        &self.overlays
    }

    /// Front of the notice queue
    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn ingredient_results(&self) -> Option<&ListView> {
        self.tabs.ingredient_results.as_ref()
    }

    pub fn categories(&self) -> Option<&ListView> {
        self.tabs.categories.as_ref()
    }

    pub fn areas(&self) -> Option<&ListView> {
        self.tabs.areas.as_ref()
    }

    /// Ids of every view currently on screen
    pub fn live_views(&self) -> HashSet<ViewId> {
        let tabs = [
            &self.tabs.ingredient_results,
            &self.tabs.categories,
            &self.tabs.areas,
        ];
        let mut live: HashSet<ViewId> = tabs.into_iter().flatten().map(ListView::id).collect();
        live.extend(self.overlays.iter().map(|overlay| match &overlay.payload {
            OverlayPayload::Meal(detail) => detail.view_id,
            OverlayPayload::Meals(view) => view.id(),
        }));
        live
    }

    /// True while a fetch issued from `owner` is in flight
    pub fn is_busy(&self, owner: Owner) -> bool {
        self.pending.values().any(|p| p.owner == owner)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Apply an action. Returns the catalog call to run, if any.
    pub fn handle(&mut self, action: Action) -> Option<FetchRequest> {
        if self.screen == Screen::Welcome {
            if action == Action::Start {
                self.screen = Screen::Explorer {
                    active_tab: Tab::SearchByName,
                };
                tracing::info!("Exploration started");
            } else {
                tracing::debug!(?action, "Ignoring action on welcome screen");
            }
            return None;
        }

        match action {
            Action::Start => {
                tracing::debug!("Already exploring");
                None
            }
            Action::SelectTab(tab) => {
                self.screen = Screen::Explorer { active_tab: tab };
                tracing::debug!(?tab, "Tab selected");
                None
            }
            Action::SubmitNameSearch(input) => {
                let name = self.require_input(&input, "Please enter a meal name.")?;
                self.request(Owner::Tab(Tab::SearchByName), CatalogQuery::SearchByName(name))
            }
            Action::SubmitIngredientSearch(input) => {
                let ingredient = self.require_input(&input, "Please enter an ingredient.")?;
                self.request(
                    Owner::Tab(Tab::SearchByIngredient),
                    CatalogQuery::SearchByIngredient(ingredient),
                )
            }
            Action::FetchCategories => {
                self.request(Owner::Tab(Tab::Categories), CatalogQuery::ListCategories)
            }
            Action::ViewCategoryMeals(input) => {
                let category = self.require_input(&input, "Please choose a category.")?;
                self.request(
                    Owner::Tab(Tab::Categories),
                    CatalogQuery::FilterByCategory(category),
                )
            }
            Action::FetchRandom => self.request(Owner::Tab(Tab::Random), CatalogQuery::RandomMeal),
            Action::LoadAreas => self.request(Owner::Tab(Tab::Area), CatalogQuery::ListAreas),
            Action::SelectArea(input) => {
                let area = self.require_input(&input, "Please select an area.")?;
                self.request(Owner::Tab(Tab::Area), CatalogQuery::FilterByArea(area))
            }
            Action::OpenMeal { id, origin } => {
                let id = id.trim();
                if id.is_empty() {
                    tracing::debug!("Ignoring detail trigger without meal id");
                    return None;
                }
                if let Owner::Overlay(overlay) = origin {
                    if !self.overlays.contains(overlay) {
                        tracing::debug!(?overlay, "Detail trigger from closed overlay");
                        return None;
                    }
                }
                self.request(origin, CatalogQuery::LookupById(id.to_string()))
            }
            Action::CloseOverlay(id) => {
                self.close_overlay(id);
                None
            }
            Action::AcknowledgeNotice => {
                self.notices.pop_front();
                None
            }
        }
    }

    /// Feed back the outcome of a request returned by [`handle`](Self::handle)
    pub fn complete(&mut self, ticket: FetchTicket, result: Result<CatalogReply, CatalogError>) {
        let Some(pending) = self.pending.remove(&ticket) else {
            tracing::debug!(?ticket, "Discarding completion for unknown ticket");
            return;
        };

        if pending.cancel.is_cancelled() {
            tracing::debug!(?ticket, owner = ?pending.owner, "Discarding cancelled fetch");
            return;
        }

        match result {
            Ok(reply) => self.apply(pending.query, reply),
            Err(e) => {
                tracing::warn!(error = %e, "Catalog call failed");
                self.notices.push_back(Notice::error("Error", e.user_message()));
            }
        }
    }

    /// Run an action to completion on the calling thread
    pub fn dispatch_blocking<C: Catalog + ?Sized>(&mut self, action: Action, catalog: &C) {
        if let Some(request) = self.handle(action) {
            let result = request.query.run(catalog);
            self.complete(request.ticket, result);
        }
    }

    /// Hand out every thumbnail that still needs loading
    pub fn take_thumbnail_requests(&mut self) -> Vec<ThumbnailRequest> {
        let mut requests = Vec::new();
        let tokens = &mut self.owner_tokens;

        for (tab, view) in self.tabs.views_mut() {
            if let Some(view) = view {
                let cancel = token_for(tokens, Owner::Tab(tab));
                collect_list_requests(view, &cancel, &mut requests);
            }
        }

        for overlay in self.overlays.iter_mut() {
            let cancel = token_for(tokens, Owner::Overlay(overlay.id));
            match &mut overlay.payload {
                OverlayPayload::Meals(view) => collect_list_requests(view, &cancel, &mut requests),
                OverlayPayload::Meal(detail) => {
                    if let Some(url) = detail.take_pending() {
                        requests.push(ThumbnailRequest {
                            target: ThumbnailTarget {
                                view: detail.view_id,
                                index: 0,
                            },
                            url,
                            size: detail.image_size,
                            cancel,
                        });
                    }
                }
            }
        }

        requests
    }

    /// Store a finished thumbnail; `None` renders the entry without an image
    pub fn apply_thumbnail(&mut self, target: ThumbnailTarget, thumbnail: Option<Thumbnail>) {
        for (_, view) in self.tabs.views_mut() {
            if let Some(view) = view.filter(|v| v.id() == target.view) {
                view.set_thumbnail(target.index, thumbnail);
                return;
            }
        }

        for overlay in self.overlays.iter_mut() {
            match &mut overlay.payload {
                OverlayPayload::Meals(view) if view.id() == target.view => {
                    view.set_thumbnail(target.index, thumbnail);
                    return;
                }
                OverlayPayload::Meal(detail) if detail.view_id == target.view => {
                    if !detail.image.is_settled() {
                        detail.image.resolve(thumbnail);
                    }
                    return;
                }
                _ => {}
            }
        }

        tracing::debug!(?target, "Dropping thumbnail for a view that is gone");
    }

    /// Load all outstanding thumbnails on the calling thread
    pub fn load_thumbnails_blocking<T: HttpTransport>(&mut self, loader: &ThumbnailLoader<T>) {
        for request in self.take_thumbnail_requests() {
            let thumbnail = loader.load_or_none(&request.url, request.size);
            self.apply_thumbnail(request.target, thumbnail);
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn require_input(&mut self, input: &str, prompt: &str) -> Option<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            self.notices.push_back(Notice::warning("Input Required", prompt));
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn inform(&mut self, title: &str, message: impl Into<String>) {
        self.notices.push_back(Notice::info(title, message));
    }

    fn request(&mut self, owner: Owner, query: CatalogQuery) -> Option<FetchRequest> {
        if self.is_busy(owner) {
            tracing::debug!(?owner, "Fetch already in flight");
            return None;
        }

        let ticket = FetchTicket(self.next_id());
        let cancel = token_for(&mut self.owner_tokens, owner);
        tracing::debug!(?ticket, ?owner, operation = %query.operation(), "Issuing fetch");

        self.pending.insert(
            ticket,
            PendingFetch {
                owner,
                query: query.clone(),
                cancel: cancel.clone(),
            },
        );

        Some(FetchRequest {
            ticket,
            owner,
            query,
            cancel,
        })
    }

    fn apply(&mut self, query: CatalogQuery, reply: CatalogReply) {
        match (query, reply) {
            (CatalogQuery::SearchByName(_), CatalogReply::Meals(meals)) => {
                match meals.into_iter().next() {
                    Some(meal) => self.open_detail(meal),
                    None => self.inform("No meal found", "Please try again."),
                }
            }
            (CatalogQuery::LookupById(_), CatalogReply::Meal(Some(meal)))
            | (CatalogQuery::RandomMeal, CatalogReply::Meal(Some(meal))) => self.open_detail(meal),
            (CatalogQuery::LookupById(id), CatalogReply::Meal(None)) => {
                self.inform("No meal found", format!("No meal with id {id}."))
            }
            (CatalogQuery::RandomMeal, CatalogReply::Meal(None)) => {
                self.inform("No Result", "No result. Please try again.")
            }
            (CatalogQuery::SearchByIngredient(ingredient), CatalogReply::Summaries(meals)) => {
                if meals.is_empty() {
                    self.replace_tab_view(Tab::SearchByIngredient, None);
                    self.inform(
                        "No Results",
                        format!("No meals found with ingredient: {ingredient}"),
                    );
                } else {
                    let view = ListView::new(
                        ViewId(self.next_id()),
                        &meals,
                        self.config.meal_list_columns,
                        Some(self.config.list_size),
                    );
                    self.replace_tab_view(Tab::SearchByIngredient, Some(view));
                }
            }
            (CatalogQuery::ListCategories, CatalogReply::Categories(categories)) => {
                let view = ListView::new(
                    ViewId(self.next_id()),
                    &categories,
                    self.config.category_columns,
                    Some(self.config.category_size),
                );
                self.replace_tab_view(Tab::Categories, Some(view));
            }
            (CatalogQuery::FilterByCategory(category), CatalogReply::Summaries(meals)) => {
                self.open_meal_list(OverlayKind::CategoryMealList, &category, &meals);
            }
            (CatalogQuery::ListAreas, CatalogReply::Areas(areas)) => {
                let view = ListView::new(ViewId(self.next_id()), &areas, self.config.area_columns, None);
                self.replace_tab_view(Tab::Area, Some(view));
            }
            (CatalogQuery::FilterByArea(area), CatalogReply::Summaries(meals)) => {
                self.open_meal_list(OverlayKind::AreaMealList, &area, &meals);
            }
            (query, reply) => {
                tracing::error!(?query, ?reply, "Reply does not match query");
                let err = CatalogError::malformed(query.operation(), "reply does not match query");
                self.notices.push_back(Notice::error("Error", err.user_message()));
            }
        }
    }

    fn replace_tab_view(&mut self, tab: Tab, view: Option<ListView>) {
        // Thumbnail loads for the old contents are no longer wanted
        if let Some(token) = self.owner_tokens.remove(&Owner::Tab(tab)) {
            token.cancel();
        }
        if let Some(slot) = self.tabs.slot(tab) {
            *slot = view;
        }
    }

    fn open_detail(&mut self, meal: MealRecord) {
        let id = OverlayId(self.next_id());
        let view_id = ViewId(self.next_id());
        tracing::info!(overlay = id.0, meal = meal.name(), "Opening meal detail");

        self.overlays.push(Overlay {
            id,
            kind: OverlayKind::MealDetail,
            title: meal.name().to_string(),
            payload: OverlayPayload::Meal(MealDetail::new(view_id, meal, self.config.detail_size)),
        });
    }

    fn open_meal_list(&mut self, kind: OverlayKind, name: &str, meals: &[MealSummary]) {
        if meals.is_empty() {
            let scope = match kind {
                OverlayKind::AreaMealList => "area",
                _ => "category",
            };
            self.inform("No Results", format!("No meals found for {scope}: {name}"));
            return;
        }

        let id = OverlayId(self.next_id());
        let view = ListView::new(
            ViewId(self.next_id()),
            meals,
            self.config.meal_list_columns,
            Some(self.config.list_size),
        );
        tracing::info!(overlay = id.0, name, count = meals.len(), "Opening meal list");

        self.overlays.push(Overlay {
            id,
            kind,
            title: format!("{name} Meals"),
            payload: OverlayPayload::Meals(view),
        });
    }

    fn close_overlay(&mut self, id: OverlayId) {
        let Some(overlay) = self.overlays.close(id) else {
            tracing::debug!(overlay = id.0, "Overlay already closed");
            return;
        };

        let owner = Owner::Overlay(id);
        if let Some(token) = self.owner_tokens.remove(&owner) {
            token.cancel();
        }
        self.pending.retain(|_, p| p.owner != owner);

        tracing::info!(overlay = id.0, title = overlay.title(), "Overlay closed");
    }
}

impl Default for ViewStateController {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

fn token_for(tokens: &mut HashMap<Owner, CancelToken>, owner: Owner) -> CancelToken {
    tokens.entry(owner).or_default().clone()
}

fn collect_list_requests(view: &mut ListView, cancel: &CancelToken, out: &mut Vec<ThumbnailRequest>) {
    let Some(size) = view.thumbnail_size() else {
        return;
    };
    let view_id = view.id();

    out.extend(view.take_pending().into_iter().map(|(index, url)| ThumbnailRequest {
        target: ThumbnailTarget {
            view: view_id,
            index,
        },
        url,
        size,
        cancel: cancel.clone(),
    }));
}
