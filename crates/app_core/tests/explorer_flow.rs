//! End-to-end browsing flows against a scripted catalog

use app_core::{
    Action, CatalogClient, HttpTransport, NoticeLevel, OverlayKind, OverlayPayload, Owner, Screen,
    Tab, ThumbnailLoader, ThumbnailSlot, TransportError, ViewConfig, ViewStateController,
};
use image::{ImageFormat, Rgba, RgbaImage};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

const BASE: &str = "https://catalog.test/api/json/v1/1";

#[derive(Default)]
struct ScriptedTransport {
    responses: Mutex<HashMap<String, Result<Vec<u8>, TransportError>>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn respond(&self, path: &str, body: impl Into<Vec<u8>>) {
        self.responses.lock().insert(url(path), Ok(body.into()));
    }

    fn fail(&self, path: &str, error: TransportError) {
        self.responses.lock().insert(url(path), Err(error));
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl HttpTransport for ScriptedTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.requests.lock().push(url.to_string());
        self.responses
            .lock()
            .get(url)
            .cloned()
            .unwrap_or(Err(TransportError::Status(404)))
    }
}

fn url(path: &str) -> String {
    if path.starts_with("https://") {
        path.to_string()
    } else {
        format!("{BASE}/{path}")
    }
}

fn png(edge: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(edge, edge, Rgba([30, 60, 114, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

struct Harness {
    transport: Arc<ScriptedTransport>,
    catalog: CatalogClient<Arc<ScriptedTransport>>,
    loader: ThumbnailLoader<Arc<ScriptedTransport>>,
    controller: ViewStateController,
}

impl Harness {
    fn new() -> Self {
        let transport = Arc::new(ScriptedTransport::default());
        Self {
            catalog: CatalogClient::new(transport.clone(), BASE),
            loader: ThumbnailLoader::new(transport.clone()),
            transport,
            controller: ViewStateController::new(ViewConfig::default()),
        }
    }

    fn exploring() -> Self {
        let mut harness = Self::new();
        harness.controller.handle(Action::Start);
        harness
    }

    fn dispatch(&mut self, action: Action) {
        self.controller.dispatch_blocking(action, &self.catalog);
    }
}

const SEAFOOD: &str = r#"{"meals":[
    {"strMeal":"Baked salmon with fennel & tomatoes","strMealThumb":"https://img.test/salmon.png","idMeal":"52959"},
    {"strMeal":"Cajun spiced fish tacos","strMealThumb":"https://img.test/tacos.png","idMeal":"52819"}
]}"#;

const SALMON: &str = r#"{"meals":[{
    "idMeal":"52959","strMeal":"Baked salmon with fennel & tomatoes","strCategory":"Seafood",
    "strArea":"British","strInstructions":"Heat oven to 180C/fan 160C/gas 4.",
    "strMealThumb":"https://img.test/salmon.png","strTags":"Paleo,Keto",
    "strIngredient1":"Fennel","strMeasure1":"2 medium",
    "strIngredient2":"Parsley","strMeasure2":"2 tbs chopped",
    "strIngredient3":"","strMeasure3":" "
}]}"#;

#[test]
fn category_list_then_meal_detail() {
    let mut h = Harness::exploring();
    h.transport.respond("filter.php?c=Seafood", SEAFOOD);
    h.transport.respond("lookup.php?i=52959", SALMON);

    h.controller.handle(Action::SelectTab(Tab::Categories));
    h.dispatch(Action::ViewCategoryMeals("Seafood".into()));

    let list = h.controller.overlays().top().unwrap();
    assert_eq!(list.kind(), OverlayKind::CategoryMealList);
    assert_eq!(list.title(), "Seafood Meals");
    let meals = list.meals().unwrap();
    let labels: Vec<_> = meals.cells().iter().map(|c| c.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["Baked salmon with fennel & tomatoes", "Cajun spiced fish tacos"]
    );

    let origin = Owner::Overlay(list.id());
    let trigger = meals.cells()[0].trigger.clone().unwrap();
    h.dispatch(trigger.into_action(origin));

    assert_eq!(h.controller.overlays().len(), 2);
    let detail = h.controller.overlays().top().unwrap();
    assert_eq!(detail.kind(), OverlayKind::MealDetail);
    let meal = detail.meal().unwrap();
    assert_eq!(meal.category_label(), "Seafood");
    assert_eq!(meal.area_label(), "British");
    let lines: Vec<_> = meal.ingredients().iter().map(|i| i.display_line()).collect();
    assert_eq!(lines, vec!["2 medium Fennel", "2 tbs chopped Parsley"]);

    // The explorer underneath is untouched
    assert_eq!(
        h.controller.screen(),
        Screen::Explorer {
            active_tab: Tab::Categories
        }
    );
}

#[test]
fn random_meal_with_no_result() {
    let mut h = Harness::exploring();
    h.transport.respond("random.php", r#"{"meals":null}"#);

    h.controller.handle(Action::SelectTab(Tab::Random));
    h.dispatch(Action::FetchRandom);

    assert!(h.controller.overlays().is_empty());
    let notice = h.controller.current_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Info);
    assert_eq!(notice.title, "No Result");
}

#[test]
fn blank_ingredient_is_rejected_locally() {
    let mut h = Harness::exploring();
    h.dispatch(Action::SubmitIngredientSearch("   ".into()));

    assert!(h.transport.requests().is_empty());
    let notice = h.controller.current_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert_eq!(notice.title, "Input Required");
    assert_eq!(notice.message, "Please enter an ingredient.");
}

#[test]
fn welcome_screen_gates_everything() {
    let mut h = Harness::new();
    h.dispatch(Action::LoadAreas);
    h.dispatch(Action::SubmitNameSearch("Arrabiata".into()));

    assert_eq!(h.controller.screen(), Screen::Welcome);
    assert!(h.transport.requests().is_empty());
}

#[test]
fn category_grid_and_thumbnails() {
    let mut h = Harness::exploring();
    let categories: Vec<String> = (0..14)
        .map(|i| {
            format!(
                r#"{{"idCategory":"{i}","strCategory":"Cat {i}","strCategoryThumb":"https://img.test/c{i}.png","strCategoryDescription":"Category {i}"}}"#
            )
        })
        .collect();
    h.transport
        .respond("categories.php", format!(r#"{{"categories":[{}]}}"#, categories.join(",")));
    for i in 0..14 {
        if i == 7 {
            h.transport.respond(&format!("https://img.test/c{i}.png"), b"<html>".to_vec());
        } else {
            h.transport.respond(&format!("https://img.test/c{i}.png"), png(64));
        }
    }

    h.dispatch(Action::FetchCategories);
    let view = h.controller.categories().unwrap();
    assert_eq!(view.placement().columns(), 6);
    assert_eq!(view.placement().row_count(), 3);
    assert_eq!(view.cells()[13].cell.row, 2);
    assert_eq!(view.cells()[13].cell.column, 1);

    h.controller.load_thumbnails_blocking(&h.loader);
    let view = h.controller.categories().unwrap();
    for cell in view.cells() {
        if cell.index == 7 {
            assert_eq!(cell.thumbnail, ThumbnailSlot::Missing);
        } else {
            let thumb = cell.thumbnail.thumbnail().unwrap();
            assert_eq!((thumb.width, thumb.height), (100, 100));
        }
    }
}

#[test]
fn areas_select_opens_list_overlay() {
    let mut h = Harness::exploring();
    h.transport.respond(
        "list.php?a=list",
        r#"{"meals":[{"strArea":"Canadian"},{"strArea":"Thai"},{"strArea":" "}]}"#,
    );
    h.transport.respond(
        "filter.php?a=Thai",
        r#"{"meals":[{"strMeal":"Pad Thai","strMealThumb":"https://img.test/pad.png","idMeal":"53065"}]}"#,
    );

    h.dispatch(Action::LoadAreas);
    let areas = h.controller.areas().unwrap();
    assert_eq!(areas.len(), 2);
    assert_eq!(areas.placement().columns(), 4);

    let trigger = areas.cells()[1].trigger.clone().unwrap();
    h.dispatch(trigger.into_action(Owner::Tab(Tab::Area)));

    let overlay = h.controller.overlays().top().unwrap();
    assert_eq!(overlay.kind(), OverlayKind::AreaMealList);
    assert_eq!(overlay.title(), "Thai Meals");
}

#[test]
fn network_failure_leaves_state_alone() {
    let mut h = Harness::exploring();
    h.transport
        .fail("search.php?s=Arrabiata", TransportError::Request("connection reset".into()));

    h.dispatch(Action::SubmitNameSearch("Arrabiata".into()));

    assert!(h.controller.overlays().is_empty());
    let notice = h.controller.current_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.message.contains("search by name"));
    assert!(!h.controller.is_busy(Owner::Tab(Tab::SearchByName)));
}

#[test]
fn detail_image_loads_at_detail_size() {
    let mut h = Harness::exploring();
    h.transport.respond("lookup.php?i=52959", SALMON);
    h.transport.respond("https://img.test/salmon.png", png(512));

    h.dispatch(Action::OpenMeal {
        id: "52959".into(),
        origin: Owner::Tab(Tab::SearchByIngredient),
    });
    h.controller.load_thumbnails_blocking(&h.loader);

    match h.controller.overlays().top().unwrap().payload() {
        OverlayPayload::Meal(detail) => {
            let image = detail.image().thumbnail().unwrap();
            assert_eq!((image.width, image.height), (300, 300));
        }
        other => panic!("expected meal detail, got {other:?}"),
    }
}

#[test]
fn unknown_meal_and_empty_categories_are_not_errors() {
    let mut h = Harness::exploring();
    h.transport.respond("lookup.php?i=1", r#"{"meals":null}"#);
    h.transport.respond("categories.php", r#"{"categories":null}"#);

    h.dispatch(Action::OpenMeal {
        id: "1".into(),
        origin: Owner::Tab(Tab::SearchByIngredient),
    });
    assert!(h.controller.overlays().is_empty());
    let notice = h.controller.current_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Info);
    assert_eq!(notice.title, "No meal found");

    h.controller.handle(Action::AcknowledgeNotice);
    h.controller.handle(Action::SelectTab(Tab::Categories));
    h.dispatch(Action::FetchCategories);

    // An empty view is kept so the tab can say there is nothing to show
    let view = h.controller.categories().unwrap();
    assert!(view.is_empty());
    assert!(h.controller.current_notice().is_none());
}
