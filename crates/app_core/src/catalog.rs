//! Remote recipe catalog client
//!
//! Every operation performs exactly one GET against the catalog and either
//! returns a fully normalized result or a single [`CatalogError`]. A response
//! whose collection field is absent or `null` is an empty result, not an
//! error.

use crate::error::{CatalogError, CatalogOperation, TransportError};
use crate::model::{AreaRecord, CategoryRecord, MealRecord, MealSummary, RawRecord};
use crate::transport::HttpTransport;
use reqwest::Url;
use serde_json::Value;

/// Default public catalog endpoint
pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

const MEALS_KEY: &str = "meals";
const CATEGORIES_KEY: &str = "categories";

/// Read operations offered by the recipe catalog
pub trait Catalog: Send + Sync {
    fn search_by_name(&self, name: &str) -> Result<Vec<MealRecord>, CatalogError>;
    fn lookup_by_id(&self, id: &str) -> Result<Option<MealRecord>, CatalogError>;
    fn search_by_ingredient(&self, ingredient: &str) -> Result<Vec<MealSummary>, CatalogError>;
    fn list_categories(&self) -> Result<Vec<CategoryRecord>, CatalogError>;
    fn filter_by_category(&self, category: &str) -> Result<Vec<MealSummary>, CatalogError>;
    fn list_areas(&self) -> Result<Vec<AreaRecord>, CatalogError>;
    fn filter_by_area(&self, area: &str) -> Result<Vec<MealSummary>, CatalogError>;
    fn random_meal(&self) -> Result<Option<MealRecord>, CatalogError>;
}

/// HTTP catalog client
pub struct CatalogClient<T> {
    transport: T,
    base_url: String,
}

impl<T: HttpTransport> CatalogClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { transport, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, TransportError> {
        let raw = format!("{}/{}", self.base_url, endpoint);
        let parsed = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        };
        parsed.map_err(|e| TransportError::InvalidUrl(format!("{raw}: {e}")))
    }

    /// Issue one request and return the records under `key`
    fn fetch(
        &self,
        operation: CatalogOperation,
        endpoint: &str,
        params: &[(&str, &str)],
        key: &str,
    ) -> Result<Vec<RawRecord>, CatalogError> {
        let url = self
            .url(endpoint, params)
            .map_err(|e| CatalogError::network(operation, e))?;

        tracing::debug!(%operation, %url, "Catalog request");

        let body = self.transport.get(url.as_str()).map_err(|e| {
            tracing::warn!(%operation, error = %e, "Catalog request failed");
            CatalogError::network(operation, e)
        })?;

        let records = parse_collection(&body, key).map_err(|detail| {
            tracing::warn!(%operation, %detail, "Malformed catalog response");
            CatalogError::malformed(operation, detail)
        })?;

        tracing::debug!(%operation, count = records.len(), "Catalog response");
        Ok(records)
    }

    fn meals(
        &self,
        operation: CatalogOperation,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<MealRecord>, CatalogError> {
        let records = self.fetch(operation, endpoint, params, MEALS_KEY)?;
        Ok(records.iter().filter_map(MealRecord::from_raw).collect())
    }

    fn summaries(
        &self,
        operation: CatalogOperation,
        params: &[(&str, &str)],
    ) -> Result<Vec<MealSummary>, CatalogError> {
        let records = self.fetch(operation, "filter.php", params, MEALS_KEY)?;
        Ok(records.iter().filter_map(MealSummary::from_raw).collect())
    }
}

impl<T: HttpTransport> Catalog for CatalogClient<T> {
    fn search_by_name(&self, name: &str) -> Result<Vec<MealRecord>, CatalogError> {
        self.meals(CatalogOperation::SearchByName, "search.php", &[("s", name)])
    }

    fn lookup_by_id(&self, id: &str) -> Result<Option<MealRecord>, CatalogError> {
        let meals = self.meals(CatalogOperation::LookupById, "lookup.php", &[("i", id)])?;
        Ok(meals.into_iter().next())
    }

    fn search_by_ingredient(&self, ingredient: &str) -> Result<Vec<MealSummary>, CatalogError> {
        self.summaries(CatalogOperation::SearchByIngredient, &[("i", ingredient)])
    }

    fn list_categories(&self) -> Result<Vec<CategoryRecord>, CatalogError> {
        let records = self.fetch(
            CatalogOperation::ListCategories,
            "categories.php",
            &[],
            CATEGORIES_KEY,
        )?;
        Ok(records.iter().filter_map(CategoryRecord::from_raw).collect())
    }

    fn filter_by_category(&self, category: &str) -> Result<Vec<MealSummary>, CatalogError> {
        self.summaries(CatalogOperation::FilterByCategory, &[("c", category)])
    }

    fn list_areas(&self) -> Result<Vec<AreaRecord>, CatalogError> {
        let records = self.fetch(
            CatalogOperation::ListAreas,
            "list.php",
            &[("a", "list")],
            MEALS_KEY,
        )?;
        Ok(records.iter().filter_map(AreaRecord::from_raw).collect())
    }

    fn filter_by_area(&self, area: &str) -> Result<Vec<MealSummary>, CatalogError> {
        self.summaries(CatalogOperation::FilterByArea, &[("a", area)])
    }

    fn random_meal(&self) -> Result<Option<MealRecord>, CatalogError> {
        let meals = self.meals(CatalogOperation::RandomMeal, "random.php", &[])?;
        Ok(meals.into_iter().next())
    }
}

/// Decode a catalog envelope and take the records under `key`.
///
/// Absent or `null` collections yield an empty list. Array entries that are
/// not objects are skipped.
pub fn parse_collection(body: &[u8], key: &str) -> Result<Vec<RawRecord>, String> {
    let value: Value = serde_json::from_slice(body).map_err(|e| e.to_string())?;

    let Value::Object(mut envelope) = value else {
        return Err(format!("expected a JSON object, got {}", json_kind(&value)));
    };

    match envelope.remove(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(record) => Some(record),
                _ => None,
            })
            .collect()),
        Some(other) => Err(format!(
            "`{key}` should be an array or null, got {}",
            json_kind(&other)
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A catalog call reified as data, so it can cross the worker boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogQuery {
    SearchByName(String),
    LookupById(String),
    SearchByIngredient(String),
    ListCategories,
    FilterByCategory(String),
    ListAreas,
    FilterByArea(String),
    RandomMeal,
}

/// Normalized result of a [`CatalogQuery`]
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogReply {
    Meals(Vec<MealRecord>),
    Meal(Option<MealRecord>),
    Summaries(Vec<MealSummary>),
    Categories(Vec<CategoryRecord>),
    Areas(Vec<AreaRecord>),
}

impl CatalogQuery {
    pub fn operation(&self) -> CatalogOperation {
        match self {
            CatalogQuery::SearchByName(_) => CatalogOperation::SearchByName,
            CatalogQuery::LookupById(_) => CatalogOperation::LookupById,
            CatalogQuery::SearchByIngredient(_) => CatalogOperation::SearchByIngredient,
            CatalogQuery::ListCategories => CatalogOperation::ListCategories,
            CatalogQuery::FilterByCategory(_) => CatalogOperation::FilterByCategory,
            CatalogQuery::ListAreas => CatalogOperation::ListAreas,
            CatalogQuery::FilterByArea(_) => CatalogOperation::FilterByArea,
            CatalogQuery::RandomMeal => CatalogOperation::RandomMeal,
        }
    }

    /// Execute against a catalog
    pub fn run<C: Catalog + ?Sized>(&self, catalog: &C) -> Result<CatalogReply, CatalogError> {
        Ok(match self {
            CatalogQuery::SearchByName(name) => CatalogReply::Meals(catalog.search_by_name(name)?),
            CatalogQuery::LookupById(id) => CatalogReply::Meal(catalog.lookup_by_id(id)?),
            CatalogQuery::SearchByIngredient(ingredient) => {
                CatalogReply::Summaries(catalog.search_by_ingredient(ingredient)?)
            }
            CatalogQuery::ListCategories => CatalogReply::Categories(catalog.list_categories()?),
            CatalogQuery::FilterByCategory(category) => {
                CatalogReply::Summaries(catalog.filter_by_category(category)?)
            }
            CatalogQuery::ListAreas => CatalogReply::Areas(catalog.list_areas()?),
            CatalogQuery::FilterByArea(area) => {
                CatalogReply::Summaries(catalog.filter_by_area(area)?)
            }
            CatalogQuery::RandomMeal => CatalogReply::Meal(catalog.random_meal()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogErrorKind;
    use crate::transport::fake::FakeTransport;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    const BASE: &str = "https://catalog.test/api";

    fn client() -> (Arc<FakeTransport>, CatalogClient<Arc<FakeTransport>>) {
        let transport = Arc::new(FakeTransport::new());
        let client = CatalogClient::new(transport.clone(), format!("{BASE}/"));
        (transport, client)
    }

    const ARRABIATA: &str = r#"{"meals":[{
        "idMeal":"52771","strMeal":"Spicy Arrabiata Penne","strCategory":"Vegetarian",
        "strArea":"Italian","strInstructions":"Bring a large pot of water to a boil.",
        "strMealThumb":"https://img.test/arrabiata.jpg","strTags":"Pasta,Curry",
        "strIngredient1":"penne rigate","strMeasure1":"1 pound",
        "strIngredient2":"olive oil","strMeasure2":"1/4 cup",
        "strIngredient3":"","strMeasure3":"",
        "strIngredient4":null,"strMeasure4":null
    }]}"#;

    #[test]
    fn test_search_by_name_normalizes_meals() {
        let (transport, client) = client();
        transport.respond(&format!("{BASE}/search.php?s=Arrabiata"), ARRABIATA);

        let meals = client.search_by_name("Arrabiata").unwrap();
        assert_eq!(meals.len(), 1);
        let meal = &meals[0];
        assert_eq!(meal.id(), "52771");
        assert_eq!(meal.area(), Some("Italian"));
        assert_eq!(meal.ingredients().len(), 2);
        assert_eq!(meal.ingredients()[1].measure, "1/4 cup");
        assert_eq!(transport.requests(), vec![format!("{BASE}/search.php?s=Arrabiata")]);
    }

    #[test]
    fn test_null_and_absent_collections_are_empty() {
        let (transport, client) = client();
        transport.respond(&format!("{BASE}/search.php?s=zzz"), r#"{"meals":null}"#);
        transport.respond(&format!("{BASE}/lookup.php?i=0"), r#"{}"#);
        transport.respond(&format!("{BASE}/filter.php?i=zzz"), r#"{"meals":null}"#);
        transport.respond(&format!("{BASE}/categories.php"), r#"{"categories":null}"#);
        transport.respond(&format!("{BASE}/filter.php?c=zzz"), r#"{}"#);
        transport.respond(&format!("{BASE}/list.php?a=list"), r#"{"meals":null}"#);
        transport.respond(&format!("{BASE}/filter.php?a=zzz"), r#"{"meals":null}"#);
        transport.respond(&format!("{BASE}/random.php"), r#"{"meals":null}"#);

        assert!(client.search_by_name("zzz").unwrap().is_empty());
        assert!(client.lookup_by_id("0").unwrap().is_none());
        assert!(client.search_by_ingredient("zzz").unwrap().is_empty());
        assert!(client.list_categories().unwrap().is_empty());
        assert!(client.filter_by_category("zzz").unwrap().is_empty());
        assert!(client.list_areas().unwrap().is_empty());
        assert!(client.filter_by_area("zzz").unwrap().is_empty());
        assert!(client.random_meal().unwrap().is_none());
        assert_eq!(transport.requests().len(), 8);
    }

    #[test]
    fn test_query_values_are_encoded() {
        let (transport, client) = client();
        transport.respond(
            &format!("{BASE}/filter.php?i=chicken+breast"),
            r#"{"meals":[{"idMeal":"1","strMeal":"Chicken Fajita","strMealThumb":"t.jpg"}]}"#,
        );

        let meals = client.search_by_ingredient("chicken breast").unwrap();
        assert_eq!(meals, vec![MealSummary::new("1", "Chicken Fajita", "t.jpg")]);
    }

    #[test]
    fn test_categories_and_areas() {
        let (transport, client) = client();
        transport.respond(
            &format!("{BASE}/categories.php"),
            r#"{"categories":[
                {"idCategory":"1","strCategory":"Beef","strCategoryThumb":"beef.png"},
                {"idCategory":"2","strCategory":"","strCategoryThumb":"blank.png"},
                {"idCategory":"3","strCategory":"Seafood"}
            ]}"#,
        );
        transport.respond(
            &format!("{BASE}/list.php?a=list"),
            r#"{"meals":[{"strArea":"American"},{"strArea":"British"},{"strArea":null}]}"#,
        );

        let categories = client.list_categories().unwrap();
        assert_eq!(
            categories,
            vec![CategoryRecord::new("Beef", "beef.png"), CategoryRecord::new("Seafood", "")]
        );

        let areas = client.list_areas().unwrap();
        assert_eq!(areas, vec![AreaRecord::new("American"), AreaRecord::new("British")]);
    }

    #[test]
    fn test_transport_failure_names_operation() {
        let (transport, client) = client();
        transport.fail(
            &format!("{BASE}/random.php"),
            TransportError::Request("timed out".into()),
        );

        let err = client.random_meal().unwrap_err();
        assert_eq!(err.operation, CatalogOperation::RandomMeal);
        assert!(err.is_network());
    }

    #[test]
    fn test_status_failure_is_network_error() {
        let (transport, client) = client();
        transport.fail(&format!("{BASE}/filter.php?c=Beef"), TransportError::Status(500));

        let err = client.filter_by_category("Beef").unwrap_err();
        assert_eq!(
            err.kind,
            CatalogErrorKind::Network(TransportError::Status(500))
        );
    }

    #[test]
    fn test_malformed_bodies() {
        let (transport, client) = client();
        transport.respond(&format!("{BASE}/search.php?s=a"), "<html>oops</html>");
        transport.respond(&format!("{BASE}/search.php?s=b"), r#"["meals"]"#);
        transport.respond(&format!("{BASE}/search.php?s=c"), r#"{"meals":"Invalid"}"#);

        for name in ["a", "b", "c"] {
            let err = client.search_by_name(name).unwrap_err();
            assert_eq!(err.operation, CatalogOperation::SearchByName);
            assert!(matches!(err.kind, CatalogErrorKind::MalformedResponse(_)));
        }
    }

    #[test]
    fn test_lookup_takes_first_record() {
        let (transport, client) = client();
        transport.respond(
            &format!("{BASE}/lookup.php?i=52772"),
            r#"{"meals":[{"idMeal":"52772","strMeal":"Teriyaki Chicken Casserole"}]}"#,
        );

        let meal = client.lookup_by_id("52772").unwrap().unwrap();
        assert_eq!(meal.name(), "Teriyaki Chicken Casserole");
        assert_eq!(meal.thumbnail_url(), "");
    }

    #[test]
    fn test_query_run_dispatches() {
        let (transport, client) = client();
        transport.respond(
            &format!("{BASE}/filter.php?a=Canadian"),
            r#"{"meals":[{"idMeal":"9","strMeal":"Poutine","strMealThumb":"p.jpg"}]}"#,
        );

        let query = CatalogQuery::FilterByArea("Canadian".into());
        assert_eq!(query.operation(), CatalogOperation::FilterByArea);
        assert_eq!(
            query.run(&client).unwrap(),
            CatalogReply::Summaries(vec![MealSummary::new("9", "Poutine", "p.jpg")])
        );
    }

    #[test]
    fn test_parse_collection_skips_non_objects() {
        let records = parse_collection(br#"{"meals":[1,{"idMeal":"1"},"x"]}"#, "meals").unwrap();
        assert_eq!(records.len(), 1);
    }
}
