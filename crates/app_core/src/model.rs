//! Catalog record model
//!
//! Records are built once from a decoded JSON object and never mutated.
//! Field extraction is defensive: absent, `null` and non-string values all
//! read as blank.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of indexed ingredient slots in a meal record
pub const INGREDIENT_SLOTS: usize = 20;

/// JSON object as returned by the catalog
pub type RawRecord = Map<String, Value>;

/// One ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub measure: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, measure: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            measure: measure.into(),
        }
    }

    /// "measure name", or just the name when no measure is given
    pub fn display_line(&self) -> String {
        if self.measure.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.measure, self.name)
        }
    }
}

/// Full recipe detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealRecord {
    id: String,
    name: String,
    thumbnail_url: String,
    category: Option<String>,
    area: Option<String>,
    instructions: Option<String>,
    ingredients: Vec<Ingredient>,
    tags: Vec<String>,
    youtube_url: Option<String>,
    source_url: Option<String>,
}

impl MealRecord {
    /// Build from a raw catalog object. Returns `None` when the record has no
    /// usable id or name.
    pub fn from_raw(raw: &RawRecord) -> Option<Self> {
        let id = text_field(raw, "idMeal")?;
        let name = text_field(raw, "strMeal")?;

        Some(Self {
            id,
            name,
            thumbnail_url: text_field(raw, "strMealThumb").unwrap_or_default(),
            category: text_field(raw, "strCategory"),
            area: text_field(raw, "strArea"),
            instructions: text_field(raw, "strInstructions"),
            ingredients: extract_ingredients(raw),
            tags: text_field(raw, "strTags")
                .map(|tags| split_tags(&tags))
                .unwrap_or_default(),
            youtube_url: text_field(raw, "strYoutube"),
            source_url: text_field(raw, "strSource"),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn thumbnail_url(&self) -> &str {
        &self.thumbnail_url
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn area(&self) -> Option<&str> {
        self.area.as_deref()
    }

    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn youtube_url(&self) -> Option<&str> {
        self.youtube_url.as_deref()
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    /// Category for display, "Unknown" when absent
    pub fn category_label(&self) -> &str {
        self.category().unwrap_or(UNKNOWN)
    }

    /// Area for display, "Unknown" when absent
    pub fn area_label(&self) -> &str {
        self.area().unwrap_or(UNKNOWN)
    }

    pub fn summary(&self) -> MealSummary {
        MealSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
        }
    }
}

const UNKNOWN: &str = "Unknown";

/// Partial recipe used in list views
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MealSummary {
    id: String,
    name: String,
    thumbnail_url: String,
}

impl MealSummary {
    pub fn new(id: impl Into<String>, name: impl Into<String>, thumbnail_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            thumbnail_url: thumbnail_url.into(),
        }
    }

    pub fn from_raw(raw: &RawRecord) -> Option<Self> {
        Some(Self {
            id: text_field(raw, "idMeal")?,
            name: text_field(raw, "strMeal")?,
            thumbnail_url: text_field(raw, "strMealThumb").unwrap_or_default(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn thumbnail_url(&self) -> &str {
        &self.thumbnail_url
    }
}

/// Meal category with its artwork
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    name: String,
    thumbnail_url: String,
    description: Option<String>,
}

impl CategoryRecord {
    pub fn new(name: impl Into<String>, thumbnail_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            thumbnail_url: thumbnail_url.into(),
            description: None,
        }
    }

    pub fn from_raw(raw: &RawRecord) -> Option<Self> {
        Some(Self {
            name: text_field(raw, "strCategory")?,
            thumbnail_url: text_field(raw, "strCategoryThumb").unwrap_or_default(),
            description: text_field(raw, "strCategoryDescription"),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn thumbnail_url(&self) -> &str {
        &self.thumbnail_url
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Regional cuisine
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AreaRecord {
    name: String,
}

impl AreaRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn from_raw(raw: &RawRecord) -> Option<Self> {
        text_field(raw, "strArea").map(|name| Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Read a string field, trimmed. Blank, absent, null and non-string values
/// all yield `None`.
pub fn text_field(raw: &RawRecord, key: &str) -> Option<String> {
    match raw.get(key) {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        _ => None,
    }
}

/// Scan the indexed ingredient slots in order. A slot counts only when its
/// name is non-blank; a blank or missing measure becomes "".
pub fn extract_ingredients(raw: &RawRecord) -> Vec<Ingredient> {
    (1..=INGREDIENT_SLOTS)
        .filter_map(|slot| {
            let name = text_field(raw, &format!("strIngredient{slot}"))?;
            let measure = text_field(raw, &format!("strMeasure{slot}")).unwrap_or_default();
            Some(Ingredient { name, measure })
        })
        .collect()
}

fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn raw(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_single_ingredient_slot() {
        let record = raw(json!({
            "strIngredient1": "",
            "strIngredient2": null,
            "strIngredient3": "Salt",
            "strMeasure3": "1 tsp",
            "strIngredient4": "   ",
            "strMeasure4": "2 cups",
        }));

        assert_eq!(extract_ingredients(&record), vec![Ingredient::new("Salt", "1 tsp")]);
    }

    #[test]
    fn test_ingredients_keep_slot_order() {
        let record = raw(json!({
            "strIngredient5": "Pepper",
            "strMeasure5": "pinch",
            "strIngredient1": "Rice",
            "strMeasure1": "200g",
        }));

        assert_eq!(
            extract_ingredients(&record),
            vec![Ingredient::new("Rice", "200g"), Ingredient::new("Pepper", "pinch")]
        );
    }

    #[test]
    fn test_duplicate_ingredients_are_kept() {
        let record = raw(json!({
            "strIngredient1": "Butter",
            "strMeasure1": "1 tbs",
            "strIngredient2": "Butter",
            "strMeasure2": null,
        }));

        let ingredients = extract_ingredients(&record);
        assert_eq!(ingredients.len(), 2);
        assert_eq!(ingredients[1], Ingredient::new("Butter", ""));
    }

    #[test]
    fn test_slots_beyond_twenty_ignored() {
        let mut record = RawRecord::new();
        for slot in 1..=25 {
            record.insert(format!("strIngredient{slot}"), json!(format!("item{slot}")));
        }
        assert_eq!(extract_ingredients(&record).len(), INGREDIENT_SLOTS);
    }

    #[test]
    fn test_meal_without_category_or_area() {
        let record = raw(json!({
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strMealThumb": "https://example.test/teriyaki.jpg",
            "strCategory": null,
        }));

        let meal = MealRecord::from_raw(&record).unwrap();
        assert_eq!(meal.category(), None);
        assert_eq!(meal.area(), None);
        assert_eq!(meal.category_label(), "Unknown");
        assert_eq!(meal.area_label(), "Unknown");
        assert!(meal.ingredients().is_empty());
        assert_eq!(meal.instructions(), None);
    }

    #[test]
    fn test_meal_requires_id_and_name() {
        assert!(MealRecord::from_raw(&raw(json!({ "strMeal": "Nameless" }))).is_none());
        assert!(MealSummary::from_raw(&raw(json!({ "idMeal": "1", "strMeal": " " }))).is_none());
    }

    #[test]
    fn test_non_string_fields_read_as_blank() {
        let record = raw(json!({
            "idMeal": "1",
            "strMeal": "Soup",
            "strArea": 42,
            "strIngredient1": ["Water"],
        }));

        let meal = MealRecord::from_raw(&record).unwrap();
        assert_eq!(meal.area(), None);
        assert!(meal.ingredients().is_empty());
    }

    #[test]
    fn test_tags_split_and_trimmed() {
        let record = raw(json!({
            "idMeal": "1",
            "strMeal": "Soup",
            "strTags": "Soup, Warming,,Winter ",
        }));

        let meal = MealRecord::from_raw(&record).unwrap();
        assert_eq!(meal.tags().to_vec(), vec!["Soup", "Warming", "Winter"]);
    }

    #[test]
    fn test_summary_narrowing() {
        let record = raw(json!({
            "idMeal": "7",
            "strMeal": "Kedgeree",
            "strMealThumb": "https://example.test/k.jpg",
            "strCategory": "Seafood",
        }));

        let meal = MealRecord::from_raw(&record).unwrap();
        assert_eq!(
            meal.summary(),
            MealSummary::new("7", "Kedgeree", "https://example.test/k.jpg")
        );
    }

    #[test]
    fn test_ingredient_display_line() {
        assert_eq!(Ingredient::new("Salt", "1 tsp").display_line(), "1 tsp Salt");
        assert_eq!(Ingredient::new("Salt", "").display_line(), "Salt");
    }
}
