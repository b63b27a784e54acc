use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

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
}

/// A recipe reshaped into a uniform ingredient-list representation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub drink_alternate: Option<String>,
    pub category: String,
    pub area: String,
    pub instructions: String,
    pub image_url: String,
    /// Comma-separated tags as delivered by the source
    pub tags: Option<String>,
    pub video_url: String,
    pub source_url: Option<String>,
    pub image_source: Option<String>,
    pub creative_commons_confirmed: Option<String>,
    pub date_modified: Option<String>,
    pub ingredients: Vec<Ingredient>,
}

impl Recipe {
    /// Split `tags` into individual tags, dropping blanks
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A meal record exactly as TheMealDB returns it.
///
/// Every scalar is optional so malformed records still deserialize. The
/// numbered `strIngredientN`/`strMeasureN` pairs land in `fields`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMeal {
    #[serde(rename = "idMeal", default)]
    pub id: Option<String>,
    #[serde(rename = "strMeal", default)]
    pub title: Option<String>,
    #[serde(rename = "strDrinkAlternate", default)]
    pub drink_alternate: Option<String>,
    #[serde(rename = "strCategory", default)]
    pub category: Option<String>,
    #[serde(rename = "strArea", default)]
    pub area: Option<String>,
    #[serde(rename = "strInstructions", default)]
    pub instructions: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    pub image_url: Option<String>,
    #[serde(rename = "strTags", default)]
    pub tags: Option<String>,
    #[serde(rename = "strYoutube", default)]
    pub video_url: Option<String>,
    #[serde(rename = "strSource", default)]
    pub source_url: Option<String>,
    #[serde(rename = "strImageSource", default)]
    pub image_source: Option<String>,
    #[serde(rename = "strCreativeCommonsConfirmed", default)]
    pub creative_commons_confirmed: Option<String>,
    #[serde(rename = "dateModified", default)]
    pub date_modified: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawMeal {
    /// String value of a non-scalar field, `None` when absent, null or not a string
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MealsResponse {
    #[serde(default)]
    pub meals: Option<Vec<RawMeal>>,
}

/// A recipe category descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(alias = "idCategory", default)]
    pub id: String,
    #[serde(alias = "strCategory", default)]
    pub name: String,
    #[serde(alias = "strCategoryThumb", default)]
    pub thumbnail_url: String,
    #[serde(alias = "strCategoryDescription", default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoriesResponse {
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_meal_captures_numbered_fields() {
        let meal: RawMeal = serde_json::from_str(
            r#"{
                "idMeal": "52772",
                "strMeal": "Teriyaki Chicken Casserole",
                "strIngredient1": "soy sauce",
                "strMeasure1": "3/4 cup",
                "strIngredient2": null
            }"#,
        )
        .unwrap();

        assert_eq!(meal.id.as_deref(), Some("52772"));
        assert_eq!(meal.title.as_deref(), Some("Teriyaki Chicken Casserole"));
        assert_eq!(meal.field("strIngredient1"), Some("soy sauce"));
        assert_eq!(meal.field("strMeasure1"), Some("3/4 cup"));
        assert_eq!(meal.field("strIngredient2"), None);
        assert_eq!(meal.field("strIngredient3"), None);
    }

    #[test]
    fn test_raw_meal_tolerates_missing_scalars() {
        let meal: RawMeal = serde_json::from_str("{}").unwrap();
        assert!(meal.id.is_none());
        assert!(meal.category.is_none());
    }

    #[test]
    fn test_meals_response_null() {
        let response: MealsResponse = serde_json::from_str(r#"{"meals": null}"#).unwrap();
        assert!(response.meals.is_none());
    }

    #[test]
    fn test_category_from_wire_names() {
        let category: Category = serde_json::from_str(
            r#"{
                "idCategory": "1",
                "strCategory": "Beef",
                "strCategoryThumb": "https://www.themealdb.com/images/category/beef.png",
                "strCategoryDescription": "Beef is the culinary name for meat from cattle."
            }"#,
        )
        .unwrap();

        assert_eq!(category.id, "1");
        assert_eq!(category.name, "Beef");
        assert!(category.description.starts_with("Beef is"));
    }

    #[test]
    fn test_tag_list() {
        let recipe = Recipe {
            tags: Some("Meat, Casserole,,".to_string()),
            ..Default::default()
        };
        assert_eq!(recipe.tag_list(), vec!["Meat", "Casserole"]);
        assert!(Recipe::default().tag_list().is_empty());
    }
}
