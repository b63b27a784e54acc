use crate::model::{Ingredient, RawMeal, Recipe};

/// Field names of the numbered ingredient/measure pairs, in source order
const INGREDIENT_FIELDS: [(&str, &str); 20] = [
    ("strIngredient1", "strMeasure1"),
    ("strIngredient2", "strMeasure2"),
    ("strIngredient3", "strMeasure3"),
    ("strIngredient4", "strMeasure4"),
    ("strIngredient5", "strMeasure5"),
    ("strIngredient6", "strMeasure6"),
    ("strIngredient7", "strMeasure7"),
    ("strIngredient8", "strMeasure8"),
    ("strIngredient9", "strMeasure9"),
    ("strIngredient10", "strMeasure10"),
    ("strIngredient11", "strMeasure11"),
    ("strIngredient12", "strMeasure12"),
    ("strIngredient13", "strMeasure13"),
    ("strIngredient14", "strMeasure14"),
    ("strIngredient15", "strMeasure15"),
    ("strIngredient16", "strMeasure16"),
    ("strIngredient17", "strMeasure17"),
    ("strIngredient18", "strMeasure18"),
    ("strIngredient19", "strMeasure19"),
    ("strIngredient20", "strMeasure20"),
];

/// Convert a raw API record into a [`Recipe`].
///
/// Pairs whose ingredient name is missing or blank are skipped; a missing
/// measure becomes an empty string. Never fails.
pub fn normalize(meal: &RawMeal) -> Recipe {
    let ingredients = INGREDIENT_FIELDS
        .iter()
        .filter_map(|(name_field, measure_field)| {
            let name = meal.field(name_field)?;
            if name.trim().is_empty() {
                return None;
            }
            Some(Ingredient::new(
                name,
                meal.field(measure_field).unwrap_or_default(),
            ))
        })
        .collect();

    Recipe {
        id: meal.id.clone().unwrap_or_default(),
        title: meal.title.clone().unwrap_or_default(),
        drink_alternate: meal.drink_alternate.clone(),
        category: meal.category.clone().unwrap_or_default(),
        area: meal.area.clone().unwrap_or_default(),
        instructions: meal.instructions.clone().unwrap_or_default(),
        image_url: meal.image_url.clone().unwrap_or_default(),
        tags: meal.tags.clone(),
        video_url: meal.video_url.clone().unwrap_or_default(),
        source_url: meal.source_url.clone(),
        image_source: meal.image_source.clone(),
        creative_commons_confirmed: meal.creative_commons_confirmed.clone(),
        date_modified: meal.date_modified.clone(),
        ingredients,
    }
}

impl From<&RawMeal> for Recipe {
    fn from(meal: &RawMeal) -> Self {
        normalize(meal)
    }
}
