use std::collections::HashMap;

use crate::collate;
use crate::model::{Ingredient, Recipe};

/// Merge the ingredients of `recipes` into one shopping list.
///
/// Ingredients whose names are equal ignoring case are merged: the first-seen
/// spelling of the name is kept and measures are joined with `", "` in
/// encounter order. The result is sorted by name with [`collate::compare`].
/// The recipes themselves are left untouched.
pub fn aggregate(recipes: &[Recipe]) -> Vec<Ingredient> {
    aggregate_iter(recipes)
}

/// Same as [`aggregate`], for any iterator of recipe references
pub fn aggregate_iter<'a, I>(recipes: I) -> Vec<Ingredient>
where
    I: IntoIterator<Item = &'a Recipe>,
{
    let mut merged: Vec<Ingredient> = Vec::new();
    // lower-cased name -> position in `merged`
    let mut index: HashMap<String, usize> = HashMap::new();

    for recipe in recipes {
        for ingredient in &recipe.ingredients {
            let key = ingredient.name.to_lowercase();
            match index.get(&key) {
                Some(&position) => {
                    let existing = &mut merged[position];
                    existing.measure.push_str(", ");
                    existing.measure.push_str(&ingredient.measure);
                }
                None => {
                    index.insert(key, merged.len());
                    merged.push(ingredient.clone());
                }
            }
        }
    }

    merged.sort_by(|a, b| collate::compare(&a.name, &b.name));
    merged
}
