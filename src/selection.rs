use crate::model::Recipe;

/// Recipes the user has marked for meal planning.
///
/// Insertion-ordered and unique by recipe id. Lives only as long as the
/// owning [`crate::RecipeBrowser`]; nothing here is persisted.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    recipes: Vec<Recipe>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `recipe` unless one with the same id is already selected.
    ///
    /// Returns `true` when the recipe was inserted.
    pub fn add(&mut self, recipe: Recipe) -> bool {
        if self.is_selected(&recipe.id) {
            return false;
        }
        self.recipes.push(recipe);
        true
    }

    /// Remove the recipe with `id`, returning it if it was selected
    pub fn remove(&mut self, id: &str) -> Option<Recipe> {
        let index = self.recipes.iter().position(|r| r.id == id)?;
        Some(self.recipes.remove(index))
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.recipes.iter().any(|r| r.id == id)
    }

    /// Remove when selected, add otherwise. Returns whether `recipe` is selected afterwards.
    pub fn toggle(&mut self, recipe: Recipe) -> bool {
        if self.remove(&recipe.id).is_some() {
            false
        } else {
            self.add(recipe)
        }
    }

    pub fn clear(&mut self) {
        self.recipes.clear();
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recipe> {
        self.recipes.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.recipes.iter().map(|r| r.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a Recipe;
    type IntoIter = std::slice::Iter<'a, Recipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
