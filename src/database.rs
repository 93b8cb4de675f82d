//! Recipe database: validation and producer lookup

use std::collections::HashMap;

use crate::error::DataError;
use crate::models::{RawRecipe, Recipe, RecipeCategory};

/// What to do when two records declare the same recipe name. Game data
/// carries duplicates (e.g. normal vs expensive difficulty variants that
/// survived extraction), so the CLI loads with `KeepFirst` and warns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Treat a colliding name as a fatal [`DataError::DuplicateRecipe`].
    #[default]
    Reject,
    /// Keep the first record for a name and flag the collision.
    KeepFirst,
}

/// Immutable mapping from recipe name to validated recipe.
///
/// Built once from extracted records; the resolver never sees raw data.
#[derive(Debug)]
pub struct RecipeDatabase {
    recipes: HashMap<String, Recipe>,
    /// Recipe names in load order, for deterministic listing.
    order: Vec<String>,
    /// Item name -> name of the first recipe (in load order) producing it.
    producers: HashMap<String, String>,
    /// Names that collided during a `KeepFirst` load.
    collisions: Vec<String>,
}

impl RecipeDatabase {
    /// Validate and load extracted records. Duplicate names are rejected.
    pub fn load(records: Vec<RawRecipe>) -> Result<Self, DataError> {
        Self::load_with(records, DuplicatePolicy::Reject)
    }

    /// Validate and load with an explicit duplicate-name policy.
    pub fn load_with(
        records: Vec<RawRecipe>,
        on_duplicate: DuplicatePolicy,
    ) -> Result<Self, DataError> {
        let mut recipes = HashMap::with_capacity(records.len());
        let mut order = Vec::with_capacity(records.len());
        let mut producers: HashMap<String, String> = HashMap::new();
        let mut collisions = Vec::new();

        for (index, record) in records.into_iter().enumerate() {
            let recipe = validate(index, record)?;

            if recipes.contains_key(&recipe.name) {
                match on_duplicate {
                    DuplicatePolicy::Reject => {
                        return Err(DataError::DuplicateRecipe { name: recipe.name });
                    }
                    DuplicatePolicy::KeepFirst => {
                        collisions.push(recipe.name);
                        continue;
                    }
                }
            }

            for product in &recipe.products {
                producers
                    .entry(product.name.clone())
                    .or_insert_with(|| recipe.name.clone());
            }
            order.push(recipe.name.clone());
            recipes.insert(recipe.name.clone(), recipe);
        }

        Ok(Self {
            recipes,
            order,
            producers,
            collisions,
        })
    }

    /// First recipe (in load order) whose products include `item`.
    ///
    /// `None` means no recipe produces the item; whether that is a raw
    /// material or missing data is the caller's call, via its raw-material
    /// allow-list.
    pub fn find_producer(&self, item: &str) -> Option<&Recipe> {
        self.producers.get(item).map(|name| &self.recipes[name])
    }

    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.recipes.get(name)
    }

    /// Recipes in load order.
    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.order.iter().map(|name| &self.recipes[name])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Names that collided during a `KeepFirst` load, in encounter order.
    pub fn collisions(&self) -> &[String] {
        &self.collisions
    }
}

/// Convert one raw record into a typed recipe, or say precisely why not.
fn validate(index: usize, record: RawRecipe) -> Result<Recipe, DataError> {
    if record.name.is_empty() {
        return Err(DataError::MissingName { index });
    }
    if record.energy <= 0.0 {
        return Err(DataError::InvalidEnergy {
            name: record.name,
            energy: record.energy,
        });
    }
    if record.products.is_empty() {
        return Err(DataError::NoProducts { name: record.name });
    }
    for stack in record.ingredients.iter().chain(record.products.iter()) {
        if stack.amount <= 0.0 {
            return Err(DataError::InvalidAmount {
                name: record.name,
                item: stack.name.clone(),
                amount: stack.amount,
            });
        }
    }
    let category =
        RecipeCategory::from_data(&record.category).ok_or_else(|| DataError::UnknownCategory {
            name: record.name.clone(),
            category: record.category.clone(),
        })?;

    Ok(Recipe {
        name: record.name,
        ingredients: record.ingredients,
        products: record.products,
        energy: record.energy,
        category,
    })
}
