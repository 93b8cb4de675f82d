//! Recipe extraction from the game's data dump
//!
//! The dump is a JSON array of the game's prototype tables. Recipe entries
//! come in several historical shapes: ingredients as `["iron-plate", 2]`
//! pairs or as `{"name": .., "amount": ..}` maps, products as a single
//! `result` plus `result_count` or as a `results` array, and optional
//! `normal`/`expensive` difficulty variants. Everything is normalised here
//! into plain [`RawRecipe`] records; nothing downstream touches raw JSON.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::DataError;
use crate::models::{ItemStack, RawRecipe};

/// Crafting time assumed when a recipe omits `energy_required`.
const DEFAULT_ENERGY: f64 = 0.5;

/// Parse the raw dump text into recipe records. Non-recipe prototypes are
/// skipped; a recipe with both difficulty variants contributes its normal
/// one.
pub fn parse_dump(raw: &str) -> Result<Vec<RawRecipe>, DataError> {
    let items: Value = serde_json::from_str(raw).map_err(|e| DataError::MalformedDump {
        message: e.to_string(),
    })?;

    let Some(items) = items.as_array() else {
        return Err(DataError::MalformedDump {
            message: "expected a top-level array of prototypes".to_string(),
        });
    };

    let mut records = Vec::new();
    for item in items {
        if item.get("type").and_then(Value::as_str) != Some("recipe") {
            continue;
        }
        let name = item
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        // With both difficulty variants present, the normal one carries the
        // ingredient list and crafting time.
        let body = if item.get("normal").is_some() && item.get("expensive").is_some() {
            &item["normal"]
        } else {
            item
        };

        let energy = body
            .get("energy_required")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_ENERGY);

        let ingredients = body
            .get("ingredients")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(parse_stack).collect())
            .unwrap_or_default();

        let products = parse_products(&name, body, item);

        let category = item
            .get("category")
            .and_then(Value::as_str)
            .unwrap_or("crafting")
            .to_string();

        records.push(RawRecipe {
            name,
            ingredients,
            products,
            energy,
            category,
        });
    }

    Ok(records)
}

/// Ingredient names that no record produces: the raw-material allow-list
/// fed to the resolver. Sorted for determinism.
pub fn derive_raw_materials(records: &[RawRecipe]) -> Vec<String> {
    let produced: HashSet<&str> = records
        .iter()
        .flat_map(|r| r.products.iter())
        .map(|p| p.name.as_str())
        .collect();

    let mut raw: Vec<String> = records
        .iter()
        .flat_map(|r| r.ingredients.iter())
        .filter(|i| !produced.contains(i.name.as_str()))
        .map(|i| i.name.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    raw.sort();
    raw
}

/// One ingredient/result entry, in either list form `["name", amount]` or
/// map form `{"name": .., "amount": ..}`.
fn parse_stack(value: &Value) -> Option<ItemStack> {
    match value {
        Value::Array(pair) => {
            let name = pair.first()?.as_str()?;
            let amount = pair.get(1)?.as_f64()?;
            Some(ItemStack::new(name, amount))
        }
        Value::Object(map) => {
            let name = map.get("name")?.as_str()?;
            let amount = map.get("amount")?.as_f64()?;
            Some(ItemStack::new(name, amount))
        }
        _ => None,
    }
}

/// Products from either a `results` array (modern) or `result` plus
/// `result_count` (legacy, count defaulting to 1). The legacy `result`
/// field lives on the difficulty body, `result_count` on either level.
fn parse_products(name: &str, body: &Value, item: &Value) -> Vec<ItemStack> {
    if let Some(results) = body.get("results").or_else(|| item.get("results")) {
        if let Some(list) = results.as_array() {
            return list.iter().filter_map(parse_stack).collect();
        }
    }

    let result_name = body
        .get("result")
        .or_else(|| item.get("result"))
        .and_then(Value::as_str)
        .unwrap_or(name);
    let count = body
        .get("result_count")
        .or_else(|| item.get("result_count"))
        .and_then(Value::as_f64)
        .unwrap_or(1.0);

    if result_name.is_empty() {
        return Vec::new();
    }
    vec![ItemStack::new(result_name, count)]
}
