//! Data models for recipes and resolved demand graphs

use std::collections::HashMap;

use crate::machines::CraftingMachine;

/// Crafting categories known to the calculator.
///
/// The category decides which machine family can run a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeCategory {
    AdvancedCrafting,
    Centrifuging,
    Chemistry,
    Crafting,
    CraftingWithFluid,
    OilProcessing,
    RocketBuilding,
    Smelting,
}

impl RecipeCategory {
    /// Parse the category string used by the game data. Returns `None` for
    /// categories the calculator does not know.
    pub fn from_data(value: &str) -> Option<Self> {
        match value {
            "advanced-crafting" => Some(Self::AdvancedCrafting),
            "centrifuging" => Some(Self::Centrifuging),
            "chemistry" => Some(Self::Chemistry),
            "crafting" => Some(Self::Crafting),
            "crafting-with-fluid" => Some(Self::CraftingWithFluid),
            "oil-processing" => Some(Self::OilProcessing),
            "rocket-building" => Some(Self::RocketBuilding),
            "smelting" => Some(Self::Smelting),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdvancedCrafting => "advanced-crafting",
            Self::Centrifuging => "centrifuging",
            Self::Chemistry => "chemistry",
            Self::Crafting => "crafting",
            Self::CraftingWithFluid => "crafting-with-fluid",
            Self::OilProcessing => "oil-processing",
            Self::RocketBuilding => "rocket-building",
            Self::Smelting => "smelting",
        }
    }
}

/// An (item, amount) pair as it appears on either side of a recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStack {
    pub name: String,
    pub amount: f64,
}

impl ItemStack {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

/// A recipe record as handed over by the extraction step, before validation.
#[derive(Debug, Clone, Default)]
pub struct RawRecipe {
    pub name: String,
    pub ingredients: Vec<ItemStack>,
    pub products: Vec<ItemStack>,
    /// Crafting time in seconds.
    pub energy: f64,
    pub category: String,
}

/// A validated recipe. Immutable after load.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<ItemStack>,
    pub products: Vec<ItemStack>,
    /// Crafting time in seconds for one cycle.
    pub energy: f64,
    pub category: RecipeCategory,
}

impl Recipe {
    /// Amount of `item` produced per craft, if this recipe produces it.
    pub fn product_amount(&self, item: &str) -> Option<f64> {
        self.products
            .iter()
            .find(|p| p.name == item)
            .map(|p| p.amount)
    }
}

/// One recipe in the resolved demand graph.
///
/// Created the first time a recipe is demanded; each further consumer adds
/// to the cumulative rate and the machine count is recomputed from the
/// merged total, so the ceiling is applied once per recipe.
#[derive(Debug, Clone)]
pub struct DemandNode {
    pub recipe: Recipe,
    /// Cumulative demanded output in items per minute of the demanded
    /// product.
    pub rate: f64,
    /// Cumulative crafting cycles per minute. Demands arriving via
    /// different products of the same recipe convert to cycles before
    /// accumulating, so multi-product recipes merge cleanly.
    pub crafts_per_minute: f64,
    /// Machine chosen for the recipe's category.
    pub machine: &'static CraftingMachine,
    pub machine_count: u64,
    /// Ingredient flows demanded by this node, items per minute, merged by
    /// item in declared ingredient order.
    pub inputs: Vec<ItemStack>,
}

impl DemandNode {
    /// Recompute the machine count from the merged cumulative rate. The
    /// ceiling is applied here, once per recipe, never per consumer.
    pub(crate) fn recompute_machines(&mut self) {
        let cycles_per_machine = 60.0 * self.machine.crafting_speed / self.recipe.energy;
        self.machine_count = (self.crafts_per_minute / cycles_per_machine).ceil() as u64;
    }

    pub(crate) fn add_input(&mut self, item: &str, rate: f64) {
        match self.inputs.iter_mut().find(|i| i.name == item) {
            Some(stack) => stack.amount += rate,
            None => self.inputs.push(ItemStack::new(item, rate)),
        }
    }
}

/// The resolved, merged production plan for a set of targets.
///
/// Read-only once returned by the resolver.
#[derive(Debug, Clone, Default)]
pub struct DemandGraph {
    nodes: HashMap<String, DemandNode>,
    /// Recipe names in first-demand order, for deterministic iteration.
    order: Vec<String>,
    /// Required external inputs (raw materials), items per minute, in
    /// first-demand order.
    raw_inputs: Vec<ItemStack>,
    /// The original top-level targets, in input order.
    targets: Vec<(String, f64)>,
}

impl DemandGraph {
    pub(crate) fn new(targets: Vec<(String, f64)>) -> Self {
        Self {
            targets,
            ..Self::default()
        }
    }

    pub fn targets(&self) -> &[(String, f64)] {
        &self.targets
    }

    pub fn node(&self, recipe_name: &str) -> Option<&DemandNode> {
        self.nodes.get(recipe_name)
    }

    /// Nodes in first-demand order.
    pub fn nodes(&self) -> impl Iterator<Item = &DemandNode> {
        self.order.iter().map(|name| &self.nodes[name])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn raw_inputs(&self) -> &[ItemStack] {
        &self.raw_inputs
    }

    pub fn raw_input(&self, item: &str) -> Option<f64> {
        self.raw_inputs
            .iter()
            .find(|i| i.name == item)
            .map(|i| i.amount)
    }

    pub(crate) fn node_mut(&mut self, recipe_name: &str) -> Option<&mut DemandNode> {
        self.nodes.get_mut(recipe_name)
    }

    pub(crate) fn insert_node(&mut self, node: DemandNode) {
        self.order.push(node.recipe.name.clone());
        self.nodes.insert(node.recipe.name.clone(), node);
    }

    pub(crate) fn add_raw_input(&mut self, item: &str, rate: f64) {
        match self.raw_inputs.iter_mut().find(|i| i.name == item) {
            Some(stack) => stack.amount += rate,
            None => self.raw_inputs.push(ItemStack::new(item, rate)),
        }
    }
}
