//! Demand resolution: worklist expansion over the recipe graph
//!
//! Expansion is an explicit FIFO worklist rather than call-stack recursion,
//! so shared sub-demands merge into one node per recipe and runaway
//! expansion (a cyclic recipe graph) is caught by a bound instead of
//! overflowing the stack.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::database::RecipeDatabase;
use crate::error::ResolveError;
use crate::machines::MachineSet;
use crate::models::{DemandGraph, DemandNode};

/// Worklist pops allowed per recipe in the database before resolution is
/// declared cyclic. Realistic databases resolve in a handful of pops per
/// recipe; a cycle re-demands its members without bound.
const EXPANSION_FACTOR: usize = 32;

/// Floor for the expansion bound, so tiny test databases still get room to
/// merge legitimately shared demands.
const MIN_EXPANSIONS: usize = 256;

/// A pending (item, rate) demand on the worklist.
struct Pending {
    item: String,
    /// Accumulated items per minute still to be expanded.
    rate: f64,
    /// Recipe that demanded this item, for error chains. `None` for
    /// top-level targets.
    consumer: Option<String>,
}

/// The core engine: expands target rates into a merged [`DemandGraph`].
pub struct DemandResolver<'a> {
    db: &'a RecipeDatabase,
    raw_materials: HashSet<String>,
    machines: &'a MachineSet,
}

impl<'a> DemandResolver<'a> {
    /// `raw_materials` is the allow-list of items that legitimately have no
    /// producing recipe; anything else without a producer is an error.
    pub fn new(
        db: &'a RecipeDatabase,
        raw_materials: impl IntoIterator<Item = String>,
        machines: &'a MachineSet,
    ) -> Self {
        Self {
            db,
            raw_materials: raw_materials.into_iter().collect(),
            machines,
        }
    }

    /// Resolve `targets` (item name, items per minute) into a demand graph.
    ///
    /// Deterministic: targets expand in input order, ingredients in their
    /// declared order, so rate accumulation and machine counts are
    /// reproducible on identical input.
    pub fn resolve(&self, targets: &[(String, f64)]) -> Result<DemandGraph, ResolveError> {
        for (item, rate) in targets {
            if *rate <= 0.0 {
                return Err(ResolveError::InvalidRate {
                    item: item.clone(),
                    rate: *rate,
                });
            }
        }

        let mut graph = DemandGraph::new(targets.to_vec());
        let mut worklist: VecDeque<Pending> = targets
            .iter()
            .map(|(item, rate)| Pending {
                item: item.clone(),
                rate: *rate,
                consumer: None,
            })
            .collect();
        // First consumer seen per item, for reconstructing error chains.
        let mut first_consumer: HashMap<String, Option<String>> = HashMap::new();
        for pending in &worklist {
            first_consumer
                .entry(pending.item.clone())
                .or_insert_with(|| pending.consumer.clone());
        }

        let budget = (self.db.len() * EXPANSION_FACTOR).max(MIN_EXPANSIONS);
        let mut expansions = 0usize;

        while let Some(pending) = worklist.pop_front() {
            expansions += 1;
            if expansions > budget {
                let names = self
                    .find_cycle(targets)
                    .unwrap_or_else(|| vec![pending.item.clone()]);
                return Err(ResolveError::CyclicRecipe { names });
            }

            let Some(recipe) = self.db.find_producer(&pending.item) else {
                if self.raw_materials.contains(&pending.item) {
                    graph.add_raw_input(&pending.item, pending.rate);
                    continue;
                }
                return Err(ResolveError::UnknownItem {
                    chain: self.consumer_chain(&first_consumer, &pending),
                    item: pending.item,
                });
            };

            // product_amount is Some by find_producer's contract
            let product_amount = recipe.product_amount(&pending.item).unwrap_or(1.0);
            let crafts_added = pending.rate / product_amount;

            if graph.node(&recipe.name).is_none() {
                let node = DemandNode {
                    recipe: recipe.clone(),
                    rate: 0.0,
                    crafts_per_minute: 0.0,
                    machine: self.machines.best_for(recipe.category),
                    machine_count: 0,
                    inputs: Vec::new(),
                };
                graph.insert_node(node);
            }
            let recipe_name = recipe.name.clone();
            let ingredients = recipe.ingredients.clone();
            {
                let node = graph
                    .node_mut(&recipe_name)
                    .expect("node inserted above");
                node.rate += pending.rate;
                node.crafts_per_minute += crafts_added;
                node.recompute_machines();
                for ingredient in &ingredients {
                    node.add_input(&ingredient.name, crafts_added * ingredient.amount);
                }
            }

            for ingredient in &ingredients {
                let required = crafts_added * ingredient.amount;
                first_consumer
                    .entry(ingredient.name.clone())
                    .or_insert_with(|| Some(recipe_name.clone()));
                // Merge into an already pending demand for the same item so
                // the pop count stays proportional to the edge count.
                match worklist.iter_mut().find(|p| p.item == ingredient.name) {
                    Some(pending) => pending.rate += required,
                    None => worklist.push_back(Pending {
                        item: ingredient.name.clone(),
                        rate: required,
                        consumer: Some(recipe_name.clone()),
                    }),
                }
            }
        }

        Ok(graph)
    }

    /// Walk first-consumer links from a pending demand back up to the
    /// top-level target that caused it.
    fn consumer_chain(
        &self,
        first_consumer: &HashMap<String, Option<String>>,
        pending: &Pending,
    ) -> Vec<String> {
        let mut chain = vec![pending.item.clone()];
        let mut cursor = pending.consumer.clone();
        while let Some(name) = cursor {
            if chain.contains(&name) {
                break;
            }
            chain.push(name.clone());
            cursor = first_consumer.get(&name).cloned().flatten();
        }
        chain.reverse();
        chain
    }

    /// Iterative DFS over the static ingredient graph reachable from the
    /// targets, to name the cycle once the expansion budget trips.
    fn find_cycle(&self, targets: &[(String, f64)]) -> Option<Vec<String>> {
        let mut finished: HashSet<String> = HashSet::new();

        for (item, _) in targets {
            let Some(recipe) = self.db.find_producer(item) else {
                continue;
            };
            let mut path: Vec<String> = Vec::new();
            let mut on_path: HashSet<String> = HashSet::new();
            // stack of (recipe name, next ingredient index)
            let mut stack: Vec<(String, usize)> = vec![(recipe.name.clone(), 0)];
            path.push(recipe.name.clone());
            on_path.insert(recipe.name.clone());

            while let Some((name, index)) = stack.pop() {
                let recipe = self.db.get(&name).expect("recipe on stack exists");
                if index >= recipe.ingredients.len() {
                    on_path.remove(&name);
                    path.pop();
                    finished.insert(name);
                    continue;
                }
                stack.push((name.clone(), index + 1));

                let ingredient = &recipe.ingredients[index].name;
                let Some(child) = self.db.find_producer(ingredient) else {
                    continue;
                };
                if on_path.contains(&child.name) {
                    let start = path.iter().position(|n| n == &child.name).unwrap_or(0);
                    let mut names = path[start..].to_vec();
                    names.push(child.name.clone());
                    return Some(names);
                }
                if finished.contains(&child.name) {
                    continue;
                }
                stack.push((child.name.clone(), 0));
                path.push(child.name.clone());
                on_path.insert(child.name.clone());
            }
        }

        None
    }
}
