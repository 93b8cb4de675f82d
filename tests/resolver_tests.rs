//! Tests for the demand resolution engine.

use factorize::database::RecipeDatabase;
use factorize::error::ResolveError;
use factorize::machines::MachineSet;
use factorize::models::{ItemStack, RawRecipe};
use factorize::resolver::DemandResolver;

fn recipe(
    name: &str,
    energy: f64,
    category: &str,
    ingredients: &[(&str, f64)],
    products: &[(&str, f64)],
) -> RawRecipe {
    RawRecipe {
        name: name.to_string(),
        ingredients: ingredients
            .iter()
            .map(|(n, a)| ItemStack::new(*n, *a))
            .collect(),
        products: products
            .iter()
            .map(|(n, a)| ItemStack::new(*n, *a))
            .collect(),
        energy,
        category: category.to_string(),
    }
}

fn gear_db() -> RecipeDatabase {
    RecipeDatabase::load(vec![recipe(
        "iron-gear-wheel",
        0.5,
        "crafting",
        &[("iron-plate", 2.0)],
        &[("iron-gear-wheel", 1.0)],
    )])
    .unwrap()
}

fn targets(specs: &[(&str, f64)]) -> Vec<(String, f64)> {
    specs.iter().map(|(n, r)| (n.to_string(), *r)).collect()
}

#[test]
fn gear_scenario() {
    let db = gear_db();
    let machines = MachineSet::new();
    let resolver = DemandResolver::new(&db, vec!["iron-plate".to_string()], &machines);

    let graph = resolver.resolve(&targets(&[("iron-gear-wheel", 60.0)])).unwrap();

    let node = graph.node("iron-gear-wheel").unwrap();
    assert_eq!(node.rate, 60.0);
    // ceil(60 * 0.5 / (1.25 * 60 * 1)) = ceil(0.4) = 1
    assert_eq!(node.machine_count, 1);
    assert_eq!(node.machine.name, "assembly-machine-3");
    assert_eq!(graph.raw_input("iron-plate"), Some(120.0));
}

#[test]
fn machine_count_follows_formula() {
    // iron-plate smelts in 3.2s; the electric furnace runs at speed 2, so
    // ceil(90 * 3.2 / (2 * 60 * 1)) = ceil(2.4) = 3 furnaces.
    let db = RecipeDatabase::load(vec![recipe(
        "iron-plate",
        3.2,
        "smelting",
        &[("iron-ore", 1.0)],
        &[("iron-plate", 1.0)],
    )])
    .unwrap();
    let machines = MachineSet::new();
    let resolver = DemandResolver::new(&db, vec!["iron-ore".to_string()], &machines);

    let graph = resolver.resolve(&targets(&[("iron-plate", 90.0)])).unwrap();

    let node = graph.node("iron-plate").unwrap();
    assert_eq!(node.rate, 90.0);
    assert_eq!(node.machine.name, "electric-furnace");
    assert_eq!(node.machine_count, 3);
    assert_eq!(graph.raw_input("iron-ore"), Some(90.0));
}

#[test]
fn shared_ingredient_demands_merge() {
    let db = RecipeDatabase::load(vec![
        recipe("a", 1.0, "crafting", &[("c", 1.0)], &[("a", 1.0)]),
        recipe("b", 1.0, "crafting", &[("c", 2.0)], &[("b", 1.0)]),
        recipe("c", 1.0, "crafting", &[("ore", 1.0)], &[("c", 1.0)]),
    ])
    .unwrap();
    let machines = MachineSet::new();
    let resolver = DemandResolver::new(&db, vec!["ore".to_string()], &machines);

    let graph = resolver
        .resolve(&targets(&[("a", 30.0), ("b", 45.0)]))
        .unwrap();

    // 30 * 1 from a, 45 * 2 from b
    assert_eq!(graph.node("c").unwrap().rate, 120.0);
    assert_eq!(graph.raw_input("ore"), Some(120.0));

    // order-independent result
    let reversed = resolver
        .resolve(&targets(&[("b", 45.0), ("a", 30.0)]))
        .unwrap();
    assert_eq!(reversed.node("c").unwrap().rate, 120.0);
    assert_eq!(
        reversed.node("c").unwrap().machine_count,
        graph.node("c").unwrap().machine_count
    );
}

#[test]
fn ceiling_applies_once_on_merged_rate() {
    // Each consumer alone needs ceil(60 / 150) = 1 machine of e; merged they
    // need ceil(120 / 150) = 1, not 2.
    let db = RecipeDatabase::load(vec![
        recipe("d1", 1.0, "crafting", &[("e", 1.0)], &[("d1", 1.0)]),
        recipe("d2", 1.0, "crafting", &[("e", 1.0)], &[("d2", 1.0)]),
        recipe("e", 0.5, "crafting", &[], &[("e", 1.0)]),
    ])
    .unwrap();
    let machines = MachineSet::new();
    let resolver = DemandResolver::new(&db, vec![], &machines);

    let graph = resolver
        .resolve(&targets(&[("d1", 60.0), ("d2", 60.0)]))
        .unwrap();

    let e = graph.node("e").unwrap();
    assert_eq!(e.rate, 120.0);
    assert_eq!(e.machine_count, 1);
}

#[test]
fn resolve_is_idempotent() {
    let db = gear_db();
    let machines = MachineSet::new();
    let resolver = DemandResolver::new(&db, vec!["iron-plate".to_string()], &machines);
    let spec = targets(&[("iron-gear-wheel", 60.0)]);

    let first = resolver.resolve(&spec).unwrap();
    let second = resolver.resolve(&spec).unwrap();

    assert_eq!(first.len(), second.len());
    for node in first.nodes() {
        let other = second.node(&node.recipe.name).unwrap();
        assert_eq!(node.rate, other.rate);
        assert_eq!(node.machine_count, other.machine_count);
    }
    assert_eq!(first.raw_inputs(), second.raw_inputs());
}

#[test]
fn demand_via_secondary_product_name() {
    // The producing recipe is found through its product list, not its name,
    // and demand converts through the product amount (55 per craft).
    let db = RecipeDatabase::load(vec![recipe(
        "basic-oil-processing",
        5.0,
        "oil-processing",
        &[("crude-oil", 100.0)],
        &[("petroleum-gas", 55.0)],
    )])
    .unwrap();
    let machines = MachineSet::new();
    let resolver = DemandResolver::new(&db, vec!["crude-oil".to_string()], &machines);

    let graph = resolver
        .resolve(&targets(&[("petroleum-gas", 110.0)]))
        .unwrap();

    let node = graph.node("basic-oil-processing").unwrap();
    assert_eq!(node.rate, 110.0);
    assert_eq!(node.machine.name, "oil-refinery");
    // 2 crafts/min * 5s / 60 = 1/6 of a refinery, rounded up
    assert_eq!(node.machine_count, 1);
    assert_eq!(graph.raw_input("crude-oil"), Some(200.0));
}

#[test]
fn cyclic_recipes_fail_instead_of_hanging() {
    let db = RecipeDatabase::load(vec![
        recipe("x", 1.0, "crafting", &[("y", 1.0)], &[("x", 1.0)]),
        recipe("y", 1.0, "crafting", &[("x", 1.0)], &[("y", 1.0)]),
    ])
    .unwrap();
    let machines = MachineSet::new();
    let resolver = DemandResolver::new(&db, vec![], &machines);

    let err = resolver.resolve(&targets(&[("x", 10.0)])).unwrap_err();
    match err {
        ResolveError::CyclicRecipe { names } => {
            assert!(names.contains(&"x".to_string()));
            assert!(names.contains(&"y".to_string()));
        }
        other => panic!("expected CyclicRecipe, got {other:?}"),
    }
}

#[test]
fn self_consuming_recipe_is_cyclic() {
    let db = RecipeDatabase::load(vec![recipe(
        "ouroboros",
        1.0,
        "crafting",
        &[("ouroboros", 1.0)],
        &[("ouroboros", 2.0)],
    )])
    .unwrap();
    let machines = MachineSet::new();
    let resolver = DemandResolver::new(&db, vec![], &machines);

    let err = resolver.resolve(&targets(&[("ouroboros", 10.0)])).unwrap_err();
    assert!(matches!(err, ResolveError::CyclicRecipe { .. }));
}

#[test]
fn unknown_target_item_is_an_error() {
    let db = gear_db();
    let machines = MachineSet::new();
    let resolver = DemandResolver::new(&db, vec!["iron-plate".to_string()], &machines);

    let err = resolver.resolve(&targets(&[("unobtainium", 10.0)])).unwrap_err();
    match err {
        ResolveError::UnknownItem { item, chain } => {
            assert_eq!(item, "unobtainium");
            assert_eq!(chain, vec!["unobtainium".to_string()]);
        }
        other => panic!("expected UnknownItem, got {other:?}"),
    }
}

#[test]
fn unknown_ingredient_reports_consumer_chain() {
    // iron-plate is neither produced nor on the raw-material allow-list
    let db = gear_db();
    let machines = MachineSet::new();
    let resolver = DemandResolver::new(&db, vec![], &machines);

    let err = resolver
        .resolve(&targets(&[("iron-gear-wheel", 60.0)]))
        .unwrap_err();
    match err {
        ResolveError::UnknownItem { item, chain } => {
            assert_eq!(item, "iron-plate");
            assert_eq!(
                chain,
                vec!["iron-gear-wheel".to_string(), "iron-plate".to_string()]
            );
        }
        other => panic!("expected UnknownItem, got {other:?}"),
    }
}

#[test]
fn non_positive_rates_are_rejected() {
    let db = gear_db();
    let machines = MachineSet::new();
    let resolver = DemandResolver::new(&db, vec!["iron-plate".to_string()], &machines);

    let err = resolver
        .resolve(&targets(&[("iron-gear-wheel", 0.0)]))
        .unwrap_err();
    assert!(matches!(err, ResolveError::InvalidRate { .. }));

    let err = resolver
        .resolve(&targets(&[("iron-gear-wheel", -5.0)]))
        .unwrap_err();
    assert!(matches!(err, ResolveError::InvalidRate { .. }));
}

#[test]
fn machine_override_changes_counts() {
    let db = gear_db();
    let mut machines = MachineSet::new();
    machines
        .set_override(
            factorize::models::RecipeCategory::Crafting,
            "assembly-machine-1",
        )
        .unwrap();
    let resolver = DemandResolver::new(&db, vec!["iron-plate".to_string()], &machines);

    let graph = resolver
        .resolve(&targets(&[("iron-gear-wheel", 300.0)]))
        .unwrap();

    let node = graph.node("iron-gear-wheel").unwrap();
    assert_eq!(node.machine.name, "assembly-machine-1");
    // ceil(300 * 0.5 / (0.5 * 60)) = 5
    assert_eq!(node.machine_count, 5);
}
