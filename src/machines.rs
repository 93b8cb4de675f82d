//! Crafting machine tiers and selection policy

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::RecipeCategory;

/// Power source of a machine, used to break ties between equally fast tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PowerType {
    Burner,
    Electric,
}

/// A machine that executes recipes of compatible categories at a speed
/// multiplier.
#[derive(Debug)]
pub struct CraftingMachine {
    pub name: &'static str,
    pub crafting_speed: f64,
    pub power_type: PowerType,
}

impl CraftingMachine {
    /// Machine name with hyphens replaced by spaces, for display.
    pub fn display_name(&self) -> String {
        self.name.replace('-', " ")
    }

    fn cmp_tier(&self, other: &Self) -> Ordering {
        self.crafting_speed
            .partial_cmp(&other.crafting_speed)
            .unwrap_or(Ordering::Equal)
            .then(self.power_type.cmp(&other.power_type))
    }
}

const FURNACES: &[CraftingMachine] = &[
    CraftingMachine {
        name: "stone-furnace",
        crafting_speed: 1.0,
        power_type: PowerType::Burner,
    },
    CraftingMachine {
        name: "steel-furnace",
        crafting_speed: 2.0,
        power_type: PowerType::Burner,
    },
    CraftingMachine {
        name: "electric-furnace",
        crafting_speed: 2.0,
        power_type: PowerType::Electric,
    },
];

const ASSEMBLY_MACHINES: &[CraftingMachine] = &[
    CraftingMachine {
        name: "assembly-machine-1",
        crafting_speed: 0.5,
        power_type: PowerType::Electric,
    },
    CraftingMachine {
        name: "assembly-machine-2",
        crafting_speed: 0.75,
        power_type: PowerType::Electric,
    },
    CraftingMachine {
        name: "assembly-machine-3",
        crafting_speed: 1.25,
        power_type: PowerType::Electric,
    },
];

const REFINERIES: &[CraftingMachine] = &[CraftingMachine {
    name: "oil-refinery",
    crafting_speed: 1.0,
    power_type: PowerType::Electric,
}];

const PLANTS: &[CraftingMachine] = &[CraftingMachine {
    name: "chemical-plant",
    crafting_speed: 1.0,
    power_type: PowerType::Electric,
}];

const CENTRIFUGES: &[CraftingMachine] = &[CraftingMachine {
    name: "centrifuge",
    crafting_speed: 1.0,
    power_type: PowerType::Electric,
}];

const ROCKET_SILOS: &[CraftingMachine] = &[CraftingMachine {
    name: "rocket-silo",
    crafting_speed: 1.0,
    power_type: PowerType::Electric,
}];

/// Machines able to run a category. Assembly machine 1 cannot handle fluid
/// ingredients, so crafting-with-fluid starts at tier 2.
fn tiers_for(category: RecipeCategory) -> &'static [CraftingMachine] {
    match category {
        RecipeCategory::Smelting => FURNACES,
        RecipeCategory::AdvancedCrafting | RecipeCategory::Crafting => ASSEMBLY_MACHINES,
        RecipeCategory::CraftingWithFluid => &ASSEMBLY_MACHINES[1..],
        RecipeCategory::Chemistry => PLANTS,
        RecipeCategory::OilProcessing => REFINERIES,
        RecipeCategory::Centrifuging => CENTRIFUGES,
        RecipeCategory::RocketBuilding => ROCKET_SILOS,
    }
}

/// Machine selection policy: highest tier per category, with optional
/// per-category overrides.
#[derive(Debug, Default)]
pub struct MachineSet {
    overrides: HashMap<RecipeCategory, &'static CraftingMachine>,
}

impl MachineSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `machine_name` for `category` instead of the default best tier.
    /// Fails if the named machine cannot run the category.
    pub fn set_override(
        &mut self,
        category: RecipeCategory,
        machine_name: &str,
    ) -> Result<(), String> {
        let machine = tiers_for(category)
            .iter()
            .find(|m| m.name == machine_name)
            .ok_or_else(|| {
                format!(
                    "no machine \"{}\" can run category \"{}\"",
                    machine_name,
                    category.as_str()
                )
            })?;
        self.overrides.insert(category, machine);
        Ok(())
    }

    /// The machine the resolver will use for `category`.
    pub fn best_for(&self, category: RecipeCategory) -> &'static CraftingMachine {
        if let Some(machine) = self.overrides.get(&category) {
            return machine;
        }
        tiers_for(category)
            .iter()
            .max_by(|a, b| a.cmp_tier(b))
            .expect("every category has at least one machine tier")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smelting_prefers_electric_furnace_on_speed_tie() {
        let machines = MachineSet::new();
        let best = machines.best_for(RecipeCategory::Smelting);
        assert_eq!(best.name, "electric-furnace");
    }

    #[test]
    fn fluid_crafting_skips_first_assembly_tier() {
        let machines = MachineSet::new();
        assert_eq!(
            machines.best_for(RecipeCategory::CraftingWithFluid).name,
            "assembly-machine-3"
        );
        assert!(
            !tiers_for(RecipeCategory::CraftingWithFluid)
                .iter()
                .any(|m| m.name == "assembly-machine-1")
        );
    }

    #[test]
    fn override_replaces_default_choice() {
        let mut machines = MachineSet::new();
        machines
            .set_override(RecipeCategory::Crafting, "assembly-machine-1")
            .unwrap();
        assert_eq!(
            machines.best_for(RecipeCategory::Crafting).name,
            "assembly-machine-1"
        );
        // other categories keep their defaults
        assert_eq!(
            machines.best_for(RecipeCategory::Chemistry).name,
            "chemical-plant"
        );
    }

    #[test]
    fn override_rejects_incompatible_machine() {
        let mut machines = MachineSet::new();
        assert!(
            machines
                .set_override(RecipeCategory::Smelting, "chemical-plant")
                .is_err()
        );
    }
}
