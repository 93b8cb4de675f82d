//! Factorize
//!
//! Factory planning calculator for Factorio production chains.

use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use factorize::database::{DuplicatePolicy, RecipeDatabase};
use factorize::extract;
use factorize::machines::MachineSet;
use factorize::models::RecipeCategory;
use factorize::render::{self, SCIENCE_PACKS};
use factorize::report;
use factorize::resolver::DemandResolver;

#[derive(Parser)]
#[command(name = "factorize")]
#[command(about = "Factory planning calculator for Factorio production chains")]
struct Cli {
    /// Path to the recipe data dump (JSON)
    #[arg(short, long, default_value = "dump/data.json")]
    data: PathBuf,

    /// Draw the factory graph to a Graphviz DOT file
    #[arg(long)]
    draw: bool,

    /// Where to write the DOT file when --draw is given
    #[arg(long, default_value = "megafactory.dot")]
    dot_out: PathBuf,

    /// Override the machine for a category, e.g. "crafting=assembly-machine-2"
    #[arg(long = "machine", value_name = "CATEGORY=MACHINE", value_parser = parse_machine_override)]
    machine_overrides: Vec<(RecipeCategory, String)>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Machines required for producing recipes at given rates
    ///
    /// SPEC is a space-separated list of recipe-name:items_per_minute
    /// specifiers, for example:
    ///
    ///     factorize factories explosive-cannon-shell:10 firearm-magazine:50
    Factories {
        /// recipe-name:items_per_minute specifiers
        #[arg(required = true, value_parser = parse_recipe_spec)]
        specs: Vec<(String, f64)>,
    },

    /// Machines required for producing every science pack at a given rate
    Science {
        /// Science packs per minute
        spm: f64,

        /// Exclude military science packs
        #[arg(long)]
        no_military: bool,
    },

    /// List all recipes found in the data dump
    ListRecipes,
}

/// Parse a "recipe-name:items_per_minute" CLI specifier.
fn parse_recipe_spec(value: &str) -> Result<(String, f64), String> {
    let (name, rate) = value.split_once(':').ok_or_else(|| {
        format!("spec must be in format \"recipe-name:items_per_minute\", got \"{value}\"")
    })?;
    let rate: f64 = rate
        .parse()
        .map_err(|_| format!("\"{rate}\" is not a valid items-per-minute rate"))?;
    if name.is_empty() || rate <= 0.0 {
        return Err(format!(
            "spec must name a recipe and a positive rate, got \"{value}\""
        ));
    }
    Ok((name.to_string(), rate))
}

/// Parse a "category=machine-name" override.
fn parse_machine_override(value: &str) -> Result<(RecipeCategory, String), String> {
    let (category, machine) = value
        .split_once('=')
        .ok_or_else(|| format!("override must be in format \"category=machine\", got \"{value}\""))?;
    let category = RecipeCategory::from_data(category)
        .ok_or_else(|| format!("unknown crafting category \"{category}\""))?;
    Ok((category, machine.to_string()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let raw = fs::read_to_string(&cli.data)
        .with_context(|| format!("failed to read data dump {}", cli.data.display()))?;
    let records = extract::parse_dump(&raw)?;
    let raw_materials = extract::derive_raw_materials(&records);

    // Game dumps carry difficulty-variant duplicates; keep the first and warn.
    let db = RecipeDatabase::load_with(records, DuplicatePolicy::KeepFirst)?;
    for name in db.collisions() {
        eprintln!("warning: duplicate recipe \"{}\", keeping the first", name);
    }

    let mut machines = MachineSet::new();
    for (category, machine) in &cli.machine_overrides {
        machines
            .set_override(*category, machine)
            .map_err(|e| anyhow!(e))?;
    }

    let targets: Vec<(String, f64)> = match &cli.command {
        Commands::Factories { specs } => specs.clone(),
        Commands::Science { spm, no_military } => SCIENCE_PACKS
            .iter()
            .copied()
            .filter(|pack| !(*no_military && *pack == "military-science-pack"))
            .map(|pack| (pack.to_string(), *spm))
            .collect(),
        Commands::ListRecipes => {
            for recipe in db.recipes() {
                println!("{} ({})", recipe.name, recipe.category.as_str());
            }
            return Ok(());
        }
    };

    let resolver = DemandResolver::new(&db, raw_materials, &machines);
    let graph = resolver.resolve(&targets)?;

    print!("{}", report::format_table(&graph));

    if cli.draw {
        let file = File::create(&cli.dot_out)
            .with_context(|| format!("failed to create {}", cli.dot_out.display()))?;
        let mut writer = BufWriter::new(file);
        render::render_dot(&graph, &mut writer)?;
        println!(
            "\nwrote {} (render with: dot -Tpng {} -o megafactory.png)",
            cli.dot_out.display(),
            cli.dot_out.display()
        );
    }

    Ok(())
}
