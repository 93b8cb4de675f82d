//! Graphviz DOT emission for a resolved demand graph
//!
//! Produces DOT text only; converting it to an image is left to graphviz
//! (`dot -Tpng megafactory.dot -o megafactory.png`).

use std::collections::HashMap;
use std::io::{self, Write};

use crate::models::DemandGraph;

/// Science packs get highlighted in the rendered graph.
pub const SCIENCE_PACKS: &[&str] = &[
    "automation-science-pack",
    "logistic-science-pack",
    "military-science-pack",
    "chemical-science-pack",
    "production-science-pack",
    "utility-science-pack",
];

fn format_rate(rate: f64) -> String {
    if (rate - rate.round()).abs() < 1e-9 {
        format!("{}", rate.round() as i64)
    } else {
        format!("{:.1}", rate)
    }
}

/// Write the demand graph as a DOT digraph: one rectangle per recipe (label:
/// name, machine count and kind) and per raw material (label: name and
/// required rate), directed edges from ingredient to consumer labelled with
/// the flow in items per minute.
pub fn render_dot(graph: &DemandGraph, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "digraph megafactory {{")?;
    writeln!(out, "    overlap=false;")?;
    writeln!(out, "    splines=ortho;")?;
    writeln!(out, "    ranksep=1.5;")?;

    // Stable numeric ids: recipes in first-demand order, then raw inputs.
    let mut ids: HashMap<&str, usize> = HashMap::new();
    for node in graph.nodes() {
        let id = ids.len();
        ids.insert(node.recipe.name.as_str(), id);
    }
    for stack in graph.raw_inputs() {
        let id = ids.len();
        ids.entry(stack.name.as_str()).or_insert(id);
    }

    for node in graph.nodes() {
        let name = node.recipe.name.as_str();
        let fill = if SCIENCE_PACKS.contains(&name) {
            "yellow"
        } else {
            "white"
        };
        writeln!(
            out,
            "    n{} [shape=rectangle, style=filled, fillcolor={}, label=\"{}\\n{} {}\"];",
            ids[name],
            fill,
            name.replace('-', " "),
            node.machine_count,
            node.machine.display_name(),
        )?;
    }

    for stack in graph.raw_inputs() {
        writeln!(
            out,
            "    n{} [shape=rectangle, style=filled, fillcolor=lightgrey, label=\"{}\\n{}/min\"];",
            ids[stack.name.as_str()],
            stack.name.replace('-', " "),
            format_rate(stack.amount),
        )?;
    }

    for node in graph.nodes() {
        for input in &node.inputs {
            // Ingredient may flow from a recipe node or a raw-material node;
            // either way its id is registered above. Producer recipes are
            // keyed by recipe name, so map the item to its producer first.
            let source = graph
                .nodes()
                .find(|n| n.recipe.product_amount(&input.name).is_some())
                .map(|n| n.recipe.name.as_str())
                .unwrap_or(input.name.as_str());
            writeln!(
                out,
                "    n{} -> n{} [label=\"{}/min\"];",
                ids[source],
                ids[node.recipe.name.as_str()],
                format_rate(input.amount),
            )?;
        }
    }

    writeln!(out, "}}")?;
    Ok(())
}
