//! Tabular report of a resolved demand graph

use std::fmt::Write;

use crate::models::DemandGraph;

/// Format a rate for the IPM column: whole numbers without decimals,
/// fractional rates with one.
fn format_rate(rate: f64) -> String {
    if (rate - rate.round()).abs() < 1e-9 {
        format!("{}", rate.round() as i64)
    } else {
        format!("{:.1}", rate)
    }
}

fn display_name(name: &str) -> String {
    name.replace('-', " ")
}

/// Render the demand graph as the terminal table: one row per recipe,
/// sorted ascending by required rate, followed by the raw-material inputs.
pub fn format_table(graph: &DemandGraph) -> String {
    let mut rows: Vec<_> = graph.nodes().collect();
    rows.sort_by(|a, b| {
        a.rate
            .partial_cmp(&b.rate)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.recipe.name.cmp(&b.recipe.name))
    });

    let name_width = rows
        .iter()
        .map(|node| node.recipe.name.len())
        .chain(std::iter::once("RECIPE".len()))
        .max()
        .unwrap_or(0)
        + 2;

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>8} {:<width$}      {}",
        "IPM",
        "RECIPE",
        "MACHINE",
        width = name_width
    );

    for node in rows {
        let _ = writeln!(
            out,
            "{:>8} {:<width$}->{:>5} {}",
            format_rate(node.rate),
            display_name(&node.recipe.name),
            node.machine_count,
            node.machine.display_name(),
            width = name_width
        );
    }

    if !graph.raw_inputs().is_empty() {
        let mut raw: Vec<_> = graph.raw_inputs().to_vec();
        raw.sort_by(|a, b| {
            a.amount
                .partial_cmp(&b.amount)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });

        let _ = writeln!(out);
        let _ = writeln!(out, "RAW INPUTS (items/min)");
        for stack in raw {
            let _ = writeln!(
                out,
                "{:>8} {}",
                format_rate(stack.amount),
                display_name(&stack.name)
            );
        }
    }

    out
}
