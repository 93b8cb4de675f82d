//! Typed errors for loading and resolution

use thiserror::Error;

/// A recipe record failed validation at the database boundary.
///
/// These are data-integrity problems; the load aborts on the first one.
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("recipe record #{index} has no name")]
    MissingName { index: usize },

    #[error("recipe \"{name}\": crafting time must be positive, got {energy}")]
    InvalidEnergy { name: String, energy: f64 },

    #[error("recipe \"{name}\" declares no products")]
    NoProducts { name: String },

    #[error("recipe \"{name}\": amount for \"{item}\" must be positive, got {amount}")]
    InvalidAmount {
        name: String,
        item: String,
        amount: f64,
    },

    #[error("recipe \"{name}\": unknown crafting category \"{category}\"")]
    UnknownCategory { name: String, category: String },

    #[error("ambiguous recipe: \"{name}\" is declared more than once")]
    DuplicateRecipe { name: String },

    #[error("recipe dump is not valid JSON: {message}")]
    MalformedDump { message: String },
}

/// A resolve call failed. No partial graph is returned.
#[derive(Debug, Error, PartialEq)]
pub enum ResolveError {
    /// The item has no producing recipe and is not a declared raw material.
    /// `chain` is the consumer chain from the top-level target down to the
    /// offending item.
    #[error("no recipe produces \"{item}\" and it is not a known raw material (demanded via {})", chain.join(" -> "))]
    UnknownItem { item: String, chain: Vec<String> },

    /// A recipe is, directly or transitively, an ingredient of itself.
    /// Recipe names are listed in encounter order.
    #[error("recipe dependency cycle: {}", names.join(" -> "))]
    CyclicRecipe { names: Vec<String> },

    #[error("target rate for \"{item}\" must be positive, got {rate}")]
    InvalidRate { item: String, rate: f64 },
}
