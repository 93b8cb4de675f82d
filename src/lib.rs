//! Factorize
//!
//! A production planning calculator for Factorio: given recipes extracted
//! from the game's data dump and a set of target items with desired rates
//! (items per minute), it resolves the full chain of intermediate products
//! and computes how many crafting machines of each kind are required.

pub mod database;
pub mod error;
pub mod extract;
pub mod machines;
pub mod models;
pub mod render;
pub mod report;
pub mod resolver;
