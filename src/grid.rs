//! Grid navigation problems and their terminal rendering.

pub mod render;
pub mod world;

pub use render::{glyph, render_policy_grid};
pub use world::GridWorld;
