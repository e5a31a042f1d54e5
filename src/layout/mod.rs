//! Force-directed layout of the visible graph.

mod config;
mod simulation;

pub use config::LayoutConfig;
pub use simulation::{LayoutNode, Simulation};
