//! Interactive canvas view of the visible hierarchy.

mod commands;
mod component;
mod render;
mod state;
pub mod style;

pub use commands::GraphCommands;
pub use component::HierarchyGraphCanvas;
