//! Static location → system → category → subcategory → feature dataset.

mod error;
mod graph;
mod model;
mod repository;

pub use error::HierarchyError;
pub use graph::SystemGraph;
pub use model::{
	HierarchyEdge, HierarchyNode, Location, NodeType, Relationship, Status, StatusSummary,
	System, SystemProfile, SystemType, Vulnerabilities,
};
pub use repository::{HierarchyRepository, StaticHierarchy};
