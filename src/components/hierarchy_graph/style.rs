//! Visual encoding of nodes and edges.

use crate::hierarchy::{NodeType, Relationship, Status, SystemType};
use crate::view_state::ViewMode;

pub const BACKGROUND: &str = "#f7fafc";
pub const EDGE_COLOR: (u8, u8, u8) = (160, 174, 192);
pub const LABEL_COLOR: &str = "#2d3748";
pub const SELECTED_GLOW: (u8, u8, u8) = (59, 130, 246);
/// Extra world-space slack around a node's disc that still counts as a hit.
pub const HIT_SLACK: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeStyle {
	pub fill: &'static str,
	pub stroke: &'static str,
}

const fn style(fill: &'static str, stroke: &'static str) -> NodeStyle {
	NodeStyle { fill, stroke }
}

pub fn system_style(system_type: Option<SystemType>) -> NodeStyle {
	match system_type {
		Some(SystemType::WebServer) => style("#3b82f6", "#1d4ed8"),
		Some(SystemType::Database) => style("#059669", "#047857"),
		Some(SystemType::Application) => style("#7c3aed", "#5b21b6"),
		Some(SystemType::LoadBalancer) => style("#dc2626", "#b91c1c"),
		Some(SystemType::Cache) => style("#ea580c", "#c2410c"),
		_ => style("#4299e1", "#2b77ad"),
	}
}

pub fn status_style(status: Status) -> NodeStyle {
	match status {
		Status::Compliant => style("#48bb78", "#38a169"),
		Status::Warning => style("#ed8936", "#dd6b20"),
		Status::Critical => style("#f56565", "#e53e3e"),
		_ => style("#a0aec0", "#718096"),
	}
}

/// Fill and stroke of a node. Systems are coloured by role, categories and
/// subcategories by a fixed palette, everything else by compliance status.
pub fn node_style(node_type: NodeType, status: Status, system_type: Option<SystemType>) -> NodeStyle {
	match node_type {
		NodeType::System => system_style(system_type),
		NodeType::Category => style("#805ad5", "#553c9a"),
		NodeType::Subcategory => style("#38b2ac", "#2c7a7b"),
		NodeType::Feature | NodeType::Unknown => status_style(status),
	}
}

pub fn node_radius(mode: ViewMode, node_type: NodeType) -> f64 {
	if mode == ViewMode::LocationSystems {
		return 35.0;
	}
	match node_type {
		NodeType::System => 30.0,
		NodeType::Category => 20.0,
		NodeType::Subcategory => 15.0,
		_ => 10.0,
	}
}

pub fn stroke_width(selected: bool) -> f64 {
	if selected { 4.0 } else { 2.0 }
}

/// Canvas font for a node label.
pub fn label_font(mode: ViewMode, node_type: NodeType) -> String {
	let size = match (mode, node_type) {
		(ViewMode::LocationSystems, _) | (_, NodeType::System) => 13,
		(_, NodeType::Category) => 12,
		_ => 11,
	};
	let weight = match node_type {
		NodeType::System | NodeType::Category => 600,
		_ => 500,
	};
	format!("{weight} {size}px sans-serif")
}

/// Vertical distance from a node's centre to its label baseline.
pub fn label_offset(mode: ViewMode, node_type: NodeType) -> f64 {
	if mode == ViewMode::LocationSystems {
		return 50.0;
	}
	match node_type {
		NodeType::System => 45.0,
		NodeType::Category => 30.0,
		NodeType::Subcategory => 25.0,
		_ => 20.0,
	}
}

/// Dash pattern (dash, gap) for an edge; `None` draws a solid line.
pub fn edge_dash(relationship: Relationship) -> Option<(f64, f64)> {
	match relationship {
		Relationship::Contains => None,
		Relationship::Prerequisite => Some((6.0, 4.0)),
		Relationship::Related => Some((2.0, 3.0)),
	}
}
