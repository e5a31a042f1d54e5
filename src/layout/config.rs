use serde::Deserialize;

use crate::hierarchy::NodeType;
use crate::view_state::ViewMode;

/// Physics parameters of the layout.
///
/// The `force_*`, `node_speed` and `damping_factor` fields feed the
/// `force_graph` integrator. Rest lengths, collision radii and the `alpha`
/// schedule drive the passes run after each integrator step.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	/// Link length between sibling systems in the location view.
	pub flat_link_distance: f64,
	/// Link length by source level in the details view: level 0, level 1,
	/// and anything deeper.
	pub link_distance_by_level: [f64; 3],
	/// Node mass in the location view.
	pub flat_mass: f32,
	/// Node mass by type in the details view: system, category, other.
	/// Heavier nodes push harder and move less.
	pub mass_by_type: [f32; 3],
	/// Collision radius in the location view.
	pub flat_collide_radius: f64,
	/// Collision radius by node type in the details view: system, category,
	/// other.
	pub collide_radius_by_type: [f64; 3],
	/// Repulsion between every pair of nodes.
	pub force_charge: f32,
	/// Attraction along every link.
	pub force_spring: f32,
	/// Cap on the force applied to a node in one step.
	pub force_max: f32,
	/// Cap on node speed.
	pub node_speed: f32,
	/// Fraction of velocity kept per step.
	pub damping_factor: f32,
	/// Integrator step at full energy, in seconds.
	pub time_step: f32,
	/// Starting energy of a fresh layout.
	pub alpha: f64,
	/// Energy below which the layout counts as settled.
	pub alpha_min: f64,
	/// Per-tick cooling rate. Alpha moves this share of the way to its target
	/// on every tick.
	pub alpha_decay: f64,
	/// Energy the simulation is held at while a node is being dragged.
	pub drag_alpha_target: f64,
	/// Delay before the camera fits the graph after the visible set changes.
	pub fit_delay_ms: f64,
	/// Seed for the jitter applied to coincident nodes.
	pub seed: u64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			flat_link_distance: 200.0,
			link_distance_by_level: [150.0, 120.0, 80.0],
			flat_mass: 16.0,
			mass_by_type: [16.0, 10.0, 6.0],
			flat_collide_radius: 40.0,
			collide_radius_by_type: [35.0, 25.0, 20.0],
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			time_step: 0.016,
			alpha: 0.8,
			alpha_min: 0.001,
			alpha_decay: 0.01,
			drag_alpha_target: 0.1,
			fit_delay_ms: 1000.0,
			seed: 0x5eed,
		}
	}
}

fn by_type<T: Copy>(values: &[T; 3], node_type: NodeType) -> T {
	match node_type {
		NodeType::System => values[0],
		NodeType::Category => values[1],
		_ => values[2],
	}
}

impl LayoutConfig {
	/// Rest length of a link leaving a node at `source_level`.
	pub fn link_distance(&self, mode: ViewMode, source_level: u8) -> f64 {
		match mode {
			ViewMode::LocationSystems => self.flat_link_distance,
			ViewMode::SystemDetails => {
				self.link_distance_by_level[usize::from(source_level).min(2)]
			}
		}
	}

	/// Mass of a node of `node_type` under `mode`.
	pub fn mass(&self, mode: ViewMode, node_type: NodeType) -> f32 {
		match mode {
			ViewMode::LocationSystems => self.flat_mass,
			ViewMode::SystemDetails => by_type(&self.mass_by_type, node_type),
		}
	}

	/// Collision radius of a node of `node_type` under `mode`.
	pub fn collide_radius(&self, mode: ViewMode, node_type: NodeType) -> f64 {
		match mode {
			ViewMode::LocationSystems => self.flat_collide_radius,
			ViewMode::SystemDetails => by_type(&self.collide_radius_by_type, node_type),
		}
	}
}
