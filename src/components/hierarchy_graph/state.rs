use std::collections::HashSet;

use log::debug;

use super::style::{HIT_SLACK, label_offset, node_radius};
use crate::camera::{Bounds, Camera, CameraCommand, ViewTransform, ZOOM_STEP};
use crate::graph_builder::{VisibleGraph, VisibleNode};
use crate::layout::{LayoutConfig, LayoutNode, Simulation};
use crate::view_state::ViewMode;

/// Pointer travel, in screen pixels, beyond which a press is a drag.
pub const CLICK_TOLERANCE: f64 = 3.0;

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<usize>,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start: ViewTransform,
}

/// Neighbourhood drawn in full while the rest of the graph is dimmed. The
/// hovered node wins over the selected one; with neither, the last focus
/// stays until `strength` has faded out.
#[derive(Clone, Debug, Default)]
pub struct FocusState {
	pub hovered: Option<usize>,
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
	/// Eased 0..1 emphasis.
	pub strength: f64,
}

const FOCUS_RISE: f64 = 1.8;
const FOCUS_FALL: f64 = 1.26;

/// Everything the canvas needs between frames: the visible graph, its
/// running layout, the camera and pointer interaction state.
pub struct GraphSurface {
	pub graph: VisibleGraph,
	pub simulation: Simulation,
	pub camera: Camera,
	pub drag: DragState,
	pub pan: PanState,
	pub focus: FocusState,
	pub selected: Option<String>,
	pub width: f64,
	pub height: f64,
	config: LayoutConfig,
	clock_ms: f64,
	fit_pending: bool,
	fit_at_ms: Option<f64>,
}

impl GraphSurface {
	pub fn new(config: LayoutConfig, width: f64, height: f64) -> Self {
		let graph = VisibleGraph::empty(ViewMode::LocationSystems);
		let simulation = Simulation::new(
			&graph,
			&config,
			(width / 2.0, height / 2.0),
			&Default::default(),
		);
		Self {
			graph,
			simulation,
			camera: Camera::new(width, height),
			drag: DragState::default(),
			pan: PanState::default(),
			focus: FocusState::default(),
			selected: None,
			width,
			height,
			config,
			clock_ms: 0.0,
			fit_pending: false,
			fit_at_ms: None,
		}
	}

	/// Replace the visible graph and restart the layout. Positions of nodes
	/// that stay visible carry over; the previous simulation is dropped. An
	/// unchanged graph keeps its simulation and only gets reheated.
	pub fn load(&mut self, graph: VisibleGraph) {
		if graph == self.graph {
			self.simulation.reheat();
			return;
		}
		let previous = self.simulation.positions();
		self.simulation = Simulation::new(
			&graph,
			&self.config,
			(self.width / 2.0, self.height / 2.0),
			&previous,
		);
		self.graph = graph;
		self.drag = DragState::default();
		self.focus = FocusState::default();
		self.refocus();
		self.fit_pending = !self.graph.is_empty();
		self.fit_at_ms = None;
		debug!(
			"surface: loaded {} nodes, {} edges",
			self.graph.nodes.len(),
			self.graph.edges.len()
		);
	}

	pub fn set_selected(&mut self, selected: Option<String>) {
		self.selected = selected;
		self.refocus();
	}

	pub fn is_selected(&self, idx: usize) -> bool {
		self.selected
			.as_deref()
			.is_some_and(|id| self.simulation.nodes().get(idx).is_some_and(|n| n.id == id))
	}

	/// Layout node `idx` together with its source node.
	pub fn node(&self, idx: usize) -> Option<(&LayoutNode, &VisibleNode)> {
		Some((self.simulation.nodes().get(idx)?, self.graph.nodes.get(idx)?))
	}

	pub fn radius(&self, idx: usize) -> f64 {
		self.simulation
			.nodes()
			.get(idx)
			.map(|n| node_radius(self.graph.mode, n.node_type))
			.unwrap_or_default()
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.camera.transform().screen_to_graph(sx, sy);
		let mut found = None;
		for (idx, node) in self.simulation.nodes().iter().enumerate() {
			let (dx, dy) = (node.x - gx, node.y - gy);
			// Later nodes are drawn on top, so the last hit wins.
			if (dx * dx + dy * dy).sqrt() < self.radius(idx) + HIT_SLACK {
				found = Some(idx);
			}
		}
		found
	}

	/// Box around every rendered node and its label. `None` when nothing is
	/// visible.
	pub fn bounds(&self) -> Option<Bounds> {
		let mode = self.graph.mode;
		Bounds::around_circles(self.simulation.nodes().iter().map(|n| {
			let reach = node_radius(mode, n.node_type).max(label_offset(mode, n.node_type));
			(n.x, n.y, reach)
		}))
	}

	pub fn fit_to_screen(&mut self) {
		if self.camera.fit(self.bounds(), self.clock_ms) {
			debug!("surface: fitting {:?}", self.camera.transform());
		}
	}

	pub fn apply(&mut self, command: CameraCommand) {
		let now = self.clock_ms;
		match command {
			CameraCommand::ZoomIn => self.camera.zoom_by(ZOOM_STEP, now),
			CameraCommand::ZoomOut => self.camera.zoom_by(1.0 / ZOOM_STEP, now),
			CameraCommand::FitToScreen => self.fit_to_screen(),
			CameraCommand::ResetView => self.camera.reset(now),
		}
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		if let Some(idx) = self.node_at_position(sx, sy) {
			let node = &self.simulation.nodes()[idx];
			self.drag = DragState {
				active: true,
				node_idx: Some(idx),
				moved: false,
				start_x: sx,
				start_y: sy,
				node_start_x: node.x,
				node_start_y: node.y,
			};
			self.simulation.drag_start(idx);
		} else {
			let transform = self.camera.transform();
			self.camera.set(transform);
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				transform_start: transform,
			};
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if !self.drag.active {
			let hovered = self.node_at_position(sx, sy);
			self.set_hover(hovered);
		}

		if self.drag.active {
			let Some(idx) = self.drag.node_idx else {
				return;
			};
			let (dx, dy) = (sx - self.drag.start_x, sy - self.drag.start_y);
			if (dx * dx + dy * dy).sqrt() > CLICK_TOLERANCE {
				self.drag.moved = true;
			}
			if self.drag.moved {
				let k = self.camera.transform().k;
				self.simulation.drag_to(
					idx,
					self.drag.node_start_x + dx / k,
					self.drag.node_start_y + dy / k,
				);
			}
		} else if self.pan.active {
			let start = self.pan.transform_start;
			self.camera.set(ViewTransform {
				x: start.x + (sx - self.pan.start_x),
				y: start.y + (sy - self.pan.start_y),
				k: start.k,
			});
		}
	}

	/// End the current press. Returns the id of the node that was clicked,
	/// if the press was on a node and did not turn into a drag.
	pub fn pointer_up(&mut self) -> Option<String> {
		let clicked = match (&self.drag, self.drag.node_idx) {
			(drag, Some(idx)) if drag.active && !drag.moved => {
				self.simulation.nodes().get(idx).map(|n| n.id.clone())
			}
			_ => None,
		};
		self.release();
		clicked
	}

	pub fn pointer_leave(&mut self) {
		self.release();
		self.set_hover(None);
	}

	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let next = self.camera.transform().scaled_about(sx, sy, factor);
		self.camera.set(next);
	}

	fn release(&mut self) {
		if let Some(idx) = self.drag.node_idx.take() {
			self.simulation.drag_end(idx);
		}
		self.drag = DragState::default();
		self.pan.active = false;
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.focus.hovered != node {
			self.focus.hovered = node;
			self.refocus();
		}
	}

	fn refocus(&mut self) {
		let target = self.focus.hovered.or_else(|| {
			self.selected
				.as_deref()
				.and_then(|id| self.simulation.index_of(id))
		});
		if target.is_none() || target == self.focus.node {
			return;
		}
		self.focus.node = target;
		self.focus.neighbors = self
			.simulation
			.links()
			.filter_map(|(s, t)| match target {
				Some(idx) if s == idx => Some(t),
				Some(idx) if t == idx => Some(s),
				_ => None,
			})
			.collect();
	}

	fn focus_wanted(&self) -> bool {
		self.focus.hovered.is_some()
			|| self
				.selected
				.as_deref()
				.is_some_and(|id| self.simulation.index_of(id).is_some())
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.focus.node == Some(idx) || self.focus.neighbors.contains(&idx)
	}

	pub fn is_focused(&self, idx: usize) -> bool {
		self.focus.node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.focus.node.is_some()
	}

	/// Advance one animation frame at time `now_ms`: one layout step, the
	/// camera transition, the focus fade and any pending auto-fit.
	pub fn tick(&mut self, now_ms: f64) {
		let dt = if self.clock_ms > 0.0 {
			((now_ms - self.clock_ms) / 1000.0).clamp(0.0, 0.1)
		} else {
			0.016
		};
		self.clock_ms = now_ms;

		if !self.simulation.is_settled() {
			self.simulation.tick();
			if self.simulation.is_settled() {
				debug!("surface: layout settled");
			}
		}
		self.camera.advance(now_ms);

		if std::mem::take(&mut self.fit_pending) {
			self.fit_at_ms = Some(now_ms + self.config.fit_delay_ms);
		}
		if self.fit_at_ms.is_some_and(|at| now_ms >= at) {
			self.fit_at_ms = None;
			self.fit_to_screen();
		}

		let (goal, rate) = if self.focus_wanted() {
			(1.0, FOCUS_RISE)
		} else {
			(0.0, FOCUS_FALL)
		};
		self.focus.strength += (goal - self.focus.strength) * (rate * dt).min(1.0);
		if goal == 0.0 && self.focus.strength < 0.01 {
			self.focus = FocusState::default();
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.camera.set_viewport(width, height);
		self.simulation.set_center(width / 2.0, height / 2.0);
	}
}
