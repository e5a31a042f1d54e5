use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::LayoutConfig;
use crate::graph_builder::VisibleGraph;
use crate::hierarchy::NodeType;

const INITIAL_RADIUS: f64 = 10.0;

/// Golden-angle step used to spread unplaced nodes on a spiral.
fn initial_angle() -> f64 {
	PI * (3.0 - 5f64.sqrt())
}

/// Offset of the `i`-th point on the placement spiral.
fn spiral(i: usize) -> (f64, f64) {
	let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
	let angle = i as f64 * initial_angle();
	(radius * angle.cos(), radius * angle.sin())
}

/// A visible node while the layout is running.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
	/// Hierarchy node id.
	pub id: String,
	/// Drives mass and collision radius.
	pub node_type: NodeType,
	/// Current x.
	pub x: f64,
	/// Current y.
	pub y: f64,
	/// Pinned x, set while the node is dragged.
	pub fx: Option<f64>,
	/// Pinned y.
	pub fy: Option<f64>,
	/// Collision radius.
	pub radius: f64,
}

#[derive(Clone, Debug)]
struct Link {
	source: usize,
	target: usize,
	distance: f64,
	strength: f64,
	bias: f64,
}

/// Force layout of one visible graph.
///
/// Each step runs the `force_graph` integrator (pairwise repulsion scaled by
/// node mass, link springs, damping) and then three position passes it has
/// no notion of: links relax towards their rest length, overlapping nodes
/// are pushed apart, and the whole layout is recentred. Both the integrator
/// step and the passes are scaled by `alpha`, which decays towards
/// `alpha_target` so the layout cools and stops.
///
/// A new visible set gets a new simulation, seeded from the previous one's
/// positions.
pub struct Simulation {
	graph: ForceGraph<usize, ()>,
	nodes: Vec<LayoutNode>,
	links: Vec<Link>,
	index: HashMap<String, usize>,
	center: (f64, f64),
	time_step: f32,
	alpha: f64,
	alpha_start: f64,
	alpha_target: f64,
	alpha_min: f64,
	alpha_decay: f64,
	drag_alpha_target: f64,
	rng: StdRng,
}

impl Simulation {
	/// Build a simulation for `graph` centred on `center`.
	///
	/// Nodes found in `previous` keep their old position. Other nodes start
	/// next to an already placed neighbour when there is one, else at their
	/// seed, else on a spiral around the centre.
	pub fn new(
		graph: &VisibleGraph,
		config: &LayoutConfig,
		center: (f64, f64),
		previous: &HashMap<String, (f64, f64)>,
	) -> Self {
		let mode = graph.mode;
		let index: HashMap<String, usize> = graph
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.node.id.clone(), i))
			.collect();

		let mut links = Vec::with_capacity(graph.edges.len());
		let mut count = vec![0usize; graph.nodes.len()];
		for edge in &graph.edges {
			let (Some(&source), Some(&target)) = (index.get(&edge.source), index.get(&edge.target))
			else {
				continue;
			};
			if source == target {
				continue;
			}
			count[source] += 1;
			count[target] += 1;
			links.push(Link {
				source,
				target,
				distance: config.link_distance(mode, graph.nodes[source].node.level),
				strength: 0.0,
				bias: 0.0,
			});
		}
		for link in &mut links {
			let (cs, ct) = (count[link.source] as f64, count[link.target] as f64);
			link.strength = 1.0 / cs.min(ct);
			link.bias = cs / (cs + ct);
		}

		let mut placed: Vec<Option<(f64, f64)>> = graph
			.nodes
			.iter()
			.map(|n| previous.get(&n.node.id).copied())
			.collect();
		let reused = placed.iter().flatten().count();
		for i in 0..placed.len() {
			if placed[i].is_some() {
				continue;
			}
			let anchor = links.iter().find_map(|l| {
				let other = if l.source == i {
					l.target
				} else if l.target == i {
					l.source
				} else {
					return None;
				};
				placed[other]
			});
			let (dx, dy) = spiral(i);
			placed[i] = Some(match (anchor, graph.nodes[i].seed) {
				(Some((ax, ay)), _) => (ax + dx, ay + dy),
				(None, Some(seed)) => seed,
				(None, None) => (center.0 + dx, center.1 + dy),
			});
		}

		let mut force_graph = ForceGraph::new(SimulationParameters {
			force_charge: config.force_charge,
			force_spring: config.force_spring,
			force_max: config.force_max,
			node_speed: config.node_speed,
			damping_factor: config.damping_factor,
		});
		let mut handles = Vec::with_capacity(graph.nodes.len());
		let mut nodes = Vec::with_capacity(graph.nodes.len());
		for (slot, (n, pos)) in graph.nodes.iter().zip(placed).enumerate() {
			let (x, y) = pos.unwrap_or(center);
			handles.push(force_graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: config.mass(mode, n.node.node_type),
				is_anchor: false,
				user_data: slot,
			}));
			nodes.push(LayoutNode {
				id: n.node.id.clone(),
				node_type: n.node.node_type,
				x,
				y,
				fx: None,
				fy: None,
				radius: config.collide_radius(mode, n.node.node_type),
			});
		}
		for link in &links {
			force_graph.add_edge(handles[link.source], handles[link.target], EdgeData::default());
		}

		debug!(
			"layout: new simulation with {} nodes ({} reused), {} links",
			nodes.len(),
			reused,
			links.len()
		);

		Self {
			graph: force_graph,
			alpha: if nodes.is_empty() { 0.0 } else { config.alpha },
			nodes,
			links,
			index,
			center,
			time_step: config.time_step,
			alpha_start: config.alpha,
			alpha_target: 0.0,
			alpha_min: config.alpha_min,
			alpha_decay: config.alpha_decay,
			drag_alpha_target: config.drag_alpha_target,
			rng: StdRng::seed_from_u64(config.seed),
		}
	}

	/// Nodes in input order.
	pub fn nodes(&self) -> &[LayoutNode] {
		&self.nodes
	}

	/// Node by id.
	pub fn node(&self, id: &str) -> Option<&LayoutNode> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	/// Slot of a node, for the drag calls.
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Link endpoints as node indices.
	pub fn links(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
		self.links.iter().map(|l| (l.source, l.target))
	}

	/// Current energy.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Whether the layout has cooled and nothing is holding it warm.
	pub fn is_settled(&self) -> bool {
		self.nodes.is_empty() || (self.alpha < self.alpha_min && self.alpha_target < self.alpha_min)
	}

	/// Current node positions keyed by id.
	pub fn positions(&self) -> HashMap<String, (f64, f64)> {
		self.nodes
			.iter()
			.map(|n| (n.id.clone(), (n.x, n.y)))
			.collect()
	}

	/// Move the point the layout is pulled towards.
	pub fn set_center(&mut self, x: f64, y: f64) {
		self.center = (x, y);
	}

	/// Bring a cooled layout back to its starting energy without moving
	/// anything.
	pub fn reheat(&mut self) {
		if !self.nodes.is_empty() {
			self.alpha = self.alpha.max(self.alpha_start);
		}
	}

	/// Pin a node at its current position and keep the simulation warm.
	pub fn drag_start(&mut self, idx: usize) {
		let Some(node) = self.nodes.get_mut(idx) else {
			return;
		};
		node.fx = Some(node.x);
		node.fy = Some(node.y);
		self.alpha_target = self.drag_alpha_target;
	}

	/// Move a dragged node to `(x, y)` in graph coordinates.
	pub fn drag_to(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fx = Some(x);
			node.fy = Some(y);
		}
	}

	/// Release a dragged node back into the free simulation.
	pub fn drag_end(&mut self, idx: usize) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fx = None;
			node.fy = None;
		}
		self.alpha_target = 0.0;
	}

	/// Advance the simulation by one step.
	pub fn tick(&mut self) {
		if self.nodes.is_empty() {
			return;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
		let alpha = self.alpha;
		let heat = if self.alpha_start > 0.0 {
			(alpha / self.alpha_start).min(1.0)
		} else {
			0.0
		};

		self.push_to_graph();
		self.graph.update(self.time_step * heat as f32);
		let nodes = &mut self.nodes;
		self.graph.visit_nodes(|n| {
			if let Some(node) = nodes.get_mut(n.data.user_data) {
				node.x = f64::from(n.x());
				node.y = f64::from(n.y());
			}
		});

		self.relax_links(alpha);
		self.separate_overlaps();
		self.recenter();
		for node in &mut self.nodes {
			if let (Some(fx), Some(fy)) = (node.fx, node.fy) {
				node.x = fx;
				node.y = fy;
			}
		}
	}

	/// Tick until settled or `max_ticks` is reached. Returns ticks run.
	pub fn run(&mut self, max_ticks: usize) -> usize {
		let mut ticks = 0;
		while !self.is_settled() && ticks < max_ticks {
			self.tick();
			ticks += 1;
		}
		ticks
	}

	/// Copy positions and pins into the integrator. Pinned nodes are anchors
	/// there, so it never moves them.
	fn push_to_graph(&mut self) {
		let nodes = &self.nodes;
		self.graph.visit_nodes_mut(|n| {
			if let Some(node) = nodes.get(n.data.user_data) {
				n.data.x = node.x as f32;
				n.data.y = node.y as f32;
				n.data.is_anchor = node.fx.is_some();
			}
		});
	}

	fn jiggle(&mut self) -> f64 {
		(self.rng.r#gen::<f64>() - 0.5) * 1e-6
	}

	fn relax_links(&mut self, alpha: f64) {
		for li in 0..self.links.len() {
			let Link {
				source,
				target,
				distance,
				strength,
				bias,
			} = self.links[li];
			let (s, t) = (&self.nodes[source], &self.nodes[target]);
			let mut x = t.x - s.x;
			let mut y = t.y - s.y;
			if x == 0.0 {
				x = self.jiggle();
			}
			if y == 0.0 {
				y = self.jiggle();
			}
			let len = (x * x + y * y).sqrt();
			let l = (len - distance) / len * alpha * strength;
			x *= l;
			y *= l;

			let t = &mut self.nodes[target];
			t.x -= x * bias;
			t.y -= y * bias;
			let s = &mut self.nodes[source];
			s.x += x * (1.0 - bias);
			s.y += y * (1.0 - bias);
		}
	}

	fn separate_overlaps(&mut self) {
		let n = self.nodes.len();
		for i in 0..n {
			let ri = self.nodes[i].radius;
			if ri <= 0.0 {
				continue;
			}
			let ri2 = ri * ri;
			for j in (i + 1)..n {
				let rj = self.nodes[j].radius;
				let r = ri + rj;
				let mut x = self.nodes[i].x - self.nodes[j].x;
				let mut y = self.nodes[i].y - self.nodes[j].y;
				let mut l = x * x + y * y;
				if l >= r * r {
					continue;
				}
				if x == 0.0 {
					x = self.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.jiggle();
					l += y * y;
				}
				let len = l.sqrt();
				let push = (r - len) / len;
				x *= push;
				y *= push;
				let rj2 = rj * rj;
				let share = rj2 / (ri2 + rj2);
				self.nodes[i].x += x * share;
				self.nodes[i].y += y * share;
				self.nodes[j].x -= x * (1.0 - share);
				self.nodes[j].y -= y * (1.0 - share);
			}
		}
	}

	fn recenter(&mut self) {
		let n = self.nodes.len() as f64;
		let (sx, sy) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let (dx, dy) = (sx / n - self.center.0, sy / n - self.center.1);
		for node in &mut self.nodes {
			node.x -= dx;
			node.y -= dy;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph_builder::VisibleNode;
	use crate::hierarchy::{
		HierarchyEdge, HierarchyNode, Relationship, StaticHierarchy, Status,
	};
	use crate::view_state::{ViewMode, ViewState};

	fn node(id: &str, node_type: NodeType, level: u8, seed: Option<(f64, f64)>) -> VisibleNode {
		VisibleNode {
			node: HierarchyNode {
				id: id.into(),
				node_type,
				name: id.into(),
				status: Status::Unknown,
				level,
				parent: None,
				description: None,
				annexure: None,
				details: Default::default(),
			},
			system_type: None,
			seed,
		}
	}

	fn contains(source: &str, target: &str) -> HierarchyEdge {
		HierarchyEdge {
			source: source.into(),
			target: target.into(),
			relationship: Relationship::Contains,
		}
	}

	fn chain() -> VisibleGraph {
		VisibleGraph {
			mode: ViewMode::SystemDetails,
			nodes: vec![
				node("sys", NodeType::System, 0, None),
				node("cat", NodeType::Category, 1, None),
				node("sub", NodeType::Subcategory, 2, None),
			],
			edges: vec![contains("sys", "cat"), contains("cat", "sub")],
		}
	}

	fn springs_only() -> LayoutConfig {
		LayoutConfig {
			force_charge: 0.0,
			force_spring: 0.0,
			collide_radius_by_type: [0.0; 3],
			..LayoutConfig::default()
		}
	}

	fn distance(sim: &Simulation, a: &str, b: &str) -> f64 {
		let (a, b) = (sim.node(a).unwrap(), sim.node(b).unwrap());
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	#[test]
	fn links_converge_to_configured_distance() {
		let mut sim = Simulation::new(&chain(), &springs_only(), (400.0, 300.0), &HashMap::new());
		let ticks = sim.run(5_000);
		assert!(sim.is_settled());
		assert!(ticks < 1_000, "took {ticks} ticks");
		assert!((distance(&sim, "sys", "cat") - 150.0).abs() < 1.0);
		assert!((distance(&sim, "cat", "sub") - 120.0).abs() < 1.0);
	}

	#[test]
	fn layout_stays_centred() {
		let mut sim = Simulation::new(&chain(), &springs_only(), (400.0, 300.0), &HashMap::new());
		sim.run(5_000);
		let n = sim.nodes().len() as f64;
		let mx = sim.nodes().iter().map(|n| n.x).sum::<f64>() / n;
		let my = sim.nodes().iter().map(|n| n.y).sum::<f64>() / n;
		assert!((mx - 400.0).abs() < 1.0 && (my - 300.0).abs() < 1.0);
	}

	#[test]
	fn collision_separates_overlapping_nodes() {
		let graph = VisibleGraph {
			mode: ViewMode::LocationSystems,
			nodes: vec![
				node("a", NodeType::System, 0, Some((100.0, 100.0))),
				node("b", NodeType::System, 0, Some((105.0, 100.0))),
			],
			edges: vec![],
		};
		let config = LayoutConfig {
			force_charge: 0.0,
			..LayoutConfig::default()
		};
		let mut sim = Simulation::new(&graph, &config, (100.0, 100.0), &HashMap::new());
		sim.run(5_000);
		assert!(distance(&sim, "a", "b") >= 79.0);
	}

	#[test]
	fn same_seed_same_layout() {
		let repo = StaticHierarchy::embedded().unwrap();
		let mut state = ViewState::new();
		state.select_location(&repo, "delhi");
		state.click_node(&repo, "delhi-db-01");
		state.click_node(&repo, "filesystem");
		let graph = VisibleGraph::build(&state, &repo, 800.0, 600.0);

		let config = LayoutConfig::default();
		let mut a = Simulation::new(&graph, &config, (400.0, 300.0), &HashMap::new());
		let mut b = Simulation::new(&graph, &config, (400.0, 300.0), &HashMap::new());
		a.run(5_000);
		b.run(5_000);
		assert_eq!(a.nodes(), b.nodes());
		assert!(a.nodes().iter().all(|n| n.x.is_finite() && n.y.is_finite()));
	}

	#[test]
	fn empty_graph_is_settled() {
		let graph = VisibleGraph::empty(ViewMode::SystemDetails);
		let mut sim = Simulation::new(&graph, &LayoutConfig::default(), (0.0, 0.0), &HashMap::new());
		assert!(sim.is_settled());
		sim.tick();
		assert_eq!(sim.run(10), 0);
	}

	#[test]
	fn previous_positions_are_reused_and_new_nodes_spawn_near_neighbours() {
		let previous = HashMap::from([("sys".to_owned(), (50.0, 60.0))]);
		let sim = Simulation::new(&chain(), &springs_only(), (400.0, 300.0), &previous);
		let sys = sim.node("sys").unwrap();
		assert_eq!((sys.x, sys.y), (50.0, 60.0));
		let cat = sim.node("cat").unwrap();
		assert!(((cat.x - 50.0).powi(2) + (cat.y - 60.0).powi(2)).sqrt() < 30.0);
	}

	#[test]
	fn reheat_wakes_a_settled_layout_in_place() {
		let mut sim = Simulation::new(&chain(), &springs_only(), (400.0, 300.0), &HashMap::new());
		sim.run(5_000);
		let settled = sim.positions();
		sim.reheat();
		assert!(!sim.is_settled());
		assert_eq!(sim.positions(), settled);
		sim.run(5_000);
		assert!(sim.is_settled());
		assert!((distance(&sim, "sys", "cat") - 150.0).abs() < 1.0);
	}

	#[test]
	fn repulsion_spreads_unlinked_nodes() {
		let graph = VisibleGraph {
			mode: ViewMode::LocationSystems,
			nodes: vec![
				node("a", NodeType::System, 0, Some((395.0, 300.0))),
				node("b", NodeType::System, 0, Some((405.0, 300.0))),
			],
			edges: vec![],
		};
		let config = LayoutConfig {
			flat_collide_radius: 0.0,
			..LayoutConfig::default()
		};
		let mut sim = Simulation::new(&graph, &config, (400.0, 300.0), &HashMap::new());
		sim.run(5_000);
		assert!(distance(&sim, "a", "b") > 10.0);
	}

	#[test]
	fn dragged_node_is_pinned_until_release() {
		let mut sim = Simulation::new(&chain(), &springs_only(), (400.0, 300.0), &HashMap::new());
		sim.run(5_000);
		let idx = sim.index_of("cat").unwrap();
		sim.drag_start(idx);
		sim.drag_to(idx, 10.0, 20.0);
		for _ in 0..200 {
			sim.tick();
		}
		assert!(!sim.is_settled());
		let cat = sim.node("cat").unwrap();
		assert_eq!((cat.x, cat.y), (10.0, 20.0));

		sim.drag_end(idx);
		assert!(sim.node("cat").unwrap().fx.is_none());
		sim.run(5_000);
		assert!(sim.is_settled());
	}
}
