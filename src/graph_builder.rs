//! Projects the [`ViewState`] onto the hierarchy to get the subgraph on screen.

use std::collections::HashSet;

use crate::hierarchy::{HierarchyEdge, HierarchyNode, HierarchyRepository, SystemType};
use crate::view_state::{ViewMode, ViewState};

/// A node selected for display, plus what rendering and layout need to know
/// beyond the hierarchy itself.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleNode {
	/// The hierarchy node itself.
	pub node: HierarchyNode,
	/// Set for system nodes; drives their colour.
	pub system_type: Option<SystemType>,
	/// Initial position hint for the layout.
	pub seed: Option<(f64, f64)>,
}

/// The visible node and edge subset for one view state.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleGraph {
	/// View this graph was built for.
	pub mode: ViewMode,
	/// Visible nodes in hierarchy order.
	pub nodes: Vec<VisibleNode>,
	/// Edges whose endpoints are both visible.
	pub edges: Vec<HierarchyEdge>,
}

impl VisibleGraph {
	/// Graph with nothing to show.
	pub fn empty(mode: ViewMode) -> Self {
		Self {
			mode,
			nodes: Vec::new(),
			edges: Vec::new(),
		}
	}

	/// Compute the visible subgraph for `state`.
	///
	/// In the location view every system of the selected location is shown
	/// as an unconnected level-0 node, seeded evenly across `width`. In the
	/// details view the root is always shown, together with every one-hop
	/// neighbour of each expanded node. Expansion never reveals more than
	/// one hop: grandchildren stay hidden until their parent is expanded.
	pub fn build(
		state: &ViewState,
		repo: &dyn HierarchyRepository,
		width: f64,
		height: f64,
	) -> Self {
		match state.current_view() {
			ViewMode::LocationSystems => Self::location_systems(state, repo, width, height),
			ViewMode::SystemDetails => Self::system_details(state, repo),
		}
	}

	fn location_systems(
		state: &ViewState,
		repo: &dyn HierarchyRepository,
		width: f64,
		height: f64,
	) -> Self {
		let Some(systems) = state
			.selected_location_id()
			.and_then(|id| repo.location_systems(id))
		else {
			return Self::empty(ViewMode::LocationSystems);
		};

		let step = width / (systems.len() + 1) as f64;
		let nodes = systems
			.iter()
			.enumerate()
			.map(|(i, system)| VisibleNode {
				node: HierarchyNode::from_system(system),
				system_type: Some(system.system_type),
				seed: Some((step * (i + 1) as f64, height / 2.0)),
			})
			.collect();

		Self {
			mode: ViewMode::LocationSystems,
			nodes,
			edges: Vec::new(),
		}
	}

	fn system_details(state: &ViewState, repo: &dyn HierarchyRepository) -> Self {
		let Some((system_id, graph)) = state
			.selected_system_id()
			.and_then(|id| Some((id, repo.system_graph(id)?)))
		else {
			return Self::empty(ViewMode::SystemDetails);
		};

		let mut visible: HashSet<&str> = HashSet::from([system_id]);
		for expanded in state.expanded_node_ids() {
			visible.extend(graph.neighbors(expanded));
		}

		let system_type = repo.system(system_id).map(|s| s.system_type);
		let nodes = graph
			.nodes()
			.filter(|n| visible.contains(n.id.as_str()))
			.map(|n| VisibleNode {
				node: n.clone(),
				system_type: if n.id == system_id { system_type } else { None },
				seed: None,
			})
			.collect();
		let edges = graph
			.edges()
			.filter(|e| visible.contains(e.source.as_str()) && visible.contains(e.target.as_str()))
			.cloned()
			.collect();

		Self {
			mode: ViewMode::SystemDetails,
			nodes,
			edges,
		}
	}

	/// Whether nothing is visible.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Visible node by id.
	pub fn node(&self, id: &str) -> Option<&VisibleNode> {
		self.nodes.iter().find(|n| n.node.id == id)
	}

	/// Whether `id` is visible.
	pub fn contains(&self, id: &str) -> bool {
		self.node(id).is_some()
	}

	/// Ids of the visible nodes.
	pub fn node_ids(&self) -> HashSet<&str> {
		self.nodes.iter().map(|n| n.node.id.as_str()).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::hierarchy::{NodeType, StaticHierarchy, SystemGraph};
	use proptest::prelude::*;
	use std::collections::BTreeSet;

	fn repo() -> StaticHierarchy {
		StaticHierarchy::embedded().unwrap()
	}

	fn drilled(repo: &StaticHierarchy, location: &str, system: &str) -> ViewState {
		let mut state = ViewState::new();
		state.select_location(repo, location);
		state.click_node(repo, system);
		state
	}

	fn ids(graph: &VisibleGraph) -> BTreeSet<String> {
		graph.nodes.iter().map(|n| n.node.id.clone()).collect()
	}

	fn one_hop(graph: &SystemGraph, id: &str) -> BTreeSet<String> {
		graph.neighbors(id).map(str::to_owned).collect()
	}

	#[test]
	fn empty_until_location_selected() {
		let repo = repo();
		let graph = VisibleGraph::build(&ViewState::new(), &repo, 900.0, 600.0);
		assert!(graph.is_empty());
		assert!(graph.edges.is_empty());
	}

	#[test]
	fn location_view_seeds_systems_evenly() {
		let repo = repo();
		let mut state = ViewState::new();
		state.select_location(&repo, "delhi");
		let graph = VisibleGraph::build(&state, &repo, 800.0, 600.0);

		let names: Vec<_> = graph.nodes.iter().map(|n| n.node.name.as_str()).collect();
		assert_eq!(names, vec!["DEL-WEB-01", "DEL-DB-01", "DEL-APP-01"]);
		assert!(graph.edges.is_empty());
		assert!(graph.nodes.iter().all(|n| n.node.level == 0));
		assert!(graph.nodes.iter().all(|n| n.node.node_type == NodeType::System));

		let seeds: Vec<_> = graph.nodes.iter().map(|n| n.seed.unwrap()).collect();
		assert_eq!(seeds, vec![(200.0, 300.0), (400.0, 300.0), (600.0, 300.0)]);
		assert_eq!(graph.nodes[1].system_type, Some(SystemType::Database));
	}

	#[test]
	fn collapsed_root_shows_only_root() {
		let repo = repo();
		let mut state = drilled(&repo, "delhi", "delhi-db-01");
		state.click_node(&repo, "delhi-db-01");
		assert!(state.expanded_node_ids().is_empty());

		let graph = VisibleGraph::build(&state, &repo, 800.0, 600.0);
		assert_eq!(ids(&graph), BTreeSet::from(["delhi-db-01".to_owned()]));
		assert!(graph.edges.is_empty());
		assert_eq!(graph.nodes[0].system_type, Some(SystemType::Database));
	}

	#[test]
	fn expansion_reveals_one_hop_only() {
		let repo = repo();
		let system = repo.system_graph("delhi-db-01").unwrap();
		let mut state = drilled(&repo, "delhi", "delhi-db-01");

		let graph = VisibleGraph::build(&state, &repo, 800.0, 600.0);
		let mut expected = one_hop(system, "delhi-db-01");
		expected.insert("delhi-db-01".into());
		assert_eq!(ids(&graph), expected);
		assert!(graph.contains("filesystem"));
		assert!(!graph.contains("fs-kernel"));

		state.click_node(&repo, "filesystem");
		let graph = VisibleGraph::build(&state, &repo, 800.0, 600.0);
		assert!(graph.contains("fs-kernel"));
		assert!(graph.contains("fs-partitions"));
		assert!(!graph.contains("F-LNX-101"));
		for edge in &graph.edges {
			assert!(graph.contains(&edge.source) && graph.contains(&edge.target));
		}
	}

	#[test]
	fn collapse_keeps_nodes_reachable_from_other_expansions() {
		let repo = repo();
		let mut state = drilled(&repo, "delhi", "delhi-db-01");
		state.click_node(&repo, "access-control");
		state.click_node(&repo, "ac-sudo");
		state.click_node(&repo, "log-auditd");
		// F-LNX-627 is a child of ac-sudo and related to F-LNX-825 under log-auditd.
		let graph = VisibleGraph::build(&state, &repo, 800.0, 600.0);
		assert!(graph.contains("F-LNX-627"));

		state.click_node(&repo, "F-LNX-825");
		state.click_node(&repo, "ac-sudo");
		let graph = VisibleGraph::build(&state, &repo, 800.0, 600.0);
		assert!(graph.contains("F-LNX-627"), "still a neighbour of expanded F-LNX-825");
		assert!(!graph.contains("F-LNX-623"));
		assert!(graph.contains("ac-sudo"), "still a neighbour of expanded access-control");
	}

	#[test]
	fn fallback_graph_shows_root() {
		let repo = repo();
		let state = drilled(&repo, "bangalore", "blr-cache-01");
		let graph = VisibleGraph::build(&state, &repo, 800.0, 600.0);
		assert_eq!(ids(&graph), BTreeSet::from(["blr-cache-01".to_owned()]));
		assert_eq!(graph.nodes[0].system_type, Some(SystemType::Cache));
	}

	fn expansion_strategy() -> impl Strategy<Value = (Vec<String>, usize)> {
		let repo = repo();
		let ids: Vec<String> = repo
			.system_graph("mumbai-web-01")
			.unwrap()
			.nodes()
			.map(|n| n.id.clone())
			.collect();
		let count = ids.len();
		(proptest::sample::subsequence(ids, 0..count), 0..count)
	}

	fn state_with(repo: &StaticHierarchy, expanded: &[String]) -> ViewState {
		let mut state = drilled(repo, "mumbai", "mumbai-web-01");
		// Entering the view expands the root; clicking it again collapses.
		state.click_node(repo, "mumbai-web-01");
		for id in expanded {
			state.click_node(repo, id);
		}
		state
	}

	proptest! {
		#[test]
		fn frontier_adds_exactly_one_hop((expanded, pick) in expansion_strategy()) {
			let repo = repo();
			let system = repo.system_graph("mumbai-web-01").unwrap();
			let extra = system.nodes().nth(pick).unwrap().id.clone();
			prop_assume!(!expanded.contains(&extra));

			let before = VisibleGraph::build(&state_with(&repo, &expanded), &repo, 800.0, 600.0);
			let mut grown = expanded.clone();
			grown.push(extra.clone());
			let after = VisibleGraph::build(&state_with(&repo, &grown), &repo, 800.0, 600.0);

			let mut expected = ids(&before);
			expected.extend(one_hop(system, &extra));
			prop_assert_eq!(ids(&after), expected);
		}

		#[test]
		fn collapse_removes_only_orphaned_frontier((expanded, pick) in expansion_strategy()) {
			let repo = repo();
			let system = repo.system_graph("mumbai-web-01").unwrap();
			let removed = system.nodes().nth(pick).unwrap().id.clone();
			prop_assume!(expanded.contains(&removed));

			let remaining: Vec<String> =
				expanded.iter().filter(|id| **id != removed).cloned().collect();
			let after = VisibleGraph::build(&state_with(&repo, &remaining), &repo, 800.0, 600.0);

			let mut expected = BTreeSet::from(["mumbai-web-01".to_owned()]);
			for id in &remaining {
				expected.extend(one_hop(system, id));
			}
			prop_assert_eq!(ids(&after), expected);
			prop_assert!(after.contains("mumbai-web-01"));
		}
	}
}
