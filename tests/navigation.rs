use std::collections::{BTreeSet, HashMap};

use infra_graph::graph_builder::VisibleGraph;
use infra_graph::hierarchy::{HierarchyRepository, NodeType, StaticHierarchy};
use infra_graph::layout::{LayoutConfig, Simulation};
use infra_graph::view_state::{ViewMode, ViewState};

fn visible(state: &ViewState, repo: &StaticHierarchy) -> BTreeSet<String> {
	VisibleGraph::build(state, repo, 800.0, 600.0)
		.node_ids()
		.into_iter()
		.map(str::to_owned)
		.collect()
}

fn set(ids: &[&str]) -> BTreeSet<String> {
	ids.iter().map(|s| s.to_string()).collect()
}

#[test]
fn delhi_drill_down() {
	let repo = StaticHierarchy::embedded().unwrap();
	let mut state = ViewState::new();
	assert!(VisibleGraph::build(&state, &repo, 800.0, 600.0).is_empty());

	assert!(state.select_location(&repo, "delhi"));
	let graph = VisibleGraph::build(&state, &repo, 800.0, 600.0);
	let names: BTreeSet<&str> = graph.nodes.iter().map(|n| n.node.name.as_str()).collect();
	assert_eq!(names, BTreeSet::from(["DEL-WEB-01", "DEL-DB-01", "DEL-APP-01"]));
	assert!(graph.edges.is_empty());
	assert!(graph.nodes.iter().all(|n| n.node.level == 0));

	assert!(state.click_node(&repo, "delhi-db-01"));
	assert_eq!(state.current_view(), ViewMode::SystemDetails);
	assert_eq!(state.expanded_node_ids(), &set(&["delhi-db-01"]));
	assert_eq!(state.selected_node_id(), Some("delhi-db-01"));

	let system = repo.system_graph("delhi-db-01").unwrap();
	let categories: BTreeSet<String> = system
		.nodes()
		.filter(|n| n.node_type == NodeType::Category)
		.map(|n| n.id.clone())
		.collect();
	let mut expected = categories.clone();
	expected.insert("delhi-db-01".into());
	assert_eq!(visible(&state, &repo), expected);

	// Collapsing the root leaves only the root.
	assert!(state.click_node(&repo, "delhi-db-01"));
	assert!(state.expanded_node_ids().is_empty());
	assert_eq!(visible(&state, &repo), set(&["delhi-db-01"]));

	assert!(state.click_node(&repo, "delhi-db-01"));
	assert_eq!(visible(&state, &repo), expected);
	assert!(categories.contains("filesystem") && categories.contains("services"));
}

#[test]
fn expanding_a_category_reveals_one_level() {
	let repo = StaticHierarchy::embedded().unwrap();
	let mut state = ViewState::new();
	state.select_location(&repo, "delhi");
	state.click_node(&repo, "delhi-db-01");
	let before = visible(&state, &repo);

	state.click_node(&repo, "access-control");
	let after = visible(&state, &repo);
	let revealed: BTreeSet<String> = after.difference(&before).cloned().collect();
	assert_eq!(revealed, set(&["ac-ssh", "ac-sudo"]));
	assert!(!after.contains("F-LNX-623"));

	state.click_node(&repo, "ac-sudo");
	let features = visible(&state, &repo);
	assert!(features.is_superset(&set(&["F-LNX-623", "F-LNX-625", "F-LNX-627"])));
}

#[test]
fn unknown_ids_change_nothing() {
	let repo = StaticHierarchy::embedded().unwrap();
	let mut state = ViewState::new();
	state.select_location(&repo, "mumbai");
	let snapshot = state.clone();
	assert!(!state.click_node(&repo, "delhi-db-01"));
	assert!(!state.click_node(&repo, "no-such-node"));
	assert!(!state.select_location(&repo, "atlantis"));
	assert_eq!(state, snapshot);

	state.click_node(&repo, "mumbai-web-01");
	let snapshot = state.clone();
	assert!(!state.click_node(&repo, "F-LNX-999"));
	assert_eq!(state, snapshot);
}

#[test]
fn back_twice_equals_back_once() {
	let repo = StaticHierarchy::embedded().unwrap();
	let mut state = ViewState::new();
	state.select_location(&repo, "bangalore");
	state.click_node(&repo, "blr-db-01");

	state.back_to_systems();
	let once = state.clone();
	state.back_to_systems();
	assert_eq!(state, once);
	assert_eq!(state.selected_location_id(), Some("bangalore"));
	assert_eq!(state.selected_system_id(), None);
	assert_eq!(state.selected_node_id(), None);
	assert_eq!(state.current_view(), ViewMode::LocationSystems);
}

#[test]
fn system_without_detail_graph_shows_root() {
	let repo = StaticHierarchy::embedded().unwrap();
	let mut state = ViewState::new();
	state.select_location(&repo, "bangalore");
	assert!(state.click_node(&repo, "blr-cache-01"));
	assert_eq!(visible(&state, &repo), set(&["blr-cache-01"]));
}

#[test]
fn layout_is_reproducible() {
	let repo = StaticHierarchy::embedded().unwrap();
	let mut state = ViewState::new();
	state.select_location(&repo, "mumbai");
	state.click_node(&repo, "mumbai-web-01");
	state.click_node(&repo, "filesystem");
	let graph = VisibleGraph::build(&state, &repo, 800.0, 600.0);
	let config = LayoutConfig::default();

	let settle = || {
		let mut sim = Simulation::new(&graph, &config, (400.0, 300.0), &HashMap::new());
		sim.run(2_000);
		sim.positions()
	};
	assert_eq!(settle(), settle());
}
