use std::collections::HashMap;

use log::info;
use serde::Deserialize;

use super::error::HierarchyError;
use super::graph::{SystemGraph, SystemGraphData};
use super::model::{Location, System};

const EMBEDDED_DATASET: &str = include_str!("../../data/infrastructure.json");

/// Read-only source of locations, systems and per-system graphs.
///
/// The graph view only talks to this trait, so a live inventory backend can
/// replace the embedded dataset without touching view or layout code.
pub trait HierarchyRepository {
	/// All locations in display order.
	fn locations(&self) -> &[Location];

	fn location(&self, id: &str) -> Option<&Location>;

	/// Systems hosted at a location, or `None` for an unknown location id.
	fn location_systems(&self, location_id: &str) -> Option<&[System]> {
		self.location(location_id).map(|l| l.systems.as_slice())
	}

	fn system(&self, id: &str) -> Option<&System>;

	/// The security graph of a system. Systems without a detailed graph get a
	/// graph holding only their root node.
	fn system_graph(&self, system_id: &str) -> Option<&SystemGraph>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Dataset {
	locations: Vec<Location>,
	#[serde(default)]
	system_graphs: HashMap<String, SystemGraphData>,
}

/// Map-backed [`HierarchyRepository`] built from a JSON document.
#[derive(Clone, Debug)]
pub struct StaticHierarchy {
	locations: Vec<Location>,
	location_index: HashMap<String, usize>,
	// (location index, system index)
	system_index: HashMap<String, (usize, usize)>,
	graphs: HashMap<String, SystemGraph>,
}

impl StaticHierarchy {
	/// The dataset compiled into the binary.
	pub fn embedded() -> Result<Self, HierarchyError> {
		Self::from_json(EMBEDDED_DATASET)
	}

	/// Parse and validate a dataset.
	pub fn from_json(json: &str) -> Result<Self, HierarchyError> {
		let dataset: Dataset = serde_json::from_str(json)?;

		let mut location_index = HashMap::new();
		let mut system_index = HashMap::new();
		for (li, location) in dataset.locations.iter().enumerate() {
			if location_index.insert(location.id.clone(), li).is_some() {
				return Err(HierarchyError::DuplicateLocation(location.id.clone()));
			}
			for (si, system) in location.systems.iter().enumerate() {
				if system_index.insert(system.id.clone(), (li, si)).is_some() {
					return Err(HierarchyError::DuplicateSystem(system.id.clone()));
				}
			}
		}

		let mut graphs = HashMap::new();
		for (system_id, data) in dataset.system_graphs {
			if !system_index.contains_key(&system_id) {
				return Err(HierarchyError::UnknownSystem(system_id));
			}
			let graph = SystemGraph::new(&system_id, data)?;
			graphs.insert(system_id, graph);
		}
		let detailed = graphs.len();

		for location in &dataset.locations {
			for system in &location.systems {
				graphs
					.entry(system.id.clone())
					.or_insert_with(|| SystemGraph::root_only(system));
			}
		}

		info!(
			"hierarchy: loaded {} locations, {} systems, {} detailed graphs",
			dataset.locations.len(),
			system_index.len(),
			detailed
		);

		Ok(Self {
			locations: dataset.locations,
			location_index,
			system_index,
			graphs,
		})
	}
}

impl HierarchyRepository for StaticHierarchy {
	fn locations(&self) -> &[Location] {
		&self.locations
	}

	fn location(&self, id: &str) -> Option<&Location> {
		self.location_index.get(id).map(|&i| &self.locations[i])
	}

	fn system(&self, id: &str) -> Option<&System> {
		self.system_index
			.get(id)
			.map(|&(l, s)| &self.locations[l].systems[s])
	}

	fn system_graph(&self, system_id: &str) -> Option<&SystemGraph> {
		self.graphs.get(system_id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::hierarchy::{NodeType, Relationship, SystemType};

	#[test]
	fn embedded_dataset_loads() {
		let repo = StaticHierarchy::embedded().unwrap();
		let ids: Vec<_> = repo.locations().iter().map(|l| l.id.as_str()).collect();
		assert_eq!(ids, vec!["mumbai", "delhi", "bangalore"]);

		let delhi: Vec<_> = repo
			.location_systems("delhi")
			.unwrap()
			.iter()
			.map(|s| s.name.as_str())
			.collect();
		assert_eq!(delhi, vec!["DEL-WEB-01", "DEL-DB-01", "DEL-APP-01"]);
		assert!(repo.location_systems("atlantis").is_none());
	}

	#[test]
	fn every_system_has_a_graph() {
		let repo = StaticHierarchy::embedded().unwrap();
		for location in repo.locations() {
			for system in &location.systems {
				let graph = repo.system_graph(&system.id).unwrap();
				assert_eq!(graph.root().id, system.id);
				assert_eq!(graph.root().node_type, NodeType::System);
			}
		}
		assert!(repo.system_graph("ghost").is_none());
	}

	#[test]
	fn detailed_graph_has_categories_and_cross_links() {
		let repo = StaticHierarchy::embedded().unwrap();
		let graph = repo.system_graph("delhi-db-01").unwrap();
		let categories: Vec<_> = graph
			.neighbors("delhi-db-01")
			.filter_map(|id| graph.node(id))
			.filter(|n| n.node_type == NodeType::Category)
			.map(|n| n.id.as_str())
			.collect();
		assert!(categories.contains(&"filesystem"));
		assert!(categories.contains(&"services"));
		assert!(
			graph
				.edges()
				.any(|e| e.relationship != Relationship::Contains)
		);
		assert_eq!(graph.profile().vendor.as_deref(), Some("Dell Technologies"));
	}

	#[test]
	fn rejects_graph_for_unknown_system() {
		let json = r#"{
			"locations": [],
			"systemGraphs": { "ghost": { "nodes": [], "edges": [] } }
		}"#;
		let err = StaticHierarchy::from_json(json).unwrap_err();
		assert!(matches!(err, HierarchyError::UnknownSystem(id) if id == "ghost"));
	}

	#[test]
	fn workstation_has_windows_policy_graph() {
		let repo = StaticHierarchy::embedded().unwrap();
		let system = repo.system("mumbai-ws-01").unwrap();
		assert_eq!(system.system_type, SystemType::Workstation);

		let graph = repo.system_graph("mumbai-ws-01").unwrap();
		let mut categories: Vec<_> = graph.neighbors("mumbai-ws-01").collect();
		categories.sort();
		assert_eq!(
			categories,
			vec!["win-accounts", "win-local", "win-security", "win-system"]
		);
		assert!(graph.nodes().any(|n| n.node_type == NodeType::Feature));
		assert_eq!(graph.profile().model.as_deref(), Some("OptiPlex 7090"));
	}

	#[test]
	fn rejects_malformed_json() {
		let err = StaticHierarchy::from_json("{ not json").unwrap_err();
		assert!(matches!(err, HierarchyError::Parse(_)));
	}
}
