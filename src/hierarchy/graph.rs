use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, EdgeFiltered, EdgeRef};
use serde::Deserialize;

use super::error::HierarchyError;
use super::model::{
	HierarchyEdge, HierarchyNode, NodeType, Relationship, System, SystemProfile,
};

/// Serialized shape of one system's graph.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct SystemGraphData {
	#[serde(default)]
	pub profile: SystemProfile,
	pub nodes: Vec<HierarchyNode>,
	pub edges: Vec<HierarchyEdge>,
}

/// Validated security hierarchy of a single system.
///
/// Nodes and edges live in a directed `petgraph` graph with an id index on
/// the side, so lookups are O(1) and one-hop neighbourhoods walk only the
/// node's own edges. Node and edge order follow the dataset.
#[derive(Clone, Debug)]
pub struct SystemGraph {
	system_id: String,
	profile: SystemProfile,
	graph: DiGraph<HierarchyNode, HierarchyEdge>,
	index: HashMap<String, NodeIndex>,
}

impl SystemGraph {
	/// Build and validate a graph whose root node id is `system_id`.
	pub(crate) fn new(system_id: &str, data: SystemGraphData) -> Result<Self, HierarchyError> {
		let SystemGraphData {
			profile,
			nodes,
			edges,
		} = data;

		let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());
		let mut index = HashMap::with_capacity(nodes.len());
		for node in nodes {
			let id = node.id.clone();
			if index.contains_key(&id) {
				return Err(HierarchyError::DuplicateNode {
					system: system_id.to_owned(),
					node: id,
				});
			}
			index.insert(id, graph.add_node(node));
		}

		for edge in edges {
			let (Some(&s), Some(&t)) = (index.get(&edge.source), index.get(&edge.target)) else {
				return Err(HierarchyError::DanglingEdge {
					system: system_id.to_owned(),
					from: edge.source,
					to: edge.target,
				});
			};
			graph.add_edge(s, t, edge);
		}

		let graph = Self {
			system_id: system_id.to_owned(),
			profile,
			graph,
			index,
		};
		graph.validate()?;
		Ok(graph)
	}

	/// A graph holding only the system's own root node.
	pub fn root_only(system: &System) -> Self {
		let mut graph = DiGraph::new();
		let root = graph.add_node(HierarchyNode::from_system(system));
		Self {
			system_id: system.id.clone(),
			profile: SystemProfile {
				ip: Some(system.ip.clone()),
				..SystemProfile::default()
			},
			graph,
			index: HashMap::from([(system.id.clone(), root)]),
		}
	}

	fn validate(&self) -> Result<(), HierarchyError> {
		let system = || self.system_id.clone();

		let root_idx = self
			.index
			.get(&self.system_id)
			.copied()
			.filter(|&i| {
				let n = &self.graph[i];
				n.level == 0 && n.node_type == NodeType::System && n.parent.is_none()
			})
			.ok_or_else(|| HierarchyError::MissingRoot(system()))?;
		let root = &self.graph[root_idx];

		for node in self.nodes() {
			let level_ok = match &node.parent {
				None => node.id == root.id,
				Some(parent) => self
					.node(parent)
					.is_some_and(|p| node.level == p.level + 1),
			};
			if !level_ok {
				return Err(HierarchyError::Level {
					system: system(),
					node: node.id.clone(),
				});
			}
		}

		// Containment edges must form a tree: one level step per edge, one
		// parent per non-root node, every node reachable from the root.
		let tree = EdgeFiltered::from_fn(&self.graph, |e| {
			e.weight().relationship == Relationship::Contains
		});
		for edge in self.graph.edge_references() {
			if edge.weight().relationship != Relationship::Contains {
				continue;
			}
			let (src, tgt) = (&self.graph[edge.source()], &self.graph[edge.target()]);
			if tgt.level != src.level + 1 {
				return Err(HierarchyError::Level {
					system: system(),
					node: tgt.id.clone(),
				});
			}
			let parents = self
				.graph
				.edges_directed(edge.target(), Direction::Incoming)
				.filter(|e| e.weight().relationship == Relationship::Contains)
				.count();
			let clash = parents > 1
				|| edge.target() == root_idx
				|| tgt.parent.as_deref().is_some_and(|p| p != src.id);
			if clash {
				return Err(HierarchyError::Containment {
					system: system(),
					node: tgt.id.clone(),
				});
			}
		}

		let mut reached = vec![false; self.graph.node_count()];
		let mut bfs = Bfs::new(&tree, root_idx);
		while let Some(idx) = bfs.next(&tree) {
			reached[idx.index()] = true;
		}
		if let Some(orphan) = self.graph.node_indices().find(|i| !reached[i.index()]) {
			return Err(HierarchyError::Containment {
				system: system(),
				node: self.graph[orphan].id.clone(),
			});
		}
		Ok(())
	}

	/// Id of the system this graph describes.
	pub fn system_id(&self) -> &str {
		&self.system_id
	}

	/// Hardware profile shown for the system root.
	pub fn profile(&self) -> &SystemProfile {
		&self.profile
	}

	/// Nodes in dataset order.
	pub fn nodes(&self) -> impl ExactSizeIterator<Item = &HierarchyNode> + '_ {
		self.graph.raw_nodes().iter().map(|n| &n.weight)
	}

	/// Edges in dataset order.
	pub fn edges(&self) -> impl ExactSizeIterator<Item = &HierarchyEdge> + '_ {
		self.graph.raw_edges().iter().map(|e| &e.weight)
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.graph.node_count()
	}

	/// The level-0 system node.
	pub fn root(&self) -> &HierarchyNode {
		// Validated at construction.
		&self.graph[self.index[&self.system_id]]
	}

	/// Node by id.
	pub fn node(&self, id: &str) -> Option<&HierarchyNode> {
		self.index.get(id).map(|&i| &self.graph[i])
	}

	/// Whether `id` names a node of this graph.
	pub fn contains(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	/// One-hop neighbours of `id` across every relationship kind, in either
	/// direction. Empty for unknown ids.
	pub fn neighbors<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + 'a {
		self.index
			.get(id)
			.into_iter()
			.flat_map(move |&i| self.graph.neighbors_undirected(i))
			.map(move |n| self.graph[n].id.as_str())
	}
}
