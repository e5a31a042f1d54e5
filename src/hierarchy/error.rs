use thiserror::Error;

/// Problems found while loading or validating a hierarchy dataset.
#[derive(Debug, Error)]
pub enum HierarchyError {
	/// The dataset is not valid JSON or does not match the schema.
	#[error("failed to parse hierarchy dataset: {0}")]
	Parse(#[from] serde_json::Error),

	/// Two locations share an id.
	#[error("duplicate location id `{0}`")]
	DuplicateLocation(String),

	/// Two systems share an id.
	#[error("duplicate system id `{0}`")]
	DuplicateSystem(String),

	/// Two nodes of one system graph share an id.
	#[error("system `{system}`: duplicate node id `{node}`")]
	DuplicateNode { system: String, node: String },

	/// A graph is keyed by a system id no location lists.
	#[error("system graph `{0}` has no matching system in any location")]
	UnknownSystem(String),

	/// A graph has no level-0 system node named after its system.
	#[error("system `{0}`: root node missing or not a level-0 system node")]
	MissingRoot(String),

	/// An edge endpoint names no node of its graph.
	#[error("system `{system}`: edge {from} -> {to} references a missing node")]
	DanglingEdge {
		system: String,
		from: String,
		to: String,
	},

	/// A node's level does not follow from its type or its parent.
	#[error("system `{system}`: node `{node}` breaks the level invariant")]
	Level { system: String, node: String },

	/// A node has no contains parent, more than one, or cannot be reached
	/// from the root.
	#[error("system `{system}`: node `{node}` is not reachable from the root by exactly one containment path")]
	Containment { system: String, node: String },
}
