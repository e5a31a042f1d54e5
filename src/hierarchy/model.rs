//! Plain data types for locations, systems and the per-system security graph.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Compliance status of a system or feature, or a structural marker for
/// nodes that carry no status of their own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
	/// Every check passes.
	Compliant,
	/// Some checks fail at low severity.
	Warning,
	/// A check fails at high severity.
	Critical,
	/// Marker used by system root nodes.
	System,
	/// Marker used by category nodes.
	Category,
	/// Marker used by subcategory nodes.
	Subcategory,
	/// Missing or unrecognised status.
	#[default]
	#[serde(other)]
	Unknown,
}

impl Status {
	/// Whether this is a real compliance status rather than a marker.
	pub fn is_compliance(self) -> bool {
		matches!(self, Status::Compliant | Status::Warning | Status::Critical)
	}

	/// Lowercase name, as used in CSS classes and the dataset.
	pub fn as_str(self) -> &'static str {
		match self {
			Status::Compliant => "compliant",
			Status::Warning => "warning",
			Status::Critical => "critical",
			Status::System => "system",
			Status::Category => "category",
			Status::Subcategory => "subcategory",
			Status::Unknown => "unknown",
		}
	}

	/// Ordering used to pick the worst status of a group.
	fn severity(self) -> u8 {
		match self {
			Status::Critical => 3,
			Status::Warning => 2,
			Status::Compliant => 1,
			_ => 0,
		}
	}

	/// The more severe of two statuses. Markers rank below every compliance
	/// status.
	pub fn worst(self, other: Status) -> Status {
		if other.severity() > self.severity() {
			other
		} else {
			self
		}
	}
}

/// Role of a system in the estate. Drives the root node colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemType {
	/// Web server.
	WebServer,
	/// Database server.
	Database,
	/// Application server.
	Application,
	/// Load balancer or reverse proxy.
	LoadBalancer,
	/// In-memory cache.
	Cache,
	/// Desktop or laptop.
	Workstation,
	/// Any type not listed above.
	#[default]
	#[serde(other)]
	Other,
}

impl SystemType {
	/// Kebab-case name, as in the dataset.
	pub fn as_str(self) -> &'static str {
		match self {
			SystemType::WebServer => "web-server",
			SystemType::Database => "database",
			SystemType::Application => "application",
			SystemType::LoadBalancer => "load-balancer",
			SystemType::Cache => "cache",
			SystemType::Workstation => "workstation",
			SystemType::Other => "other",
		}
	}
}

/// Vulnerability counts by severity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vulnerabilities {
	/// Critical findings.
	pub critical: u32,
	/// High findings.
	pub high: u32,
	/// Medium findings.
	pub medium: u32,
	/// Low findings.
	pub low: u32,
}

impl Vulnerabilities {
	/// Sum over all severities.
	pub fn total(&self) -> u32 {
		self.critical + self.high + self.medium + self.low
	}
}

/// A single host belonging to a [`Location`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct System {
	/// Unique across all locations.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Role of the host.
	#[serde(rename = "type")]
	pub system_type: SystemType,
	/// Overall compliance status.
	pub status: Status,
	/// Primary IP address.
	pub ip: String,
	/// Operating system.
	pub os: String,
	/// Responsible team.
	pub owner: String,
	/// Deployment environment, e.g. production or staging.
	pub environment: String,
	/// CPU description.
	#[serde(default)]
	pub cpu: Option<String>,
	/// Installed memory.
	#[serde(default)]
	pub memory: Option<String>,
	/// Disk capacity.
	#[serde(default)]
	pub storage: Option<String>,
	/// Uptime as reported by the last scan.
	#[serde(default)]
	pub uptime: Option<String>,
	/// When the last compliance scan ran.
	#[serde(default)]
	pub last_scan: Option<String>,
	/// Open vulnerabilities by severity.
	#[serde(default)]
	pub vulnerabilities: Vulnerabilities,
	/// Services running on the host.
	#[serde(default)]
	pub services: Vec<String>,
}

/// An office or datacenter and the systems it hosts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
	/// Unique location id.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Geographic region.
	pub region: String,
	/// Postal address.
	pub address: String,
	/// Datacenter or site name.
	pub datacenter: String,
	/// Hosted systems in display order.
	pub systems: Vec<System>,
}

/// Per-status counts, of systems for a location or of features for a
/// compliance report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusSummary {
	/// Compliant items.
	pub compliant: usize,
	/// Items with a warning.
	pub warning: usize,
	/// Critical items.
	pub critical: usize,
}

impl StatusSummary {
	/// Count one item. Non-compliance statuses are ignored.
	pub fn record(&mut self, status: Status) {
		match status {
			Status::Compliant => self.compliant += 1,
			Status::Warning => self.warning += 1,
			Status::Critical => self.critical += 1,
			_ => {}
		}
	}
}

impl Location {
	/// Count of this location's systems by status.
	pub fn summary(&self) -> StatusSummary {
		let mut summary = StatusSummary::default();
		for system in &self.systems {
			summary.record(system.status);
		}
		summary
	}

	/// Worst compliance status among this location's systems.
	pub fn status(&self) -> Status {
		self.systems
			.iter()
			.fold(Status::Unknown, |acc, s| acc.worst(s.status))
	}
}

/// Kind of node in a system graph. Unrecognised or missing kinds
/// deserialize to [`NodeType::Unknown`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
	/// Level-0 root, one per system graph.
	System,
	/// Level 1.
	Category,
	/// Level 2.
	Subcategory,
	/// Level 3, a single checked control.
	Feature,
	/// Missing or unrecognised type.
	#[default]
	#[serde(other)]
	Unknown,
}

impl NodeType {
	/// Kebab-case name, as in the dataset.
	pub fn as_str(self) -> &'static str {
		match self {
			NodeType::System => "system",
			NodeType::Category => "category",
			NodeType::Subcategory => "subcategory",
			NodeType::Feature => "feature",
			NodeType::Unknown => "unknown",
		}
	}
}

/// One node of a system's security hierarchy.
///
/// `level` is 0 for the system root, 1 for categories, 2 for subcategories
/// and 3 for features. `details` is a free-form attribute bag whose keys
/// depend on `node_type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
	/// Unique within its system graph. A root shares its system's id.
	pub id: String,
	/// Kind of node. Fixes the expected level.
	#[serde(rename = "type", default)]
	pub node_type: NodeType,
	/// Display name.
	pub name: String,
	/// Compliance status for features, a marker otherwise.
	#[serde(default)]
	pub status: Status,
	/// Depth below the root.
	pub level: u8,
	/// Id of the containing node. `None` only for the root.
	#[serde(default)]
	pub parent: Option<String>,
	/// Free-text description.
	#[serde(default)]
	pub description: Option<String>,
	/// Reference into the hardening standard the feature comes from.
	#[serde(default)]
	pub annexure: Option<String>,
	/// Type-specific attributes.
	#[serde(default)]
	pub details: Map<String, Value>,
}

impl HierarchyNode {
	/// Wrap a [`System`] as a level-0 root node.
	pub fn from_system(system: &System) -> Self {
		let details = match serde_json::to_value(system) {
			Ok(Value::Object(map)) => map,
			_ => Map::new(),
		};
		Self {
			id: system.id.clone(),
			node_type: NodeType::System,
			name: system.name.clone(),
			status: system.status,
			level: 0,
			parent: None,
			description: None,
			annexure: None,
			details,
		}
	}

	/// String-valued detail, if present.
	pub fn detail_str(&self, key: &str) -> Option<&str> {
		self.details.get(key).and_then(Value::as_str)
	}

	/// Integer-valued detail, if present.
	pub fn detail_u64(&self, key: &str) -> Option<u64> {
		self.details.get(key).and_then(Value::as_u64)
	}
}

/// Kind of relationship an edge expresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relationship {
	/// Tree edge from parent to child.
	Contains,
	/// Source must be satisfied before target.
	Prerequisite,
	/// Loose association between two nodes.
	Related,
}

/// Directed edge between two nodes of one system graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HierarchyEdge {
	/// Id of the start node.
	pub source: String,
	/// Id of the end node.
	pub target: String,
	/// What the edge expresses.
	pub relationship: Relationship,
}

impl HierarchyEdge {
	/// The endpoint opposite `id`, if `id` is one of this edge's endpoints.
	pub fn other(&self, id: &str) -> Option<&str> {
		if self.source == id {
			Some(&self.target)
		} else if self.target == id {
			Some(&self.source)
		} else {
			None
		}
	}
}

/// Hardware and ownership metadata attached to a detailed system graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemProfile {
	/// Function of the host, e.g. primary database.
	pub role: Option<String>,
	/// Management IP address.
	pub ip: Option<String>,
	/// Site the hardware sits in.
	pub location: Option<String>,
	/// Rack position.
	pub rack: Option<String>,
	/// Manufacturer serial number.
	pub serial_number: Option<String>,
	/// Purchase date as written in the asset register.
	pub purchase_date: Option<String>,
	/// Warranty end or terms.
	pub warranty: Option<String>,
	/// Hardware vendor.
	pub vendor: Option<String>,
	/// Hardware model.
	pub model: Option<String>,
}
