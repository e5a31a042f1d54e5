//! Details of the selected node.
//!
//! [`InfoPanelContent`] is a pure function of the view state and the
//! repository; the [`InfoPanel`] component only lays it out.

use leptos::prelude::*;

use crate::hierarchy::{
	HierarchyNode, HierarchyRepository, NodeType, Status, System, SystemProfile, Vulnerabilities,
};
use crate::view_state::{ViewMode, ViewState};

const NOT_AVAILABLE: &str = "N/A";

fn or_na(value: Option<&str>) -> String {
	value
		.filter(|v| !v.is_empty())
		.unwrap_or(NOT_AVAILABLE)
		.to_owned()
}

#[derive(Clone, Debug, PartialEq)]
pub struct SystemOverview {
	pub name: String,
	pub system_type: String,
	pub status: Status,
	pub ip: String,
	pub uptime: String,
	pub os: String,
	pub cpu: String,
	pub memory: String,
	pub storage: String,
	pub vulnerabilities: Vulnerabilities,
}

impl SystemOverview {
	pub fn of(system: &System) -> Self {
		Self {
			name: system.name.clone(),
			system_type: system.system_type.as_str().to_owned(),
			status: system.status,
			ip: or_na(Some(system.ip.as_str())),
			uptime: or_na(system.uptime.as_deref()),
			os: or_na(Some(system.os.as_str())),
			cpu: or_na(system.cpu.as_deref()),
			memory: or_na(system.memory.as_deref()),
			storage: or_na(system.storage.as_deref()),
			vulnerabilities: system.vulnerabilities,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct FeatureInfo {
	pub id: String,
	pub name: String,
	pub status: Status,
	pub risk_level: String,
	pub check_type: String,
	pub expected: String,
	pub actual: String,
	pub annexure: String,
	pub description: String,
	pub remediation: String,
}

/// What the info panel shows.
#[derive(Clone, Debug, PartialEq)]
pub enum InfoPanelContent {
	/// Nothing is selected.
	Empty,
	SystemOverview(SystemOverview),
	SystemConfiguration {
		name: String,
		role: String,
		ip: String,
		hardware: String,
		serial: String,
	},
	Category {
		name: String,
		description: String,
		passed: u64,
		failed: u64,
		total: u64,
		last_audit: String,
	},
	Subcategory {
		name: String,
		description: String,
	},
	Feature(FeatureInfo),
	/// A node whose type is missing or not recognised.
	Unknown {
		name: String,
		node_type: String,
	},
}

impl InfoPanelContent {
	/// Content for whatever node `state` has selected.
	pub fn for_selection(state: &ViewState, repo: &dyn HierarchyRepository) -> Self {
		let Some(node_id) = state.selected_node_id() else {
			return Self::Empty;
		};
		let graph = state.selected_system_id().and_then(|id| repo.system_graph(id));
		match graph.and_then(|g| Some((g.node(node_id)?, g.profile()))) {
			Some((node, profile)) => Self::for_node(state.current_view(), node, profile, repo),
			None => match repo.system(node_id) {
				Some(system) => Self::SystemOverview(SystemOverview::of(system)),
				None => Self::Empty,
			},
		}
	}

	/// Content for `node` as shown in `mode`. System nodes get an overview
	/// in the location view and their hardware profile in the details view.
	pub fn for_node(
		mode: ViewMode,
		node: &HierarchyNode,
		profile: &SystemProfile,
		repo: &dyn HierarchyRepository,
	) -> Self {
		let desc = || or_na(node.detail_str("description"));
		match node.node_type {
			NodeType::System => match (mode, repo.system(&node.id)) {
				(ViewMode::LocationSystems, Some(system)) => {
					Self::SystemOverview(SystemOverview::of(system))
				}
				(_, system) => {
					let hardware = format!(
						"{} {}",
						or_na(profile.vendor.as_deref()),
						profile.model.as_deref().unwrap_or_default()
					);
					Self::SystemConfiguration {
						name: node.name.clone(),
						role: or_na(profile.role.as_deref()),
						ip: or_na(
							profile
								.ip
								.as_deref()
								.or(system.map(|s| s.ip.as_str())),
						),
						hardware: hardware.trim_end().to_owned(),
						serial: or_na(profile.serial_number.as_deref()),
					}
				}
			},
			NodeType::Category => Self::Category {
				name: node.name.clone(),
				description: desc(),
				passed: node.detail_u64("passedChecks").unwrap_or(0),
				failed: node.detail_u64("failedChecks").unwrap_or(0),
				total: node.detail_u64("totalChecks").unwrap_or(0),
				last_audit: or_na(node.detail_str("lastAudit")),
			},
			NodeType::Subcategory => Self::Subcategory {
				name: node.name.clone(),
				description: desc(),
			},
			NodeType::Feature => Self::Feature(FeatureInfo {
				id: node.id.clone(),
				name: node.name.clone(),
				status: node.status,
				risk_level: or_na(node.detail_str("riskLevel")),
				check_type: or_na(node.detail_str("checkType")),
				expected: or_na(node.detail_str("expectedValue")),
				actual: or_na(node.detail_str("actualValue")),
				annexure: or_na(node.annexure.as_deref()),
				description: or_na(node.description.as_deref()),
				remediation: or_na(node.detail_str("remediation")),
			}),
			NodeType::Unknown => Self::Unknown {
				name: if node.name.is_empty() {
					"Unknown Node".to_owned()
				} else {
					node.name.clone()
				},
				node_type: "Unknown".to_owned(),
			},
		}
	}

	pub fn title(&self) -> Option<&str> {
		match self {
			Self::Empty => None,
			Self::SystemOverview(o) => Some(&o.name),
			Self::Feature(f) => Some(&f.name),
			Self::SystemConfiguration { name, .. }
			| Self::Category { name, .. }
			| Self::Subcategory { name, .. }
			| Self::Unknown { name, .. } => Some(name),
		}
	}
}

#[component]
fn Field(label: &'static str, #[prop(into)] value: String) -> impl IntoView {
	view! {
		<div class="info-field">
			<span class="info-label">{label}": "</span>
			{value}
		</div>
	}
}

#[component]
fn StatusBadge(status: Status) -> impl IntoView {
	view! {
		<span class=format!("status-badge status-{}", status.as_str())>
			{status.as_str().to_uppercase()}
		</span>
	}
}

#[component]
fn Count(label: &'static str, value: u64, tone: &'static str) -> impl IntoView {
	view! {
		<div class=format!("info-count {tone}")>
			<div class="info-count-value">{value}</div>
			<div>{label}</div>
		</div>
	}
}

fn header(title: String, subtitle: &'static str, accent: &'static str) -> impl IntoView {
	view! {
		<div class="info-header">
			<h3 class=format!("info-title {accent}")>{title}</h3>
			<p class="info-subtitle">{subtitle}</p>
		</div>
	}
}

fn hint(text: &'static str) -> impl IntoView {
	view! { <div class="info-hint">{text}</div> }
}

pub(crate) fn content_view(content: InfoPanelContent) -> AnyView {
	match content {
		InfoPanelContent::Empty => view! {
			<div class="info-empty">
				<p>"Click on any node to view detailed information"</p>
			</div>
		}
		.into_any(),
		InfoPanelContent::SystemOverview(o) => {
			let v = o.vulnerabilities;
			view! {
				{header(o.name, "System Overview", "accent-system")}
				<div class="info-grid">
					<Field label="Type" value=o.system_type />
					<div class="info-field">
						<span class="info-label">"Status: "</span>
						<StatusBadge status=o.status />
					</div>
					<Field label="IP" value=o.ip />
					<Field label="Uptime" value=o.uptime />
					<Field label="OS" value=o.os />
					<Field label="CPU" value=o.cpu />
					<Field label="Memory" value=o.memory />
					<Field label="Storage" value=o.storage />
				</div>
				<div class="info-section">"Vulnerabilities"</div>
				<div class="info-counts">
					<Count label="Critical" value=v.critical.into() tone="count-critical" />
					<Count label="High" value=v.high.into() tone="count-high" />
					<Count label="Medium" value=v.medium.into() tone="count-medium" />
					<Count label="Low" value=v.low.into() tone="count-low" />
				</div>
				{hint("Click to drill down into security details")}
			}
			.into_any()
		}
		InfoPanelContent::SystemConfiguration {
			name,
			role,
			ip,
			hardware,
			serial,
		} => view! {
			{header(name, "Security Configuration", "accent-system")}
			<div class="info-list">
				<Field label="Role" value=role />
				<Field label="IP Address" value=ip />
				<Field label="Hardware" value=hardware />
				<Field label="Serial" value=serial />
			</div>
			{hint("Click to expand/collapse security categories")}
		}
		.into_any(),
		InfoPanelContent::Category {
			name,
			description,
			passed,
			failed,
			total,
			last_audit,
		} => view! {
			{header(name, "Security Category", "accent-category")}
			<div class="info-list">
				<Field label="Description" value=description />
				<div class="info-counts">
					<Count label="Passed" value=passed tone="count-passed" />
					<Count label="Failed" value=failed tone="count-critical" />
					<Count label="Total" value=total tone="count-low" />
				</div>
				<Field label="Last Audit" value=last_audit />
			</div>
			{hint("Click to expand/collapse subcategories")}
		}
		.into_any(),
		InfoPanelContent::Subcategory { name, description } => view! {
			{header(name, "Security Sub-Category", "accent-subcategory")}
			<div class="info-list">
				<Field label="Description" value=description />
			</div>
			{hint("Click to expand/collapse security features")}
		}
		.into_any(),
		InfoPanelContent::Feature(f) => view! {
			{header(f.name, "Security Feature", "accent-feature")}
			<div class="info-list">
				<Field label="ID" value=f.id />
				<div class="info-field">
					<span class="info-label">"Status: "</span>
					<StatusBadge status=f.status />
				</div>
				<Field label="Risk Level" value=f.risk_level />
				<Field label="Check Type" value=f.check_type />
				<Field label="Expected" value=f.expected />
				<Field label="Actual" value=f.actual />
				<Field label="Annexure" value=f.annexure />
				<Field label="Description" value=f.description />
				<Field label="Remediation" value=f.remediation />
			</div>
		}
		.into_any(),
		InfoPanelContent::Unknown { name, node_type } => view! {
			<div class="info-header">
				<h3 class="info-title">{name}</h3>
				<p class="info-subtitle">"Type: "{node_type}</p>
			</div>
			<p class="info-empty">"Click on a node to view detailed information."</p>
		}
		.into_any(),
	}
}

/// Side panel describing the selected node, with a button to clear the
/// selection.
#[component]
pub fn InfoPanel(
	#[prop(into)] content: Signal<InfoPanelContent>,
	#[prop(into)] on_clear: Callback<()>,
) -> impl IntoView {
	view! {
		<aside class="info-panel">
			<div class="info-panel-bar">
				<h3>"Node Information"</h3>
				<Show when=move || content.with(|c| *c != InfoPanelContent::Empty)>
					<button title="Clear Selection" on:click=move |_| on_clear.run(())>
						"✕"
					</button>
				</Show>
			</div>
			{move || content_view(content.get())}
		</aside>
	}
}
