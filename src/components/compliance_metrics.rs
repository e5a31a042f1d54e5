//! Feature-level compliance counts for the sidebar.

use leptos::prelude::*;

use crate::hierarchy::{HierarchyRepository, NodeType, StatusSummary, System};
use crate::view_state::ViewState;

/// Feature counts over the systems in scope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComplianceMetrics {
	pub features: StatusSummary,
	/// Every feature in scope, whatever its status.
	pub total: usize,
}

impl ComplianceMetrics {
	/// Counts for the selected system, else for the selected location, else
	/// for every location. Systems without a detailed graph add nothing.
	pub fn for_selection(state: &ViewState, repo: &dyn HierarchyRepository) -> Self {
		let systems: Vec<&System> = match (state.selected_system_id(), state.selected_location_id()) {
			(Some(id), _) => repo.system(id).into_iter().collect(),
			(None, Some(location)) => repo
				.location_systems(location)
				.unwrap_or_default()
				.iter()
				.collect(),
			(None, None) => repo.locations().iter().flat_map(|l| &l.systems).collect(),
		};

		let mut metrics = Self::default();
		let features = systems
			.into_iter()
			.filter_map(|s| repo.system_graph(&s.id))
			.flat_map(|g| g.nodes())
			.filter(|n| n.node_type == NodeType::Feature);
		for feature in features {
			metrics.features.record(feature.status);
			metrics.total += 1;
		}
		metrics
	}
}

#[component]
pub fn ComplianceMetricsCard(#[prop(into)] metrics: Signal<ComplianceMetrics>) -> impl IntoView {
	let cell = move |label: &'static str, tone: &'static str, value: fn(&ComplianceMetrics) -> usize| {
		view! {
			<div class=format!("metric {tone}")>
				<div class="metric-value">{move || metrics.with(value)}</div>
				<div class="metric-label">{label}</div>
			</div>
		}
	};

	view! {
		<section class="compliance-metrics">
			<h3>"Compliance Metrics"</h3>
			<div class="metric-grid">
				{cell("Compliant", "count-passed", |m| m.features.compliant)}
				{cell("Warning", "count-medium", |m| m.features.warning)}
				{cell("Critical", "count-critical", |m| m.features.critical)}
				{cell("Total Features", "metric-total", |m| m.total)}
			</div>
		</section>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::hierarchy::{Status, StaticHierarchy};

	fn feature_count(repo: &StaticHierarchy, system: &str) -> usize {
		repo.system_graph(system)
			.unwrap()
			.nodes()
			.filter(|n| n.node_type == NodeType::Feature)
			.count()
	}

	#[test]
	fn scope_follows_selection() {
		let repo = StaticHierarchy::embedded().unwrap();
		let mut state = ViewState::new();
		let everything = ComplianceMetrics::for_selection(&state, &repo);

		state.select_location(&repo, "mumbai");
		let mumbai = ComplianceMetrics::for_selection(&state, &repo);
		assert_eq!(
			mumbai.total,
			feature_count(&repo, "mumbai-web-01")
				+ feature_count(&repo, "mumbai-db-01")
				+ feature_count(&repo, "mumbai-ws-01")
		);
		assert!(mumbai.total < everything.total);

		state.click_node(&repo, "mumbai-ws-01");
		let ws = ComplianceMetrics::for_selection(&state, &repo);
		assert_eq!(ws.total, feature_count(&repo, "mumbai-ws-01"));
		let graph = repo.system_graph("mumbai-ws-01").unwrap();
		let critical = graph
			.nodes()
			.filter(|n| n.node_type == NodeType::Feature && n.status == Status::Critical)
			.count();
		assert_eq!(ws.features.critical, critical);
		let s = ws.features;
		assert!(s.compliant + s.warning + s.critical <= ws.total);
	}

	#[test]
	fn system_without_detail_graph_has_no_features() {
		let repo = StaticHierarchy::embedded().unwrap();
		let mut state = ViewState::new();
		state.select_location(&repo, "bangalore");
		state.click_node(&repo, "blr-cache-01");
		assert_eq!(ComplianceMetrics::for_selection(&state, &repo), ComplianceMetrics::default());
	}
}
