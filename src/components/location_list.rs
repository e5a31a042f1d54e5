use leptos::prelude::*;

use super::info_panel::{InfoPanelContent, SystemOverview, content_view};
use crate::hierarchy::{HierarchyRepository, Location, Status};
use crate::view_state::ViewState;

/// The drilled-into system's name and its expanded nodes as `(id, name)`,
/// in id order. `None` outside the details view.
pub fn expanded_nodes(
	state: &ViewState,
	repo: &dyn HierarchyRepository,
) -> Option<(String, Vec<(String, String)>)> {
	let system_id = state.selected_system_id()?;
	let graph = repo.system_graph(system_id)?;
	let nodes = state
		.expanded_node_ids()
		.iter()
		.map(|id| {
			let name = graph.node(id).map_or_else(|| id.clone(), |n| n.name.clone());
			(id.clone(), name)
		})
		.collect();
	Some((graph.root().name.clone(), nodes))
}

/// Sidebar block shown while a system is open: which nodes are expanded.
#[component]
pub fn ExpandedNodes(
	#[prop(into)] details: Signal<Option<(String, Vec<(String, String)>)>>,
) -> impl IntoView {
	move || {
		details.get().map(|(system, nodes)| {
			view! {
				<section class="expanded-nodes">
					<div class="expanded-system">{system}</div>
					<div class="info-subtitle">"Security Configuration Details"</div>
					<div class="info-label">"Expanded Nodes:"</div>
					<ul>
						{nodes
							.into_iter()
							.map(|(id, name)| view! { <li title=id>{name}</li> })
							.collect_view()}
					</ul>
				</section>
			}
		})
	}
}

/// Sidebar listing every location with its compliance summary. The systems
/// of the selected location can be inspected and opened from here.
#[component]
pub fn LocationList(
	locations: Vec<Location>,
	#[prop(into)] selected: Signal<Option<String>>,
	#[prop(into)] on_select: Callback<String>,
	/// Called with `(location_id, system_id)`.
	#[prop(into)]
	on_open_system: Callback<(String, String)>,
) -> impl IntoView {
	let rows = locations
		.into_iter()
		.map(|location| {
			let summary = location.summary();
			let status = location.status();
			let id = location.id.clone();
			let is_selected = {
				let id = id.clone();
				move || selected.with(|s| s.as_deref() == Some(id.as_str()))
			};
			let show_systems = is_selected.clone();
			let systems = location.systems.clone();
			let location_id = id.clone();

			view! {
				<li class=move || if is_selected() { "location selected" } else { "location" }>
					<button class="location-button" on:click=move |_| on_select.run(id.clone())>
						<span class=format!("status-dot status-{}", status_class(status))></span>
						<span class="location-name">{location.name}</span>
						<span class="location-region">{location.region}</span>
					</button>
					<div class="location-summary">
						<span class="count-passed">{summary.compliant}" compliant"</span>
						<span class="count-medium">{summary.warning}" warning"</span>
						<span class="count-critical">{summary.critical}" critical"</span>
					</div>
					<Show when=show_systems>
						<ul class="system-list">
							{systems
								.iter()
								.map(|system| {
									let overview = InfoPanelContent::SystemOverview(
										SystemOverview::of(system),
									);
									let ids = (location_id.clone(), system.id.clone());
									view! {
										<li>
											<details>
												<summary>{system.name.clone()}</summary>
												{content_view(overview)}
												<button
													class="open-system"
													on:click=move |_| on_open_system.run(ids.clone())
												>
													"View security details"
												</button>
											</details>
										</li>
									}
								})
								.collect_view()}
						</ul>
					</Show>
				</li>
			}
		})
		.collect_view();

	view! {
		<nav class="location-list">
			<h3>"Locations"</h3>
			<ul>{rows}</ul>
		</nav>
	}
}

fn status_class(status: Status) -> &'static str {
	if status.is_compliance() { status.as_str() } else { "unknown" }
}
