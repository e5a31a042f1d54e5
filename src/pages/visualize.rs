use leptos::prelude::*;
use log::warn;

use crate::components::compliance_metrics::{ComplianceMetrics, ComplianceMetricsCard};
use crate::components::hierarchy_graph::style::{node_style, status_style, system_style};
use crate::components::hierarchy_graph::{GraphCommands, HierarchyGraphCanvas};
use crate::components::info_panel::{InfoPanel, InfoPanelContent};
use crate::components::location_list::{ExpandedNodes, LocationList, expanded_nodes};
use crate::graph_builder::VisibleGraph;
use crate::hierarchy::{HierarchyRepository, NodeType, Status, StaticHierarchy, SystemType};
use crate::view_state::{ViewMode, ViewState};

/// Infrastructure graph page
#[component]
pub fn Visualize() -> impl IntoView {
	match StaticHierarchy::embedded() {
		Ok(repo) => view! { <GraphExplorer repo=repo /> }.into_any(),
		Err(err) => {
			warn!("visualize: embedded dataset rejected: {err}");
			view! {
				<div class="dataset-error">
					<h1>"Infrastructure data unavailable"</h1>
					<p>{err.to_string()}</p>
				</div>
			}
			.into_any()
		}
	}
}

#[component]
fn GraphExplorer(repo: StaticHierarchy) -> impl IntoView {
	let locations = repo.locations().to_vec();
	let repo = StoredValue::new(repo);
	let view_state = RwSignal::new(ViewState::new());
	let commands = GraphCommands::new(view_state);
	// Written by the canvas once it has measured itself.
	let canvas_size = RwSignal::new((800.0, 600.0));

	// Not memoised: every transition must reach the canvas, including one
	// that leaves the visible set unchanged.
	let graph = Signal::derive(move || {
		let (width, height) = canvas_size.get();
		view_state.with(|s| repo.with_value(|r| VisibleGraph::build(s, r, width, height)))
	});
	let selected = Signal::derive(move || {
		view_state.with(|s| s.selected_node_id().map(str::to_owned))
	});
	let info = Memo::new(move |_| {
		view_state.with(|s| repo.with_value(|r| InfoPanelContent::for_selection(s, r)))
	});
	let mode = Memo::new(move |_| view_state.with(ViewState::current_view));
	let metrics = Memo::new(move |_| {
		view_state.with(|s| repo.with_value(|r| ComplianceMetrics::for_selection(s, r)))
	});
	let expanded = Memo::new(move |_| {
		view_state.with(|s| repo.with_value(|r| expanded_nodes(s, r)))
	});

	let on_node_click = Callback::new(move |id: String| {
		view_state.maybe_update(|s| repo.with_value(|r| s.click_node(r, &id)));
	});
	let on_select_location = Callback::new(move |id: String| {
		view_state.maybe_update(|s| repo.with_value(|r| s.select_location(r, &id)));
	});
	let on_open_system = Callback::new(move |(location, system): (String, String)| {
		view_state.maybe_update(|s| {
			repo.with_value(|r| s.select_location(r, &location) | s.click_node(r, &system))
		});
	});
	let on_clear = Callback::new(move |_: ()| {
		view_state.maybe_update(ViewState::clear_selection);
	});

	let breadcrumb = move || {
		view_state.with(|s| match (s.current_view(), s.selected_location_id()) {
			(_, None) => "Click on a location, then select a system to view".to_owned(),
			(ViewMode::LocationSystems, Some(location)) => {
				let name = repo.with_value(|r| r.location(location).map(|l| l.name.clone()));
				format!("{} → Click systems for details", name.unwrap_or_default())
			}
			(ViewMode::SystemDetails, Some(_)) => {
				let system = s.selected_system_id().unwrap_or_default();
				let name = repo.with_value(|r| r.system(system).map(|sys| sys.name.clone()));
				format!("{} → Click nodes for information", name.unwrap_or_default())
			}
		})
	};

	view! {
		<div class="visualize">
			<aside class="sidebar">
				<ExpandedNodes details=expanded />
				<LocationList
					locations=locations
					selected=Signal::derive(move || {
						view_state.with(|s| s.selected_location_id().map(str::to_owned))
					})
					on_select=on_select_location
					on_open_system=on_open_system
				/>
				<ComplianceMetricsCard metrics=metrics />
			</aside>

			<main class="graph-area">
				<div class="graph-toolbar">
					<button title="Zoom In" on:click=move |_| commands.zoom_in()>"+"</button>
					<button title="Zoom Out" on:click=move |_| commands.zoom_out()>"−"</button>
					<button title="Fit to Screen" on:click=move |_| commands.fit_to_screen()>
						"Fit"
					</button>
					<button title="Reset View" on:click=move |_| commands.reset_view()>
						"Reset"
					</button>
					<Show when=move || mode.get() == ViewMode::SystemDetails>
						<button title="Back to Systems" on:click=move |_| commands.go_back()>
							"← Back"
						</button>
					</Show>
				</div>

				<div class="graph-status">
					<div>{breadcrumb}</div>
					{move || {
						info.with(|c| c.title().map(str::to_owned))
							.map(|name| view! { <div class="graph-selected">"Selected: "{name}</div> })
					}}
				</div>

				<HierarchyGraphCanvas
					graph=graph
					selected=selected
					on_node_click=on_node_click
					commands=commands
					size=canvas_size
				/>

				<Legend mode=mode />
			</main>

			<InfoPanel content=info on_clear=on_clear />
		</div>
	}
}

#[component]
fn Legend(#[prop(into)] mode: Signal<ViewMode>) -> impl IntoView {
	let swatch = |color: &'static str, label: &'static str, shape: &'static str| {
		view! {
			<div class="legend-item">
				<span class=format!("legend-swatch {shape}") style:background-color=color></span>
				<span>{label}</span>
			</div>
		}
	};

	let node_types = move || match mode.get() {
		ViewMode::LocationSystems => [
			(SystemType::WebServer, "Web Server"),
			(SystemType::Database, "Database"),
			(SystemType::Application, "Application"),
			(SystemType::LoadBalancer, "Load Balancer"),
			(SystemType::Cache, "Cache"),
			(SystemType::Workstation, "Workstation"),
		]
		.into_iter()
		.map(|(t, label)| swatch(system_style(Some(t)).fill, label, "round"))
		.collect_view()
		.into_any(),
		ViewMode::SystemDetails => view! {
			{swatch(system_style(None).fill, "System", "round")}
			{swatch(node_style(NodeType::Category, Status::Category, None).fill, "Category", "round")}
			{swatch(
				node_style(NodeType::Subcategory, Status::Subcategory, None).fill,
				"Sub-Category",
				"round",
			)}
		}
		.into_any(),
	};

	view! {
		<div class="graph-legend">
			<h4>"Node Types"</h4>
			{node_types}
			{swatch(status_style(Status::Compliant).fill, "Compliant", "square")}
			{swatch(status_style(Status::Warning).fill, "Warning", "square")}
			{swatch(status_style(Status::Critical).fill, "Critical", "square")}
		</div>
	}
}
