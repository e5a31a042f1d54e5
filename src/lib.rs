//! Drill-down force-directed graph of infrastructure compliance posture.
//!
//! The navigation core ([`view_state`], [`graph_builder`], [`layout`],
//! [`camera`]) is plain Rust over a [`hierarchy::HierarchyRepository`]; the
//! Leptos components only project it onto a canvas and a few panels.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

pub mod camera;
pub mod graph_builder;
pub mod hierarchy;
pub mod layout;
pub mod view_state;

// Modules
mod components;
mod pages;

// Top-Level pages
use crate::pages::not_found::NotFound;
use crate::pages::visualize::Visualize;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the infrastructure graph and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Infrastructure Graph" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Visualize />
				<Route path=path!("/visualize") view=Visualize />
			</Routes>
		</Router>
	}
}
