//! Navigation state of the graph view and the transitions that mutate it.

use std::collections::BTreeSet;

use log::{debug, info};

use crate::hierarchy::HierarchyRepository;

/// Which of the two graph views is shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
	/// The systems of one location, as unconnected siblings.
	LocationSystems,
	/// One system's security hierarchy, revealed by expansion.
	SystemDetails,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Navigation {
	LocationSystems {
		location_id: Option<String>,
	},
	SystemDetails {
		location_id: String,
		system_id: String,
		expanded: BTreeSet<String>,
	},
}

/// Selection and expansion state of the graph view.
///
/// A system can only be selected while in [`ViewMode::SystemDetails`], and
/// the selected node always exists in the hierarchy being shown. The
/// transition methods are the only mutators; each returns whether anything
/// changed so callers know when to rebuild the visible graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
	nav: Navigation,
	selected_node_id: Option<String>,
}

impl Default for ViewState {
	fn default() -> Self {
		Self {
			nav: Navigation::LocationSystems { location_id: None },
			selected_node_id: None,
		}
	}
}

static NO_EXPANSION: BTreeSet<String> = BTreeSet::new();

impl ViewState {
	/// Nothing selected, location view.
	pub fn new() -> Self {
		Self::default()
	}

	/// Which of the two views is showing.
	pub fn current_view(&self) -> ViewMode {
		match self.nav {
			Navigation::LocationSystems { .. } => ViewMode::LocationSystems,
			Navigation::SystemDetails { .. } => ViewMode::SystemDetails,
		}
	}

	/// Location in view. In the details view this is the system's location.
	pub fn selected_location_id(&self) -> Option<&str> {
		match &self.nav {
			Navigation::LocationSystems { location_id } => location_id.as_deref(),
			Navigation::SystemDetails { location_id, .. } => Some(location_id),
		}
	}

	/// System drilled into, if any.
	pub fn selected_system_id(&self) -> Option<&str> {
		match &self.nav {
			Navigation::SystemDetails { system_id, .. } => Some(system_id),
			Navigation::LocationSystems { .. } => None,
		}
	}

	/// Node shown in the info panel.
	pub fn selected_node_id(&self) -> Option<&str> {
		self.selected_node_id.as_deref()
	}

	/// Nodes whose one-hop neighbourhood is revealed. Always empty outside
	/// [`ViewMode::SystemDetails`].
	pub fn expanded_node_ids(&self) -> &BTreeSet<String> {
		match &self.nav {
			Navigation::SystemDetails { expanded, .. } => expanded,
			Navigation::LocationSystems { .. } => &NO_EXPANSION,
		}
	}

	/// Whether `node_id` is expanded.
	pub fn is_expanded(&self, node_id: &str) -> bool {
		self.expanded_node_ids().contains(node_id)
	}

	/// Show the systems of `location_id`, dropping any system drill-down.
	/// Unknown location ids are ignored.
	pub fn select_location(
		&mut self,
		repo: &dyn HierarchyRepository,
		location_id: &str,
	) -> bool {
		if repo.location(location_id).is_none() {
			debug!("view: ignoring unknown location `{location_id}`");
			return false;
		}
		let next = Self {
			nav: Navigation::LocationSystems {
				location_id: Some(location_id.to_owned()),
			},
			selected_node_id: None,
		};
		info!("view: location `{location_id}` selected");
		self.replace(next)
	}

	/// Handle a click on a rendered node.
	///
	/// In the location view a click on one of the location's systems drills
	/// into that system with only its root expanded. In the details view a
	/// click toggles the node's expansion and selects it. Ids outside the
	/// current hierarchy leave the state untouched.
	pub fn click_node(&mut self, repo: &dyn HierarchyRepository, node_id: &str) -> bool {
		let changed = match &mut self.nav {
			Navigation::LocationSystems {
				location_id: Some(location_id),
			} => {
				let known = repo
					.location_systems(location_id)
					.is_some_and(|systems| systems.iter().any(|s| s.id == node_id));
				if known {
					info!("view: drilling into system `{node_id}`");
					self.nav = Navigation::SystemDetails {
						location_id: location_id.clone(),
						system_id: node_id.to_owned(),
						expanded: BTreeSet::from([node_id.to_owned()]),
					};
					self.selected_node_id = Some(node_id.to_owned());
				}
				known
			}
			Navigation::LocationSystems { location_id: None } => false,
			Navigation::SystemDetails {
				system_id,
				expanded,
				..
			} => {
				let known = repo
					.system_graph(system_id)
					.is_some_and(|graph| graph.contains(node_id));
				if known {
					if !expanded.remove(node_id) {
						expanded.insert(node_id.to_owned());
					}
					self.selected_node_id = Some(node_id.to_owned());
				}
				known
			}
		};
		if !changed {
			debug!("view: ignoring click on `{node_id}`");
		}
		changed
	}

	/// Leave the system drill-down, keeping the selected location.
	pub fn back_to_systems(&mut self) -> bool {
		let next = Self {
			nav: Navigation::LocationSystems {
				location_id: self.selected_location_id().map(str::to_owned),
			},
			selected_node_id: None,
		};
		self.replace(next)
	}

	/// Drop the info-panel selection, leaving navigation and expansion as is.
	pub fn clear_selection(&mut self) -> bool {
		self.selected_node_id.take().is_some()
	}

	/// Clear every selection and return to the initial empty view.
	pub fn reset(&mut self) -> bool {
		self.replace(Self::default())
	}

	fn replace(&mut self, next: Self) -> bool {
		if *self == next {
			return false;
		}
		*self = next;
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::hierarchy::StaticHierarchy;

	fn repo() -> StaticHierarchy {
		StaticHierarchy::embedded().unwrap()
	}

	#[test]
	fn starts_empty() {
		let state = ViewState::new();
		assert_eq!(state.current_view(), ViewMode::LocationSystems);
		assert_eq!(state.selected_location_id(), None);
		assert_eq!(state.selected_system_id(), None);
		assert_eq!(state.selected_node_id(), None);
		assert!(state.expanded_node_ids().is_empty());
	}

	#[test]
	fn drill_into_system_expands_root() {
		let repo = repo();
		let mut state = ViewState::new();
		assert!(state.select_location(&repo, "delhi"));
		assert!(state.click_node(&repo, "delhi-db-01"));

		assert_eq!(state.current_view(), ViewMode::SystemDetails);
		assert_eq!(state.selected_location_id(), Some("delhi"));
		assert_eq!(state.selected_system_id(), Some("delhi-db-01"));
		assert_eq!(state.selected_node_id(), Some("delhi-db-01"));
		assert_eq!(
			state.expanded_node_ids().iter().collect::<Vec<_>>(),
			vec!["delhi-db-01"]
		);
	}

	#[test]
	fn click_toggles_and_always_selects() {
		let repo = repo();
		let mut state = ViewState::new();
		state.select_location(&repo, "delhi");
		state.click_node(&repo, "delhi-db-01");

		assert!(state.click_node(&repo, "filesystem"));
		assert!(state.is_expanded("filesystem"));
		assert_eq!(state.selected_node_id(), Some("filesystem"));

		assert!(state.click_node(&repo, "delhi-db-01"));
		assert!(!state.is_expanded("delhi-db-01"));
		assert_eq!(state.selected_node_id(), Some("delhi-db-01"));

		assert!(state.click_node(&repo, "filesystem"));
		assert!(!state.is_expanded("filesystem"));
		assert_eq!(state.selected_node_id(), Some("filesystem"));
	}

	#[test]
	fn unknown_ids_are_ignored() {
		let repo = repo();
		let mut state = ViewState::new();
		assert!(!state.click_node(&repo, "delhi-db-01"));
		assert!(!state.select_location(&repo, "atlantis"));
		assert_eq!(state, ViewState::new());

		state.select_location(&repo, "delhi");
		let before = state.clone();
		assert!(!state.click_node(&repo, "mumbai-web-01"));
		assert!(!state.click_node(&repo, "filesystem"));
		assert_eq!(state, before);

		state.click_node(&repo, "delhi-db-01");
		let before = state.clone();
		assert!(!state.click_node(&repo, "no-such-node"));
		assert!(!state.click_node(&repo, "delhi-web-01"));
		assert_eq!(state, before);
	}

	#[test]
	fn selecting_location_leaves_details() {
		let repo = repo();
		let mut state = ViewState::new();
		state.select_location(&repo, "delhi");
		state.click_node(&repo, "delhi-db-01");
		state.click_node(&repo, "services");

		assert!(state.select_location(&repo, "mumbai"));
		assert_eq!(state.current_view(), ViewMode::LocationSystems);
		assert_eq!(state.selected_location_id(), Some("mumbai"));
		assert_eq!(state.selected_system_id(), None);
		assert_eq!(state.selected_node_id(), None);
		assert!(state.expanded_node_ids().is_empty());
	}

	#[test]
	fn back_is_idempotent() {
		let repo = repo();
		let mut state = ViewState::new();
		state.select_location(&repo, "mumbai");
		state.click_node(&repo, "mumbai-web-01");
		state.click_node(&repo, "network");

		assert!(state.back_to_systems());
		let once = state.clone();
		assert!(!state.back_to_systems());
		assert_eq!(state, once);
		assert_eq!(state.selected_location_id(), Some("mumbai"));
		assert_eq!(state.selected_system_id(), None);
		assert!(state.expanded_node_ids().is_empty());
	}

	#[test]
	fn reset_returns_to_initial() {
		let repo = repo();
		let mut state = ViewState::new();
		state.select_location(&repo, "bangalore");
		state.click_node(&repo, "blr-cache-01");
		assert!(state.reset());
		assert_eq!(state, ViewState::new());
		assert!(!state.reset());
	}

	#[test]
	fn clear_selection_keeps_expansion() {
		let repo = repo();
		let mut state = ViewState::new();
		state.select_location(&repo, "mumbai");
		state.click_node(&repo, "mumbai-web-01");
		state.click_node(&repo, "network");
		let expanded = state.expanded_node_ids().clone();

		assert!(state.clear_selection());
		assert_eq!(state.selected_node_id(), None);
		assert_eq!(state.expanded_node_ids(), &expanded);
		assert_eq!(state.selected_system_id(), Some("mumbai-web-01"));
		assert!(!state.clear_selection());
	}
}
