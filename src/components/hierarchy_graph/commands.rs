use leptos::prelude::*;

use crate::camera::CameraCommand;
use crate::view_state::ViewState;

/// Handle through which toolbars drive the graph view.
///
/// Navigation goes straight to the shared [`ViewState`] signal. Camera moves
/// are queued and picked up by the canvas on its next frame.
#[derive(Clone, Copy)]
pub struct GraphCommands {
	view: RwSignal<ViewState>,
	camera: StoredValue<Vec<CameraCommand>>,
}

impl GraphCommands {
	pub fn new(view: RwSignal<ViewState>) -> Self {
		Self {
			view,
			camera: StoredValue::new(Vec::new()),
		}
	}

	fn push(&self, command: CameraCommand) {
		self.camera.update_value(|queue| queue.push(command));
	}

	pub fn zoom_in(&self) {
		self.push(CameraCommand::ZoomIn);
	}

	pub fn zoom_out(&self) {
		self.push(CameraCommand::ZoomOut);
	}

	pub fn fit_to_screen(&self) {
		self.push(CameraCommand::FitToScreen);
	}

	/// Clear all navigation and move the camera back to identity.
	pub fn reset_view(&self) {
		self.view.maybe_update(ViewState::reset);
		self.push(CameraCommand::ResetView);
	}

	pub fn go_back(&self) {
		self.view.maybe_update(ViewState::back_to_systems);
	}

	/// Take every queued camera command, oldest first.
	pub fn drain(&self) -> Vec<CameraCommand> {
		self.camera
			.try_update_value(std::mem::take)
			.unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::hierarchy::StaticHierarchy;
	use crate::view_state::ViewMode;

	#[test]
	fn toolbar_commands() {
		let owner = Owner::new();
		owner.set();
		let repo = StaticHierarchy::embedded().unwrap();
		let view = RwSignal::new(ViewState::new());
		view.update(|s| {
			s.select_location(&repo, "delhi");
			s.click_node(&repo, "delhi-db-01");
		});
		let commands = GraphCommands::new(view);

		commands.go_back();
		view.with_untracked(|s| {
			assert_eq!(s.current_view(), ViewMode::LocationSystems);
			assert_eq!(s.selected_location_id(), Some("delhi"));
		});

		commands.zoom_in();
		commands.reset_view();
		assert!(view.with_untracked(|s| *s == ViewState::new()));
		assert_eq!(commands.drain(), vec![CameraCommand::ZoomIn, CameraCommand::ResetView]);
		assert!(commands.drain().is_empty());

		commands.zoom_out();
		commands.fit_to_screen();
		assert_eq!(commands.drain(), vec![CameraCommand::ZoomOut, CameraCommand::FitToScreen]);
	}
}
