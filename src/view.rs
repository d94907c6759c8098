use std::cell::Cell;

/// What the binding layer needs from a hosted view.
pub trait View: 'static {
	fn is_mounted(&self) -> bool;

	/// The host's default re-render entry point.
	fn render(&self);

	/// Called when a bound target notifies. Defaults to [`View::render`].
	fn on_model_change(&self) {
		self.render()
	}

	/// Called before the view is rebound to a different target.
	fn will_change_model(&self) {}

	/// Called after the view has been rebound to a different target.
	fn did_change_model(&self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
	#[default]
	Unmounted,
	Mounted,
	Unmounting,
}

/// Mount phase tracking for hosts implementing [`View::is_mounted`].
#[derive(Debug, Default)]
pub struct MountState {
	phase: Cell<Phase>,
}

impl MountState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn phase(&self) -> Phase {
		self.phase.get()
	}

	pub fn set(&self, phase: Phase) {
		self.phase.set(phase)
	}

	pub fn is_mounted(&self) -> bool {
		self.phase.get() == Phase::Mounted
	}
}
