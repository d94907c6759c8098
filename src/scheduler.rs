use std::cell::Cell;
use std::rc::{Rc, Weak};

use crate::{defer, Callback, Event, View};

/// How notifications of one binding turn into render triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
	/// One synchronous trigger per notification.
	Immediate,
	/// Leading trigger on the first notification of a burst and at most
	/// one trailing trigger when the burst is flushed.
	Coalesced,
}

/// Re-renders a view if it is still mounted.
#[derive(Clone)]
pub struct Trigger {
	view: Weak<dyn View>,
}

impl Trigger {
	pub fn new(view: Weak<dyn View>) -> Self {
		Trigger { view }
	}

	/// Returns whether the view was asked to update.
	pub fn fire(&self) -> bool {
		match self.view.upgrade() {
			Some(view) if view.is_mounted() => {
				tracing::trace!("model change trigger");
				view.on_model_change();
				true
			}
			_ => {
				tracing::trace!("skipping trigger for detached view");
				false
			}
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
	Idle,
	Pending { trailing: bool },
}

/// Builds the listener callback for `trigger` under `policy`.
pub fn schedule(policy: Policy, trigger: Trigger) -> Callback {
	match policy {
		Policy::Immediate => Rc::new(move |_: Event| {
			trigger.fire();
		}),
		Policy::Coalesced => {
			let phase = Rc::new(Cell::new(Phase::Idle));
			Rc::new(move |_: Event| match phase.get() {
				Phase::Idle => {
					phase.set(Phase::Pending { trailing: false });
					defer({
						let phase = phase.clone();
						let trigger = trigger.clone();
						move || {
							if phase.replace(Phase::Idle) == (Phase::Pending { trailing: true }) {
								trigger.fire();
							}
						}
					});
					trigger.fire();
				}
				Phase::Pending { .. } => phase.set(Phase::Pending { trailing: true }),
			})
		}
	}
}
