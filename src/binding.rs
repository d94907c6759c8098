use std::cell::{Cell, RefCell};
use std::rc::Weak;

use crate::{schedule, OwnerKey, Resolved, Result, Target, Trigger, View, Watch};

enum State {
	Unbound,
	Bound(Resolved),
}

/// Live association of one view with the target of one [`Watch`].
///
/// Every binding registers under its own [`OwnerKey`], so tearing it
/// down never touches listeners installed by anybody else.
pub struct Binding<P> {
	watch: Watch<P>,
	owner: OwnerKey,
	state: RefCell<State>,
	// Outcome of the last `props_will_change`, consumed by `props_did_change`.
	changed: Cell<Option<bool>>,
}

impl<P> Binding<P> {
	pub fn new(watch: Watch<P>) -> Self {
		Binding {
			watch,
			owner: OwnerKey::new(),
			state: RefCell::new(State::Unbound),
			changed: Cell::new(None),
		}
	}

	pub fn owner(&self) -> OwnerKey {
		self.owner
	}

	pub fn watch(&self) -> &Watch<P> {
		&self.watch
	}

	pub fn is_bound(&self) -> bool {
		matches!(*self.state.borrow(), State::Bound(_))
	}

	pub fn target(&self) -> Option<Target> {
		match &*self.state.borrow() {
			State::Bound(resolved) => Some(resolved.target.clone()),
			State::Unbound => None,
		}
	}

	pub fn attach(&self, view: &Weak<dyn View>, props: &P) -> Result<()> {
		let resolved = self.watch.resolve(props)?;
		self.unbind();
		self.bind(view, resolved);
		Ok(())
	}

	pub fn props_will_change(&self, view: &Weak<dyn View>, current: &P, next: &P) -> Result<()> {
		let after = self.watch.resolve(next)?;
		let before = match self.watch.target(current) {
			Ok(before) => before,
			// Already reported by the hook that received `current`.
			Err(err) => {
				tracing::debug!(slot = self.watch.name(), %err, "current props do not resolve");
				self.target()
			}
		};
		let changed = before.as_ref() != after.as_ref().map(|r| &r.target);
		let stale = self.target().as_ref() != after.as_ref().map(|r| &r.target);
		self.changed.set(Some(changed));

		if !changed && !stale {
			return Ok(());
		}

		if changed {
			if let Some(view) = view.upgrade() {
				view.will_change_model();
			}
		} else {
			tracing::debug!(slot = self.watch.name(), "correcting stale binding");
		}

		self.unbind();
		self.bind(view, after);
		Ok(())
	}

	pub fn props_did_change(&self, view: &Weak<dyn View>, prev: &P, current: &P) -> Result<()> {
		let changed = match self.changed.take() {
			Some(changed) => changed,
			None => self.watch.target(prev)? != self.watch.target(current)?,
		};

		if changed {
			if let Some(view) = view.upgrade() {
				view.did_change_model();
			}
		}

		Ok(())
	}

	/// Idempotent; safe to call without a prior `attach`.
	pub fn detach(&self) {
		self.changed.set(None);
		self.unbind();
	}

	fn bind(&self, view: &Weak<dyn View>, resolved: Option<Resolved>) {
		let Some(resolved) = resolved else {
			return;
		};

		let callback = schedule(resolved.policy, Trigger::new(view.clone()));
		resolved
			.target
			.register(self.owner, resolved.events, callback);

		tracing::debug!(
			slot = self.watch.name(),
			owner = ?self.owner,
			target = ?resolved.target,
			events = ?resolved.events,
			"bound"
		);

		*self.state.borrow_mut() = State::Bound(resolved);
	}

	fn unbind(&self) {
		let previous = std::mem::replace(&mut *self.state.borrow_mut(), State::Unbound);
		if let State::Bound(resolved) = previous {
			let removed = resolved.target.unregister(self.owner);
			tracing::debug!(
				slot = self.watch.name(),
				owner = ?self.owner,
				target = ?resolved.target,
				removed,
				"unbound"
			);
		}
	}
}

impl<P> Drop for Binding<P> {
	fn drop(&mut self) {
		self.unbind();
	}
}
