use std::cell::RefCell;
use std::rc::Weak;

use smallvec::SmallVec;

use crate::{Binding, OwnerKey, Result, Target, View, Watch};

/// The four calls a hosting view technology makes into the binding layer.
///
/// Each is called once at the matching point of a view's life.
pub trait Lifecycle<P> {
	fn on_attach(&self, props: &P) -> Result<()>;
	fn on_props_will_change(&self, next: &P) -> Result<()>;
	fn on_props_did_change(&self, prev: &P) -> Result<()>;
	fn on_detach(&self);
}

struct PropsState<P> {
	current: Option<P>,
	incoming: Option<P>,
}

/// All bindings of one view.
///
/// Keeps the props snapshot the hooks need so hosts only pass what
/// their own lifecycle gives them.
pub struct Subscriptions<P> {
	view: Weak<dyn View>,
	bindings: SmallVec<[Binding<P>; 1]>,
	props: RefCell<PropsState<P>>,
}

impl<P> Subscriptions<P> {
	pub fn new(view: Weak<dyn View>) -> Self {
		Subscriptions {
			view,
			bindings: SmallVec::new(),
			props: RefCell::new(PropsState {
				current: None,
				incoming: None,
			}),
		}
	}

	pub fn watch(mut self, watch: Watch<P>) -> Self {
		self.bindings.push(Binding::new(watch));
		self
	}

	pub fn bindings(&self) -> &[Binding<P>] {
		&self.bindings
	}

	/// Currently bound targets, one per bound slot.
	pub fn targets(&self) -> Vec<Target> {
		self.bindings.iter().filter_map(Binding::target).collect()
	}

	pub fn owners(&self) -> impl Iterator<Item = OwnerKey> + '_ {
		self.bindings.iter().map(Binding::owner)
	}
}

impl<P: Clone> Lifecycle<P> for Subscriptions<P> {
	fn on_attach(&self, props: &P) -> Result<()> {
		self.props.borrow_mut().current = Some(props.clone());
		for binding in &self.bindings {
			binding.attach(&self.view, props)?;
		}

		Ok(())
	}

	fn on_props_will_change(&self, next: &P) -> Result<()> {
		// Not attached: there is nothing to rebind.
		let Some(current) = self.props.borrow().current.clone() else {
			return Ok(());
		};

		for binding in &self.bindings {
			binding.props_will_change(&self.view, &current, next)?;
		}

		self.props.borrow_mut().incoming = Some(next.clone());
		Ok(())
	}

	fn on_props_did_change(&self, prev: &P) -> Result<()> {
		let current = {
			let mut props = self.props.borrow_mut();
			if let Some(incoming) = props.incoming.take() {
				props.current = Some(incoming);
			}
			props.current.clone()
		};

		if let Some(current) = current {
			for binding in &self.bindings {
				binding.props_did_change(&self.view, prev, &current)?;
			}
		}

		Ok(())
	}

	fn on_detach(&self) {
		for binding in &self.bindings {
			binding.detach();
		}

		let mut props = self.props.borrow_mut();
		props.current = None;
		props.incoming = None;
	}
}
