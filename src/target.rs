use std::fmt;
use std::rc::Rc;

use crate::addr::RcAddr;
use crate::collection::Collection;
use crate::{Callback, Emitter, Events, Listeners, Model, OwnerKey, Policy, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
	Model,
	Collection,
}

impl Kind {
	/// Events a binding listens to when none were configured.
	///
	/// Collections never default to per-item `change`.
	pub fn default_events(self) -> Events {
		match self {
			Kind::Model => Events::CHANGE,
			Kind::Collection => Events::STRUCTURAL,
		}
	}

	pub fn default_policy(self) -> Policy {
		match self {
			Kind::Model => Policy::Immediate,
			Kind::Collection => Policy::Coalesced,
		}
	}
}

/// Something a view can be bound to. Compared by reference identity.
#[derive(Clone)]
pub struct Target {
	kind: Kind,
	emitter: RcAddr<dyn Emitter>,
}

impl Target {
	pub fn new(kind: Kind, emitter: Rc<dyn Emitter>) -> Self {
		Target {
			kind,
			emitter: RcAddr::new(emitter),
		}
	}

	#[inline]
	pub fn kind(&self) -> Kind {
		self.kind
	}

	#[inline]
	pub fn listeners(&self) -> &Listeners {
		self.emitter.listeners()
	}

	pub fn register(&self, owner: OwnerKey, events: Events, callback: Callback) -> Token {
		self.listeners().register(owner, events, callback)
	}

	pub fn unregister(&self, owner: OwnerKey) -> usize {
		self.listeners().unregister(owner)
	}

	pub fn tokens_of(&self, owner: OwnerKey) -> usize {
		self.listeners().tokens_of(owner)
	}
}

impl PartialEq for Target {
	fn eq(&self, other: &Self) -> bool {
		self.emitter == other.emitter
	}
}

impl Eq for Target {}

impl fmt::Debug for Target {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?}@{:#x}", self.kind, self.emitter.addr())
	}
}

impl<T: 'static> From<&Model<T>> for Target {
	fn from(model: &Model<T>) -> Self {
		Target::new(Kind::Model, model.body.clone())
	}
}

impl<T: 'static> From<Model<T>> for Target {
	fn from(model: Model<T>) -> Self {
		Target::new(Kind::Model, model.body)
	}
}

impl<T: 'static> From<&Collection<T>> for Target {
	fn from(collection: &Collection<T>) -> Self {
		Target::new(Kind::Collection, collection.body.clone())
	}
}

impl<T: 'static> From<Collection<T>> for Target {
	fn from(collection: Collection<T>) -> Self {
		Target::new(Kind::Collection, collection.body)
	}
}
