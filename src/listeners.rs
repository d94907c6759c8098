use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use fxhash::FxHashMap;
use smallvec::SmallVec;

use crate::{Event, Events};

pub type Callback = Rc<dyn Fn(Event)>;

thread_local! {
	static NEXT_OWNER: Cell<u64> = Cell::new(1);
}

/// Identity of whoever installed a listener. Unique per thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerKey(u64);

impl OwnerKey {
	pub fn new() -> Self {
		NEXT_OWNER.with(|next| {
			let id = next.get();
			next.set(id + 1);
			OwnerKey(id)
		})
	}
}

impl Default for OwnerKey {
	fn default() -> Self {
		OwnerKey::new()
	}
}

/// Handle of a single registration inside one [`Listeners`] table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(u64);

struct Entry {
	owner: OwnerKey,
	events: Events,
	callback: Callback,
}

#[derive(Default)]
struct ListenersInner {
	next: u64,
	registrations: u64,
	// BTreeMap keeps dispatch in registration order.
	entries: BTreeMap<Token, Entry>,
	owners: FxHashMap<OwnerKey, SmallVec<[Token; 2]>>,
}

/// Owner-scoped listener table.
#[derive(Default)]
pub struct Listeners {
	inner: RefCell<ListenersInner>,
}

impl Listeners {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&self, owner: OwnerKey, events: Events, callback: Callback) -> Token {
		let mut inner = self.inner.borrow_mut();
		let token = Token(inner.next);
		inner.next += 1;
		inner.registrations += 1;
		inner.entries.insert(
			token,
			Entry {
				owner,
				events,
				callback,
			},
		);
		inner.owners.entry(owner).or_default().push(token);
		token
	}

	/// Removes every token installed by `owner` and nothing else.
	pub fn unregister(&self, owner: OwnerKey) -> usize {
		let mut inner = self.inner.borrow_mut();
		let Some(tokens) = inner.owners.remove(&owner) else {
			return 0;
		};

		for token in &tokens {
			inner.entries.remove(token);
		}

		tokens.len()
	}

	pub fn tokens_of(&self, owner: OwnerKey) -> usize {
		self.inner
			.borrow()
			.owners
			.get(&owner)
			.map_or(0, |tokens| tokens.len())
	}

	pub fn len(&self) -> usize {
		self.inner.borrow().entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Number of successful `register` calls over the table's lifetime.
	pub fn registrations(&self) -> u64 {
		self.inner.borrow().registrations
	}

	pub fn emit(&self, event: Event) {
		let matching: SmallVec<[(Token, Callback); 4]> = {
			let inner = self.inner.borrow();
			inner
				.entries
				.iter()
				.filter(|(_, entry)| entry.events.contains(Events::from(event)))
				.map(|(token, entry)| (*token, entry.callback.clone()))
				.collect()
		};

		// Deferred work queued by callbacks belongs to the burst that
		// triggered this dispatch, not to a `batch` a callback opens.
		crate::batch::hold(|| {
			for (token, callback) in matching {
				// Callbacks may unregister other owners while we dispatch.
				if !self.inner.borrow().entries.contains_key(&token) {
					continue;
				}

				callback(event);
			}
		})
	}
}

impl fmt::Debug for Listeners {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let inner = self.inner.borrow();
		f.debug_map()
			.entries(
				inner
					.entries
					.iter()
					.map(|(token, entry)| ((token, entry.owner), entry.events)),
			)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn counter(log: &Rc<RefCell<Vec<(u8, Event)>>>, id: u8) -> Callback {
		let log = log.clone();
		Rc::new(move |event| log.borrow_mut().push((id, event)))
	}

	#[test]
	fn unregister_is_owner_scoped() {
		let listeners = Listeners::new();
		let log = Rc::new(RefCell::new(vec![]));
		let a = OwnerKey::new();
		let b = OwnerKey::new();

		listeners.register(a, Events::CHANGE, counter(&log, 1));
		listeners.register(a, Events::ADD, counter(&log, 2));
		listeners.register(b, Events::CHANGE, counter(&log, 3));

		assert_eq!(listeners.unregister(a), 2);
		assert_eq!(listeners.tokens_of(a), 0);
		assert_eq!(listeners.tokens_of(b), 1);
		assert_eq!(listeners.unregister(a), 0);

		listeners.emit(Event::Change);
		assert_eq!(*log.borrow(), vec![(3, Event::Change)]);
	}

	#[test]
	fn emit_follows_registration_order() {
		let listeners = Listeners::new();
		let log = Rc::new(RefCell::new(vec![]));
		let owner = OwnerKey::new();

		for id in 0..5 {
			listeners.register(owner, Events::STRUCTURAL, counter(&log, id));
		}

		listeners.emit(Event::Reset);
		listeners.emit(Event::Change);

		let ids: Vec<u8> = log.borrow().iter().map(|(id, _)| *id).collect();
		assert_eq!(ids, vec![0, 1, 2, 3, 4]);
		assert_eq!(listeners.registrations(), 5);
	}

	#[test]
	fn removed_during_dispatch_is_skipped() {
		let listeners = Rc::new(Listeners::new());
		let log = Rc::new(RefCell::new(vec![]));
		let first = OwnerKey::new();
		let second = OwnerKey::new();

		listeners.register(first, Events::CHANGE, {
			let listeners = Rc::downgrade(&listeners);
			Rc::new(move |_: Event| {
				if let Some(listeners) = listeners.upgrade() {
					listeners.unregister(second);
				}
			})
		});
		listeners.register(second, Events::CHANGE, counter(&log, 2));

		listeners.emit(Event::Change);
		assert!(log.borrow().is_empty());
		assert_eq!(listeners.len(), 1);
	}
}
