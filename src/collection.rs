use std::cell::{Ref, RefCell};
use std::cmp::Ordering;
use std::fmt::Debug;
use std::rc::{Rc, Weak};

use crate::{Emitter, Event, Events, Listeners, Model, OwnerKey};

/// An ordered set of [`Model`]s. Clones share identity.
///
/// Structural mutations emit `add`, `remove`, `reorder` and `reset`.
/// A `change` of any member is re-emitted as `change` on the collection.
pub struct Collection<T> {
	pub(crate) body: Rc<CollectionBody<T>>,
}

pub(crate) struct CollectionBody<T> {
	items: RefCell<Vec<Model<T>>>,
	listeners: Listeners,
	// Registrations this collection holds on its members.
	key: OwnerKey,
	this: Weak<CollectionBody<T>>,
}

impl<T> Clone for Collection<T> {
	fn clone(&self) -> Self {
		Self {
			body: self.body.clone(),
		}
	}
}

impl<T: 'static> Default for Collection<T> {
	fn default() -> Self {
		Collection::new(Vec::new())
	}
}

impl<T> Collection<T>
where
	T: 'static,
{
	pub fn new(items: Vec<Model<T>>) -> Self {
		let body = Rc::new_cyclic(|this| CollectionBody {
			items: RefCell::new(Vec::with_capacity(items.len())),
			listeners: Listeners::new(),
			key: OwnerKey::new(),
			this: this.clone(),
		});

		for item in items {
			if !body.contains(&item) {
				body.adopt(&item);
				body.items.borrow_mut().push(item);
			}
		}

		Collection { body }
	}

	pub fn len(&self) -> usize {
		self.body.items.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn get(&self, index: usize) -> Option<Model<T>> {
		self.body.items.borrow().get(index).cloned()
	}

	pub fn contains(&self, model: &Model<T>) -> bool {
		self.body.contains(model)
	}

	/// Borrows the current members in order.
	pub fn items(&self) -> Ref<'_, [Model<T>]> {
		Ref::map(self.body.items.borrow(), |items| items.as_slice())
	}

	/// Snapshot of the current members in order.
	pub fn models(&self) -> Vec<Model<T>> {
		self.body.items.borrow().clone()
	}

	/// Appends `model`. Adding a model that is already a member does nothing.
	pub fn add(&self, model: Model<T>) {
		if self.body.contains(&model) {
			return;
		}

		self.body.adopt(&model);
		self.body.items.borrow_mut().push(model);
		self.body.listeners.emit(Event::Add);
	}

	pub fn remove(&self, model: &Model<T>) -> bool {
		let removed = {
			let mut items = self.body.items.borrow_mut();
			match items.iter().position(|item| item.ptr_eq(model)) {
				Some(index) => Some(items.remove(index)),
				None => None,
			}
		};

		match removed {
			Some(removed) => {
				self.body.release(&removed);
				self.body.listeners.emit(Event::Remove);
				true
			}
			None => false,
		}
	}

	pub fn sort_by(&self, mut compare: impl FnMut(&T, &T) -> Ordering) {
		self.body
			.items
			.borrow_mut()
			.sort_by(|a, b| compare(&a.get(), &b.get()));
		self.body.listeners.emit(Event::Reorder);
	}

	pub fn sort_by_key<K: Ord>(&self, mut key: impl FnMut(&T) -> K) {
		self.sort_by(|a, b| key(a).cmp(&key(b)))
	}

	/// Swaps two members. Out of range indexes are ignored.
	pub fn swap(&self, a: usize, b: usize) {
		{
			let mut items = self.body.items.borrow_mut();
			if a == b || a >= items.len() || b >= items.len() {
				return;
			}
			items.swap(a, b);
		}

		self.body.listeners.emit(Event::Reorder);
	}

	/// Replaces all members at once.
	pub fn reset(&self, models: Vec<Model<T>>) {
		let previous = std::mem::take(&mut *self.body.items.borrow_mut());
		for item in &previous {
			self.body.release(item);
		}

		for model in models {
			if !self.body.contains(&model) {
				self.body.adopt(&model);
				self.body.items.borrow_mut().push(model);
			}
		}

		self.body.listeners.emit(Event::Reset);
	}

	#[inline]
	pub fn listeners(&self) -> &Listeners {
		&self.body.listeners
	}

	pub fn ptr_eq(&self, other: &Collection<T>) -> bool {
		Rc::ptr_eq(&self.body, &other.body)
	}
}

impl<T: 'static> CollectionBody<T> {
	fn contains(&self, model: &Model<T>) -> bool {
		self.items.borrow().iter().any(|item| item.ptr_eq(model))
	}

	fn adopt(&self, model: &Model<T>) {
		let this = self.this.clone();
		model.listeners().register(
			self.key,
			Events::CHANGE,
			Rc::new(move |event| {
				if let Some(this) = this.upgrade() {
					this.listeners.emit(event);
				}
			}),
		);
	}

	fn release(&self, model: &Model<T>) {
		model.listeners().unregister(self.key);
	}
}

impl<T> Drop for CollectionBody<T> {
	fn drop(&mut self) {
		for item in self.items.get_mut().iter() {
			item.listeners().unregister(self.key);
		}
	}
}

impl<T: 'static> Emitter for CollectionBody<T> {
	fn listeners(&self) -> &Listeners {
		&self.listeners
	}
}

impl<T> Debug for Collection<T>
where
	T: 'static + Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(self.body.items.borrow().iter()).finish()
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::*;

	fn log_events(collection: &Collection<u32>, events: Events) -> Rc<RefCell<Vec<Event>>> {
		let log = Rc::new(RefCell::new(vec![]));
		collection.listeners().register(OwnerKey::new(), events, {
			let log = log.clone();
			Rc::new(move |event| log.borrow_mut().push(event))
		});
		log
	}

	#[test]
	fn structural_events() {
		let one = Model::new(1);
		let two = Model::new(2);
		let collection = Collection::new(vec![two.clone(), one.clone()]);
		let log = log_events(&collection, Events::STRUCTURAL);

		collection.add(one.clone());
		collection.add(Model::new(3));
		collection.sort_by_key(|v| *v);
		assert!(collection.remove(&two));
		assert!(!collection.remove(&two));
		collection.swap(0, 0);
		collection.reset(vec![]);

		assert_eq!(
			*log.borrow(),
			vec![Event::Add, Event::Reorder, Event::Remove, Event::Reset]
		);
		assert!(collection.is_empty());
	}

	#[test]
	fn forwards_member_changes_until_released() {
		let one = Model::new(1);
		let collection = Collection::new(vec![one.clone()]);
		let changes = Rc::new(Cell::new(0));
		collection
			.listeners()
			.register(OwnerKey::new(), Events::CHANGE, {
				let changes = changes.clone();
				Rc::new(move |_: Event| changes.set(changes.get() + 1))
			});

		one.set(10);
		assert_eq!(changes.get(), 1);

		collection.remove(&one);
		assert!(one.listeners().is_empty());
		one.set(11);
		assert_eq!(changes.get(), 1);
	}

	#[test]
	fn drop_releases_members() {
		let one = Model::new(1);
		let two = Model::new(2);
		{
			let collection = Collection::new(vec![one.clone(), two.clone()]);
			assert_eq!(collection.len(), 2);
			assert_eq!(one.listeners().len(), 1);
		}

		assert!(one.listeners().is_empty());
		assert!(two.listeners().is_empty());
	}
}
