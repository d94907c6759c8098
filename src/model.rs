use std::cell::{Ref, RefCell};
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use crate::{Emitter, Event, Listeners};

struct Hashed<T> {
	value: T,
	hash: u64,
}

impl<T: Hash> Hashed<T> {
	fn new(value: T) -> Self {
		let hash = fxhash::hash64(&value);
		Self { value, hash }
	}
}

/// A single observable record. Clones share identity.
///
/// Every mutation that changes the value's hash emits [`Event::Change`].
pub struct Model<T> {
	pub(crate) body: Rc<ModelBody<T>>,
}

pub(crate) struct ModelBody<T> {
	value: RefCell<Hashed<T>>,
	listeners: Listeners,
}

impl<T> Clone for Model<T> {
	fn clone(&self) -> Self {
		Self {
			body: self.body.clone(),
		}
	}
}

impl<T> Default for Model<T>
where
	T: Default + Hash + 'static,
{
	fn default() -> Self {
		Model::new(Default::default())
	}
}

impl<T> Model<T> {
	#[inline]
	pub fn listeners(&self) -> &Listeners {
		&self.body.listeners
	}

	pub fn ptr_eq(&self, other: &Model<T>) -> bool {
		Rc::ptr_eq(&self.body, &other.body)
	}
}

impl<T> Model<T>
where
	T: 'static,
{
	pub fn new(value: T) -> Self
	where
		T: Hash,
	{
		Model {
			body: Rc::new(ModelBody {
				value: RefCell::new(Hashed::new(value)),
				listeners: Listeners::new(),
			}),
		}
	}

	#[inline]
	pub fn get(&self) -> Ref<'_, T> {
		Ref::map(self.body.value.borrow(), |v| &v.value)
	}

	#[inline]
	pub fn set(&self, value: T)
	where
		T: Hash,
	{
		let _ = self.replace(value);
	}

	pub fn replace(&self, value: T) -> T
	where
		T: Hash,
	{
		let new = Hashed::new(value);
		let hash = new.hash;
		let old = std::mem::replace(&mut *self.body.value.borrow_mut(), new);
		if old.hash != hash {
			self.body.listeners.emit(Event::Change);
		}

		old.value
	}

	pub fn update(&self, func: impl FnOnce(&mut T))
	where
		T: Hash,
	{
		let changed = {
			let mut value = self.body.value.borrow_mut();
			func(&mut value.value);
			let hash = fxhash::hash64(&value.value);
			let changed = value.hash != hash;
			value.hash = hash;
			changed
		};

		if changed {
			self.body.listeners.emit(Event::Change);
		}
	}
}

impl<T: 'static> Emitter for ModelBody<T> {
	fn listeners(&self) -> &Listeners {
		&self.listeners
	}
}

impl<T> Debug for Model<T>
where
	T: 'static + Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.get().fmt(f)
	}
}
