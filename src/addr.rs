use std::ops::Deref;
use std::rc::Rc;

/// Compares `Rc`s by the address they point to,
/// ignoring any trait object metadata.
pub struct RcAddr<T: ?Sized> {
	ptr: Rc<T>,
}

impl<T: ?Sized> RcAddr<T> {
	pub fn new(ptr: Rc<T>) -> Self {
		RcAddr { ptr }
	}

	pub fn addr(&self) -> usize {
		Rc::as_ptr(&self.ptr) as *const () as usize
	}
}

impl<T: ?Sized> Clone for RcAddr<T> {
	fn clone(&self) -> Self {
		RcAddr {
			ptr: self.ptr.clone(),
		}
	}
}

impl<T: ?Sized> Deref for RcAddr<T> {
	type Target = Rc<T>;
	fn deref(&self) -> &Self::Target {
		&self.ptr
	}
}

impl<T: ?Sized> PartialEq for RcAddr<T> {
	fn eq(&self, other: &Self) -> bool {
		self.addr() == other.addr()
	}
}

impl<T: ?Sized> Eq for RcAddr<T> {}
