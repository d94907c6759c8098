use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

type Task = Box<dyn FnOnce()>;

thread_local! {
	static DEPTH: Cell<usize> = Cell::new(0);
	static FLUSHING: Cell<bool> = Cell::new(false);
	#[cfg(target_arch = "wasm32")]
	static MICROTASK: Cell<bool> = Cell::new(false);
	static DEFERRED: RefCell<VecDeque<Task>> = RefCell::new(VecDeque::new());
}

pub fn in_batch() -> bool {
	DEPTH.with(|d| d.get() > 0)
}

/// Number of deferred tasks waiting for the next flush.
pub fn pending() -> usize {
	DEFERRED.with(|q| q.borrow().len())
}

/// Runs `func` as one burst: deferred work queued inside is flushed
/// when the outermost `batch` returns.
pub fn batch<R>(func: impl FnOnce() -> R) -> R {
	let guard = BatchGuard::start();
	let result = func();
	let is_root = guard.is_root;
	std::mem::drop(guard);

	if is_root {
		flush();
	}

	result
}

/// Runs `func` inside the current burst without ending it: a `batch`
/// nested in `func` is never the root, so nothing is flushed here.
pub(crate) fn hold<R>(func: impl FnOnce() -> R) -> R {
	let _guard = BatchGuard::start();
	func()
}

struct BatchGuard {
	is_root: bool,
}

impl BatchGuard {
	fn start() -> Self {
		let is_root = DEPTH.with(|d| {
			let depth = d.get();
			d.set(depth + 1);
			depth == 0
		});

		BatchGuard { is_root }
	}
}

impl Drop for BatchGuard {
	fn drop(&mut self) {
		DEPTH.with(|d| d.set(d.get() - 1));
	}
}

/// Queues `task` to run on the next flush.
pub fn defer(task: impl FnOnce() + 'static) {
	DEFERRED.with(|q| q.borrow_mut().push_back(Box::new(task)));

	#[cfg(target_arch = "wasm32")]
	schedule_microtask();
}

#[cfg(target_arch = "wasm32")]
fn schedule_microtask() {
	let first = MICROTASK.with(|s| !s.replace(true));
	if first {
		let callback = wasm_bindgen::closure::Closure::once_into_js(|| {
			MICROTASK.with(|s| s.set(false));
			flush();
		});
		js::queue_microtask(&callback);
	}
}

#[cfg(target_arch = "wasm32")]
mod js {
	use wasm_bindgen::prelude::*;

	#[wasm_bindgen]
	extern "C" {
		#[wasm_bindgen(js_name = queueMicrotask)]
		pub fn queue_microtask(callback: &JsValue);
	}
}

/// Drains the deferred queue, including tasks queued while draining.
///
/// The host calls this once per event loop turn. Nested calls return
/// immediately and leave the work to the outer one.
pub fn flush() {
	if FLUSHING.with(|f| f.replace(true)) {
		return;
	}

	let _reset = FlushGuard;
	let mut ran = 0usize;
	loop {
		let task = DEFERRED.with(|q| q.borrow_mut().pop_front());
		let Some(task) = task else {
			break;
		};

		task();
		ran += 1;
	}

	if ran > 0 {
		tracing::trace!(tasks = ran, "flushed deferred queue");
	}
}

struct FlushGuard;

impl Drop for FlushGuard {
	fn drop(&mut self) {
		FLUSHING.with(|f| f.set(false));
	}
}
