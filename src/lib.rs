pub mod macros;

mod addr;
mod batch;
mod binding;
mod collection;
mod error;
mod event;
mod lifecycle;
mod listeners;
mod model;
mod resolver;
mod scheduler;
mod target;
mod view;

pub use batch::{batch, defer, flush, in_batch, pending};
pub use binding::Binding;
pub use collection::Collection;
pub use error::{BindError, BoxError, Result};
pub use event::{Event, Events};
pub use lifecycle::{Lifecycle, Subscriptions};
pub use listeners::{Callback, Listeners, OwnerKey, Token};
pub use model::Model;
pub use resolver::{Props, Resolved, Watch};
pub use scheduler::{schedule, Policy, Trigger};
pub use target::{Kind, Target};
pub use view::{MountState, Phase, View};

pub trait Emitter: 'static {
	/// Listener table owned by this emitter. Its lifetime
	/// is the emitter's own lifetime.
	fn listeners(&self) -> &Listeners;
}
