use std::borrow::Cow;
use std::fmt;

use crate::{BindError, BoxError, Events, Kind, Policy, Result, Target};

/// Props that expose targets by key.
pub trait Props {
	fn target(&self, key: &str) -> Option<Target>;
}

type Accessor<P> = Box<dyn Fn(&P) -> std::result::Result<Option<Target>, BoxError>>;

/// Configuration of one watched slot: where to find the target in the
/// props and how to listen to it.
pub struct Watch<P> {
	name: Cow<'static, str>,
	accessor: Accessor<P>,
	events: Option<Events>,
	policy: Option<Policy>,
}

/// A target together with the normalized listening configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
	pub target: Target,
	pub events: Events,
	pub policy: Policy,
}

impl<P: 'static> Watch<P> {
	/// Watch the target stored in the props under `key`.
	pub fn key(key: impl Into<Cow<'static, str>>) -> Self
	where
		P: Props,
	{
		let key = key.into();
		Watch {
			name: key.clone(),
			accessor: Box::new(move |props: &P| -> std::result::Result<Option<Target>, BoxError> {
				Ok(props.target(&key))
			}),
			events: None,
			policy: None,
		}
	}

	/// Watch whatever `accessor` returns, listening to `events`.
	pub fn accessor<F>(events: impl Into<Events>, accessor: F) -> Self
	where
		F: Fn(&P) -> std::result::Result<Option<Target>, BoxError> + 'static,
	{
		Watch {
			name: Cow::Borrowed("accessor"),
			accessor: Box::new(accessor),
			events: Some(events.into()),
			policy: None,
		}
	}

	/// Infallible form of [`Watch::accessor`].
	pub fn select<F>(events: impl Into<Events>, select: F) -> Self
	where
		F: Fn(&P) -> Option<Target> + 'static,
	{
		Self::accessor(events, move |props| Ok(select(props)))
	}
}

impl<P> Watch<P> {
	pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
		self.name = name.into();
		self
	}

	pub fn events(mut self, events: impl Into<Events>) -> Self {
		self.events = Some(events.into());
		self
	}

	pub fn policy(mut self, policy: Policy) -> Self {
		self.policy = Some(policy);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn resolve(&self, props: &P) -> Result<Option<Resolved>> {
		let target = (self.accessor)(props).map_err(|source| BindError::Configuration {
			slot: self.name.to_string(),
			source,
		})?;

		Ok(target.map(|target| {
			let kind: Kind = target.kind();
			Resolved {
				events: self.events.unwrap_or_else(|| kind.default_events()),
				policy: self.policy.unwrap_or_else(|| kind.default_policy()),
				target,
			}
		}))
	}

	/// Just the target, without the listening configuration.
	pub fn target(&self, props: &P) -> Result<Option<Target>> {
		Ok(self.resolve(props)?.map(|resolved| resolved.target))
	}
}

impl<P> fmt::Debug for Watch<P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Watch")
			.field("name", &self.name)
			.field("events", &self.events)
			.field("policy", &self.policy)
			.finish()
	}
}
