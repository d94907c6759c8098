use std::fmt;

use bitflags::bitflags;

/// Notification emitted by a [`Model`](crate::Model) or a [`Collection`](crate::Collection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
	Change,
	Add,
	Remove,
	Reorder,
	Reset,
}

impl Event {
	pub fn name(self) -> &'static str {
		match self {
			Event::Change => "change",
			Event::Add => "add",
			Event::Remove => "remove",
			Event::Reorder => "reorder",
			Event::Reset => "reset",
		}
	}
}

impl fmt::Display for Event {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

bitflags! {
	/// Events a listener reacts to.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct Events: u8 {
		const CHANGE = 1 << 0;
		const ADD = 1 << 1;
		const REMOVE = 1 << 2;
		const REORDER = 1 << 3;
		const RESET = 1 << 4;
		/// Membership and order, without per-item `change`.
		const STRUCTURAL = Self::ADD.bits() | Self::REMOVE.bits() | Self::REORDER.bits() | Self::RESET.bits();
	}
}

impl From<Event> for Events {
	fn from(event: Event) -> Self {
		match event {
			Event::Change => Events::CHANGE,
			Event::Add => Events::ADD,
			Event::Remove => Events::REMOVE,
			Event::Reorder => Events::REORDER,
			Event::Reset => Events::RESET,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn structural_excludes_change() {
		assert!(!Events::STRUCTURAL.contains(Event::Change.into()));
		assert!(Events::STRUCTURAL.contains(Event::Reorder.into()));
		assert_eq!(Events::STRUCTURAL.iter().count(), 4);
	}

	#[test]
	fn single_events_map_to_flags() {
		let events = Events::from(Event::Reset) | Event::Change.into();
		assert_eq!(events, Events::RESET | Events::CHANGE);
	}
}
