#[cfg(not(miri))] // Skip property tests under miri as they're too slow
use observe_view::{batch, flush, Collection, Model, Target, Watch};
#[cfg(not(miri))]
use proptest::prelude::*;


#[cfg(not(miri))]
use mock::{TestProps, TestView};

#[cfg(not(miri))]
struct Pool {
	models: Vec<Model<u32>>,
	collections: Vec<Collection<u32>>,
}

#[cfg(not(miri))]
impl Pool {
	fn new() -> Self {
		Pool {
			models: (0..2).map(Model::new).collect(),
			collections: (0..2).map(|_| Collection::default()).collect(),
		}
	}

	fn target(&self, index: Option<usize>) -> Option<Target> {
		index.map(|i| match i % 4 {
			0 | 1 => Target::from(&self.models[i % 2]),
			_ => Target::from(&self.collections[i % 2]),
		})
	}

	fn props(&self, index: Option<usize>) -> TestProps {
		TestProps {
			model: self.target(index),
			list: None,
		}
	}

	fn targets(&self) -> Vec<Target> {
		(0..4).filter_map(|i| self.target(Some(i))).collect()
	}

	fn registrations(&self) -> u64 {
		self.targets()
			.iter()
			.map(|t| t.listeners().registrations())
			.sum()
	}

	/// One notification on every target, each in its own burst.
	fn poke_all(&self, round: u32) {
		for model in &self.models {
			model.set(1000 + round);
		}
		for collection in &self.collections {
			batch(|| collection.add(Model::new(round)));
		}
	}
}

#[cfg(not(miri))]
fn slot() -> impl Strategy<Value = Option<usize>> {
	prop::option::of(0usize..4)
}

#[cfg(not(miri))]
proptest! {
	#[test]
	fn detach_leaves_no_tokens(first in slot(), updates in prop::collection::vec(slot(), 0..12)) {
		let pool = Pool::new();
		let view = TestView::new(vec![Watch::key("model")]);
		let owner = view.subscriptions.bindings()[0].owner();

		let mut props = pool.props(first);
		view.mount(&props);
		for next in updates {
			let next = pool.props(next);
			view.update(&props, &next);
			props = next;
		}
		view.unmount();

		for target in pool.targets() {
			prop_assert_eq!(target.tokens_of(owner), 0);
			// Collections keep their own registrations on members only.
			prop_assert!(target.listeners().is_empty());
		}
	}

	#[test]
	fn stable_identity_never_rebinds(first in slot(), updates in prop::collection::vec(slot(), 1..12)) {
		let pool = Pool::new();
		let view = TestView::new(vec![Watch::key("model")]);

		let mut current = first;
		let mut props = pool.props(current);
		view.mount(&props);
		for next_index in updates {
			let before = pool.registrations();
			let next = pool.props(next_index);
			view.update(&props, &next);

			let same = pool.target(current) == pool.target(next_index);
			if same {
				prop_assert_eq!(pool.registrations(), before);
			} else {
				prop_assert_eq!(pool.registrations(), before + u64::from(next_index.is_some()));
			}

			current = next_index;
			props = next;
		}
	}

	#[test]
	fn collection_burst_is_capped_at_two(k in 1usize..40) {
		let list = Collection::<u32>::default();
		let view = TestView::new(vec![Watch::key("list")]);
		view.mount(&TestProps::list(&list));

		batch(|| {
			for i in 0..k {
				list.add(Model::new(i as u32));
			}
		});

		prop_assert_eq!(view.renders.get(), if k == 1 { 1 } else { 2 });
	}

	#[test]
	fn model_notifications_are_never_coalesced(k in 1u32..40) {
		let model = Model::new(0u32);
		let view = TestView::new(vec![Watch::key("model")]);
		view.mount(&TestProps::model(&model));

		batch(|| {
			for i in 1..=k {
				model.set(i);
			}
		});

		prop_assert_eq!(view.renders.get(), k as usize);
	}

	#[test]
	fn only_the_bound_target_triggers(path in prop::collection::vec(0usize..4, 1..8)) {
		let pool = Pool::new();
		let view = TestView::new(vec![Watch::key("model")]);

		let mut props = pool.props(Some(path[0]));
		view.mount(&props);
		for (round, index) in path.iter().copied().enumerate().skip(1) {
			let next = pool.props(Some(index));
			view.update(&props, &next);
			props = next;

			let before = view.renders.get();
			pool.poke_all(round as u32);
			flush();
			// Exactly one burst of one notification reached the bound target.
			prop_assert_eq!(view.renders.get(), before + 1);
		}

		view.unmount();
		let before = view.renders.get();
		pool.poke_all(99);
		flush();
		prop_assert_eq!(view.renders.get(), before);
	}
}
