use std::collections::{BTreeMap, BTreeSet, HashMap};

use vitrine_domain::{ItemId, Selection, Trait};

/// Inverted index assembled incrementally from whichever items have resolved
/// so far. Covers only recorded ids; the match set can only grow as more
/// items resolve.
#[derive(Debug, Default)]
pub struct TraitIndex {
	excluded: Vec<String>,
	postings: HashMap<String, BTreeMap<String, BTreeSet<ItemId>>>,
	recorded: HashMap<ItemId, Vec<Trait>>,
}
impl TraitIndex {
	pub fn new(excluded: Vec<String>) -> Self {
		Self { excluded, ..Self::default() }
	}

	pub fn recorded_len(&self) -> usize {
		self.recorded.len()
	}

	/// Replaces any previous postings for the id, so re-resolution stays
	/// idempotent. Traits of an excluded type are never indexed.
	pub fn record_traits(&mut self, id: ItemId, traits: &[Trait]) {
		if let Some(previous) = self.recorded.remove(&id) {
			for t in previous {
				if let Some(values) = self.postings.get_mut(&t.trait_type)
					&& let Some(ids) = values.get_mut(&t.value)
				{
					ids.remove(&id);

					if ids.is_empty() {
						values.remove(&t.value);
					}
				}
			}

			self.postings.retain(|_, values| !values.is_empty());
		}

		let kept: Vec<Trait> = traits
			.iter()
			.filter(|t| !self.excluded.iter().any(|name| name == &t.trait_type))
			.cloned()
			.collect();

		for t in &kept {
			self.postings
				.entry(t.trait_type.clone())
				.or_default()
				.entry(t.value.clone())
				.or_default()
				.insert(id);
		}

		self.recorded.insert(id, kept);
	}

	/// OR within a type, AND across types, over recorded ids only. An empty
	/// selection matches every recorded id.
	pub fn matching_ids(&self, selection: &Selection) -> BTreeSet<ItemId> {
		if selection.is_empty() {
			return self.recorded.keys().copied().collect();
		}

		let mut result: Option<BTreeSet<ItemId>> = None;

		for (trait_type, values) in selection.iter() {
			let mut union = BTreeSet::new();

			if let Some(postings) = self.postings.get(trait_type) {
				for value in values {
					if let Some(ids) = postings.get(value) {
						union.extend(ids);
					}
				}
			}

			result = Some(match result {
				Some(current) => current.intersection(&union).copied().collect(),
				None => union,
			});

			if result.as_ref().map(BTreeSet::is_empty).unwrap_or(false) {
				break;
			}
		}

		result.unwrap_or_default()
	}

	pub fn values(&self) -> BTreeMap<String, BTreeSet<String>> {
		self.postings
			.iter()
			.map(|(trait_type, values)| (trait_type.clone(), values.keys().cloned().collect()))
			.collect()
	}
}
