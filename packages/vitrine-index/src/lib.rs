mod bundle;
mod error;
mod store;
mod trait_index;

pub use bundle::{BundleAttribute, BundleRecord, Catalog, IndexBundle};
pub use error::{Error, Result};
pub use store::ItemStore;
pub use trait_index::TraitIndex;

use std::collections::{BTreeMap, BTreeSet};

use vitrine_domain::{ItemId, Selection, Trait};

/// Reconciles the precomputed bundle with the incrementally assembled index.
/// The bundle, when present, is authoritative for matching (it covers the
/// whole collection); cache-derived data only extends value discovery.
#[derive(Debug)]
pub struct CollectionIndex {
	incremental: TraitIndex,
	bundle: Option<IndexBundle>,
}
impl CollectionIndex {
	pub fn new(excluded: Vec<String>) -> Self {
		Self { incremental: TraitIndex::new(excluded), bundle: None }
	}

	pub fn set_bundle(&mut self, bundle: IndexBundle) {
		self.bundle = Some(bundle);
	}

	pub fn has_bundle(&self) -> bool {
		self.bundle.is_some()
	}

	pub fn bundle(&self) -> Option<&IndexBundle> {
		self.bundle.as_ref()
	}

	pub fn record_traits(&mut self, id: ItemId, traits: &[Trait]) {
		self.incremental.record_traits(id, traits);
	}

	pub fn recorded_len(&self) -> usize {
		self.incremental.recorded_len()
	}

	pub fn matching_ids(&self, selection: &Selection) -> BTreeSet<ItemId> {
		match &self.bundle {
			Some(bundle) => bundle.matching_ids(selection),
			None => self.incremental.matching_ids(selection),
		}
	}

	/// Bundle catalog first, extended with values discovered from resolved
	/// items. Precomputed data is never removed by the union.
	pub fn values_union(&self) -> BTreeMap<String, BTreeSet<String>> {
		let mut union = self.bundle.as_ref().map(IndexBundle::values).unwrap_or_default();

		for (trait_type, values) in self.incremental.values() {
			union.entry(trait_type).or_default().extend(values);
		}

		union
	}
}
