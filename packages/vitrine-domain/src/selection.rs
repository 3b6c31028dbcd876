use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::item::Trait;

/// The active trait filter: OR within a type, AND across types that carry at
/// least one selected value. An empty selection filters nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
	by_type: BTreeMap<String, BTreeSet<String>>,
}
impl Selection {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.by_type.is_empty()
	}

	pub fn select(&mut self, trait_type: impl Into<String>, value: impl Into<String>) {
		self.by_type.entry(trait_type.into()).or_default().insert(value.into());
	}

	/// Adds the value if absent, removes it if present; a type with no values
	/// left drops out entirely so it stops participating in the AND.
	pub fn toggle(&mut self, trait_type: &str, value: &str) {
		let values = self.by_type.entry(trait_type.to_string()).or_default();

		if !values.remove(value) {
			values.insert(value.to_string());
		}
		if values.is_empty() {
			self.by_type.remove(trait_type);
		}
	}

	pub fn clear(&mut self) {
		self.by_type.clear();
	}

	/// Drops any type in `excluded`. Stale persisted state can reference a
	/// once-valid type that has since been hidden from the filter surface.
	pub fn drop_excluded(&mut self, excluded: &[String]) {
		self.by_type.retain(|trait_type, _| !excluded.iter().any(|name| name == trait_type));
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
		self.by_type.iter()
	}

	pub fn types(&self) -> impl Iterator<Item = &String> {
		self.by_type.keys()
	}

	/// AND across selected types, OR within each type's value set.
	pub fn matches(&self, traits: &[Trait]) -> bool {
		self.by_type.iter().all(|(trait_type, values)| {
			traits
				.iter()
				.any(|t| &t.trait_type == trait_type && values.contains(t.value.as_str()))
		})
	}
}
