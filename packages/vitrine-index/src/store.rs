use std::{
	collections::{HashMap, HashSet},
	sync::{Mutex, RwLock},
};

use vitrine_domain::{Item, ItemId, ResolutionState, Trait};

/// Per-item store of resolved traits and media candidates; the single source
/// of truth once an item has been fetched. Entries live for the session.
///
/// Shared across resolution workers: reads clone out, `put` is atomic with
/// respect to readers, and the in-flight marker set guarantees at most one
/// outstanding resolution attempt per id.
#[derive(Debug, Default)]
pub struct ItemStore {
	items: RwLock<HashMap<ItemId, Item>>,
	in_flight: Mutex<HashSet<ItemId>>,
}
impl ItemStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.read_items().len()
	}

	pub fn is_empty(&self) -> bool {
		self.read_items().is_empty()
	}

	pub fn has(&self, id: ItemId) -> bool {
		self.read_items().contains_key(&id)
	}

	pub fn get(&self, id: ItemId) -> Option<Item> {
		self.read_items().get(&id).cloned()
	}

	/// Allocates a placeholder record. No-op when the id is already present.
	pub fn plan(&self, id: ItemId) {
		self.write_items().entry(id).or_insert_with(|| Item::planned(id));
	}

	/// The only metadata mutator. Re-putting overwrites traits but merges
	/// media candidate lists, new first, so a payload that stops carrying a
	/// candidate does not erase a previously useful one.
	pub fn put(&self, id: ItemId, traits: Vec<Trait>, media_candidates: Vec<String>) {
		let mut items = self.write_items();
		let entry = items.entry(id).or_insert_with(|| Item::planned(id));
		let mut merged = media_candidates;

		for existing in &entry.media_candidates {
			if !merged.contains(existing) {
				merged.push(existing.clone());
			}
		}

		entry.traits = traits;
		entry.media_candidates = merged;
		entry.state = ResolutionState::Resolved;
	}

	pub fn mark_failed(&self, id: ItemId) {
		let mut items = self.write_items();
		let entry = items.entry(id).or_insert_with(|| Item::planned(id));

		entry.state = ResolutionState::Failed;
	}

	/// Check-then-set on the in-flight marker. Returns `false` when an
	/// attempt is already outstanding or the item is already resolved, so a
	/// resolution is never started twice.
	pub fn begin_resolution(&self, id: ItemId) -> bool {
		let mut in_flight = self.in_flight.lock().unwrap_or_else(|err| err.into_inner());

		if in_flight.contains(&id) {
			return false;
		}

		{
			let mut items = self.write_items();
			let entry = items.entry(id).or_insert_with(|| Item::planned(id));

			if entry.state == ResolutionState::Resolved {
				return false;
			}

			entry.state = ResolutionState::Resolving;
		}

		in_flight.insert(id);

		true
	}

	/// Clears the marker once the attempt finished, success or failure.
	pub fn end_resolution(&self, id: ItemId) {
		let mut in_flight = self.in_flight.lock().unwrap_or_else(|err| err.into_inner());

		in_flight.remove(&id);
	}

	pub fn in_flight_len(&self) -> usize {
		self.in_flight.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn resolved_ids(&self) -> Vec<ItemId> {
		let mut ids: Vec<ItemId> =
			self.read_items().values().filter(|item| item.is_resolved()).map(|item| item.id).collect();

		ids.sort_unstable();

		ids
	}

	pub fn failed_ids(&self) -> Vec<ItemId> {
		let mut ids: Vec<ItemId> = self
			.read_items()
			.values()
			.filter(|item| item.state == ResolutionState::Failed)
			.map(|item| item.id)
			.collect();

		ids.sort_unstable();

		ids
	}

	pub fn resolved_len(&self) -> usize {
		self.read_items().values().filter(|item| item.is_resolved()).count()
	}

	fn read_items(&self) -> std::sync::RwLockReadGuard<'_, HashMap<ItemId, Item>> {
		self.items.read().unwrap_or_else(|err| err.into_inner())
	}

	fn write_items(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<ItemId, Item>> {
		self.items.write().unwrap_or_else(|err| err.into_inner())
	}
}
