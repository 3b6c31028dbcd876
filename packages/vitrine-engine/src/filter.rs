use std::collections::BTreeSet;

use vitrine_domain::{ItemId, Selection, SortKey, id_matches_search};
use vitrine_index::{CollectionIndex, ItemStore};

use crate::planner::Planner;

/// The consumer-facing query surface: free-text id search, trait selection,
/// and sort direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
	pub search: String,
	pub selection: Selection,
	pub sort: SortKey,
}
impl Query {
	pub fn is_unfiltered(&self) -> bool {
		self.search.trim().is_empty() && self.selection.is_empty()
	}
}

/// One recomputation of the filter/sort pipeline. `coverage_required` tells
/// the caller the whole id space must be examined (and, for trait filters
/// without a precomputed index, resolved) for the result to be complete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
	pub ids: Vec<ItemId>,
	pub coverage_required: bool,
}

/// Recomputed from scratch on every change to the query, the watermark, or
/// the cache. Incremental patching invites staleness bugs under out-of-order
/// resolution, so none is attempted.
pub fn compute(
	query: &Query,
	index: &CollectionIndex,
	planner: &mut Planner,
	store: &ItemStore,
) -> Outcome {
	let search = query.search.trim();

	if query.is_unfiltered() {
		let mut ids: Vec<ItemId> = (0..planner.planned_len()).collect();

		query.sort.sort(&mut ids);

		return Outcome { ids, coverage_required: false };
	}

	let mut matched = BTreeSet::new();

	// Search and trait filters combine by union: either condition qualifies
	// an id.
	if !search.is_empty() {
		matched.extend((0..planner.total_count()).filter(|id| id_matches_search(*id, search)));
	}
	if !query.selection.is_empty() {
		matched.extend(index.matching_ids(&query.selection));
	}

	// Filtering can discover ids past the planned window; give every result
	// a placeholder so the consumer can display it.
	if let Some(max) = matched.iter().next_back().copied()
		&& planner.planned_until().map(|until| max > until).unwrap_or(true)
	{
		planner.ensure_planned(store, max);
	}

	let coverage_required =
		!search.is_empty() || (!query.selection.is_empty() && !index.has_bundle());
	let mut ids: Vec<ItemId> = matched.into_iter().collect();

	query.sort.sort(&mut ids);

	Outcome { ids, coverage_required }
}

#[cfg(test)]
mod tests {
	use vitrine_domain::Trait;

	use super::*;

	fn setup(total: u32) -> (CollectionIndex, Planner, ItemStore) {
		(CollectionIndex::new(Vec::new()), Planner::new(total), ItemStore::new())
	}

	#[test]
	fn unfiltered_result_is_the_planned_range() {
		let (index, mut planner, store) = setup(100);

		planner.ensure_planned(&store, 9);

		let outcome = compute(&Query::default(), &index, &mut planner, &store);

		assert_eq!(outcome.ids, (0..10).collect::<Vec<_>>());
		assert!(!outcome.coverage_required);
	}

	#[test]
	fn descending_sort_reverses_ids() {
		let (index, mut planner, store) = setup(100);

		planner.ensure_planned(&store, 4);

		let query = Query { sort: SortKey::IdDescending, ..Query::default() };
		let outcome = compute(&query, &index, &mut planner, &store);

		assert_eq!(outcome.ids, vec![4, 3, 2, 1, 0]);
	}

	#[test]
	fn search_scans_the_whole_collection() {
		let (index, mut planner, store) = setup(150);
		let query = Query { search: "12".to_string(), ..Query::default() };
		let outcome = compute(&query, &index, &mut planner, &store);
		let mut expected = vec![12, 112];

		expected.extend(120..130);
		expected.sort_unstable();

		assert_eq!(outcome.ids, expected);
		assert!(outcome.coverage_required);
		// Discovered ids got placeholders up to the highest match.
		assert_eq!(planner.planned_until(), Some(129));
		assert!(store.has(129));
	}

	#[test]
	fn selection_without_bundle_requires_coverage() {
		let (mut index, mut planner, store) = setup(100);

		index.record_traits(3, &[Trait::new("Fur", "Blue")]);

		let mut selection = Selection::new();

		selection.select("Fur", "Blue");

		let query = Query { selection, ..Query::default() };
		let outcome = compute(&query, &index, &mut planner, &store);

		assert_eq!(outcome.ids, vec![3]);
		assert!(outcome.coverage_required);
	}

	#[test]
	fn search_and_selection_union() {
		let (mut index, mut planner, store) = setup(200);

		index.record_traits(50, &[Trait::new("Fur", "Blue")]);

		let mut selection = Selection::new();

		selection.select("Fur", "Blue");

		let query = Query { search: "111".to_string(), selection, ..Query::default() };
		let outcome = compute(&query, &index, &mut planner, &store);

		assert_eq!(outcome.ids, vec![50, 111]);
	}
}
