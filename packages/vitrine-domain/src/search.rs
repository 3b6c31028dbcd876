use crate::item::ItemId;

/// Substring match on the decimal rendering of the id, independent of
/// resolution state. A query of "1" intentionally matches 1, 10..19, 21 and
/// so on; the broad match is the product's search behavior, not a bug.
pub fn id_matches_search(id: ItemId, search: &str) -> bool {
	let search = search.trim();

	if search.is_empty() {
		return false;
	}

	id.to_string().contains(search)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn matches_substring_of_decimal_id() {
		assert!(id_matches_search(12, "12"));
		assert!(id_matches_search(112, "12"));
		assert!(id_matches_search(120, "12"));
		assert!(!id_matches_search(21, "12"));
	}

	#[test]
	fn blank_search_matches_nothing() {
		assert!(!id_matches_search(0, ""));
		assert!(!id_matches_search(0, "   "));
	}

	#[test]
	fn single_digit_query_is_broad() {
		assert!(id_matches_search(1, "1"));
		assert!(id_matches_search(10, "1"));
		assert!(id_matches_search(21, "1"));
		assert!(!id_matches_search(2, "1"));
	}
}
