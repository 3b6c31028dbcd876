use serde::{Deserialize, Serialize};

use crate::item::ItemId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
	#[default]
	IdAscending,
	IdDescending,
}
impl SortKey {
	/// Ids are unique integers, so no tie-break is needed.
	pub fn sort(&self, ids: &mut [ItemId]) {
		match self {
			Self::IdAscending => ids.sort_unstable(),
			Self::IdDescending => ids.sort_unstable_by(|a, b| b.cmp(a)),
		}
	}
}
