pub mod item;
pub mod search;
pub mod selection;
pub mod sort;

pub use item::{Item, ItemId, ItemMetadata, ResolutionState, Trait};
pub use search::id_matches_search;
pub use selection::Selection;
pub use sort::SortKey;
