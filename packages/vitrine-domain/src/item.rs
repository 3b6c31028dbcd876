use serde::{Deserialize, Serialize};

/// Position-assigned, stable, never reused. Valid ids live in
/// `[0, total_count)` for the session's collection.
pub type ItemId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trait {
	pub trait_type: String,
	pub value: String,
}
impl Trait {
	pub fn new(trait_type: impl Into<String>, value: impl Into<String>) -> Self {
		Self { trait_type: trait_type.into(), value: value.into() }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionState {
	Planned,
	Resolving,
	Resolved,
	Failed,
}

/// One collection entry. Media and traits stay empty until metadata
/// resolution succeeds; a `Failed` item keeps whatever it had and may be
/// retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
	pub id: ItemId,
	pub media_candidates: Vec<String>,
	pub traits: Vec<Trait>,
	pub state: ResolutionState,
}
impl Item {
	pub fn planned(id: ItemId) -> Self {
		Self { id, media_candidates: Vec::new(), traits: Vec::new(), state: ResolutionState::Planned }
	}

	pub fn is_resolved(&self) -> bool {
		self.state == ResolutionState::Resolved
	}
}

/// The resolved payload for one item, as produced by a metadata source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemMetadata {
	pub image: Option<String>,
	pub traits: Vec<Trait>,
}
