use vitrine_domain::ItemId;
use vitrine_index::ItemStore;

/// Watermark over the contiguous prefix of the id space that has placeholder
/// records. Only grows; allocation is pure bookkeeping, never I/O.
#[derive(Debug)]
pub struct Planner {
	total_count: u32,
	planned: u32,
}
impl Planner {
	pub fn new(total_count: u32) -> Self {
		Self { total_count, planned: 0 }
	}

	pub fn total_count(&self) -> u32 {
		self.total_count
	}

	pub fn planned_len(&self) -> u32 {
		self.planned
	}

	/// The highest planned id, or `None` before anything has been planned.
	pub fn planned_until(&self) -> Option<ItemId> {
		self.planned.checked_sub(1)
	}

	pub fn is_complete(&self) -> bool {
		self.planned >= self.total_count
	}

	/// Creates placeholder items for every id up to and including
	/// `through_id`, ascending, and advances the watermark. Requests at or
	/// past `total_count` are a caller bug: logged loudly and clamped.
	pub fn ensure_planned(&mut self, store: &ItemStore, through_id: ItemId) {
		let through_id = if through_id >= self.total_count {
			tracing::error!(
				through_id,
				total_count = self.total_count,
				"Planner overrun. Clamping to the last id.",
			);

			self.total_count - 1
		} else {
			through_id
		};

		if through_id < self.planned {
			return;
		}

		for id in self.planned..=through_id {
			store.plan(id);
		}

		self.planned = through_id + 1;
	}
}
