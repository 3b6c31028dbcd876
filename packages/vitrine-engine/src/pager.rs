use vitrine_domain::ItemId;

use crate::{filter::Outcome, planner::Planner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
	Idle,
	Loading,
	Exhausted,
}

/// What one `advance` call did; `PlanRequested` asks the caller to extend the
/// planned window and recompute before the window can grow further.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
	Grew,
	PlanRequested { through_id: ItemId },
	AlreadyLoading,
	Exhausted,
}

/// Fixed-page visible window over the filter/sort result. `Exhausted` is
/// terminal; `Loading` coalesces so the same page is never requested twice.
#[derive(Debug)]
pub struct Pager {
	page_size: u32,
	visible_count: usize,
	state: PagerState,
	pending_plan_until: Option<ItemId>,
}
impl Pager {
	pub fn new(page_size: u32) -> Self {
		Self {
			page_size,
			visible_count: page_size as usize,
			state: PagerState::Idle,
			pending_plan_until: None,
		}
	}

	pub fn state(&self) -> PagerState {
		self.state
	}

	pub fn visible_count(&self) -> usize {
		self.visible_count
	}

	/// The first `visible_count` ids of the current result.
	pub fn visible<'a>(&self, outcome: &'a Outcome) -> &'a [ItemId] {
		&outcome.ids[..self.visible_count.min(outcome.ids.len())]
	}

	/// Back to the first page; called when the query context changes.
	pub fn reset(&mut self) {
		self.visible_count = self.page_size as usize;
		self.state = PagerState::Idle;
		self.pending_plan_until = None;
	}

	pub fn advance(&mut self, outcome: &Outcome, planner: &Planner) -> Advance {
		if self.state == PagerState::Exhausted {
			return Advance::Exhausted;
		}
		if outcome.ids.len() > self.visible_count {
			self.visible_count += self.page_size as usize;
			self.state = PagerState::Idle;
			self.pending_plan_until = None;

			return Advance::Grew;
		}
		if !planner.is_complete() {
			let through_id =
				(planner.planned_len() + self.page_size - 1).min(planner.total_count() - 1);

			// The watermark only moves once the caller executes the request,
			// so an unchanged through_id means the same page is still pending.
			if self.state == PagerState::Loading && self.pending_plan_until == Some(through_id) {
				return Advance::AlreadyLoading;
			}

			self.state = PagerState::Loading;
			self.pending_plan_until = Some(through_id);

			return Advance::PlanRequested { through_id };
		}

		self.state = PagerState::Exhausted;

		Advance::Exhausted
	}
}
