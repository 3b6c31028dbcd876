pub mod filter;
pub mod pager;
pub mod planner;

mod error;
mod resolve;

pub use error::{Error, Result};
pub use filter::{Outcome, Query};
pub use pager::{Advance, Pager, PagerState};
pub use planner::Planner;

use std::{
	collections::{BTreeMap, BTreeSet},
	future::Future,
	pin::Pin,
	sync::{
		Arc, Mutex,
		atomic::{AtomicBool, Ordering},
	},
};

use reqwest::Client;

use vitrine_config::Config;
use vitrine_domain::{Item, ItemId, ItemMetadata, ResolutionState, Selection, SortKey, Trait};
use vitrine_gateway::fetch_json_with_fallback;
use vitrine_index::{CollectionIndex, IndexBundle, ItemStore};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Where item metadata comes from. The production impl runs the gateway
/// resolver; tests inject a scripted source.
pub trait MetadataSource
where
	Self: Send + Sync,
{
	fn fetch<'a>(&'a self, id: ItemId) -> BoxFuture<'a, Result<ItemMetadata>>;
}

/// Resolves metadata through the mirror gateways with fallback.
pub struct GatewaySource {
	client: Client,
	collection: vitrine_config::Collection,
	gateways: vitrine_config::Gateways,
}
impl GatewaySource {
	pub fn new(cfg: &Config) -> Result<Self> {
		Ok(Self {
			client: vitrine_gateway::client(cfg.resolver.timeout_ms)?,
			collection: cfg.collection.clone(),
			gateways: cfg.gateways.clone(),
		})
	}
}
impl MetadataSource for GatewaySource {
	fn fetch<'a>(&'a self, id: ItemId) -> BoxFuture<'a, Result<ItemMetadata>> {
		Box::pin(async move {
			Ok(vitrine_gateway::fetch_metadata(&self.client, &self.collection, &self.gateways, id)
				.await?)
		})
	}
}

/// One browsing session over one collection. Owns every mutable structure of
/// the engine, so concurrent sessions (and tests) never share state; drop it
/// and everything goes with it.
///
/// Single logical consumer: the session itself is driven from one task.
/// Parallelism is confined to metadata resolution, which shares only the
/// item store, the in-flight markers, and the collection index.
pub struct Session {
	cfg: Config,
	store: Arc<ItemStore>,
	index: Arc<Mutex<CollectionIndex>>,
	planner: Planner,
	pager: Pager,
	query: Query,
	outcome: Outcome,
	source: Arc<dyn MetadataSource>,
	closed: Arc<AtomicBool>,
}
impl Session {
	pub fn new(cfg: Config, source: Arc<dyn MetadataSource>) -> Self {
		let store = Arc::new(ItemStore::new());
		let index =
			Arc::new(Mutex::new(CollectionIndex::new(cfg.browse.excluded_trait_types.clone())));
		let mut planner = Planner::new(cfg.collection.total_count);
		let pager = Pager::new(cfg.browse.page_size);

		planner.ensure_planned(&store, first_page_end(&cfg));

		let mut session = Session {
			cfg,
			store,
			index,
			planner,
			pager,
			query: Query::default(),
			outcome: Outcome::default(),
			source,
			closed: Arc::new(AtomicBool::new(false)),
		};

		session.refresh();

		session
	}

	/// Session wired to the real gateway resolver.
	pub fn with_gateway(cfg: Config) -> Result<Self> {
		let source = Arc::new(GatewaySource::new(&cfg)?);

		Ok(Self::new(cfg, source))
	}

	pub fn store(&self) -> &ItemStore {
		&self.store
	}

	pub fn planner(&self) -> &Planner {
		&self.planner
	}

	pub fn query(&self) -> &Query {
		&self.query
	}

	pub fn outcome(&self) -> &Outcome {
		&self.outcome
	}

	pub fn state(&self) -> PagerState {
		self.pager.state()
	}

	/// Fetches and applies the precomputed index bundle. Any of the three
	/// documents missing or invalid degrades to per-item resolution; the
	/// session keeps working either way.
	pub async fn load_bundle(&mut self, client: &Client) -> bool {
		let (Some(records_url), Some(catalog_url), Some(inverted_url)) = (
			self.cfg.bundle.records_url.clone(),
			self.cfg.bundle.catalog_url.clone(),
			self.cfg.bundle.inverted_url.clone(),
		) else {
			return false;
		};
		let mut documents = Vec::with_capacity(3);

		for (label, url) in [
			("bundle/records", records_url),
			("bundle/catalog", catalog_url),
			("bundle/inverted", inverted_url),
		] {
			match fetch_json_with_fallback(client, label, &[url]).await {
				Ok((json, _)) => documents.push(json),
				Err(err) => {
					tracing::warn!(label, error = %err, "Index bundle unavailable. Falling back to per-item resolution.");

					return false;
				},
			}
		}

		let inverted = documents.pop().unwrap_or_default();
		let catalog = documents.pop().unwrap_or_default();
		let records = documents.pop().unwrap_or_default();

		match IndexBundle::from_documents(
			records,
			catalog,
			inverted,
			&self.cfg.browse.excluded_trait_types,
		) {
			Ok(bundle) => {
				self.apply_bundle(bundle);

				true
			},
			Err(err) => {
				tracing::warn!(error = %err, "Index bundle invalid. Falling back to per-item resolution.");

				false
			},
		}
	}

	/// Seeds the store and the incremental index from the bundle's records,
	/// then installs the bundle as the authoritative match source. Records go
	/// through the ordinary `put` path, so re-resolution stays idempotent.
	pub fn apply_bundle(&mut self, bundle: IndexBundle) {
		{
			let mut index = self.lock_index();

			for record in bundle.records() {
				if record.id >= self.cfg.collection.total_count {
					continue;
				}

				let traits: Vec<Trait> =
					record.attributes.iter().filter_map(|attribute| attribute.to_trait()).collect();
				let media = vitrine_gateway::media_candidates(
					record.id,
					record.image.as_deref(),
					&self.cfg.gateways,
				);

				self.store.put(record.id, traits.clone(), media);
				index.record_traits(record.id, &traits);
			}

			index.set_bundle(bundle);
		}

		self.refresh();
	}

	/// Recomputes the filter/sort outcome from scratch. Called after every
	/// change to the query, the planned window, or the cache.
	pub fn refresh(&mut self) {
		let index = self.index.clone();
		let index = index.lock().unwrap_or_else(|err| err.into_inner());

		self.outcome = filter::compute(&self.query, &index, &mut self.planner, &self.store);
	}

	pub fn set_search(&mut self, search: impl Into<String>) {
		self.query.search = search.into();
		self.pager.reset();
		self.refresh();
	}

	/// Installs a new trait selection, silently dropping any excluded type a
	/// stale consumer might still reference.
	pub fn set_selection(&mut self, mut selection: Selection) {
		selection.drop_excluded(&self.cfg.browse.excluded_trait_types);

		self.query.selection = selection;
		self.pager.reset();
		self.refresh();
	}

	pub fn toggle_trait(&mut self, trait_type: &str, value: &str) {
		if self.cfg.browse.excluded_trait_types.iter().any(|name| name == trait_type) {
			return;
		}

		self.query.selection.toggle(trait_type, value);
		self.pager.reset();
		self.refresh();
	}

	pub fn set_sort(&mut self, sort: SortKey) {
		self.query.sort = sort;
		self.pager.reset();
		self.refresh();
	}

	pub fn clear_filters(&mut self) {
		self.query = Query::default();
		self.pager.reset();
		self.refresh();
	}

	pub fn visible_ids(&self) -> &[ItemId] {
		self.pager.visible(&self.outcome)
	}

	/// The visible window as full records. Unresolved and failed items come
	/// back in their placeholder/failed states so the consumer can render
	/// them distinguishably rather than omit them.
	pub fn visible_items(&self) -> Vec<Item> {
		self.visible_ids()
			.iter()
			.map(|id| self.store.get(*id).unwrap_or_else(|| Item::planned(*id)))
			.collect()
	}

	/// Per-type trait values for the filter surface: bundle catalog first,
	/// extended by values discovered from resolved items.
	pub fn values_union(&self) -> BTreeMap<String, BTreeSet<String>> {
		self.lock_index().values_union()
	}

	/// One pagination step. Grows the window when computed results remain;
	/// otherwise plans ahead (the whole id space when the current query needs
	/// coverage, one page otherwise), recomputes, and resolves what became
	/// visible. Terminal at `Exhausted`, and never exhausts while ids that
	/// could still match remain unexamined.
	pub async fn advance(&mut self) -> PagerState {
		// A trait filter without the precomputed index must examine every id
		// before the window may exhaust. The pager cannot see this: the
		// planner can be complete (small collection, or a prior search planned
		// through the last id) while resolution has not covered the space.
		if !self.is_closed() && self.coverage_pending() {
			self.ensure_coverage().await;
			self.resolve_visible().await;

			return self.pager.state();
		}

		match self.pager.advance(&self.outcome, &self.planner) {
			Advance::Grew => {
				self.resolve_visible().await;
			},
			Advance::PlanRequested { through_id } => {
				if self.outcome.coverage_required {
					self.ensure_coverage().await;
				} else {
					self.planner.ensure_planned(&self.store, through_id);
					self.refresh();
				}

				self.resolve_visible().await;
			},
			Advance::AlreadyLoading | Advance::Exhausted => {},
		}

		self.pager.state()
	}

	/// True while the active trait filter's match set could still grow: no
	/// precomputed index, and some id has never had a resolution attempt.
	/// `Failed` ids count as examined; `retry_failed` is their path back in.
	fn coverage_pending(&self) -> bool {
		if !self.outcome.coverage_required || self.query.selection.is_empty() {
			return false;
		}
		if self.lock_index().has_bundle() {
			return false;
		}

		(0..self.cfg.collection.total_count).any(|id| {
			self.store
				.get(id)
				.map(|item| item.state == ResolutionState::Planned)
				.unwrap_or(true)
		})
	}

	/// Plans the whole id space and, for trait filters without a precomputed
	/// index, resolves every unresolved item so the match set is complete.
	/// `Failed` items are left alone; `retry_failed` is the explicit path.
	pub async fn ensure_coverage(&mut self) {
		if !self.outcome.coverage_required {
			return;
		}

		let last = self.cfg.collection.total_count - 1;

		self.planner.ensure_planned(&self.store, last);

		let needs_metadata = !self.query.selection.is_empty() && !self.lock_index().has_bundle();

		if needs_metadata {
			let pending: Vec<ItemId> = (0..=last)
				.filter(|id| {
					self.store
						.get(*id)
						.map(|item| item.state == ResolutionState::Planned)
						.unwrap_or(true)
				})
				.collect();

			self.resolve_ids(pending).await;
		}

		self.refresh();
	}

	/// Resolves whatever is visible but still unresolved.
	pub async fn resolve_visible(&mut self) -> usize {
		let pending: Vec<ItemId> = self
			.visible_ids()
			.iter()
			.copied()
			.filter(|id| {
				self.store
					.get(*id)
					.map(|item| item.state == ResolutionState::Planned)
					.unwrap_or(true)
			})
			.collect();
		let count = pending.len();

		self.resolve_ids(pending).await;
		self.refresh();

		count
	}

	/// Re-queues every `Failed` item once. Never called automatically.
	pub async fn retry_failed(&mut self) -> usize {
		let failed = self.store.failed_ids();
		let count = failed.len();

		self.resolve_ids(failed).await;
		self.refresh();

		count
	}

	/// Stops the session issuing new fetches. Fetches already in the air
	/// complete and write the cache, which is harmless: writes are
	/// idempotent and this session no longer reads them.
	pub fn close(&self) {
		self.closed.store(true, Ordering::Relaxed);
	}

	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::Relaxed)
	}

	async fn resolve_ids(&self, ids: Vec<ItemId>) {
		if ids.is_empty() || self.is_closed() {
			return;
		}

		resolve::resolve_ids(
			self.source.clone(),
			self.store.clone(),
			self.index.clone(),
			self.cfg.gateways.clone(),
			self.cfg.resolver.clone(),
			self.closed.clone(),
			ids,
		)
		.await;
	}

	fn lock_index(&self) -> std::sync::MutexGuard<'_, CollectionIndex> {
		self.index.lock().unwrap_or_else(|err| err.into_inner())
	}
}

fn first_page_end(cfg: &Config) -> ItemId {
	(cfg.browse.page_size - 1).min(cfg.collection.total_count - 1)
}
