use std::{
	collections::HashMap,
	sync::{
		Mutex,
		atomic::{AtomicUsize, Ordering},
	},
};

use tracing_subscriber::EnvFilter;

use vitrine_config::{Browse, Bundle, Collection, Config, Gateways, Resolver};
use vitrine_domain::{ItemId, ItemMetadata, Trait};
use vitrine_engine::{BoxFuture, Error, MetadataSource, Result};

/// Installs a fmt subscriber honoring `RUST_LOG`, defaulting to `info`.
/// Safe to call from every test; only the first call wins.
pub fn init_tracing() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
}

const FUR: [&str; 3] = ["Blue", "Gold", "Red"];
const EYES: [&str; 2] = ["Green", "Red"];

/// Deterministic metadata for a generated collection: `Fur` cycles through
/// three values, `Eyes` through two, and `Score` is a numeric type meant to
/// be excluded in tests.
pub fn generate_metadata(total_count: u32) -> HashMap<ItemId, ItemMetadata> {
	(0..total_count)
		.map(|id| {
			let traits = vec![
				Trait::new("Fur", FUR[id as usize % FUR.len()]),
				Trait::new("Eyes", EYES[id as usize % EYES.len()]),
				Trait::new("Score", ((id % 10) * 10).to_string()),
			];
			let metadata =
				ItemMetadata { image: Some(format!("ipfs://bafytest/{id}.png")), traits };

			(id, metadata)
		})
		.collect()
}

/// Config fixture with instant backoff so retry paths run in test time.
pub fn config(total_count: u32, page_size: u32) -> Config {
	Config {
		collection: Collection {
			id: "testkit".to_string(),
			metadata_root: "bafytestroot".to_string(),
			total_count,
		},
		gateways: Gateways::default(),
		bundle: Bundle::default(),
		resolver: Resolver { concurrency: 4, timeout_ms: 1_000, max_attempts: 3, base_backoff_ms: 1 },
		browse: Browse { page_size, excluded_trait_types: Vec::new() },
	}
}

/// In-memory metadata source with per-id scripted failures and a fetch
/// counter, standing in for the gateway resolver.
pub struct StaticSource {
	items: HashMap<ItemId, ItemMetadata>,
	failures: Mutex<HashMap<ItemId, u32>>,
	fetches: AtomicUsize,
}
impl StaticSource {
	pub fn new(items: HashMap<ItemId, ItemMetadata>) -> Self {
		Self { items, failures: Mutex::new(HashMap::new()), fetches: AtomicUsize::new(0) }
	}

	pub fn generate(total_count: u32) -> Self {
		Self::new(generate_metadata(total_count))
	}

	/// The next `count` fetches for `id` fail before the source recovers.
	pub fn fail_times(&self, id: ItemId, count: u32) {
		let mut failures = self.failures.lock().unwrap_or_else(|err| err.into_inner());

		failures.insert(id, count);
	}

	pub fn fetch_count(&self) -> usize {
		self.fetches.load(Ordering::SeqCst)
	}
}
impl MetadataSource for StaticSource {
	fn fetch<'a>(&'a self, id: ItemId) -> BoxFuture<'a, Result<ItemMetadata>> {
		Box::pin(async move {
			self.fetches.fetch_add(1, Ordering::SeqCst);

			{
				let mut failures = self.failures.lock().unwrap_or_else(|err| err.into_inner());

				if let Some(left) = failures.get_mut(&id)
					&& *left > 0
				{
					*left -= 1;

					return Err(Error::Source {
						message: format!("Scripted failure for item {id}."),
					});
				}
			}

			self.items
				.get(&id)
				.cloned()
				.ok_or_else(|| Error::Source { message: format!("No metadata for item {id}.") })
		})
	}
}
