use std::sync::{
	Arc, Mutex,
	atomic::{AtomicBool, Ordering},
};

use tokio::sync::Semaphore;

use vitrine_config::{Gateways, Resolver};
use vitrine_domain::ItemId;
use vitrine_gateway::{media_candidates, with_backoff};
use vitrine_index::{CollectionIndex, ItemStore};

use crate::MetadataSource;

/// Resolves a batch of ids against the metadata source, at most
/// `resolver.concurrency` fetches in flight at once. Each id is claimed via
/// the store's in-flight marker before any work is issued, so concurrent
/// batches never duplicate a fetch. Per-item failures are isolated: the item
/// is marked `Failed` and the batch continues.
pub(crate) async fn resolve_ids(
	source: Arc<dyn MetadataSource>,
	store: Arc<ItemStore>,
	index: Arc<Mutex<CollectionIndex>>,
	gateways: Gateways,
	resolver: Resolver,
	closed: Arc<AtomicBool>,
	ids: Vec<ItemId>,
) {
	let semaphore = Arc::new(Semaphore::new(resolver.concurrency as usize));
	let mut handles = Vec::new();

	for id in ids {
		if closed.load(Ordering::Relaxed) {
			break;
		}
		if !store.begin_resolution(id) {
			continue;
		}

		let Ok(permit) = semaphore.clone().acquire_owned().await else {
			store.end_resolution(id);

			break;
		};
		let source = source.clone();
		let store = store.clone();
		let index = index.clone();
		let gateways = gateways.clone();
		let closed = closed.clone();
		let max_attempts = resolver.max_attempts;
		let base_backoff_ms = resolver.base_backoff_ms;

		handles.push(tokio::spawn(async move {
			let _permit = permit;

			// A discarded session stops issuing fetches; the claim is
			// released so a later session can pick the id up.
			if closed.load(Ordering::Relaxed) {
				store.end_resolution(id);

				return;
			}

			let result =
				with_backoff(max_attempts, base_backoff_ms, |_| source.fetch(id)).await;

			match result {
				Ok(metadata) => {
					let media = media_candidates(id, metadata.image.as_deref(), &gateways);

					store.put(id, metadata.traits.clone(), media);
					index
						.lock()
						.unwrap_or_else(|err| err.into_inner())
						.record_traits(id, &metadata.traits);
				},
				Err(err) => {
					tracing::warn!(id, error = %err, "Item resolution failed.");
					store.mark_failed(id);
				},
			}

			store.end_resolution(id);
		}));
	}

	for handle in handles {
		if let Err(err) = handle.await {
			tracing::error!(error = %err, "Resolution worker panicked.");
		}
	}
}
