mod error;
mod fetch;
mod resolve;
mod retry;

pub use error::{Error, Result};
pub use fetch::{fetch_json_with_fallback, fetch_metadata, parse_metadata};
pub use resolve::{MIRRORS, candidates, media_candidates, metadata_candidates, proxied};
pub use retry::{backoff_for_attempt, with_backoff};

use std::time::Duration;

use reqwest::Client;

/// One shared client per session; the per-attempt timeout bounds every fetch.
pub fn client(timeout_ms: u64) -> Result<Client> {
	Ok(Client::builder().timeout(Duration::from_millis(timeout_ms)).build()?)
}
