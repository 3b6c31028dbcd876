use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub collection: Collection,
	#[serde(default)]
	pub gateways: Gateways,
	#[serde(default)]
	pub bundle: Bundle,
	#[serde(default)]
	pub resolver: Resolver,
	#[serde(default)]
	pub browse: Browse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Collection {
	/// Path segment under which per-item metadata lives, e.g. a project slug.
	pub id: String,
	/// Content identifier for the metadata directory: bare, `ipfs://`-prefixed,
	/// or a full gateway URL.
	pub metadata_root: String,
	pub total_count: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Gateways {
	/// Overrides the first mirror endpoint. The fallback mirrors are fixed.
	pub primary: Option<String>,
	/// Optional resizing/format-conversion intermediary for media URLs.
	pub image_proxy: Option<String>,
	/// Optional pre-rendered thumbnail host; `<thumb_base>/<id>.webp` is tried
	/// before any resolved media URL.
	pub thumb_base: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Bundle {
	pub records_url: Option<String>,
	pub catalog_url: Option<String>,
	pub inverted_url: Option<String>,
}
impl Bundle {
	pub fn is_configured(&self) -> bool {
		self.records_url.is_some() && self.catalog_url.is_some() && self.inverted_url.is_some()
	}

	pub fn is_partial(&self) -> bool {
		let set =
			[&self.records_url, &self.catalog_url, &self.inverted_url].iter().filter(|url| url.is_some()).count();

		set != 0 && set != 3
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Resolver {
	pub concurrency: u32,
	pub timeout_ms: u64,
	pub max_attempts: u32,
	pub base_backoff_ms: u64,
}
impl Default for Resolver {
	fn default() -> Self {
		Self { concurrency: 4, timeout_ms: 10_000, max_attempts: 3, base_backoff_ms: 500 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Browse {
	pub page_size: u32,
	/// Trait types hidden from the filter surface; selections referencing them
	/// are dropped.
	pub excluded_trait_types: Vec<String>,
}
impl Default for Browse {
	fn default() -> Self {
		Self { page_size: 30, excluded_trait_types: Vec::new() }
	}
}
