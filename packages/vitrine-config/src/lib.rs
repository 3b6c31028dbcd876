mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Browse, Bundle, Collection, Config, Gateways, Resolver};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.collection.id.trim().is_empty() {
		return Err(Error::Validation { message: "collection.id must be non-empty.".to_string() });
	}
	if cfg.collection.metadata_root.trim().is_empty() {
		return Err(Error::Validation {
			message: "collection.metadata_root must be non-empty.".to_string(),
		});
	}
	if cfg.collection.total_count == 0 {
		return Err(Error::Validation {
			message: "collection.total_count must be greater than zero.".to_string(),
		});
	}
	if cfg.bundle.is_partial() {
		return Err(Error::Validation {
			message: "bundle requires records_url, catalog_url, and inverted_url together."
				.to_string(),
		});
	}
	if cfg.resolver.concurrency == 0 {
		return Err(Error::Validation {
			message: "resolver.concurrency must be greater than zero.".to_string(),
		});
	}
	if cfg.resolver.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "resolver.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.resolver.max_attempts == 0 {
		return Err(Error::Validation {
			message: "resolver.max_attempts must be greater than zero.".to_string(),
		});
	}
	if cfg.browse.page_size == 0 {
		return Err(Error::Validation {
			message: "browse.page_size must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for url in [
		&mut cfg.gateways.primary,
		&mut cfg.gateways.image_proxy,
		&mut cfg.gateways.thumb_base,
		&mut cfg.bundle.records_url,
		&mut cfg.bundle.catalog_url,
		&mut cfg.bundle.inverted_url,
	] {
		if url.as_deref().map(|value| value.trim().is_empty()).unwrap_or(false) {
			*url = None;
		}
	}

	cfg.browse.excluded_trait_types.retain(|name| !name.trim().is_empty());
}
