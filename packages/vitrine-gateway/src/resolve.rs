use vitrine_config::{Collection, Gateways};

use crate::error::{Error, Result};

/// Interchangeable mirror endpoints, tried in order. The first entry may be
/// overridden via `Gateways.primary`; the fallbacks are fixed.
pub const MIRRORS: [&str; 4] = [
	"https://ipfs.io/ipfs/",
	"https://cloudflare-ipfs.com/ipfs/",
	"https://dweb.link/ipfs/",
	"https://gateway.pinata.cloud/ipfs/",
];

enum Suffix {
	/// A content path to expand against every mirror.
	Content(String),
	/// A non-gateway URL used verbatim as the only candidate.
	Direct(String),
}

/// Normalizes a full gateway URL, an `ipfs://`-prefixed id, or a bare content
/// id into the path suffix shared by every mirror.
fn path_suffix(identifier: &str) -> Result<Suffix> {
	let identifier = identifier.trim();

	if identifier.is_empty() {
		return Err(Error::InvalidIdentifier { identifier: identifier.to_string() });
	}
	if let Some(stripped) = identifier.strip_prefix("ipfs://") {
		let stripped = stripped.strip_prefix("ipfs/").unwrap_or(stripped);

		if stripped.is_empty() {
			return Err(Error::InvalidIdentifier { identifier: identifier.to_string() });
		}

		return Ok(Suffix::Content(stripped.to_string()));
	}
	if identifier.starts_with("http://") || identifier.starts_with("https://") {
		return match identifier.split_once("/ipfs/") {
			Some((_, suffix)) if !suffix.is_empty() =>
				Ok(Suffix::Content(suffix.to_string())),
			_ => Ok(Suffix::Direct(identifier.to_string())),
		};
	}

	Ok(Suffix::Content(identifier.to_string()))
}

/// Ordered retrieval candidates for one identifier.
pub fn candidates(identifier: &str, gateways: &Gateways) -> Result<Vec<String>> {
	match path_suffix(identifier)? {
		Suffix::Direct(url) => Ok(vec![url]),
		Suffix::Content(suffix) => {
			let mut out = Vec::with_capacity(MIRRORS.len());

			for (index, mirror) in MIRRORS.iter().enumerate() {
				let base = match (index, gateways.primary.as_deref()) {
					(0, Some(primary)) => primary,
					_ => mirror,
				};

				out.push(join(base, &suffix));
			}

			Ok(out)
		},
	}
}

/// Candidates for one item's metadata object:
/// `<candidate>/<collection-id>/<item-id>.json`.
pub fn metadata_candidates(
	collection: &Collection,
	gateways: &Gateways,
	id: u32,
) -> Result<Vec<String>> {
	let rest = format!("{}/{id}.json", collection.id);

	Ok(candidates(&collection.metadata_root, gateways)?
		.into_iter()
		.map(|base| join(&base, &rest))
		.collect())
}

/// Routes a media URL through the optional resizing intermediary. Candidate
/// order is the caller's concern and is preserved.
pub fn proxied(url: &str, gateways: &Gateways) -> Option<String> {
	gateways.image_proxy.as_deref().map(|proxy| format!("{proxy}{url}"))
}

/// Ordered media candidates for an item: the thumbnail endpoint first, then
/// proxied forms of the resolved image, then the raw fallbacks.
pub fn media_candidates(id: u32, image: Option<&str>, gateways: &Gateways) -> Vec<String> {
	let mut out = Vec::new();

	if let Some(thumb_base) = gateways.thumb_base.as_deref() {
		out.push(join(thumb_base, &format!("{id}.webp")));
	}
	if let Some(image) = image
		&& let Ok(resolved) = candidates(image, gateways)
	{
		if gateways.image_proxy.is_some() {
			for url in &resolved {
				if let Some(proxy_url) = proxied(url, gateways) {
					out.push(proxy_url);
				}
			}
		}

		out.extend(resolved);
	}

	out.dedup();

	out
}

fn join(base: &str, rest: &str) -> String {
	let base = base.trim_end_matches('/');
	let rest = rest.trim_start_matches('/');

	format!("{base}/{rest}")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bare_id_expands_against_all_mirrors() {
		let urls = candidates("bafybeigdyr/meta", &Gateways::default()).expect("Expected candidates.");

		assert_eq!(urls.len(), MIRRORS.len());
		assert_eq!(urls[0], "https://ipfs.io/ipfs/bafybeigdyr/meta");
		assert_eq!(urls[1], "https://cloudflare-ipfs.com/ipfs/bafybeigdyr/meta");
	}

	#[test]
	fn scheme_prefixed_id_is_stripped() {
		let urls = candidates("ipfs://bafybeigdyr/meta", &Gateways::default()).expect("Expected candidates.");

		assert_eq!(urls[0], "https://ipfs.io/ipfs/bafybeigdyr/meta");
	}

	#[test]
	fn gateway_url_is_renormalized() {
		let urls = candidates("https://gateway.pinata.cloud/ipfs/bafybeigdyr", &Gateways::default())
			.expect("Expected candidates.");

		assert_eq!(urls[0], "https://ipfs.io/ipfs/bafybeigdyr");
		assert_eq!(urls.len(), MIRRORS.len());
	}

	#[test]
	fn non_gateway_url_passes_through_alone() {
		let urls =
			candidates("https://static.example.org/meta.json", &Gateways::default()).expect("Expected candidates.");

		assert_eq!(urls, vec!["https://static.example.org/meta.json".to_string()]);
	}

	#[test]
	fn primary_override_replaces_first_mirror_only() {
		let gateways = Gateways {
			primary: Some("https://gateway.example.org/ipfs/".to_string()),
			..Gateways::default()
		};
		let urls = candidates("bafybeigdyr", &gateways).expect("Expected candidates.");

		assert_eq!(urls[0], "https://gateway.example.org/ipfs/bafybeigdyr");
		assert_eq!(urls[1], "https://cloudflare-ipfs.com/ipfs/bafybeigdyr");
	}

	#[test]
	fn empty_identifier_is_rejected() {
		assert!(matches!(
			candidates("  ", &Gateways::default()),
			Err(crate::Error::InvalidIdentifier { .. })
		));
	}

	#[test]
	fn metadata_candidates_append_collection_and_id() {
		let collection = Collection {
			id: "sample".to_string(),
			metadata_root: "bafybeigdyr".to_string(),
			total_count: 100,
		};
		let urls = metadata_candidates(&collection, &Gateways::default(), 7).expect("Expected candidates.");

		assert_eq!(urls[0], "https://ipfs.io/ipfs/bafybeigdyr/sample/7.json");
	}

	#[test]
	fn thumbnail_precedes_image_candidates() {
		let gateways = Gateways {
			thumb_base: Some("https://thumbs.example.org/sample".to_string()),
			..Gateways::default()
		};
		let urls = media_candidates(7, Some("ipfs://bafyimage/7.png"), &gateways);

		assert_eq!(urls[0], "https://thumbs.example.org/sample/7.webp");
		assert_eq!(urls[1], "https://ipfs.io/ipfs/bafyimage/7.png");
	}

	#[test]
	fn proxy_layer_preserves_fallback_order() {
		let gateways =
			Gateways { image_proxy: Some("https://resize.example.org/?url=".to_string()), ..Gateways::default() };
		let urls = media_candidates(7, Some("bafyimage/7.png"), &gateways);

		assert_eq!(urls[0], "https://resize.example.org/?url=https://ipfs.io/ipfs/bafyimage/7.png");
		assert_eq!(
			urls[1],
			"https://resize.example.org/?url=https://cloudflare-ipfs.com/ipfs/bafyimage/7.png"
		);
		assert_eq!(urls[MIRRORS.len()], "https://ipfs.io/ipfs/bafyimage/7.png");
	}
}
