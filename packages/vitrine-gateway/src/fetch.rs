use reqwest::{Client, header::CONTENT_TYPE};
use serde_json::Value;

use vitrine_config::{Collection, Gateways};
use vitrine_domain::{ItemMetadata, Trait};

use crate::{
	error::{Error, Result},
	resolve,
};

/// Tries candidates strictly in order; the first JSON-content HTTP success
/// wins and the remainder are never issued. Returns the payload and the
/// winning candidate's index.
pub async fn fetch_json_with_fallback(
	client: &Client,
	label: &str,
	candidates: &[String],
) -> Result<(Value, usize)> {
	for (index, url) in candidates.iter().enumerate() {
		match fetch_json(client, url).await {
			Ok(json) => {
				if index > 0 {
					tracing::debug!(label, winner = index, "Fell back past failing sources.");
				}

				return Ok((json, index));
			},
			Err(err) => {
				tracing::warn!(label, url, error = %err, "Gateway candidate failed.");
			},
		}
	}

	Err(Error::AllSourcesExhausted { label: label.to_string(), tried: candidates.len() })
}

async fn fetch_json(client: &Client, url: &str) -> Result<Value> {
	let res = client.get(url).send().await?.error_for_status()?;
	let is_json = res
		.headers()
		.get(CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.map(|value| value.contains("json"))
		.unwrap_or(false);

	if !is_json {
		return Err(Error::UnexpectedContentType { url: url.to_string() });
	}

	Ok(res.json().await?)
}

/// Resolves one item's metadata object and parses it tolerantly.
pub async fn fetch_metadata(
	client: &Client,
	collection: &Collection,
	gateways: &Gateways,
	id: u32,
) -> Result<ItemMetadata> {
	let candidates = resolve::metadata_candidates(collection, gateways, id)?;
	let label = format!("metadata/{id}");
	let (json, _) = fetch_json_with_fallback(client, &label, &candidates).await?;

	Ok(parse_metadata(&json))
}

/// Missing or mis-typed fields degrade to empty media/traits rather than
/// failing the item; the payload did arrive, it is just incomplete.
pub fn parse_metadata(json: &Value) -> ItemMetadata {
	let image = ["image", "image_url"]
		.iter()
		.find_map(|field| json.get(field).and_then(Value::as_str))
		.map(str::to_string);
	let mut traits = Vec::new();

	if let Some(attributes) = json.get("attributes").and_then(Value::as_array) {
		for attribute in attributes {
			let Some(trait_type) = ["trait_type", "type", "name"]
				.iter()
				.find_map(|field| attribute.get(field).and_then(Value::as_str))
			else {
				continue;
			};
			let Some(value) = ["value", "trait_value"]
				.iter()
				.filter_map(|field| attribute.get(field))
				.find_map(|raw| match raw {
					Value::String(text) => Some(text.clone()),
					Value::Number(number) => Some(number.to_string()),
					_ => None,
				})
			else {
				continue;
			};

			traits.push(Trait::new(trait_type, value));
		}
	} else {
		tracing::debug!("Metadata payload carries no attributes array.");
	}

	ItemMetadata { image, traits }
}
