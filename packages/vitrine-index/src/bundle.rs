use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Deserialize;
use serde_json::Value;

use vitrine_domain::{ItemId, Selection, Trait};

use crate::error::{Error, Result};

/// One record of the precomputed `records` document.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleRecord {
	pub id: ItemId,
	#[serde(default, alias = "image_url")]
	pub image: Option<String>,
	#[serde(default)]
	pub attributes: Vec<BundleAttribute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BundleAttribute {
	#[serde(alias = "type", alias = "name")]
	pub trait_type: String,
	#[serde(alias = "trait_value")]
	pub value: Value,
}
impl BundleAttribute {
	pub fn to_trait(&self) -> Option<Trait> {
		match &self.value {
			Value::String(text) => Some(Trait::new(self.trait_type.clone(), text.clone())),
			Value::Number(number) => Some(Trait::new(self.trait_type.clone(), number.to_string())),
			_ => None,
		}
	}
}

/// The precomputed trait catalog document.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
	pub types: Vec<String>,
	pub values_by_type: HashMap<String, Vec<String>>,
	#[serde(default)]
	pub counts: HashMap<String, HashMap<String, u32>>,
}

/// The precomputed index artifact: item records, trait catalog, and inverted
/// index, produced by an external build step. Authoritative for matching
/// because it covers the whole collection.
#[derive(Debug)]
pub struct IndexBundle {
	records: Vec<BundleRecord>,
	catalog: Catalog,
	inverted: HashMap<String, BTreeMap<String, BTreeSet<ItemId>>>,
}
impl IndexBundle {
	/// Builds the bundle from its three JSON documents. Any invalid document
	/// makes the whole bundle unavailable; partial precomputed data would
	/// silently under-match.
	pub fn from_documents(
		records: Value,
		catalog: Value,
		inverted: Value,
		excluded: &[String],
	) -> Result<Self> {
		let records: Vec<BundleRecord> = serde_json::from_value(records)
			.map_err(|err| Error::BundleUnavailable { message: format!("records: {err}.") })?;
		let mut catalog: Catalog = serde_json::from_value(catalog)
			.map_err(|err| Error::BundleUnavailable { message: format!("catalog: {err}.") })?;
		let inverted: HashMap<String, BTreeMap<String, Vec<ItemId>>> =
			serde_json::from_value(inverted)
				.map_err(|err| Error::BundleUnavailable { message: format!("inverted: {err}.") })?;
		let is_excluded = |name: &str| excluded.iter().any(|excluded| excluded == name);

		catalog.types.retain(|name| !is_excluded(name));
		catalog.values_by_type.retain(|name, _| !is_excluded(name));
		catalog.counts.retain(|name, _| !is_excluded(name));

		let inverted = inverted
			.into_iter()
			.filter(|(name, _)| !is_excluded(name))
			.map(|(name, values)| {
				(
					name,
					values
						.into_iter()
						.map(|(value, ids)| (value, ids.into_iter().collect::<BTreeSet<_>>()))
						.collect(),
				)
			})
			.collect();

		Ok(Self { records, catalog, inverted })
	}

	pub fn records(&self) -> &[BundleRecord] {
		&self.records
	}

	pub fn catalog(&self) -> &Catalog {
		&self.catalog
	}

	/// Per-type union of the selected values, intersected across types. An
	/// empty selection matches every record, mirroring the incremental
	/// index. Once every item has resolved, this agrees with the
	/// cache-derived path; that equivalence is the index's core correctness
	/// property.
	pub fn matching_ids(&self, selection: &Selection) -> BTreeSet<ItemId> {
		if selection.is_empty() {
			return self.records.iter().map(|record| record.id).collect();
		}

		let mut result: Option<BTreeSet<ItemId>> = None;

		for (trait_type, values) in selection.iter() {
			let mut union = BTreeSet::new();

			if let Some(postings) = self.inverted.get(trait_type) {
				for value in values {
					if let Some(ids) = postings.get(value) {
						union.extend(ids);
					}
				}
			}

			result = Some(match result {
				Some(current) => current.intersection(&union).copied().collect(),
				None => union,
			});

			if result.as_ref().map(BTreeSet::is_empty).unwrap_or(false) {
				break;
			}
		}

		result.unwrap_or_default()
	}

	pub fn values(&self) -> BTreeMap<String, BTreeSet<String>> {
		self.catalog
			.values_by_type
			.iter()
			.map(|(trait_type, values)| (trait_type.clone(), values.iter().cloned().collect()))
			.collect()
	}
}
