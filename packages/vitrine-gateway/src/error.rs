pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error("Identifier {identifier:?} yields no retrieval candidates.")]
	InvalidIdentifier { identifier: String },
	#[error("Non-JSON response from {url}.")]
	UnexpectedContentType { url: String },
	#[error("All {tried} sources failed for {label}.")]
	AllSourcesExhausted { label: String, tried: usize },
}
