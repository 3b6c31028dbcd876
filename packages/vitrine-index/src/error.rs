pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Json(#[from] serde_json::Error),
	#[error("Index bundle is unavailable: {message}")]
	BundleUnavailable { message: String },
}
