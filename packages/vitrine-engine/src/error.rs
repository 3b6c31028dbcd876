pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Gateway(#[from] vitrine_gateway::Error),
	#[error(transparent)]
	Index(#[from] vitrine_index::Error),
	#[error("Metadata source error: {message}")]
	Source { message: String },
}
