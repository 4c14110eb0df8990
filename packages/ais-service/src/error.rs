pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Scorer unavailable: {message}")]
	ScorerUnavailable { status: Option<u16>, message: String },
	#[error("Insufficient feedback: {qualifying} of {required} qualifying entries.")]
	InsufficientFeedback { qualifying: usize, required: usize },
	#[error("Malformed request: {message}")]
	MalformedRequest { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
}
impl Error {
	pub(crate) fn scorer(err: ais_providers::Error) -> Self {
		Self::ScorerUnavailable { status: err.status(), message: err.to_string() }
	}
}
impl From<ais_providers::Error> for Error {
	fn from(err: ais_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
