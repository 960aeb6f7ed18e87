pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Invalid config: {message}")]
	InvalidConfig { message: String },
}
impl From<yardwatch_providers::Error> for Error {
	fn from(err: yardwatch_providers::Error) -> Self {
		match err {
			yardwatch_providers::Error::InvalidConfig { message } => Self::InvalidConfig { message },
			other => Self::Provider { message: other.to_string() },
		}
	}
}
