//! Error types shared by the API wrapper, configuration and studio session.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// No credential was available, or the backend rejected it.
	#[error("Authentication required: {0}")]
	Unauthorized(String),

	#[error("Invalid configuration: {0}")]
	Config(String),

	#[error("Invalid input: {0}")]
	InvalidInput(String),

	#[error("Invalid URL: {0}")]
	Url(#[from] url::ParseError),

	#[error("HTTP transport error: {0}")]
	Http(#[from] reqwest::Error),

	/// The backend answered with a non-success status other than 401.
	#[error("API request failed with status {status}: {message}")]
	Api { status: u16, message: String },

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Control channel error: {0}")]
	Channel(String),
}

impl Error {
	/// Returns true for the authorization failure handled globally by the API client.
	pub fn is_unauthorized(&self) -> bool {
		matches!(self, Error::Unauthorized(_))
	}

	/// HTTP status carried by the error, if the backend produced one.
	pub fn status(&self) -> Option<u16> {
		match self {
			Error::Unauthorized(_) => Some(401),
			Error::Api { status, .. } => Some(*status),
			Error::Http(err) => err.status().map(|s| s.as_u16()),
			_ => None,
		}
	}
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
	fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
		Error::Channel(err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_is_reported_for_api_errors() {
		let err = Error::Api {
			status: 404,
			message: "Stream not found".into(),
		};
		assert_eq!(err.status(), Some(404));
		assert!(!err.is_unauthorized());
		assert_eq!(err.to_string(), "API request failed with status 404: Stream not found");
	}

	#[test]
	fn unauthorized_maps_to_401() {
		let err = Error::Unauthorized("no credential".into());
		assert!(err.is_unauthorized());
		assert_eq!(err.status(), Some(401));
	}
}
