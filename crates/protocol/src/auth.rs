//! OAuth code exchange bodies.

use serde::{Deserialize, Serialize};

/// Body of `POST /auth/google/callback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleCallbackRequest {
	pub code: String,
}

/// Session token issued by the backend after a successful code exchange.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
	pub access_token: String,
	#[serde(default = "default_token_type")]
	pub token_type: String,
}

fn default_token_type() -> String {
	"bearer".to_string()
}

impl std::fmt::Debug for Token {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Token")
			.field("access_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.finish()
	}
}
