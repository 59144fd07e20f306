//! Parsing of the OAuth redirect that lands on the login page.

use url::Url;

use crate::credentials::Credential;

const DEFAULT_FAILURE_MESSAGE: &str = "Authentication failed";

/// Outcome carried by the login page query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginCallback {
	/// The backend issued a session credential.
	Token(Credential),
	/// The backend reported a failure; the message is user facing.
	Failed(String),
	/// Plain visit to the login page.
	Empty,
}

impl LoginCallback {
	/// Parses a full callback URL, a path with query, or a bare query string.
	///
	/// An `error` parameter takes precedence over a `token`.
	pub fn parse(input: &str) -> Self {
		let query = match Url::parse(input) {
			Ok(url) => url.query().unwrap_or_default().to_string(),
			Err(_) => input.split_once('?').map(|(_, q)| q).unwrap_or(input).to_string(),
		};

		let mut token = None;
		let mut error = None;
		let mut message = None;
		for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
			match key.as_ref() {
				"token" => token = Some(value.into_owned()),
				"error" => error = Some(value.into_owned()),
				"message" => message = Some(value.into_owned()),
				_ => {}
			}
		}

		if error.is_some() {
			let message = message.filter(|m| !m.trim().is_empty()).unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
			return LoginCallback::Failed(message);
		}

		match token.and_then(Credential::new) {
			Some(credential) => LoginCallback::Token(credential),
			None => LoginCallback::Empty,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn token_callback_yields_credential() {
		let parsed = LoginCallback::parse("http://localhost:5173/login?token=abc123");
		assert_eq!(parsed, LoginCallback::Token(Credential::new("abc123").unwrap()));
	}

	#[test]
	fn error_wins_and_message_is_decoded() {
		let parsed = LoginCallback::parse("/login?token=abc&error=oauth&message=Email%20not%20verified");
		assert_eq!(parsed, LoginCallback::Failed("Email not verified".into()));
	}

	#[test]
	fn error_without_message_uses_default() {
		assert_eq!(LoginCallback::parse("error=1"), LoginCallback::Failed("Authentication failed".into()));
	}

	#[test]
	fn empty_or_blank_token_is_empty() {
		assert_eq!(LoginCallback::parse("http://localhost:5173/login"), LoginCallback::Empty);
		assert_eq!(LoginCallback::parse("token="), LoginCallback::Empty);
	}
}
