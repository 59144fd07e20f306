use reqwest::Method;
use spreadify_protocol::{GoogleCallbackRequest, Token};
use tracing::info;

use super::ApiClient;
use crate::credentials::Credential;
use crate::error::{Error, Result};

/// `/auth` endpoints.
pub struct AuthApi<'a> {
	client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
	pub(super) fn new(client: &'a ApiClient) -> Self {
		Self { client }
	}

	/// Exchanges an OAuth authorization code for a session token.
	pub async fn google_callback(&self, code: &str) -> Result<Token> {
		let body = GoogleCallbackRequest { code: code.to_string() };
		self.client.send_json(Method::POST, self.client.endpoint("/auth/google/callback"), &body).await
	}

	/// Exchanges `code` and stores the resulting credential.
	pub async fn login_with_code(&self, code: &str) -> Result<Credential> {
		let token = self.google_callback(code).await?;
		let credential = Credential::new(token.access_token).ok_or_else(|| Error::Unauthorized("the server issued an empty token".into()))?;
		self.client.credentials().store(credential.clone())?;
		info!(target = "spreadify.api", "signed in");
		Ok(credential)
	}

	/// Stores a credential delivered directly through the login redirect.
	pub fn accept_credential(&self, credential: Credential) -> Result<()> {
		self.client.credentials().store(credential)
	}

	/// Drops the stored credential. Returns true if one was present.
	pub fn logout(&self) -> Result<bool> {
		let cleared = self.client.credentials().clear()?;
		if cleared {
			info!(target = "spreadify.api", "signed out");
		}
		Ok(cleared)
	}
}
