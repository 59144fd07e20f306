//! Account commands.
//!
//! - [`login`] - Exchange an OAuth code, accept the login redirect, or print the consent URL
//! - [`logout`] - Forget the stored credential
//! - [`whoami`] - Report whether a credential is stored

use std::time::{SystemTime, UNIX_EPOCH};

use spreadify::login::LoginCallback;
use spreadify::{CredentialProvider, Error, Result};
use tracing::info;

use crate::context::CommandContext;
use crate::output::{LoginData, LogoutData, WhoamiData};

/// Signs in with either an authorization `code` or a login `callback` URL.
/// With neither, returns the Google consent URL without signing in.
///
/// # Errors
///
/// Returns an error if:
/// - The backend rejects the code
/// - The callback carries an `error`, or neither a token nor an error
/// - No code or callback was given and no OAuth client id is configured
/// - The credential file cannot be written
pub async fn login(ctx: &CommandContext, code: Option<String>, callback: Option<String>) -> Result<LoginData> {
	let api = ctx.api()?;

	match (code, callback) {
		(Some(code), _) => {
			info!(target = "spreadify.cli", "exchanging authorization code");
			api.auth().login_with_code(&code).await?;
		}
		(None, Some(callback)) => match LoginCallback::parse(&callback) {
			LoginCallback::Token(credential) => api.auth().accept_credential(credential)?,
			LoginCallback::Failed(message) => return Err(Error::Unauthorized(message)),
			LoginCallback::Empty => {
				return Err(Error::InvalidInput("the callback carries neither a token nor an error".into()));
			}
		},
		(None, None) => {
			let url = ctx.config().google_authorization_url(&oauth_state()).ok_or_else(|| {
				Error::InvalidInput("pass --code or --callback, or configure --google-client-id to get a consent URL".into())
			})?;
			info!(target = "spreadify.cli", "open the consent URL, then rerun with --code or --callback");
			return Ok(LoginData {
				signed_in: ctx.credentials().get().is_some(),
				credentials_file: ctx.credentials_path().to_path_buf(),
				authorization_url: Some(url.to_string()),
			});
		}
	}

	Ok(LoginData {
		signed_in: true,
		credentials_file: ctx.credentials_path().to_path_buf(),
		authorization_url: None,
	})
}

/// Opaque anti-forgery value for the consent round trip.
fn oauth_state() -> String {
	let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos()).unwrap_or_default();
	format!("{:x}{:x}", nanos, std::process::id())
}

pub fn logout(ctx: &CommandContext) -> Result<LogoutData> {
	let cleared = ctx.api()?.auth().logout()?;
	Ok(LogoutData { cleared })
}

pub fn whoami(ctx: &CommandContext) -> WhoamiData {
	WhoamiData {
		signed_in: ctx.credentials().get().is_some(),
		credentials_file: ctx.credentials_path().to_path_buf(),
	}
}
