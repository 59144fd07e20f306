//! Endpoint configuration resolved once at process start.
//!
//! Values come from the environment (or any lookup function). Local development
//! defaults exist for the three URLs, but every fallback is logged at `warn` so
//! the operator can always see which values were not supplied explicitly.

use tracing::warn;
use url::Url;

use crate::credentials::Credential;
use crate::error::{Error, Result};
use crate::navigation::Route;

pub const API_URL_ENV: &str = "SPREADIFY_API_URL";
pub const WS_URL_ENV: &str = "SPREADIFY_WS_URL";
pub const PUBLIC_URL_ENV: &str = "SPREADIFY_PUBLIC_URL";
pub const STRIPE_PUBLIC_KEY_ENV: &str = "SPREADIFY_STRIPE_PUBLIC_KEY";
pub const GOOGLE_CLIENT_ID_ENV: &str = "SPREADIFY_GOOGLE_CLIENT_ID";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_WS_URL: &str = "ws://localhost:8000";
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:5173";

pub const GOOGLE_AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Path of the control channel below the channel base URL.
pub const CONTROL_CHANNEL_PATH: &str = "ws";

/// Immutable endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	api_url: Url,
	ws_url: Url,
	public_url: Url,
	stripe_public_key: String,
	google_client_id: String,
}

/// Raw values before validation.
#[derive(Debug, Clone, Default)]
pub struct ConfigValues {
	pub api_url: Option<String>,
	pub ws_url: Option<String>,
	pub public_url: Option<String>,
	pub stripe_public_key: Option<String>,
	pub google_client_id: Option<String>,
}

impl Config {
	/// Resolves configuration from the process environment.
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Resolves configuration through `lookup`, which maps an env var name to its value.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
		Self::from_values(ConfigValues {
			api_url: lookup(API_URL_ENV),
			ws_url: lookup(WS_URL_ENV),
			public_url: lookup(PUBLIC_URL_ENV),
			stripe_public_key: lookup(STRIPE_PUBLIC_KEY_ENV),
			google_client_id: lookup(GOOGLE_CLIENT_ID_ENV),
		})
	}

	/// Validates explicit values, applying the documented defaults for missing ones.
	pub fn from_values(values: ConfigValues) -> Result<Self> {
		let api_url = parse_url(API_URL_ENV, values.api_url, DEFAULT_API_URL, &["http", "https"])?;
		let ws_url = parse_url(WS_URL_ENV, values.ws_url, DEFAULT_WS_URL, &["ws", "wss"])?;
		let public_url = parse_url(PUBLIC_URL_ENV, values.public_url, DEFAULT_PUBLIC_URL, &["http", "https"])?;

		Ok(Self {
			api_url,
			ws_url,
			public_url,
			stripe_public_key: optional_identifier(STRIPE_PUBLIC_KEY_ENV, values.stripe_public_key),
			google_client_id: optional_identifier(GOOGLE_CLIENT_ID_ENV, values.google_client_id),
		})
	}

	pub fn api_url(&self) -> &Url {
		&self.api_url
	}

	pub fn ws_url(&self) -> &Url {
		&self.ws_url
	}

	pub fn public_url(&self) -> &Url {
		&self.public_url
	}

	pub fn stripe_public_key(&self) -> &str {
		&self.stripe_public_key
	}

	pub fn google_client_id(&self) -> &str {
		&self.google_client_id
	}

	/// Google consent page for the configured client id, sending the browser
	/// back to the public login page with an authorization `code`.
	///
	/// `None` when no client id is configured.
	pub fn google_authorization_url(&self, state: &str) -> Option<Url> {
		if self.google_client_id.is_empty() {
			return None;
		}
		let mut url = Url::parse(GOOGLE_AUTHORIZATION_ENDPOINT).ok()?;
		url.query_pairs_mut()
			.append_pair("client_id", &self.google_client_id)
			.append_pair("redirect_uri", self.public_page(Route::Login).as_str())
			.append_pair("response_type", "code")
			.append_pair("scope", "openid email profile")
			.append_pair("state", state);
		Some(url)
	}

	/// Absolute URL of an API path such as `/streams/42`.
	pub fn api_endpoint(&self, path: &str) -> Url {
		append_path(&self.api_url, path)
	}

	/// URL of one item below `collection`. `id` is pushed as a single
	/// percent-encoded segment, so it can never name another path.
	pub fn api_item_endpoint(&self, collection: &str, id: &str) -> Url {
		let mut url = append_path(&self.api_url, collection);
		if let Ok(mut segments) = url.path_segments_mut() {
			segments.pop_if_empty().push(id);
		}
		url
	}

	/// Control channel URL for `credential`: `{wsBase}/ws?token=<credential>`.
	pub fn control_channel_url(&self, credential: &Credential) -> Url {
		let mut url = append_path(&self.ws_url, CONTROL_CHANNEL_PATH);
		url.query_pairs_mut().clear().append_pair("token", credential.expose());
		url
	}

	/// Public URL of a front-end page.
	pub fn public_page(&self, route: Route) -> Url {
		append_path(&self.public_url, route.path())
	}
}

/// Appends `suffix` to the path of `base`, keeping any base path prefix.
fn append_path(base: &Url, suffix: &str) -> Url {
	let mut url = base.clone();
	let prefix = base.path().trim_end_matches('/');
	let suffix = suffix.trim_start_matches('/');
	url.set_path(&format!("{prefix}/{suffix}"));
	url.set_query(None);
	url
}

fn parse_url(key: &str, value: Option<String>, default: &str, schemes: &[&str]) -> Result<Url> {
	let raw = match value.filter(|v| !v.trim().is_empty()) {
		Some(raw) => raw,
		None => {
			warn!(target = "spreadify.config", key, default, "not set; using local development default");
			default.to_string()
		}
	};

	let url = Url::parse(raw.trim()).map_err(|e| Error::Config(format!("{key}={raw}: {e}")))?;
	if !schemes.contains(&url.scheme()) {
		return Err(Error::Config(format!(
			"{key}={raw}: scheme must be one of {}",
			schemes.join(", ")
		)));
	}
	Ok(url)
}

fn optional_identifier(key: &str, value: Option<String>) -> String {
	match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
		Some(v) => v,
		None => {
			warn!(target = "spreadify.config", key, "not set; features depending on it are unavailable");
			String::new()
		}
	}
}
