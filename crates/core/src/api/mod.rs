//! Thin wrapper around the backend HTTP API.
//!
//! One [`ApiClient`] owns one `reqwest::Client` configured with the API base URL
//! and a JSON content type. Every request reads the credential at send time and
//! attaches it as a bearer token. A `401` from any endpoint clears the
//! credential and redirects to [`Route::Login`]; every other failure is returned
//! to the caller untouched and is never retried here.

mod auth;
mod billing;
mod streams;

use std::sync::Arc;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};
use url::Url;

pub use auth::AuthApi;
pub use billing::{BillingApi, CheckoutRedirect};
pub use streams::StreamsApi;

use crate::config::Config;
use crate::credentials::CredentialProvider;
use crate::error::{Error, Result};
use crate::navigation::{Navigator, Route};

/// Shared client for the backend API.
#[derive(Clone)]
pub struct ApiClient {
	http: reqwest::Client,
	config: Arc<Config>,
	credentials: Arc<dyn CredentialProvider>,
	navigator: Arc<dyn Navigator>,
}

impl ApiClient {
	pub fn new(config: Arc<Config>, credentials: Arc<dyn CredentialProvider>, navigator: Arc<dyn Navigator>) -> Result<Self> {
		let mut headers = HeaderMap::new();
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

		let http = reqwest::Client::builder()
			.default_headers(headers)
			.user_agent(concat!("spreadify/", env!("CARGO_PKG_VERSION")))
			.build()?;

		Ok(Self {
			http,
			config,
			credentials,
			navigator,
		})
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn credentials(&self) -> &Arc<dyn CredentialProvider> {
		&self.credentials
	}

	/// `/auth` endpoints.
	pub fn auth(&self) -> AuthApi<'_> {
		AuthApi::new(self)
	}

	/// `/stripe` endpoints.
	pub fn billing(&self) -> BillingApi<'_> {
		BillingApi::new(self)
	}

	/// `/streams` endpoints.
	pub fn streams(&self) -> StreamsApi<'_> {
		StreamsApi::new(self)
	}

	/// Absolute URL of an API path such as `/streams`.
	pub(crate) fn endpoint(&self, path: &str) -> Url {
		self.config.api_endpoint(path)
	}

	pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
		let response = self.execute(self.request(Method::GET, url)).await?;
		Ok(response.json().await?)
	}

	pub(crate) async fn send_json<B, T>(&self, method: Method, url: Url, body: &B) -> Result<T>
	where
		B: Serialize + ?Sized,
		T: DeserializeOwned,
	{
		let response = self.execute(self.request(method, url).json(body)).await?;
		Ok(response.json().await?)
	}

	/// Sends a request whose response body is not needed.
	pub(crate) async fn send_empty(&self, method: Method, url: Url) -> Result<()> {
		self.execute(self.request(method, url)).await?;
		Ok(())
	}

	fn request(&self, method: Method, url: Url) -> RequestBuilder {
		let builder = self.http.request(method, url);
		match self.credentials.get() {
			Some(credential) => builder.bearer_auth(credential.expose()),
			None => builder,
		}
	}

	async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
		let request = builder.build()?;
		let method = request.method().clone();
		let url = request.url().clone();
		debug!(target = "spreadify.api", %method, path = url.path(), "sending request");

		let response = self.http.execute(request).await?;
		let status = response.status();

		if status == StatusCode::UNAUTHORIZED {
			warn!(target = "spreadify.api", %method, path = url.path(), "unauthorized; clearing credential");
			return Err(self.handle_unauthorized());
		}

		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			let message = error_message(status, &body);
			debug!(target = "spreadify.api", %method, path = url.path(), status = status.as_u16(), %message, "request failed");
			return Err(Error::Api {
				status: status.as_u16(),
				message,
			});
		}

		Ok(response)
	}

	fn handle_unauthorized(&self) -> Error {
		if let Err(err) = self.credentials.clear() {
			error!(target = "spreadify.api", error = %err, "failed to clear credential after 401");
		}
		self.navigator.redirect(Route::Login);
		Error::Unauthorized("the server rejected the session credential".to_string())
	}
}

impl std::fmt::Debug for ApiClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ApiClient").field("api_url", &self.config.api_url().as_str()).finish_non_exhaustive()
	}
}

/// Picks a human-readable message out of an error body.
///
/// FastAPI-style `detail` (string or list of `{msg}`) and `message` fields are
/// preferred; otherwise the raw body, then the canonical status reason.
fn error_message(status: StatusCode, body: &str) -> String {
	if let Ok(value) = serde_json::from_str::<Value>(body) {
		match value.get("detail").or_else(|| value.get("message")) {
			Some(Value::String(s)) if !s.is_empty() => return s.clone(),
			Some(Value::Array(items)) => {
				let msgs: Vec<&str> = items.iter().filter_map(|item| item.get("msg").and_then(Value::as_str)).collect();
				if !msgs.is_empty() {
					return msgs.join("; ");
				}
			}
			_ => {}
		}
	}

	let trimmed = body.trim();
	if !trimmed.is_empty() {
		return trimmed.to_string();
	}
	status.canonical_reason().unwrap_or("request failed").to_string()
}
