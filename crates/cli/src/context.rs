//! Shared state for one CLI invocation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use spreadify::config::ConfigValues;
use spreadify::{ApiClient, Config, FileCredentials, Navigator, Result, Route};
use tracing::info;

use crate::cli::EndpointArgs;

/// Navigator for a terminal: there is no page to switch to, so a redirect
/// tells the user where to go instead.
#[derive(Debug)]
pub struct TerminalNavigator {
	config: Arc<Config>,
}

impl TerminalNavigator {
	pub fn new(config: Arc<Config>) -> Self {
		Self { config }
	}

	fn hint(route: Route) -> &'static str {
		match route {
			Route::Login => "run `spreadify login` to sign in again",
			Route::Pricing => "run `spreadify plans` to pick a plan",
			_ => "open the page in a browser",
		}
	}
}

impl Navigator for TerminalNavigator {
	fn redirect(&self, route: Route) {
		let url = self.config.public_page(route);
		info!(target = "spreadify.cli", %route, "redirect");
		eprintln!("redirect: {url} ({})", Self::hint(route));
	}
}

/// Resolved configuration plus the credential store and navigator every
/// command shares.
pub struct CommandContext {
	config: Arc<Config>,
	credentials: Arc<FileCredentials>,
	navigator: Arc<TerminalNavigator>,
}

impl CommandContext {
	pub fn new(endpoints: EndpointArgs, credentials: Option<PathBuf>) -> Result<Self> {
		let config = Arc::new(Config::from_values(ConfigValues {
			api_url: endpoints.api_url,
			ws_url: endpoints.ws_url,
			public_url: endpoints.public_url,
			stripe_public_key: endpoints.stripe_public_key,
			google_client_id: endpoints.google_client_id,
		})?);
		let credentials = credentials.map(FileCredentials::new).unwrap_or_else(FileCredentials::open_default);
		Ok(Self {
			navigator: Arc::new(TerminalNavigator::new(config.clone())),
			credentials: Arc::new(credentials),
			config,
		})
	}

	pub fn config(&self) -> &Arc<Config> {
		&self.config
	}

	pub fn credentials(&self) -> &Arc<FileCredentials> {
		&self.credentials
	}

	pub fn credentials_path(&self) -> &Path {
		self.credentials.path()
	}

	pub fn navigator(&self) -> &Arc<TerminalNavigator> {
		&self.navigator
	}

	pub fn api(&self) -> Result<ApiClient> {
		ApiClient::new(self.config.clone(), self.credentials.clone(), self.navigator.clone())
	}
}
