//! Static route table and the navigation boundary used on authorization failure.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Pages of the product front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
	Landing,
	Login,
	Studio,
	Pricing,
	Success,
	PrivacyPolicy,
}

/// Every route with its path, in display order.
pub const ROUTES: &[(Route, &str)] = &[
	(Route::Landing, "/"),
	(Route::Login, "/login"),
	(Route::Studio, "/studio"),
	(Route::Pricing, "/pricing"),
	(Route::Success, "/success"),
	(Route::PrivacyPolicy, "/privacy-policy"),
];

impl Route {
	pub fn path(self) -> &'static str {
		ROUTES
			.iter()
			.find(|(route, _)| *route == self)
			.map(|(_, path)| *path)
			.unwrap_or("/")
	}

	/// Resolves a path (query and trailing slash ignored) to its route.
	pub fn from_path(path: &str) -> Option<Route> {
		let path = path.split(['?', '#']).next().unwrap_or_default();
		let trimmed = path.trim_end_matches('/');
		let normalized = if trimmed.is_empty() { "/" } else { trimmed };
		ROUTES.iter().find(|(_, p)| *p == normalized).map(|(route, _)| *route)
	}
}

impl std::fmt::Display for Route {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.path())
	}
}

/// Navigation boundary of the hosting view layer.
///
/// Called by the API client and the studio controller when the user has to be
/// sent elsewhere, most notably to [`Route::Login`] after an authorization failure.
pub trait Navigator: Send + Sync {
	fn redirect(&self, route: Route);
}

/// Navigator that only records the requested redirects.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
	redirects: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
	pub fn new() -> Self {
		Self::default()
	}

	/// All redirects requested so far, oldest first.
	pub fn redirects(&self) -> Vec<Route> {
		self.redirects.lock().clone()
	}

	/// Most recent redirect target.
	pub fn current(&self) -> Option<Route> {
		self.redirects.lock().last().copied()
	}
}

impl Navigator for RecordingNavigator {
	fn redirect(&self, route: Route) {
		tracing::debug!(target = "spreadify.navigation", route = %route, "redirect requested");
		self.redirects.lock().push(route);
	}
}
