use std::path::PathBuf;

use serde::Serialize;
use spreadify::Route;
use spreadify::api::CheckoutRedirect;
use spreadify::studio::{Notice, TeardownReport, TrackInfo};

/// Result data for login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
	pub signed_in: bool,
	pub credentials_file: PathBuf,
	/// Consent page to open when no code or callback was given.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub authorization_url: Option<String>,
}

/// Result data for logout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutData {
	/// Whether a credential was present and removed.
	pub cleared: bool,
}

/// Result data for whoami. The credential itself is never printed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoamiData {
	pub signed_in: bool,
	pub credentials_file: PathBuf,
}

/// Result data for checkout.
#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum CheckoutData {
	/// Free plan: continue on a front-end page.
	#[serde(rename_all = "camelCase")]
	Navigate { plan: String, url: String },
	/// Paid plan: hand over to the external checkout.
	#[serde(rename_all = "camelCase")]
	Checkout { plan: String, redirect: CheckoutRedirect },
}

/// One entry of the routes listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
	pub route: Route,
	pub path: &'static str,
	pub url: String,
}

/// Result data for streams delete.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedData {
	pub id: String,
	pub deleted: bool,
}

/// Why a studio run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StudioExit {
	Interrupted,
	ConnectionLost,
	DurationElapsed,
}

/// Result data for studio.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioData {
	pub session: u64,
	pub exit: StudioExit,
	pub connected: bool,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub tracks: Vec<TrackInfo>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub notices: Vec<Notice>,
	pub messages_received: usize,
	pub teardown: TeardownReport,
}
