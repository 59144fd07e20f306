//! Events a studio session reports to its view layer.

use serde::Serialize;
use tokio::sync::mpsc;

use super::capture::{CaptureError, Preview};
use super::controller::TeardownReport;
use super::state::ConnectionStatus;

/// Lifecycle event of one studio session, in the order it happened.
#[derive(Debug, Clone)]
pub enum StudioEvent {
	/// The connection status changed.
	Status(ConnectionStatus),
	/// The control channel acknowledged the open.
	Connected,
	/// The control channel failed or was closed by the peer.
	ConnectionLost { reason: String },
	/// Local capture succeeded; the preview stays valid until teardown.
	PreviewReady(Preview),
	/// Local capture failed. The connection is unaffected.
	DeviceAccessFailed(CaptureError),
	/// Opaque text frame received on the control channel.
	ChannelMessage(String),
	/// Teardown finished. Always the last event of a session.
	Ended(TeardownReport),
}

impl StudioEvent {
	/// User-facing notice for this event, if it warrants one.
	pub fn notice(&self) -> Option<Notice> {
		match self {
			StudioEvent::Connected => Some(Notice::info("Connected to Studio", "You can now start streaming.")),
			StudioEvent::ConnectionLost { .. } => Some(Notice::destructive(
				"Connection Lost",
				"Please refresh the page to reconnect.",
			)),
			StudioEvent::DeviceAccessFailed(_) => Some(Notice::destructive(
				"Media Access Error",
				"Please ensure camera and microphone permissions are granted.",
			)),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	Info,
	Destructive,
}

/// Toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
	pub title: &'static str,
	pub description: &'static str,
	pub severity: Severity,
}

impl Notice {
	fn info(title: &'static str, description: &'static str) -> Self {
		Self {
			title,
			description,
			severity: Severity::Info,
		}
	}

	fn destructive(title: &'static str, description: &'static str) -> Self {
		Self {
			title,
			description,
			severity: Severity::Destructive,
		}
	}

	/// Shown when a studio is entered without a credential.
	pub fn authorization_required() -> Self {
		Self::destructive("Authentication Error", "Please log in again.")
	}
}

/// Sending half of a session's event stream. Sends after the view stopped
/// listening are dropped.
#[derive(Debug, Clone)]
pub(crate) struct EventSink(mpsc::UnboundedSender<StudioEvent>);

impl EventSink {
	pub(crate) fn new(tx: mpsc::UnboundedSender<StudioEvent>) -> Self {
		Self(tx)
	}

	pub(crate) fn emit(&self, event: StudioEvent) {
		let _ = self.0.send(event);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn notices_match_events() {
		let connected = StudioEvent::Connected.notice().unwrap();
		assert_eq!(connected.title, "Connected to Studio");
		assert_eq!(connected.severity, Severity::Info);

		let lost = StudioEvent::ConnectionLost {
			reason: "reset".to_string(),
		}
		.notice()
		.unwrap();
		assert_eq!(lost.severity, Severity::Destructive);
		assert!(lost.description.contains("refresh"));

		let denied = StudioEvent::DeviceAccessFailed(CaptureError::PermissionDenied)
			.notice()
			.unwrap();
		assert_eq!(denied.title, "Media Access Error");

		assert!(StudioEvent::Status(ConnectionStatus::Connecting).notice().is_none());
		assert!(StudioEvent::ChannelMessage("{}".to_string()).notice().is_none());
	}

	#[test]
	fn authorization_notice() {
		let notice = Notice::authorization_required();
		assert_eq!(notice.title, "Authentication Error");
		assert_eq!(notice.severity, Severity::Destructive);
	}
}
