//! Connection status of a studio session and its transition function.
//!
//! The status only moves along
//! `disconnected -> connecting -> connected -> disconnected`, with
//! `connecting -> disconnected` for a failed or cancelled attempt. Transitions
//! that do not fit are rejected rather than applied, so the observable sequence
//! can never skip `connecting` or re-enter `connected` without a disconnect.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, trace};

use super::events::{EventSink, StudioEvent};

/// Connection status observed by the view layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
	#[default]
	Disconnected,
	Connecting,
	Connected,
}

impl std::fmt::Display for ConnectionStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ConnectionStatus::Disconnected => write!(f, "disconnected"),
			ConnectionStatus::Connecting => write!(f, "connecting"),
			ConnectionStatus::Connected => write!(f, "connected"),
		}
	}
}

/// Connection lifecycle inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
	/// A connection was requested.
	Requested,
	/// The transport acknowledged the open.
	Opened,
	/// The transport failed or closed without being asked to.
	Lost,
	/// The session closed the connection itself.
	Closed,
}

impl ConnectionStatus {
	/// Status reached by applying `trigger`, or `None` if the trigger does not apply.
	pub fn on(self, trigger: Trigger) -> Option<ConnectionStatus> {
		use ConnectionStatus::*;

		match (self, trigger) {
			(Disconnected, Trigger::Requested) => Some(Connecting),
			(Connecting, Trigger::Opened) => Some(Connected),
			(Connecting | Connected, Trigger::Lost | Trigger::Closed) => Some(Disconnected),
			_ => None,
		}
	}
}

/// Owns the status of one session and publishes every accepted transition.
pub(crate) struct StatusTracker {
	session_id: u64,
	current: ConnectionStatus,
	watch: watch::Sender<ConnectionStatus>,
	events: EventSink,
}

impl StatusTracker {
	pub(crate) fn new(session_id: u64, events: EventSink) -> (Self, watch::Receiver<ConnectionStatus>) {
		let (watch, rx) = watch::channel(ConnectionStatus::Disconnected);
		let tracker = Self {
			session_id,
			current: ConnectionStatus::Disconnected,
			watch,
			events,
		};
		(tracker, rx)
	}

	pub(crate) fn current(&self) -> ConnectionStatus {
		self.current
	}

	/// Applies `trigger`; returns the new status if it changed.
	pub(crate) fn apply(&mut self, trigger: Trigger) -> Option<ConnectionStatus> {
		let Some(next) = self.current.on(trigger) else {
			trace!(
				target = "spreadify.studio",
				session = self.session_id,
				status = %self.current,
				?trigger,
				"ignored transition"
			);
			return None;
		};

		debug!(
			target = "spreadify.studio",
			session = self.session_id,
			from = %self.current,
			to = %next,
			"connection status changed"
		);
		self.current = next;
		self.watch.send_replace(next);
		self.events.emit(StudioEvent::Status(next));
		Some(next)
	}
}
