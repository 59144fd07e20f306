//! Runs one studio session from the terminal.
//!
//! The terminal has no camera stack, so capture goes through the virtual
//! device. Notices are printed to stderr as they happen; the summary lands in
//! the result envelope once the session has been torn down.

use std::sync::Arc;
use std::time::Duration;

use spreadify::studio::{
	CaptureError, Notice, Severity, StudioController, StudioEvent, VirtualCaptureDevice, WsConnector,
};
use spreadify::{Error, Result};
use tracing::{debug, info};

use crate::context::CommandContext;
use crate::output::{StudioData, StudioExit};

/// Options of the studio command.
#[derive(Debug, Clone, Copy, Default)]
pub struct StudioOptions {
	pub deny_devices: bool,
	pub duration: Option<Duration>,
}

/// Runs a session until Ctrl-C, connection loss, or the optional duration.
///
/// Returns the notices shown along the way even when the session could not start.
pub async fn run(ctx: &CommandContext, options: StudioOptions) -> (Result<StudioData>, Vec<Notice>) {
	let device = if options.deny_devices {
		VirtualCaptureDevice::denying(CaptureError::PermissionDenied)
	} else {
		VirtualCaptureDevice::new()
	};
	let controller = StudioController::new(
		ctx.config().clone(),
		ctx.credentials().clone(),
		ctx.navigator().clone(),
		Arc::new(WsConnector),
		Arc::new(device),
	);

	let mut notices = Vec::new();
	let mut session = match controller.activate() {
		Ok(session) => session,
		Err(err) => {
			if matches!(err, Error::Unauthorized(_)) {
				let notice = Notice::authorization_required();
				show(&notice);
				notices.push(notice);
			}
			return (Err(err), notices);
		}
	};
	info!(target = "spreadify.cli", session = session.id(), "studio running; press Ctrl-C to stop");

	let deadline = async {
		match options.duration {
			Some(duration) => tokio::time::sleep(duration).await,
			None => std::future::pending().await,
		}
	};
	tokio::pin!(deadline);

	let mut connected = false;
	let mut messages_received = 0;
	let exit = loop {
		tokio::select! {
			_ = tokio::signal::ctrl_c() => break StudioExit::Interrupted,
			_ = &mut deadline => break StudioExit::DurationElapsed,
			event = session.next_event() => {
				let Some(event) = event else {
					break StudioExit::ConnectionLost;
				};
				if let Some(notice) = event.notice() {
					show(&notice);
					notices.push(notice);
				}
				match event {
					StudioEvent::Connected => connected = true,
					StudioEvent::ChannelMessage(text) => {
						messages_received += 1;
						debug!(target = "spreadify.cli", bytes = text.len(), "channel message");
					}
					StudioEvent::ConnectionLost { .. } => break StudioExit::ConnectionLost,
					_ => {}
				}
			}
		}
	};

	let tracks = session.preview().map(|preview| preview.tracks()).unwrap_or_default();
	let Some(teardown) = session.deactivate().await else {
		return (Err(Error::Channel("studio session ended without a teardown report".into())), notices);
	};

	let data = StudioData {
		session: session.id(),
		exit,
		connected,
		tracks,
		notices: notices.clone(),
		messages_received,
		teardown,
	};
	(Ok(data), notices)
}

fn show(notice: &Notice) {
	let marker = match notice.severity {
		Severity::Info => "info",
		Severity::Destructive => "error",
	};
	eprintln!("[{marker}] {}: {}", notice.title, notice.description);
}
