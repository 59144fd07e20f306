//! Studio session lifecycle.
//!
//! [`StudioController::activate`] checks the credential synchronously, then
//! starts capture acquisition and the control connection side by side on a
//! driver task. The driver owns both resources for the whole session and
//! releases them in a single teardown step when the session is deactivated
//! or dropped. Nothing else releases them, so teardown runs exactly once.

use std::mem;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::capture::{CaptureConstraints, CaptureDevice, CaptureError, CaptureHandle, Preview};
use super::channel::{ChannelEvent, ControlConnection, ControlConnector, redacted};
use super::events::{EventSink, StudioEvent};
use super::state::{ConnectionStatus, StatusTracker, Trigger};
use crate::config::Config;
use crate::credentials::CredentialProvider;
use crate::error::{Error, Result};
use crate::navigation::{Navigator, Route};

/// How the control connection was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionRelease {
	/// An open connection was closed.
	Closed,
	/// A connection attempt still in flight was cancelled.
	Abandoned,
	/// The connection had already failed or been closed by the peer.
	AlreadyDown,
}

/// How the capture handle was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CaptureRelease {
	/// Every track of the held handle was stopped.
	Stopped { tracks: usize },
	/// Acquisition was still pending; its handle is stopped as soon as it resolves.
	Deferred,
	/// No handle was ever acquired.
	NotAcquired,
}

/// Outcome of a session teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TeardownReport {
	pub session: u64,
	pub connection: ConnectionRelease,
	pub capture: CaptureRelease,
}

/// Starts studio sessions for one view.
pub struct StudioController {
	config: Arc<Config>,
	credentials: Arc<dyn CredentialProvider>,
	navigator: Arc<dyn Navigator>,
	connector: Arc<dyn ControlConnector>,
	device: Arc<dyn CaptureDevice>,
	constraints: CaptureConstraints,
	next_session: AtomicU64,
}

impl StudioController {
	pub fn new(
		config: Arc<Config>,
		credentials: Arc<dyn CredentialProvider>,
		navigator: Arc<dyn Navigator>,
		connector: Arc<dyn ControlConnector>,
		device: Arc<dyn CaptureDevice>,
	) -> Self {
		Self {
			config,
			credentials,
			navigator,
			connector,
			device,
			constraints: CaptureConstraints::default(),
			next_session: AtomicU64::new(1),
		}
	}

	pub fn with_constraints(mut self, constraints: CaptureConstraints) -> Self {
		self.constraints = constraints;
		self
	}

	/// Starts a new session.
	///
	/// Without a credential this redirects to the login page and fails with
	/// [`Error::Unauthorized`] before any capture or connection request is made.
	/// Must be called from within a Tokio runtime.
	pub fn activate(&self) -> Result<StudioSession> {
		let Some(credential) = self.credentials.get() else {
			warn!(target = "spreadify.studio", "studio entered without a credential");
			self.navigator.redirect(Route::Login);
			return Err(Error::Unauthorized("no credential available for the studio".to_string()));
		};

		let id = self.next_session.fetch_add(1, Ordering::Relaxed);
		let url = self.config.control_channel_url(&credential);
		info!(target = "spreadify.studio", session = id, channel = %redacted(&url), "activating studio session");

		let (events_tx, events_rx) = mpsc::unbounded_channel();
		let sink = EventSink::new(events_tx);
		let (mut status, status_rx) = StatusTracker::new(id, sink.clone());
		status.apply(Trigger::Requested);

		let connect = self.connector.connect(url);
		let capture = self.device.acquire(self.constraints);

		let preview = Arc::new(Mutex::new(None));
		let (shutdown_tx, shutdown_rx) = oneshot::channel();
		let driver = Driver {
			id,
			status,
			events: sink,
			preview: preview.clone(),
			link: Link::Pending(connect),
			capture: Capture::Pending(capture),
		};
		let task = tokio::spawn(driver.run(shutdown_rx));

		Ok(StudioSession {
			id,
			status: status_rx,
			events: events_rx,
			preview,
			shutdown: Some(shutdown_tx),
			task: Some(task),
		})
	}
}

impl std::fmt::Debug for StudioController {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StudioController")
			.field("config", &self.config)
			.field("constraints", &self.constraints)
			.finish_non_exhaustive()
	}
}

/// One activation of the studio.
///
/// Dropping the session tears it down in the background.
pub struct StudioSession {
	id: u64,
	status: watch::Receiver<ConnectionStatus>,
	events: mpsc::UnboundedReceiver<StudioEvent>,
	preview: Arc<Mutex<Option<Preview>>>,
	shutdown: Option<oneshot::Sender<()>>,
	task: Option<JoinHandle<TeardownReport>>,
}

impl StudioSession {
	pub fn id(&self) -> u64 {
		self.id
	}

	pub fn status(&self) -> ConnectionStatus {
		*self.status.borrow()
	}

	/// Receiver that observes every status change of this session.
	pub fn status_watch(&self) -> watch::Receiver<ConnectionStatus> {
		self.status.clone()
	}

	/// Local preview, once capture succeeded and until teardown.
	pub fn preview(&self) -> Option<Preview> {
		self.preview.lock().clone()
	}

	/// Next lifecycle event; `None` once the session has ended and all events were read.
	pub async fn next_event(&mut self) -> Option<StudioEvent> {
		self.events.recv().await
	}

	/// Event without waiting, if one is queued.
	pub fn try_next_event(&mut self) -> Option<StudioEvent> {
		self.events.try_recv().ok()
	}

	/// Initiates teardown immediately and resolves once it finished.
	///
	/// Only the first call yields a report; later calls resolve to `None`.
	pub fn deactivate(&mut self) -> BoxFuture<'static, Option<TeardownReport>> {
		if let Some(shutdown) = self.shutdown.take() {
			debug!(target = "spreadify.studio", session = self.id, "deactivation requested");
			let _ = shutdown.send(());
		}
		let task = self.task.take();
		let id = self.id;
		async move {
			match task?.await {
				Ok(report) => Some(report),
				Err(err) => {
					warn!(target = "spreadify.studio", session = id, error = %err, "session driver did not finish");
					None
				}
			}
		}
		.boxed()
	}
}

impl std::fmt::Debug for StudioSession {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StudioSession")
			.field("id", &self.id)
			.field("status", &self.status())
			.field("active", &self.shutdown.is_some())
			.finish()
	}
}

enum Link {
	Pending(BoxFuture<'static, Result<Box<dyn ControlConnection>>>),
	Open(Box<dyn ControlConnection>),
	Down,
}

enum Capture {
	Pending(BoxFuture<'static, std::result::Result<CaptureHandle, CaptureError>>),
	Held(Arc<CaptureHandle>),
	Unavailable,
}

enum LinkStep {
	Opened(Box<dyn ControlConnection>),
	ConnectFailed(Error),
	Event(ChannelEvent),
}

struct Driver {
	id: u64,
	status: StatusTracker,
	events: EventSink,
	preview: Arc<Mutex<Option<Preview>>>,
	link: Link,
	capture: Capture,
}

impl Driver {
	async fn run(mut self, mut shutdown: oneshot::Receiver<()>) -> TeardownReport {
		loop {
			tokio::select! {
				biased;
				_ = &mut shutdown => break,
				step = link_step(&mut self.link) => self.on_link(step).await,
				acquired = capture_step(&mut self.capture) => self.on_capture(acquired),
			}
		}
		self.teardown().await
	}

	async fn on_link(&mut self, step: LinkStep) {
		match step {
			LinkStep::Opened(connection) => {
				self.link = Link::Open(connection);
				self.status.apply(Trigger::Opened);
				info!(target = "spreadify.studio", session = self.id, "control channel connected");
				self.events.emit(StudioEvent::Connected);
			}
			LinkStep::ConnectFailed(err) => {
				self.link = Link::Down;
				self.lost(err.to_string());
			}
			LinkStep::Event(ChannelEvent::Message(text)) => {
				self.events.emit(StudioEvent::ChannelMessage(text));
			}
			LinkStep::Event(ChannelEvent::Closed { code, reason }) => {
				self.release_link().await;
				let reason = match code {
					Some(code) if reason.is_empty() => format!("closed by server ({code})"),
					Some(code) => format!("closed by server ({code}): {reason}"),
					None if reason.is_empty() => "closed by server".to_string(),
					None => reason,
				};
				self.lost(reason);
			}
			LinkStep::Event(ChannelEvent::Failed(reason)) => {
				self.release_link().await;
				self.lost(reason);
			}
		}
	}

	fn on_capture(&mut self, acquired: std::result::Result<CaptureHandle, CaptureError>) {
		match acquired {
			Ok(handle) => {
				let handle = Arc::new(handle);
				let preview = Preview::new(handle.clone());
				self.capture = Capture::Held(handle);
				*self.preview.lock() = Some(preview.clone());
				info!(target = "spreadify.studio", session = self.id, tracks = preview.tracks().len(), "capture acquired");
				self.events.emit(StudioEvent::PreviewReady(preview));
			}
			Err(err) => {
				self.capture = Capture::Unavailable;
				warn!(target = "spreadify.studio", session = self.id, error = %err, "capture failed");
				self.events.emit(StudioEvent::DeviceAccessFailed(err));
			}
		}
	}

	/// Closes an open connection after the peer ended it.
	async fn release_link(&mut self) {
		if let Link::Open(mut connection) = mem::replace(&mut self.link, Link::Down) {
			connection.close().await;
		}
	}

	fn lost(&mut self, reason: String) {
		self.status.apply(Trigger::Lost);
		warn!(target = "spreadify.studio", session = self.id, %reason, "control channel lost");
		self.events.emit(StudioEvent::ConnectionLost { reason });
	}

	async fn teardown(mut self) -> TeardownReport {
		let connection = match mem::replace(&mut self.link, Link::Down) {
			Link::Open(mut connection) => {
				connection.close().await;
				ConnectionRelease::Closed
			}
			Link::Pending(attempt) => {
				drop(attempt);
				ConnectionRelease::Abandoned
			}
			Link::Down => ConnectionRelease::AlreadyDown,
		};
		self.status.apply(Trigger::Closed);

		self.preview.lock().take();
		let capture = match mem::replace(&mut self.capture, Capture::Unavailable) {
			Capture::Held(handle) => CaptureRelease::Stopped { tracks: handle.stop() },
			Capture::Pending(acquisition) => {
				let id = self.id;
				tokio::spawn(async move {
					if let Ok(handle) = acquisition.await {
						let tracks = handle.stop();
						debug!(target = "spreadify.studio", session = id, tracks, "stopped capture that resolved after teardown");
					}
				});
				CaptureRelease::Deferred
			}
			Capture::Unavailable => CaptureRelease::NotAcquired,
		};

		let report = TeardownReport {
			session: self.id,
			connection,
			capture,
		};
		info!(target = "spreadify.studio", session = self.id, ?connection, ?capture, "studio session ended");
		self.events.emit(StudioEvent::Ended(report));
		report
	}
}

async fn link_step(link: &mut Link) -> LinkStep {
	match link {
		Link::Pending(attempt) => match attempt.await {
			Ok(connection) => LinkStep::Opened(connection),
			Err(err) => LinkStep::ConnectFailed(err),
		},
		Link::Open(connection) => LinkStep::Event(connection.next_event().await),
		Link::Down => std::future::pending().await,
	}
}

async fn capture_step(capture: &mut Capture) -> std::result::Result<CaptureHandle, CaptureError> {
	match capture {
		Capture::Pending(acquisition) => acquisition.await,
		Capture::Held(_) | Capture::Unavailable => std::future::pending().await,
	}
}
