//! Local media capture: devices, tracks, and the owned capture handle.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Kind of media carried by a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
	Audio,
	Video,
}

impl fmt::Display for TrackKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TrackKind::Audio => write!(f, "audio"),
			TrackKind::Video => write!(f, "video"),
		}
	}
}

/// One live input track.
///
/// `stop` must be safe to call more than once.
pub trait MediaTrack: Send + Sync {
	fn kind(&self) -> TrackKind;
	fn label(&self) -> &str;
	fn stop(&self);
	fn is_live(&self) -> bool;
}

/// Snapshot of a track for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackInfo {
	pub kind: TrackKind,
	pub label: String,
	pub live: bool,
}

/// Which media a capture request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConstraints {
	pub audio: bool,
	pub video: bool,
}

impl Default for CaptureConstraints {
	fn default() -> Self {
		Self {
			audio: true,
			video: true,
		}
	}
}

/// Why a capture request failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
	#[error("permission to access camera or microphone was denied")]
	PermissionDenied,
	#[error("no capture device matches the requested constraints")]
	NotFound,
	#[error("capture device is busy: {0}")]
	Busy(String),
	#[error("capture failed: {0}")]
	Other(String),
}

/// Owned set of acquired tracks.
///
/// Stopping is idempotent and also happens on drop, so a handle can never
/// outlive its owner with live tracks.
pub struct CaptureHandle {
	tracks: Vec<Box<dyn MediaTrack>>,
	stopped: AtomicBool,
}

impl CaptureHandle {
	pub fn new(tracks: Vec<Box<dyn MediaTrack>>) -> Self {
		Self {
			tracks,
			stopped: AtomicBool::new(false),
		}
	}

	pub fn tracks(&self) -> Vec<TrackInfo> {
		self.tracks
			.iter()
			.map(|track| TrackInfo {
				kind: track.kind(),
				label: track.label().to_string(),
				live: track.is_live(),
			})
			.collect()
	}

	pub fn is_stopped(&self) -> bool {
		self.stopped.load(Ordering::Acquire)
	}

	/// Stops every track. Returns how many were stopped by this call.
	pub(crate) fn stop(&self) -> usize {
		if self.stopped.swap(true, Ordering::AcqRel) {
			return 0;
		}
		for track in &self.tracks {
			track.stop();
		}
		debug!(target = "spreadify.capture", tracks = self.tracks.len(), "capture stopped");
		self.tracks.len()
	}
}

impl Drop for CaptureHandle {
	fn drop(&mut self) {
		self.stop();
	}
}

impl fmt::Debug for CaptureHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CaptureHandle")
			.field("tracks", &self.tracks())
			.field("stopped", &self.is_stopped())
			.finish()
	}
}

/// Read-only view of the session's capture handle for local preview.
#[derive(Debug, Clone)]
pub struct Preview(Arc<CaptureHandle>);

impl Preview {
	pub(crate) fn new(handle: Arc<CaptureHandle>) -> Self {
		Self(handle)
	}

	pub fn tracks(&self) -> Vec<TrackInfo> {
		self.0.tracks()
	}

	pub fn is_live(&self) -> bool {
		!self.0.is_stopped()
	}
}

/// Source of capture handles.
pub trait CaptureDevice: Send + Sync {
	fn acquire(&self, constraints: CaptureConstraints) -> BoxFuture<'static, Result<CaptureHandle, CaptureError>>;
}

/// Synthetic device with one microphone and one camera track.
#[derive(Debug, Clone, Default)]
pub struct VirtualCaptureDevice {
	deny: Option<CaptureError>,
	delay: Option<Duration>,
}

impl VirtualCaptureDevice {
	pub fn new() -> Self {
		Self::default()
	}

	/// A device that fails every request with `error`.
	pub fn denying(error: CaptureError) -> Self {
		Self {
			deny: Some(error),
			delay: None,
		}
	}

	/// Resolve requests only after `delay`.
	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);
		self
	}
}

impl CaptureDevice for VirtualCaptureDevice {
	fn acquire(&self, constraints: CaptureConstraints) -> BoxFuture<'static, Result<CaptureHandle, CaptureError>> {
		let deny = self.deny.clone();
		let delay = self.delay;
		async move {
			if let Some(delay) = delay {
				tokio::time::sleep(delay).await;
			}
			if let Some(error) = deny {
				return Err(error);
			}

			let mut tracks: Vec<Box<dyn MediaTrack>> = Vec::new();
			if constraints.audio {
				tracks.push(Box::new(VirtualTrack::new(TrackKind::Audio, "Virtual Microphone")));
			}
			if constraints.video {
				tracks.push(Box::new(VirtualTrack::new(TrackKind::Video, "Virtual Camera")));
			}
			if tracks.is_empty() {
				return Err(CaptureError::NotFound);
			}
			Ok(CaptureHandle::new(tracks))
		}
		.boxed()
	}
}

struct VirtualTrack {
	kind: TrackKind,
	label: &'static str,
	live: AtomicBool,
}

impl VirtualTrack {
	fn new(kind: TrackKind, label: &'static str) -> Self {
		Self {
			kind,
			label,
			live: AtomicBool::new(true),
		}
	}
}

impl MediaTrack for VirtualTrack {
	fn kind(&self) -> TrackKind {
		self.kind
	}

	fn label(&self) -> &str {
		self.label
	}

	fn stop(&self) {
		self.live.store(false, Ordering::Release);
	}

	fn is_live(&self) -> bool {
		self.live.load(Ordering::Acquire)
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::AtomicUsize;

	use super::*;

	struct CountingTrack(Arc<AtomicUsize>);

	impl MediaTrack for CountingTrack {
		fn kind(&self) -> TrackKind {
			TrackKind::Video
		}

		fn label(&self) -> &str {
			"counting"
		}

		fn stop(&self) {
			self.0.fetch_add(1, Ordering::SeqCst);
		}

		fn is_live(&self) -> bool {
			self.0.load(Ordering::SeqCst) == 0
		}
	}

	#[test]
	fn stop_is_idempotent_and_runs_on_drop() {
		let stops = Arc::new(AtomicUsize::new(0));
		let handle = CaptureHandle::new(vec![Box::new(CountingTrack(stops.clone()))]);

		assert_eq!(handle.stop(), 1);
		assert_eq!(handle.stop(), 0);
		drop(handle);
		assert_eq!(stops.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn drop_stops_unstopped_handle() {
		let stops = Arc::new(AtomicUsize::new(0));
		drop(CaptureHandle::new(vec![Box::new(CountingTrack(stops.clone()))]));
		assert_eq!(stops.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn virtual_device_yields_audio_and_video() {
		let handle = VirtualCaptureDevice::new()
			.acquire(CaptureConstraints::default())
			.await
			.unwrap();
		let tracks = handle.tracks();
		assert_eq!(tracks.len(), 2);
		assert_eq!(tracks[0].kind, TrackKind::Audio);
		assert_eq!(tracks[1].label, "Virtual Camera");
		assert!(tracks.iter().all(|t| t.live));

		let preview = Preview::new(Arc::new(handle));
		assert!(preview.is_live());
	}

	#[tokio::test]
	async fn virtual_device_honours_constraints() {
		let device = VirtualCaptureDevice::new();
		let audio_only = device
			.acquire(CaptureConstraints { audio: true, video: false })
			.await
			.unwrap();
		assert_eq!(audio_only.tracks().len(), 1);

		let none = device.acquire(CaptureConstraints { audio: false, video: false }).await;
		assert_eq!(none.unwrap_err(), CaptureError::NotFound);
	}

	#[tokio::test]
	async fn denying_device_reports_error() {
		let device = VirtualCaptureDevice::denying(CaptureError::PermissionDenied);
		let err = device.acquire(CaptureConstraints::default()).await.unwrap_err();
		assert_eq!(err, CaptureError::PermissionDenied);
	}
}
