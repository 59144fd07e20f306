//! Studio session: local capture plus the control channel.
//!
//! A [`StudioController`] is created once per studio view. Each call to
//! [`StudioController::activate`] yields a fresh [`StudioSession`] that
//! acquires a [`CaptureHandle`] and a control connection independently and
//! reports progress as [`StudioEvent`]s. Deactivating or dropping the session
//! releases whatever was acquired, once.

mod capture;
mod channel;
mod controller;
mod events;
mod state;


pub use capture::{
	CaptureConstraints, CaptureDevice, CaptureError, CaptureHandle, MediaTrack, Preview, TrackInfo, TrackKind,
	VirtualCaptureDevice,
};
pub use channel::{ChannelEvent, ControlConnection, ControlConnector, WsConnection, WsConnector};
pub use controller::{CaptureRelease, ConnectionRelease, StudioController, StudioSession, TeardownReport};
pub use events::{Notice, Severity, StudioEvent};
pub use state::{ConnectionStatus, Trigger};
