//! Control channel transport.
//!
//! The controller only sees [`ControlConnector`] and [`ControlConnection`];
//! [`WsConnector`] is the WebSocket implementation used in production.
//! Message framing on the channel is opaque here.

use futures_util::future::BoxFuture;
use futures_util::{FutureExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::Result;

/// What an open connection produced next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
	/// A text frame from the backend.
	Message(String),
	/// The peer closed the connection.
	Closed { code: Option<u16>, reason: String },
	/// The transport failed.
	Failed(String),
}

/// An established control connection.
pub trait ControlConnection: Send {
	/// Waits for the next event. After `Closed` or `Failed` the connection is done.
	fn next_event(&mut self) -> BoxFuture<'_, ChannelEvent>;

	/// Closes the connection. Closing twice is a no-op.
	fn close(&mut self) -> BoxFuture<'_, ()>;
}

/// Opens control connections.
pub trait ControlConnector: Send + Sync {
	fn connect(&self, url: Url) -> BoxFuture<'static, Result<Box<dyn ControlConnection>>>;
}

/// `url` with its query removed, for logging. The query carries the credential.
pub(crate) fn redacted(url: &Url) -> String {
	let mut shown = url.clone();
	shown.set_query(None);
	shown.to_string()
}

/// WebSocket connector.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl ControlConnector for WsConnector {
	fn connect(&self, url: Url) -> BoxFuture<'static, Result<Box<dyn ControlConnection>>> {
		async move {
			debug!(target = "spreadify.channel", url = %redacted(&url), "opening control channel");
			let (stream, response) = tokio_tungstenite::connect_async(url.as_str()).await?;
			debug!(
				target = "spreadify.channel",
				status = response.status().as_u16(),
				"control channel open"
			);
			Ok(Box::new(WsConnection { stream, closed: false }) as Box<dyn ControlConnection>)
		}
		.boxed()
	}
}

/// WebSocket-backed control connection.
pub struct WsConnection {
	stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
	closed: bool,
}

impl ControlConnection for WsConnection {
	fn next_event(&mut self) -> BoxFuture<'_, ChannelEvent> {
		async move {
			if self.closed {
				return ChannelEvent::Closed {
					code: None,
					reason: "closed locally".to_string(),
				};
			}
			loop {
				match self.stream.next().await {
					Some(Ok(Message::Text(text))) => return ChannelEvent::Message(text),
					Some(Ok(Message::Close(frame))) => {
						self.closed = true;
						let (code, reason) = match frame {
							Some(frame) => (Some(u16::from(frame.code)), frame.reason.to_string()),
							None => (None, String::new()),
						};
						return ChannelEvent::Closed { code, reason };
					}
					Some(Ok(other)) => {
						trace!(target = "spreadify.channel", kind = frame_kind(&other), "ignored frame");
					}
					Some(Err(err)) => {
						self.closed = true;
						warn!(target = "spreadify.channel", error = %err, "control channel failed");
						return ChannelEvent::Failed(err.to_string());
					}
					None => {
						self.closed = true;
						return ChannelEvent::Closed {
							code: None,
							reason: String::new(),
						};
					}
				}
			}
		}
		.boxed()
	}

	fn close(&mut self) -> BoxFuture<'_, ()> {
		async move {
			if self.closed {
				return;
			}
			self.closed = true;
			if let Err(err) = self.stream.close(None).await {
				debug!(target = "spreadify.channel", error = %err, "close handshake failed");
			}
		}
		.boxed()
	}
}

fn frame_kind(message: &Message) -> &'static str {
	match message {
		Message::Text(_) => "text",
		Message::Binary(_) => "binary",
		Message::Ping(_) => "ping",
		Message::Pong(_) => "pong",
		Message::Close(_) => "close",
		Message::Frame(_) => "frame",
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn redacted_drops_token() {
		let url = Url::parse("ws://localhost:8000/ws?token=secret").unwrap();
		assert_eq!(redacted(&url), "ws://localhost:8000/ws");
	}
}
