//! Studio sessions over a real WebSocket control channel.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use parking_lot::Mutex;
use spreadify::config::ConfigValues;
use spreadify::studio::{
	CaptureRelease, ConnectionRelease, ConnectionStatus, StudioController, StudioEvent, StudioSession, VirtualCaptureDevice,
	WsConnector,
};
use spreadify::{Config, Credential, MemoryCredentials, RecordingNavigator};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

const TOKEN: &str = "channel-token";
const WAIT: Duration = Duration::from_secs(10);

#[derive(Clone, Copy)]
enum Script {
	/// Greets the client, then closes with a reason.
	GreetAndClose,
	/// Stays open until the client closes.
	HoldOpen,
}

struct ServerState {
	script: Script,
	client_closed: Mutex<Option<oneshot::Sender<()>>>,
}

async fn channel(
	ws: WebSocketUpgrade,
	Query(params): Query<HashMap<String, String>>,
	State(state): State<Arc<ServerState>>,
) -> Response {
	if params.get("token").map(String::as_str) != Some(TOKEN) {
		return StatusCode::UNAUTHORIZED.into_response();
	}
	ws.on_upgrade(move |socket| serve(socket, state))
}

async fn serve(mut socket: WebSocket, state: Arc<ServerState>) {
	match state.script {
		Script::GreetAndClose => {
			let _ = socket.send(Message::Text("hello".into())).await;
			let _ = socket
				.send(Message::Close(Some(CloseFrame {
					code: 1001,
					reason: "going away".into(),
				})))
				.await;
		}
		Script::HoldOpen => {
			while let Some(message) = socket.recv().await {
				if matches!(message, Ok(Message::Close(_)) | Err(_)) {
					break;
				}
			}
			if let Some(tx) = state.client_closed.lock().take() {
				let _ = tx.send(());
			}
		}
	}
}

async fn spawn_channel(script: Script) -> (String, oneshot::Receiver<()>) {
	let (tx, rx) = oneshot::channel();
	let state = Arc::new(ServerState {
		script,
		client_closed: Mutex::new(Some(tx)),
	});
	let app = Router::new().route("/ws", get(channel)).with_state(state);
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	tokio::spawn(async move {
		axum::serve(listener, app).await.unwrap();
	});
	(format!("ws://{addr}"), rx)
}

fn controller(ws_url: String, token: &str) -> StudioController {
	let config = Config::from_values(ConfigValues {
		ws_url: Some(ws_url),
		..ConfigValues::default()
	})
	.unwrap();
	let credentials = MemoryCredentials::with_credential(Credential::new(token).unwrap());
	StudioController::new(
		Arc::new(config),
		Arc::new(credentials),
		Arc::new(RecordingNavigator::new()),
		Arc::new(WsConnector),
		Arc::new(VirtualCaptureDevice::new()),
	)
}

async fn events_until(session: &mut StudioSession, done: impl Fn(&StudioEvent) -> bool) -> Vec<StudioEvent> {
	let mut seen = Vec::new();
	loop {
		let event = tokio::time::timeout(WAIT, session.next_event())
			.await
			.expect("timed out waiting for studio event")
			.expect("event stream ended early");
		let finished = done(&event);
		seen.push(event);
		if finished {
			return seen;
		}
	}
}

#[tokio::test]
async fn server_close_is_reported_as_connection_loss() {
	let (url, _closed) = spawn_channel(Script::GreetAndClose).await;
	let mut session = controller(url, TOKEN).activate().unwrap();

	let events = events_until(&mut session, |e| matches!(e, StudioEvent::ConnectionLost { .. })).await;
	assert!(events.iter().any(|e| matches!(e, StudioEvent::Connected)));
	assert!(
		events
			.iter()
			.any(|e| matches!(e, StudioEvent::ChannelMessage(text) if text == "hello"))
	);
	match events.last() {
		Some(StudioEvent::ConnectionLost { reason }) => assert!(reason.contains("1001"), "reason: {reason}"),
		other => panic!("unexpected event {other:?}"),
	}
	assert_eq!(session.status(), ConnectionStatus::Disconnected);

	let report = session.deactivate().await.unwrap();
	assert_eq!(report.connection, ConnectionRelease::AlreadyDown);
	assert_eq!(report.capture, CaptureRelease::Stopped { tracks: 2 });
}

#[tokio::test]
async fn deactivation_closes_open_channel() {
	let (url, closed) = spawn_channel(Script::HoldOpen).await;
	let mut session = controller(url, TOKEN).activate().unwrap();

	events_until(&mut session, |e| matches!(e, StudioEvent::Connected)).await;
	assert_eq!(session.status(), ConnectionStatus::Connected);

	let report = session.deactivate().await.unwrap();
	assert_eq!(report.connection, ConnectionRelease::Closed);
	tokio::time::timeout(WAIT, closed)
		.await
		.expect("server never saw the close")
		.unwrap();
	assert_eq!(session.status(), ConnectionStatus::Disconnected);
}

#[tokio::test]
async fn rejected_handshake_is_reported_as_connection_loss() {
	let (url, _closed) = spawn_channel(Script::HoldOpen).await;
	let mut session = controller(url, "wrong-token").activate().unwrap();

	let events = events_until(&mut session, |e| matches!(e, StudioEvent::ConnectionLost { .. })).await;
	assert!(!events.iter().any(|e| matches!(e, StudioEvent::Connected)));
	assert_eq!(session.status(), ConnectionStatus::Disconnected);

	let report = session.deactivate().await.unwrap();
	assert_eq!(report.connection, ConnectionRelease::AlreadyDown);
}
