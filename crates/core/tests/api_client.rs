//! ApiClient against an in-process backend.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{Value, json};
use spreadify::config::ConfigValues;
use spreadify::protocol::{StreamCreate, StreamStatus, StreamUpdate};
use spreadify::{ApiClient, Config, Credential, CredentialProvider, Error, MemoryCredentials, RecordingNavigator, Route};
use tokio::net::TcpListener;

const GOOD_TOKEN: &str = "good-token";

type Reply = Result<Json<Value>, (StatusCode, Json<Value>)>;

#[derive(Default)]
struct Backend {
	streams: Mutex<BTreeMap<String, Value>>,
	next_id: AtomicUsize,
	authorizations: Mutex<Vec<Option<String>>>,
	checkout_bodies: Mutex<Vec<Value>>,
}

impl Backend {
	fn authorize(&self, headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
		let value = headers
			.get(header::AUTHORIZATION)
			.and_then(|v| v.to_str().ok())
			.map(str::to_string);
		self.authorizations.lock().push(value.clone());
		if value.as_deref() == Some(&format!("Bearer {GOOD_TOKEN}")) {
			Ok(())
		} else {
			Err((
				StatusCode::UNAUTHORIZED,
				Json(json!({ "detail": "Could not validate credentials" })),
			))
		}
	}

	fn last_authorization(&self) -> Option<String> {
		self.authorizations.lock().last().cloned().flatten()
	}
}

fn not_found() -> (StatusCode, Json<Value>) {
	(StatusCode::NOT_FOUND, Json(json!({ "detail": "Stream not found" })))
}

async fn google_callback(Json(body): Json<Value>) -> Reply {
	if body["code"] == "valid-code" {
		Ok(Json(json!({ "access_token": GOOD_TOKEN, "token_type": "bearer" })))
	} else {
		Err((StatusCode::BAD_REQUEST, Json(json!({ "detail": "Invalid code" }))))
	}
}

async fn list_streams(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Reply {
	backend.authorize(&headers)?;
	let streams: Vec<Value> = backend.streams.lock().values().cloned().collect();
	Ok(Json(Value::Array(streams)))
}

async fn create_stream(State(backend): State<Arc<Backend>>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
	backend.authorize(&headers)?;
	let id = format!("s{}", backend.next_id.fetch_add(1, Ordering::SeqCst) + 1);
	let stream = json!({
		"id": id,
		"user_id": "u1",
		"title": body["title"],
		"description": body.get("description").cloned().unwrap_or(Value::Null),
		"platforms": body["platforms"],
		"status": body["status"],
		"created_at": "2024-01-01T00:00:00Z",
		"updated_at": "2024-01-01T00:00:00Z",
		"rtmp_url": format!("rtmp://ingest.test/live/{id}"),
	});
	backend.streams.lock().insert(id, stream.clone());
	Ok(Json(stream))
}

async fn get_stream(State(backend): State<Arc<Backend>>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
	backend.authorize(&headers)?;
	backend.streams.lock().get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn update_stream(
	State(backend): State<Arc<Backend>>,
	headers: HeaderMap,
	Path(id): Path<String>,
	Json(body): Json<Value>,
) -> Reply {
	backend.authorize(&headers)?;
	let mut streams = backend.streams.lock();
	let stream = streams.get_mut(&id).ok_or_else(not_found)?;
	if let (Some(target), Some(changes)) = (stream.as_object_mut(), body.as_object()) {
		for (key, value) in changes {
			target.insert(key.clone(), value.clone());
		}
		target.insert("updated_at".to_string(), json!("2024-01-02T00:00:00Z"));
	}
	Ok(Json(stream.clone()))
}

async fn delete_stream(
	State(backend): State<Arc<Backend>>,
	headers: HeaderMap,
	Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
	backend.authorize(&headers)?;
	match backend.streams.lock().remove(&id) {
		Some(_) => Ok(StatusCode::NO_CONTENT),
		None => Err(not_found()),
	}
}

async fn create_checkout(State(backend): State<Arc<Backend>>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
	backend.authorize(&headers)?;
	backend.checkout_bodies.lock().push(body);
	Ok(Json(json!({ "sessionId": "cs_test_1" })))
}

async fn verify_session(State(backend): State<Arc<Backend>>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
	backend.authorize(&headers)?;
	Ok(Json(json!({
		"status": "complete",
		"customer_email": "ada@example.com",
		"session": body["sessionId"],
	})))
}

async fn spawn_backend() -> (String, Arc<Backend>) {
	let backend = Arc::new(Backend::default());
	let app = Router::new()
		.route("/auth/google/callback", post(google_callback))
		.route("/streams", get(list_streams).post(create_stream))
		.route("/streams/{id}", get(get_stream).put(update_stream).delete(delete_stream))
		.route("/stripe/create-checkout-session", post(create_checkout))
		.route("/stripe/verify-session", post(verify_session))
		.with_state(backend.clone());

	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	tokio::spawn(async move {
		axum::serve(listener, app).await.unwrap();
	});
	(format!("http://{addr}"), backend)
}

struct Fixture {
	client: ApiClient,
	credentials: Arc<MemoryCredentials>,
	navigator: Arc<RecordingNavigator>,
	backend: Arc<Backend>,
}

async fn fixture(token: Option<&str>) -> Fixture {
	let (base, backend) = spawn_backend().await;
	let config = Config::from_values(ConfigValues {
		api_url: Some(base),
		public_url: Some("https://app.spreadify.test".to_string()),
		stripe_public_key: Some("pk_test_123".to_string()),
		..ConfigValues::default()
	})
	.unwrap();
	let credentials = Arc::new(match token.and_then(Credential::new) {
		Some(credential) => MemoryCredentials::with_credential(credential),
		None => MemoryCredentials::new(),
	});
	let navigator = Arc::new(RecordingNavigator::new());
	let client = ApiClient::new(Arc::new(config), credentials.clone(), navigator.clone()).unwrap();
	Fixture {
		client,
		credentials,
		navigator,
		backend,
	}
}

#[tokio::test]
async fn stream_crud_round_trip() -> anyhow::Result<()> {
	let f = fixture(Some(GOOD_TOKEN)).await;
	let streams = f.client.streams();

	assert!(streams.list().await?.is_empty());

	let created = streams
		.create(&StreamCreate::new("Launch party", vec!["youtube".into(), "twitch".into()]).with_description(Some("Q3 launch".into())))
		.await?;
	assert_eq!(created.title, "Launch party");
	assert_eq!(created.status, StreamStatus::Draft);
	assert_eq!(created.description.as_deref(), Some("Q3 launch"));

	let fetched = streams.get(&created.id).await?;
	assert_eq!(fetched, created);

	let updated = streams
		.update(
			&created.id,
			&StreamUpdate {
				status: Some(StreamStatus::Live),
				..StreamUpdate::default()
			},
		)
		.await?;
	assert_eq!(updated.status, StreamStatus::Live);
	assert_eq!(updated.title, "Launch party");
	assert_eq!(updated.platforms, vec!["youtube", "twitch"]);

	assert_eq!(streams.list().await?.len(), 1);
	streams.delete(&created.id).await?;
	assert!(streams.list().await?.is_empty());

	assert_eq!(f.backend.last_authorization().as_deref(), Some("Bearer good-token"));
	assert!(f.navigator.redirects().is_empty());
	Ok(())
}

#[tokio::test]
async fn unauthorized_clears_credential_and_redirects_once() {
	let f = fixture(Some("expired-token")).await;

	let err = f.client.streams().list().await.unwrap_err();
	assert!(err.is_unauthorized());
	assert_eq!(err.status(), Some(401));
	assert!(f.credentials.get().is_none());
	assert_eq!(f.navigator.redirects(), vec![Route::Login]);

	// The next request goes out without a bearer header.
	let err = f.client.streams().list().await.unwrap_err();
	assert!(err.is_unauthorized());
	assert_eq!(f.backend.last_authorization(), None);
	assert_eq!(f.navigator.redirects(), vec![Route::Login, Route::Login]);
}

#[tokio::test]
async fn other_failures_keep_credential() {
	let f = fixture(Some(GOOD_TOKEN)).await;

	let err = f.client.streams().get("missing").await.unwrap_err();
	match &err {
		Error::Api { status, message } => {
			assert_eq!(*status, 404);
			assert_eq!(message, "Stream not found");
		}
		other => panic!("unexpected error {other:?}"),
	}
	assert_eq!(err.status(), Some(404));
	assert!(f.credentials.get().is_some());
	assert!(f.navigator.redirects().is_empty());
}

#[tokio::test]
async fn encoded_dot_segment_id_reaches_stream_route() {
	let f = fixture(Some(GOOD_TOKEN)).await;

	let err = f.client.streams().delete("%2e%2e").await.unwrap_err();
	match &err {
		Error::Api { status, message } => {
			assert_eq!(*status, 404);
			assert_eq!(message, "Stream not found");
		}
		other => panic!("unexpected error {other:?}"),
	}
	assert_eq!(f.backend.last_authorization().as_deref(), Some("Bearer good-token"));
}

#[tokio::test]
async fn invalid_stream_id_is_rejected_locally() {
	let f = fixture(Some(GOOD_TOKEN)).await;

	let err = f.client.streams().get("../auth").await.unwrap_err();
	assert!(matches!(err, Error::InvalidInput(_)));
	assert!(f.backend.authorizations.lock().is_empty());
}

#[tokio::test]
async fn login_with_code_stores_credential() -> anyhow::Result<()> {
	let f = fixture(None).await;

	let credential = f.client.auth().login_with_code("valid-code").await?;
	assert_eq!(credential.expose(), GOOD_TOKEN);
	assert_eq!(f.credentials.get().map(|c| c.expose().to_string()).as_deref(), Some(GOOD_TOKEN));

	assert!(f.client.streams().list().await.is_ok());
	assert!(f.client.auth().logout()?);
	assert!(f.credentials.get().is_none());
	assert!(!f.client.auth().logout()?);
	Ok(())
}

#[tokio::test]
async fn rejected_code_surfaces_message() {
	let f = fixture(None).await;

	let err = f.client.auth().login_with_code("bogus").await.unwrap_err();
	assert_eq!(err.status(), Some(400));
	assert!(err.to_string().contains("Invalid code"));
	assert!(f.credentials.get().is_none());
	assert!(f.navigator.redirects().is_empty());
}

#[tokio::test]
async fn checkout_uses_public_pages() -> anyhow::Result<()> {
	let f = fixture(Some(GOOD_TOKEN)).await;

	let redirect = f.client.billing().create_checkout_session("price_H5ggYwtDq4fbrJ").await?;
	assert_eq!(redirect.session_id, "cs_test_1");
	assert_eq!(redirect.publishable_key, "pk_test_123");

	let bodies = f.backend.checkout_bodies.lock().clone();
	assert_eq!(
		bodies,
		vec![json!({
			"priceId": "price_H5ggYwtDq4fbrJ",
			"successUrl": "https://app.spreadify.test/success",
			"cancelUrl": "https://app.spreadify.test/pricing",
		})]
	);

	let verification = f.client.billing().verify_session("cs_test_1").await?;
	assert_eq!(verification.status.as_deref(), Some("complete"));
	assert_eq!(verification.customer_email.as_deref(), Some("ada@example.com"));
	assert_eq!(verification.extra["session"], "cs_test_1");
	Ok(())
}
