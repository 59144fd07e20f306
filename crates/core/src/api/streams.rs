use reqwest::Method;
use spreadify_protocol::{Stream, StreamCreate, StreamUpdate};
use url::Url;

use super::ApiClient;
use crate::config::Config;
use crate::error::{Error, Result};

const COLLECTION: &str = "/streams";

/// `/streams` endpoints.
pub struct StreamsApi<'a> {
	client: &'a ApiClient,
}

impl<'a> StreamsApi<'a> {
	pub(super) fn new(client: &'a ApiClient) -> Self {
		Self { client }
	}

	pub async fn list(&self) -> Result<Vec<Stream>> {
		self.client.get_json(self.client.endpoint(COLLECTION)).await
	}

	pub async fn create(&self, stream: &StreamCreate) -> Result<Stream> {
		self.client.send_json(Method::POST, self.client.endpoint(COLLECTION), stream).await
	}

	pub async fn get(&self, id: &str) -> Result<Stream> {
		self.client.get_json(item_url(self.client.config(), id)?).await
	}

	pub async fn update(&self, id: &str, update: &StreamUpdate) -> Result<Stream> {
		self.client.send_json(Method::PUT, item_url(self.client.config(), id)?, update).await
	}

	pub async fn delete(&self, id: &str) -> Result<()> {
		self.client.send_empty(Method::DELETE, item_url(self.client.config(), id)?).await
	}
}

/// `/streams/{id}`. The id becomes exactly one percent-encoded path segment.
fn item_url(config: &Config, id: &str) -> Result<Url> {
	let id = id.trim();
	if id.is_empty() || id.contains(['/', '?', '#']) || id == "." || id == ".." {
		return Err(Error::InvalidInput(format!("invalid stream id: {id:?}")));
	}
	Ok(config.api_item_endpoint(COLLECTION, id))
}
