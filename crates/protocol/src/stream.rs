//! Stream resource bodies for `/streams`.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a stream as reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamStatus {
	#[default]
	Draft,
	Scheduled,
	Live,
	Ended,
	/// A status this client does not know about yet.
	#[serde(other)]
	Unknown,
}

impl std::fmt::Display for StreamStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			StreamStatus::Draft => write!(f, "draft"),
			StreamStatus::Scheduled => write!(f, "scheduled"),
			StreamStatus::Live => write!(f, "live"),
			StreamStatus::Ended => write!(f, "ended"),
			StreamStatus::Unknown => write!(f, "unknown"),
		}
	}
}

impl std::str::FromStr for StreamStatus {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"draft" => Ok(StreamStatus::Draft),
			"scheduled" => Ok(StreamStatus::Scheduled),
			"live" => Ok(StreamStatus::Live),
			"ended" => Ok(StreamStatus::Ended),
			_ => Err(format!("unknown stream status: {s}")),
		}
	}
}

/// A stream owned by the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
	pub id: String,
	pub user_id: String,
	pub title: String,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub platforms: Vec<String>,
	#[serde(default)]
	pub status: StreamStatus,
	pub created_at: String,
	pub updated_at: String,
	#[serde(default)]
	pub rtmp_url: Option<String>,
	#[serde(default)]
	pub stream_key: Option<String>,
}

/// Body of `POST /streams`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamCreate {
	pub title: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	pub platforms: Vec<String>,
	#[serde(default)]
	pub status: StreamStatus,
}

impl StreamCreate {
	/// Creates a draft stream targeting `platforms`.
	pub fn new(title: impl Into<String>, platforms: Vec<String>) -> Self {
		Self {
			title: title.into(),
			description: None,
			platforms,
			status: StreamStatus::Draft,
		}
	}

	pub fn with_description(mut self, description: Option<String>) -> Self {
		self.description = description;
		self
	}
}

/// Body of `PUT /streams/{id}`. Unset fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamUpdate {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub platforms: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<StreamStatus>,
}

impl StreamUpdate {
	pub fn is_empty(&self) -> bool {
		self.title.is_none() && self.description.is_none() && self.platforms.is_none() && self.status.is_none()
	}
}
