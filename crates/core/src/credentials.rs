//! Bearer credential storage shared by the API client and the studio session.
//!
//! The credential lives in exactly one slot. Components receive an
//! `Arc<dyn CredentialProvider>` instead of reaching for ambient storage, so the
//! "clear on 401" contract has a single owner of the truth.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::Result;

/// Key under which the credential is persisted.
pub const CREDENTIAL_KEY: &str = "token";

/// Environment variable overriding the credential file location.
pub const CREDENTIALS_FILE_ENV: &str = "SPREADIFY_CREDENTIALS_FILE";

/// Opaque bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
	/// Wraps `token`; blank tokens count as no credential.
	pub fn new(token: impl Into<String>) -> Option<Self> {
		let token = token.into();
		let trimmed = token.trim();
		if trimmed.is_empty() {
			return None;
		}
		Some(Self(trimmed.to_string()))
	}

	pub fn expose(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Debug for Credential {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("Credential(<redacted>)")
	}
}

/// Single source of truth for the current credential.
pub trait CredentialProvider: Send + Sync {
	/// Reads the current credential, if any.
	fn get(&self) -> Option<Credential>;

	/// Replaces the stored credential.
	fn store(&self, credential: Credential) -> Result<()>;

	/// Removes the stored credential. Returns true if one was present.
	fn clear(&self) -> Result<bool>;
}

/// Process-local credential slot.
#[derive(Debug, Default)]
pub struct MemoryCredentials {
	slot: Mutex<Option<Credential>>,
}

impl MemoryCredentials {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_credential(credential: Credential) -> Self {
		Self {
			slot: Mutex::new(Some(credential)),
		}
	}
}

impl CredentialProvider for MemoryCredentials {
	fn get(&self) -> Option<Credential> {
		self.slot.lock().clone()
	}

	fn store(&self, credential: Credential) -> Result<()> {
		*self.slot.lock() = Some(credential);
		Ok(())
	}

	fn clear(&self) -> Result<bool> {
		Ok(self.slot.lock().take().is_some())
	}
}

/// Credential slot persisted as a JSON document on disk.
///
/// The file is read on every access so that a login performed by another
/// process is picked up. Other keys in the document are preserved.
#[derive(Debug)]
pub struct FileCredentials {
	path: PathBuf,
	lock: Mutex<()>,
}

impl FileCredentials {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			lock: Mutex::new(()),
		}
	}

	/// Opens the slot at the default location (see [`default_credentials_path`]).
	pub fn open_default() -> Self {
		Self::new(default_credentials_path())
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn read_document(&self) -> Map<String, Value> {
		let Ok(content) = fs::read_to_string(&self.path) else {
			return Map::new();
		};
		match serde_json::from_str::<Value>(&content) {
			Ok(Value::Object(map)) => map,
			Ok(_) | Err(_) => {
				warn!(target = "spreadify.credentials", path = %self.path.display(), "credential file is not a JSON object; ignoring");
				Map::new()
			}
		}
	}

	/// Replaces the file atomically. The temporary file is created owner-only
	/// (0600 on Unix) and renamed over the target once fully written.
	fn write_document(&self, document: &Map<String, Value>) -> Result<()> {
		let dir = match self.path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent,
			_ => Path::new("."),
		};
		fs::create_dir_all(dir)?;

		let mut file = NamedTempFile::new_in(dir)?;
		serde_json::to_writer_pretty(&mut file, document)?;
		file.write_all(b"\n")?;
		file.as_file().sync_all()?;
		file.persist(&self.path).map_err(|e| e.error)?;
		Ok(())
	}
}

impl CredentialProvider for FileCredentials {
	fn get(&self) -> Option<Credential> {
		let _guard = self.lock.lock();
		self.read_document()
			.get(CREDENTIAL_KEY)
			.and_then(Value::as_str)
			.and_then(Credential::new)
	}

	fn store(&self, credential: Credential) -> Result<()> {
		let _guard = self.lock.lock();
		let mut document = self.read_document();
		document.insert(CREDENTIAL_KEY.to_string(), Value::String(credential.expose().to_string()));
		self.write_document(&document)?;
		debug!(target = "spreadify.credentials", path = %self.path.display(), "credential stored");
		Ok(())
	}

	fn clear(&self) -> Result<bool> {
		let _guard = self.lock.lock();
		let mut document = self.read_document();
		if document.remove(CREDENTIAL_KEY).is_none() {
			return Ok(false);
		}
		self.write_document(&document)?;
		debug!(target = "spreadify.credentials", path = %self.path.display(), "credential cleared");
		Ok(true)
	}
}

/// Default credential file: `$SPREADIFY_CREDENTIALS_FILE`, else
/// `$XDG_CONFIG_HOME/spreadify/credentials.json`, else `~/.config/spreadify/credentials.json`.
pub fn default_credentials_path() -> PathBuf {
	if let Some(path) = std::env::var_os(CREDENTIALS_FILE_ENV) {
		return PathBuf::from(path);
	}
	std::env::var_os("XDG_CONFIG_HOME")
		.map(PathBuf::from)
		.or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
		.unwrap_or_else(|| PathBuf::from("."))
		.join("spreadify/credentials.json")
}
