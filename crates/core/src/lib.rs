//! Spreadify studio client.
//!
//! The crate is split along the seams of the product front-end:
//!
//! * [`config`] resolves the backend endpoints once at startup.
//! * [`credentials`] holds the bearer credential shared by every component.
//! * [`api`] wraps the backend HTTP API and owns the global "clear on 401" policy.
//! * [`studio`] runs one studio session: local capture plus the control channel,
//!   with guaranteed teardown of both.
//!
//! [`navigation`], [`pricing`] and [`login`] carry the small pieces of page logic
//! that the view layer needs to stay consistent with the API and the studio.

pub mod api;
pub mod config;
pub mod credentials;
pub mod error;
pub mod login;
pub mod navigation;
pub mod pricing;
pub mod studio;

pub use api::ApiClient;
pub use config::Config;
pub use credentials::{Credential, CredentialProvider, FileCredentials, MemoryCredentials};
pub use error::{Error, Result};
pub use navigation::{Navigator, RecordingNavigator, Route};
pub use spreadify_protocol as protocol;
