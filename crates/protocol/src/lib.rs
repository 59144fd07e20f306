//! Wire types for the Spreadify backend API.
//!
//! This crate contains the serde-serializable request and response bodies
//! exchanged with the backend over JSON/HTTP. These types represent the
//! "protocol layer" - the shapes of data as they appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond serialization/deserialization
//! * 1:1 with the backend schemas, including its field casing
//! * Forward compatible where the backend may grow (unknown statuses, extra fields)
//!
//! The HTTP client that sends these lives in the `spreadify` crate.

pub mod auth;
pub mod billing;
pub mod stream;

pub use auth::*;
pub use billing::*;
pub use stream::*;
