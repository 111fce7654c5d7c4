//! Document serialization for the Folio document store.
//!
//! A collection never knows the byte format of its documents: it holds a
//! shared [`DocumentSerializer`] and asks it to turn a document into bytes
//! and back. [`JsonSerializer`] is the format every stock collection uses.
//!
//! # Key Types
//!
//! - [`DocumentSerializer`] -- Per-type serialize/deserialize contract
//! - [`JsonSerializer`] -- Pretty-printed JSON via `serde_json`
//! - [`layout`] -- File naming shared by collections and matchers

pub mod error;
pub mod json;
pub mod layout;
pub mod traits;

pub use error::{CodecError, CodecResult};
pub use json::JsonSerializer;
pub use traits::DocumentSerializer;
