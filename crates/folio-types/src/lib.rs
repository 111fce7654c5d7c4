//! Foundation types for the Folio document store.
//!
//! Every other Folio crate depends on `folio-types`. It defines what a
//! document is from the store's point of view and how its content is
//! fingerprinted for change detection.
//!
//! # Key Types
//!
//! - [`Document`] -- The contract a record type fulfils to be stored
//! - [`Fingerprint`] -- BLAKE3 digest over a document's persisted fields
//! - [`FingerprintHasher`] -- Domain-separated, length-prefixed field hasher

pub mod document;
pub mod fingerprint;

pub use document::Document;
pub use fingerprint::{Fingerprint, FingerprintHasher};
