//! Collections, identity map and unit-of-work sessions for Folio.
//!
//! A Folio database is a directory. Each top-level subdirectory is a
//! collection of one document type, stored either one file per document
//! or one directory per document. [`Store::open`] scans the root, detects
//! the layout of every subdirectory and binds it to the type registered in
//! a [`ModelRegistry`]. Sessions then load, query, add and delete documents
//! through a per-type [`IdentityMap`] and push everything to storage in one
//! [`CacheableSession::save_changes`].
//!
//! # Key Types
//!
//! - [`Store`] -- Immutable table of bound collections plus bind diagnostics
//! - [`DocumentCollection`] -- One document type in one directory layout
//! - [`CollectionBinder`] -- Layout detection over [`Matcher`]s
//! - [`ModelRegistry`] -- Collection name → document type and serializer
//! - [`IdentityMap`] -- One live instance per id, fingerprint dirty checks
//! - [`CacheableSession`] -- The unit of work
//! - [`DataSession`] -- Cache-free storage access under a session
//!
//! # Design Rules
//!
//! 1. Within a session, every id has at most one live instance.
//! 2. A document is written at flush iff it was added or its fingerprint
//!    changed since it was loaded.
//! 3. Absence is not an error: missing, unreadable and unbound documents
//!    read as `None`.
//! 4. Identity violations and writes to unbound types fail immediately.
//! 5. A directory that does not bind is a diagnostic, never a failed open.

pub mod binder;
pub mod collection;
pub mod data_session;
pub mod document_ref;
pub mod error;
pub mod identity_map;
pub mod matcher;
pub mod options;
pub mod registry;
pub mod session;
pub mod store;

#[cfg(test)]
mod test_support;

pub use binder::{BindReport, CollectionBinder};
pub use collection::{
    AuditFailure, AuditReport, BoundCollection, CollectionStructure, DocumentCollection,
};
pub use data_session::{DataSession, StoreSession};
pub use document_ref::DocumentRef;
pub use error::{BindError, StoreError, StoreResult};
pub use identity_map::{ChangeSet, IdentityMap, Resolved};
pub use matcher::{default_matchers, DirectoryMatcher, FileMatcher, Matcher, MatcherFactory};
pub use options::{CollectionNaming, StoreOptions, CONFIG_FILE_NAME};
pub use registry::ModelRegistry;
pub use session::{CacheableSession, FlushReport, FlushableMap};
pub use store::{Session, Store};
