use folio_codec::CodecError;
use folio_vfs::VfsError;

use crate::collection::CollectionStructure;

/// Errors from store, collection and session operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A document without an id was handed to an operation that needs one.
    #[error("{type_name} document has no identity")]
    EmptyIdentity { type_name: &'static str },

    /// `add` was called for an id the session already tracks.
    #[error("{type_name} '{id}' is already tracked by this session")]
    DuplicateIdentity { type_name: &'static str, id: String },

    /// No collection is bound for the document type.
    #[error("no collection is bound for {0}")]
    MissingCollection(&'static str),

    /// The backend denied write access to a document location.
    #[error("write access denied: {0}")]
    WriteDenied(String),

    /// Two registered types derive the same collection name.
    #[error("collection name '{name}' is already used by {existing}")]
    DuplicateCollection { name: String, existing: &'static str },

    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Filesystem failure.
    #[error(transparent)]
    Vfs(#[from] VfsError),

    /// Encoding or decoding failure.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Why a directory under the database root was not bound to a collection.
///
/// Bind errors never abort a scan: they are logged, collected and kept on
/// the [`crate::Store`] as diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// No layout accepted the directory.
    #[error("no layout matches {directory}: {}", reasons.join("; "))]
    NoMatches {
        directory: String,
        reasons: Vec<String>,
    },

    /// More than one layout accepted the directory.
    #[error("more than one layout matches {directory}: {structures:?}")]
    Ambiguous {
        directory: String,
        structures: Vec<CollectionStructure>,
    },

    /// The layout is fine but no document type is registered for the name.
    #[error("no document type is registered for {directory}")]
    UnknownModel { directory: String },

    /// The directory could not be listed.
    #[error("cannot scan {directory}: {message}")]
    Io { directory: String, message: String },
}

impl BindError {
    /// Full name of the directory the error is about.
    pub fn directory(&self) -> &str {
        match self {
            BindError::NoMatches { directory, .. }
            | BindError::Ambiguous { directory, .. }
            | BindError::UnknownModel { directory }
            | BindError::Io { directory, .. } => directory,
        }
    }
}
