use crate::fingerprint::Fingerprint;

/// A record that can be stored in a Folio collection.
///
/// Implementations must satisfy these invariants:
/// - `id()` is assigned by the caller and is the document's identity. An
///   empty id means "no identity": such a document can never be written.
/// - `fingerprint()` covers every persisted field, nested sequences
///   included, in order. Sessions detect modifications solely by comparing
///   fingerprints, so a field left out of the fingerprint is a field whose
///   edits are silently dropped.
/// - `display_name()` is informational and never used for identity.
///
/// ```
/// use folio_types::{Document, Fingerprint, FingerprintHasher};
///
/// #[derive(Clone)]
/// struct Note {
///     id: String,
///     text: String,
/// }
///
/// impl Document for Note {
///     fn type_name() -> &'static str {
///         "Note"
///     }
///
///     fn id(&self) -> &str {
///         &self.id
///     }
///
///     fn fingerprint(&self) -> Fingerprint {
///         FingerprintHasher::new("note-v1").str(&self.id).str(&self.text).finish()
///     }
/// }
///
/// let note = Note { id: "n-1".into(), text: "hello".into() };
/// assert!(note.has_identity());
/// ```
pub trait Document: Clone + Send + Sync + 'static {
    /// The type name a collection name is derived from (e.g. `"Community"`).
    fn type_name() -> &'static str;

    /// Caller-assigned identity.
    fn id(&self) -> &str;

    /// Human-readable name, if the type has one.
    fn display_name(&self) -> Option<&str> {
        None
    }

    /// Digest over every persisted field.
    fn fingerprint(&self) -> Fingerprint;

    /// Returns `true` if the document carries a non-empty id.
    fn has_identity(&self) -> bool {
        !self.id().is_empty()
    }
}
