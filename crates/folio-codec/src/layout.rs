//! Names of the files documents are stored in.

/// Extension of every document file.
pub const EXTENSION: &str = "json";

/// File holding the document in a one-directory-per-document collection.
pub const INDEX_FILE_NAME: &str = "index.json";

/// File name of document `id` in a one-file-per-document collection.
pub fn document_file_name(id: &str) -> String {
    format!("{id}.{EXTENSION}")
}

/// Returns `true` if `name` carries the document extension, exactly as
/// [`document_file_name`] writes it.
pub fn has_document_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(stem, ext)| !stem.is_empty() && ext == EXTENSION)
}

/// Document id encoded in a file name, if it is a document file.
pub fn id_from_file_name(name: &str) -> Option<&str> {
    if has_document_extension(name) {
        name.rsplit_once('.').map(|(stem, _)| stem)
    } else {
        None
    }
}
