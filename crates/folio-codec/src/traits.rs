use crate::error::CodecResult;

/// Converts documents of type `T` to and from bytes.
///
/// Decoding distinguishes "nothing here" from "garbage here": an input that
/// encodes no document yields `Ok(None)`, malformed input is an error.
/// Either way the caller treats the document as absent; the distinction
/// only matters for diagnostics.
pub trait DocumentSerializer<T>: Send + Sync {
    /// Encode a document.
    fn serialize(&self, document: &T) -> CodecResult<Vec<u8>>;

    /// Decode a document, or `None` if the input holds no document.
    fn deserialize(&self, data: &[u8]) -> CodecResult<Option<T>>;
}
