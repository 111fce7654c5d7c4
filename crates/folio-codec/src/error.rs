use thiserror::Error;

/// Errors produced while encoding or decoding documents.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("encode error: {0}")]
    Encode(String),

    #[error("decode error: {0}")]
    Decode(String),
}

pub type CodecResult<T> = std::result::Result<T, CodecError>;
