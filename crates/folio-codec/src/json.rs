use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CodecError, CodecResult};
use crate::traits::DocumentSerializer;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Pretty-printed JSON serializer.
///
/// Empty input, whitespace-only input and a bare `null` all decode to
/// `None`. A leading UTF-8 byte order mark is ignored.
pub struct JsonSerializer<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonSerializer<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonSerializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for JsonSerializer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsonSerializer<{}>", std::any::type_name::<T>())
    }
}

impl<T> DocumentSerializer<T> for JsonSerializer<T>
where
    T: Serialize + DeserializeOwned,
{
    fn serialize(&self, document: &T) -> CodecResult<Vec<u8>> {
        let mut data =
            serde_json::to_vec_pretty(document).map_err(|e| CodecError::Encode(e.to_string()))?;
        data.push(b'\n');
        Ok(data)
    }

    fn deserialize(&self, data: &[u8]) -> CodecResult<Option<T>> {
        let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice::<Option<T>>(data).map_err(|e| CodecError::Decode(e.to_string()))
    }
}
