use std::fmt;

/// Content fingerprint of a document.
///
/// A `Fingerprint` is the BLAKE3 digest of every persisted field of a
/// document, fed through a [`FingerprintHasher`]. Two documents of the same
/// type with the same persisted representation always produce the same
/// fingerprint; changing any field (including the order of a sequence)
/// produces a different one.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.short_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Domain-separated field hasher producing a [`Fingerprint`].
///
/// Every field is written with a type tag and a length prefix, and optional
/// fields record whether they are present. As a result `("ab", "c")` and
/// `("a", "bc")` never collide, and `None` differs from `Some("")`.
///
/// ```
/// use folio_types::FingerprintHasher;
///
/// let a = FingerprintHasher::new("venue-v1").str("v-1").opt_str(Some("Hall")).finish();
/// let b = FingerprintHasher::new("venue-v1").str("v-1").opt_str(None).finish();
/// assert_ne!(a, b);
/// ```
pub struct FingerprintHasher {
    hasher: blake3::Hasher,
}

const TAG_NONE: u8 = 0x00;
const TAG_BYTES: u8 = 0x01;
const TAG_INT: u8 = 0x02;
const TAG_SEQ: u8 = 0x03;
const TAG_BOOL: u8 = 0x04;

impl FingerprintHasher {
    /// Start a hasher with the given domain tag (usually the document type
    /// and a format version, e.g. `"community-v1"`).
    pub fn new(domain: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(domain.as_bytes());
        hasher.update(b":");
        Self { hasher }
    }

    /// Write a raw byte field.
    pub fn bytes(mut self, value: &[u8]) -> Self {
        self.hasher.update(&[TAG_BYTES]);
        self.hasher.update(&(value.len() as u64).to_le_bytes());
        self.hasher.update(value);
        self
    }

    /// Write a string field.
    pub fn str(self, value: &str) -> Self {
        self.bytes(value.as_bytes())
    }

    /// Write an optional string field.
    pub fn opt_str(mut self, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.str(v),
            None => {
                self.hasher.update(&[TAG_NONE]);
                self
            }
        }
    }

    /// Write a signed integer field.
    pub fn int(mut self, value: i64) -> Self {
        self.hasher.update(&[TAG_INT]);
        self.hasher.update(&value.to_le_bytes());
        self
    }

    /// Write an optional signed integer field.
    pub fn opt_int(mut self, value: Option<i64>) -> Self {
        match value {
            Some(v) => self.int(v),
            None => {
                self.hasher.update(&[TAG_NONE]);
                self
            }
        }
    }

    /// Write a boolean field.
    pub fn bool(mut self, value: bool) -> Self {
        self.hasher.update(&[TAG_BOOL, value as u8]);
        self
    }

    /// Write an ordered sequence, hashing each item with `each`.
    pub fn seq<'a, T: 'a, I, F>(mut self, items: I, mut each: F) -> Self
    where
        I: IntoIterator<Item = &'a T>,
        I::IntoIter: ExactSizeIterator,
        F: FnMut(Self, &'a T) -> Self,
    {
        let items = items.into_iter();
        self.hasher.update(&[TAG_SEQ]);
        self.hasher.update(&(items.len() as u64).to_le_bytes());
        let mut this = self;
        for item in items {
            this = each(this, item);
        }
        this
    }

    /// Write an ordered sequence of strings.
    pub fn strs(self, values: &[String]) -> Self {
        self.seq(values, |h, v| h.str(v))
    }

    /// Finish hashing.
    pub fn finish(self) -> Fingerprint {
        Fingerprint(*self.hasher.finalize().as_bytes())
    }
}
