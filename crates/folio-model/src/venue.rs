use serde::{Deserialize, Serialize};

use folio_types::{Document, Fingerprint, FingerprintHasher};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Venue {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Seats, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_url: Option<String>,
}

impl Document for Venue {
    fn type_name() -> &'static str {
        "Venue"
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn fingerprint(&self) -> Fingerprint {
        FingerprintHasher::new("venue-v1")
            .str(&self.id)
            .opt_str(self.name.as_deref())
            .opt_int(self.capacity.map(i64::from))
            .opt_str(self.address.as_deref())
            .opt_str(self.map_url.as_deref())
            .finish()
    }
}
