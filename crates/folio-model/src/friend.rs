use serde::{Deserialize, Serialize};

use folio_types::{Document, Fingerprint, FingerprintHasher};

/// A company or organisation supporting meetups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Friend {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Document for Friend {
    fn type_name() -> &'static str {
        "Friend"
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn fingerprint(&self) -> Fingerprint {
        FingerprintHasher::new("friend-v1")
            .str(&self.id)
            .opt_str(self.name.as_deref())
            .opt_str(self.url.as_deref())
            .opt_str(self.description.as_deref())
            .finish()
    }
}
