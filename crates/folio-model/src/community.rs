use serde::{Deserialize, Serialize};

use folio_types::{Document, Fingerprint, FingerprintHasher};

/// A developer community, usually bound to one city.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Community {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// IANA time zone name, e.g. `Europe/Moscow`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vk_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_channel_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_chat_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meetup_com_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timepad_url: Option<String>,
}

impl Document for Community {
    fn type_name() -> &'static str {
        "Community"
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn fingerprint(&self) -> Fingerprint {
        FingerprintHasher::new("community-v1")
            .str(&self.id)
            .opt_str(self.name.as_deref())
            .opt_str(self.city.as_deref())
            .opt_str(self.time_zone.as_deref())
            .opt_str(self.vk_url.as_deref())
            .opt_str(self.twitter_url.as_deref())
            .opt_str(self.telegram_channel_url.as_deref())
            .opt_str(self.telegram_chat_url.as_deref())
            .opt_str(self.meetup_com_url.as_deref())
            .opt_str(self.timepad_url.as_deref())
            .finish()
    }
}
