use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use folio_types::{Document, Fingerprint, FingerprintHasher};

/// One talk slot of a meetup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetupSession {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub talk_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl MeetupSession {
    fn hash_into(&self, hasher: FingerprintHasher) -> FingerprintHasher {
        hasher
            .opt_str(self.talk_id.as_deref())
            .opt_str(self.start_time.map(|t| t.to_rfc3339()).as_deref())
            .opt_str(self.end_time.map(|t| t.to_rfc3339()).as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meetup {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community_id: Option<String>,
    pub friend_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<String>,
    pub sessions: Vec<MeetupSession>,
}

impl Meetup {
    /// Ids of every talk presented, in session order.
    pub fn talk_ids(&self) -> impl Iterator<Item = &str> {
        self.sessions.iter().filter_map(|s| s.talk_id.as_deref())
    }
}

impl Document for Meetup {
    fn type_name() -> &'static str {
        "Meetup"
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn fingerprint(&self) -> Fingerprint {
        FingerprintHasher::new("meetup-v1")
            .str(&self.id)
            .opt_str(self.name.as_deref())
            .opt_str(self.community_id.as_deref())
            .strs(&self.friend_ids)
            .opt_str(self.venue_id.as_deref())
            .seq(&self.sessions, |h, session| session.hash_into(h))
            .finish()
    }
}
