use serde::{Deserialize, Serialize};

use folio_types::{Document, Fingerprint, FingerprintHasher};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Talk {
    pub id: String,
    pub speaker_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Related talks, in display order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub see_also_talk_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slides_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl Document for Talk {
    fn type_name() -> &'static str {
        "Talk"
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn fingerprint(&self) -> Fingerprint {
        FingerprintHasher::new("talk-v1")
            .str(&self.id)
            .strs(&self.speaker_ids)
            .opt_str(self.title.as_deref())
            .opt_str(self.description.as_deref())
            .strs(&self.see_also_talk_ids)
            .opt_str(self.code_url.as_deref())
            .opt_str(self.slides_url.as_deref())
            .opt_str(self.video_url.as_deref())
            .finish()
    }
}
