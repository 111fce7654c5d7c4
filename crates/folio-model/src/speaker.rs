use serde::{Deserialize, Serialize};

use folio_types::{Document, Fingerprint, FingerprintHasher};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Speaker {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacts_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub habr_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
}

impl Document for Speaker {
    fn type_name() -> &'static str {
        "Speaker"
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn fingerprint(&self) -> Fingerprint {
        FingerprintHasher::new("speaker-v1")
            .str(&self.id)
            .opt_str(self.name.as_deref())
            .opt_str(self.company_name.as_deref())
            .opt_str(self.company_url.as_deref())
            .opt_str(self.description.as_deref())
            .opt_str(self.blog_url.as_deref())
            .opt_str(self.contacts_url.as_deref())
            .opt_str(self.twitter_url.as_deref())
            .opt_str(self.habr_url.as_deref())
            .opt_str(self.github_url.as_deref())
            .finish()
    }
}
