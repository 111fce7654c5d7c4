//! Store configuration.

use serde::{Deserialize, Serialize};

use folio_vfs::Directory;

use crate::error::{StoreError, StoreResult};

/// Name of the optional configuration file at the database root.
pub const CONFIG_FILE_NAME: &str = "folio.toml";

/// How a collection name is derived from a document type name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollectionNaming {
    /// `Community` → `communities`, `Talk` → `talks`.
    #[default]
    LowerPlural,
    /// `Community` → `community`.
    Lower,
}

impl CollectionNaming {
    /// Apply the rule to a type name.
    pub fn apply(self, type_name: &str) -> String {
        let lower = type_name.to_lowercase();
        match self {
            CollectionNaming::Lower => lower,
            CollectionNaming::LowerPlural => match lower.strip_suffix('y') {
                Some(stem) => format!("{stem}ies"),
                None => format!("{lower}s"),
            },
        }
    }
}

/// Options for opening a store.
///
/// ```toml
/// naming = "lower-plural"
/// skip_hidden = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Collection naming rule.
    pub naming: CollectionNaming,
    /// Ignore entries whose name starts with `.` when binding and listing.
    /// Matchers never see them, so a stray dot-file does not reject a
    /// layout. With `false`, every entry must fit the layout.
    pub skip_hidden: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            naming: CollectionNaming::LowerPlural,
            skip_hidden: true,
        }
    }
}

impl StoreOptions {
    /// Parse options from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        toml::from_str(text).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Load `folio.toml` from a database root, or the defaults if the root
    /// has none.
    pub async fn load(root: &Directory) -> StoreResult<Self> {
        let file = root.file(CONFIG_FILE_NAME)?;
        if !file.exists().await? {
            return Ok(Self::default());
        }
        let data = file.read().await?;
        let text = String::from_utf8(data)
            .map_err(|e| StoreError::Config(format!("{CONFIG_FILE_NAME}: {e}")))?;
        Self::from_toml_str(&text)
    }
}

pub(crate) fn is_hidden(skip_hidden: bool, name: &str) -> bool {
    skip_hidden && name.starts_with('.')
}
