//! Root detection and name rules for the supported platforms.

/// Path naming rules of one platform family.
///
/// The strategy is never chosen from the host OS: it is detected from the
/// root prefix of the path being parsed, so Windows-style paths can be
/// handled on Unix and vice versa.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NamingStrategy {
    /// Root is `/`.
    Unix,
    /// Root is a drive letter, `C:` normalised to `C:\`.
    Windows,
}

const UNIX_INVALID: &[char] = &['\0', '/'];
const WINDOWS_INVALID: &[char] = &['"', '<', '>', '|', '\0', ':', '*', '?', '\\', '/'];

/// Both separators are accepted when splitting, whatever the strategy.
const SEPARATORS: &[char] = &['/', '\\'];

impl NamingStrategy {
    /// Every strategy, in detection order.
    pub const ALL: [NamingStrategy; 2] = [NamingStrategy::Unix, NamingStrategy::Windows];

    /// Separator used when rendering a full name.
    pub fn separator(self) -> char {
        match self {
            NamingStrategy::Unix => '/',
            NamingStrategy::Windows => '\\',
        }
    }

    /// Normalised root of `path` under this strategy, if it has one.
    pub fn root_of(self, path: &str) -> Option<String> {
        match self {
            NamingStrategy::Unix => path.starts_with('/').then(|| "/".to_string()),
            NamingStrategy::Windows => {
                let bytes = path.as_bytes();
                let drive = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
                let terminated = bytes.len() == 2 || matches!(bytes.get(2), Some(b'/' | b'\\'));
                (drive && terminated).then(|| format!("{}:\\", bytes[0] as char))
            }
        }
    }

    /// Detect the strategy and normalised root of `path`.
    pub fn detect(path: &str) -> Option<(NamingStrategy, String)> {
        Self::ALL
            .iter()
            .find_map(|strategy| strategy.root_of(path).map(|root| (*strategy, root)))
    }

    /// Why `name` cannot be a path part under this strategy, or `None` if
    /// it can.
    pub fn name_error(self, name: &str) -> Option<String> {
        if name.trim().is_empty() {
            return Some("name is blank".to_string());
        }
        if name == "." || name == ".." {
            return Some("relative segments are not allowed".to_string());
        }
        let invalid = match self {
            NamingStrategy::Unix => UNIX_INVALID,
            NamingStrategy::Windows => WINDOWS_INVALID,
        };
        let bad = name.chars().find(|c| {
            invalid.contains(c) || (self == NamingStrategy::Windows && c.is_ascii_control())
        });
        bad.map(|c| format!("contains invalid character {c:?}"))
    }

    /// Returns `true` if `name` is a valid path part.
    pub fn is_valid_name(self, name: &str) -> bool {
        self.name_error(name).is_none()
    }

    /// Split the part of a path after its root into non-empty segments.
    pub fn split(rest: &str) -> impl Iterator<Item = &str> {
        rest.split(SEPARATORS).filter(|s| !s.is_empty())
    }

    /// Render a root and name parts as a full path string.
    pub fn combine<'a>(self, root: &str, names: impl IntoIterator<Item = &'a str>) -> String {
        let mut out = root.to_string();
        for name in names {
            if !out.ends_with(self.separator()) {
                out.push(self.separator());
            }
            out.push_str(name);
        }
        out
    }
}
