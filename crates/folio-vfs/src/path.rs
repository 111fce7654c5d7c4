//! Platform-independent absolute paths.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{VfsError, VfsResult};
use crate::naming::NamingStrategy;

/// An absolute path: a normalised root plus validated name parts.
///
/// Equality, ordering and hashing use the rendered full name, so
/// `/a//b/` and `/a/b` are the same path.
///
/// ```
/// use folio_vfs::AbsolutePath;
///
/// let path = AbsolutePath::parse("/db/talks/t-1.json").unwrap();
/// assert_eq!(path.name(), "t-1.json");
/// assert_eq!(path.parent().unwrap().full_name(), "/db/talks");
/// ```
#[derive(Clone)]
pub struct AbsolutePath {
    strategy: NamingStrategy,
    root: String,
    names: Vec<String>,
    full_name: String,
}

impl AbsolutePath {
    /// Parse an absolute path string.
    pub fn parse(path: &str) -> VfsResult<Self> {
        let invalid = || VfsError::InvalidPath(path.to_string());
        if path.trim().is_empty() {
            return Err(invalid());
        }
        let (strategy, root) = NamingStrategy::detect(path).ok_or_else(invalid)?;

        // The normalised Windows root is one byte longer than a bare `C:`.
        let rest = path.get(root.len()..).unwrap_or("");
        let mut names = Vec::new();
        for name in NamingStrategy::split(rest) {
            if !strategy.is_valid_name(name) {
                return Err(invalid());
            }
            names.push(name.to_string());
        }
        Ok(Self::from_parts(strategy, root, names))
    }

    fn from_parts(strategy: NamingStrategy, root: String, names: Vec<String>) -> Self {
        let full_name = strategy.combine(&root, names.iter().map(String::as_str));
        Self {
            strategy,
            root,
            names,
            full_name,
        }
    }

    /// The strategy detected when parsing.
    pub fn strategy(&self) -> NamingStrategy {
        self.strategy
    }

    /// The last part: a name, or the root itself.
    pub fn name(&self) -> &str {
        self.names.last().map(String::as_str).unwrap_or(&self.root)
    }

    /// The rendered path.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns `true` if this path is a root.
    pub fn is_root(&self) -> bool {
        self.names.is_empty()
    }

    /// Number of parts, root included.
    pub fn depth(&self) -> usize {
        self.names.len() + 1
    }

    /// Name parts below the root.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Path of a direct child. The name must be a single valid part.
    pub fn child(&self, name: &str) -> VfsResult<Self> {
        if let Some(reason) = self.strategy.name_error(name) {
            return Err(VfsError::InvalidName {
                name: name.to_string(),
                reason,
            });
        }
        if name.contains(['/', '\\']) {
            return Err(VfsError::InvalidName {
                name: name.to_string(),
                reason: "contains a path separator".to_string(),
            });
        }
        let mut names = self.names.clone();
        names.push(name.to_string());
        Ok(Self::from_parts(self.strategy, self.root.clone(), names))
    }

    /// The parent path, or `None` for a root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        self.take(self.depth() - 1)
    }

    /// The first `count` parts of this path, root included.
    pub fn take(&self, count: usize) -> Option<Self> {
        if count == 0 || count > self.depth() {
            return None;
        }
        let names = self.names[..count - 1].to_vec();
        Some(Self::from_parts(self.strategy, self.root.clone(), names))
    }

    /// Returns `true` if `other` lies strictly below this path.
    pub fn is_ancestor_of(&self, other: &AbsolutePath) -> bool {
        self.root == other.root
            && other.names.len() > self.names.len()
            && other.names.starts_with(&self.names)
    }
}

impl PartialEq for AbsolutePath {
    fn eq(&self, other: &Self) -> bool {
        self.full_name == other.full_name
    }
}

impl Eq for AbsolutePath {}

impl Hash for AbsolutePath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full_name.hash(state);
    }
}

impl PartialOrd for AbsolutePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AbsolutePath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.full_name.cmp(&other.full_name)
    }
}

impl fmt::Debug for AbsolutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AbsolutePath({})", self.full_name)
    }
}

impl fmt::Display for AbsolutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

impl std::str::FromStr for AbsolutePath {
    type Err = VfsError;

    fn from_str(s: &str) -> VfsResult<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalises_separators() {
        let a = AbsolutePath::parse("/db//talks/").unwrap();
        let b = AbsolutePath::parse("/db\\talks").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.full_name(), "/db/talks");
        assert_eq!(a.depth(), 3);
    }

    #[test]
    fn parse_windows() {
        let path = AbsolutePath::parse("D:/data/db").unwrap();
        assert_eq!(path.strategy(), NamingStrategy::Windows);
        assert_eq!(path.full_name(), "D:\\data\\db");

        let root = AbsolutePath::parse("D:").unwrap();
        assert!(root.is_root());
        assert_eq!(root.full_name(), "D:\\");
    }

    #[test]
    fn parse_rejects_relative_and_blank() {
        assert!(matches!(AbsolutePath::parse("db"), Err(VfsError::InvalidPath(_))));
        assert!(matches!(AbsolutePath::parse("  "), Err(VfsError::InvalidPath(_))));
        assert!(AbsolutePath::parse("C:\\a|b").is_err());
        assert!(AbsolutePath::parse("/a/../b").is_err());
    }

    #[test]
    fn root_name_is_root() {
        let root = AbsolutePath::parse("/").unwrap();
        assert_eq!(root.name(), "/");
        assert!(root.parent().is_none());
    }

    #[test]
    fn child_validates_name() {
        let root = AbsolutePath::parse("/db").unwrap();
        assert_eq!(root.child("x.json").unwrap().full_name(), "/db/x.json");
        assert!(matches!(root.child(""), Err(VfsError::InvalidName { .. })));
        assert!(root.child("a/b").is_err());
        assert!(root.child("a\\b").is_err());
        assert!(root.child("..").is_err());
    }

    #[test]
    fn take_and_parent() {
        let path = AbsolutePath::parse("/a/b/c").unwrap();
        assert_eq!(path.take(1).unwrap().full_name(), "/");
        assert_eq!(path.take(2).unwrap().full_name(), "/a");
        assert_eq!(path.take(4).unwrap(), path);
        assert!(path.take(0).is_none());
        assert!(path.take(5).is_none());
        assert_eq!(path.parent().unwrap().full_name(), "/a/b");
    }

    #[test]
    fn ancestry_is_by_parts() {
        let ab = AbsolutePath::parse("/a/b").unwrap();
        assert!(ab.is_ancestor_of(&AbsolutePath::parse("/a/b/c").unwrap()));
        assert!(!ab.is_ancestor_of(&AbsolutePath::parse("/a/bc").unwrap()));
        assert!(!ab.is_ancestor_of(&ab));
        assert!(!ab.is_ancestor_of(&AbsolutePath::parse("C:\\a\\b\\c").unwrap()));
    }
}
