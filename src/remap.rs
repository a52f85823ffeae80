//! Source path remapping.
//!
//! Applies an old-path → new-path mapping to every document reachable from the line tables
//! of a [`DebugInfo`]. Paths are matched by exact string equality; a path without an entry
//! keeps its value. Only document paths change: GUIDs, sequence points, scopes, variables and
//! constants are never visited.
//!
//! Each referenced document is rewritten at most once per call, however many line groups
//! point at it. Applying the same mapping again therefore changes nothing further as long as
//! no new path is itself a key of the mapping.
//!
//! # Examples
//!
//! ```rust
//! use symremap::remap::{remap_documents, PathMap};
//! use symremap::symbols::{DebugInfo, DocumentLines, SourceDocument, SymFunction};
//! use symremap::token::Token;
//!
//! let mut info = DebugInfo::new();
//! let doc = info.add_document(SourceDocument::csharp("/src/a.cs"));
//! let mut function = SymFunction::new(Token(0x06000001), 16);
//! function.lines.push(DocumentLines::new(doc, Vec::new()));
//! info.functions.push(function);
//!
//! let map: PathMap = [("/src/a.cs", "/src/b.cs")].into_iter().collect();
//! assert_eq!(remap_documents(&mut info, &map), 1);
//! assert_eq!(info.documents[0].path, "/src/b.cs");
//! ```

use std::collections::HashMap;

use crate::symbols::DebugInfo;

/// A total mapping of source paths: entries rename, everything else maps to itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMap {
    entries: HashMap<String, String>,
}

impl PathMap {
    /// Create an empty (identity) mapping.
    #[must_use]
    pub fn new() -> Self {
        PathMap::default()
    }

    /// Add or replace the entry for `from`.
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.entries.insert(from.into(), to.into());
    }

    /// The explicit target of `path`, if it has an entry.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    /// The path `path` maps to; the path itself when it has no entry.
    #[must_use]
    pub fn resolve<'a>(&'a self, path: &'a str) -> &'a str {
        self.get(path).unwrap_or(path)
    }

    /// Number of explicit entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the mapping is the identity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if applying the mapping twice can differ from applying it once, i.e. some
    /// target is also a key mapping elsewhere.
    #[must_use]
    pub fn is_chained(&self) -> bool {
        self.entries
            .iter()
            .any(|(from, to)| from != to && self.entries.contains_key(to.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        PathMap {
            entries: iter
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, String>> for PathMap {
    fn from(entries: HashMap<String, String>) -> Self {
        PathMap { entries }
    }
}

/// Rewrite the path of every document referenced by a line group of `info` through `map`.
///
/// Returns the number of documents whose path changed. Documents no line group refers to,
/// and ids outside the arena, are left alone.
pub fn remap_documents(info: &mut DebugInfo, map: &PathMap) -> usize {
    if map.is_empty() {
        return 0;
    }

    if map.is_chained() {
        log::warn!("Path mapping contains chained entries; remapping is not idempotent");
    }

    let mut changed = 0;
    for id in info.referenced_documents() {
        let Some(document) = info.document_mut(id) else {
            continue;
        };

        if let Some(target) = map.get(&document.path) {
            if target != document.path {
                log::debug!("Remapping document {id}: {} -> {target}", document.path);
                document.path = target.to_string();
                changed += 1;
            }
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::factories::{answer_function, sample_info};
    use crate::symbols::{DocumentId, DocumentLines, SourceDocument, LANGUAGE_BASIC};

    #[test]
    fn test_resolve_is_total() {
        let map: PathMap = [("/src/a.cs", "/src/b.cs")].into_iter().collect();
        assert_eq!(map.resolve("/src/a.cs"), "/src/b.cs");
        assert_eq!(map.resolve("/src/c.cs"), "/src/c.cs");
        assert_eq!(map.get("/src/c.cs"), None);
        assert_eq!(map.len(), 1);
        assert!(PathMap::new().is_empty());
    }

    #[test]
    fn test_exact_match_only() {
        let map: PathMap = [("/src/a.cs", "/src/b.cs")].into_iter().collect();
        assert_eq!(map.resolve("/SRC/A.CS"), "/SRC/A.CS");
        assert_eq!(map.resolve("/src/./a.cs"), "/src/./a.cs");
    }

    #[test]
    fn test_empty_map_is_identity() {
        let mut info = sample_info();
        let before = info.clone();
        assert_eq!(remap_documents(&mut info, &PathMap::new()), 0);
        assert_eq!(info, before);
    }

    #[test]
    fn test_selective_remap() {
        let mut info = sample_info();
        let before = info.clone();
        let map: PathMap = [("/src/a.cs", "/src/b.cs")].into_iter().collect();

        assert_eq!(remap_documents(&mut info, &map), 1);
        for (old, new) in before.documents.iter().zip(&info.documents) {
            if old.path == "/src/a.cs" {
                assert_eq!(new.path, "/src/b.cs");
            } else {
                assert_eq!(new.path, old.path);
            }
            assert!(old.same_kind(new));
        }
        assert_eq!(info.functions, before.functions);
        assert_eq!(info.entry_point, before.entry_point);
    }

    #[test]
    fn test_idempotent() {
        let map: PathMap = [("/src/a.cs", "/src/b.cs"), ("/src/util.cs", "/lib/util.cs")]
            .into_iter()
            .collect();

        let mut once = sample_info();
        remap_documents(&mut once, &map);
        let mut twice = once.clone();
        assert_eq!(remap_documents(&mut twice, &map), 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_shared_document_renamed_once() {
        let mut info = DebugInfo::new();
        let doc = info.add_document(SourceDocument::csharp("a"));
        for token in [0x06000001, 0x06000002] {
            let mut function = answer_function(token);
            function.lines = vec![
                DocumentLines::new(doc, Vec::new()),
                DocumentLines::new(doc, Vec::new()),
            ];
            info.functions.push(function);
        }

        let map: PathMap = [("a", "b"), ("b", "c")].into_iter().collect();
        assert!(map.is_chained());
        assert_eq!(remap_documents(&mut info, &map), 1);
        assert_eq!(info.documents[0].path, "b");
    }

    #[test]
    fn test_unreferenced_and_dangling_documents() {
        let mut info = DebugInfo::new();
        let mut orphan = SourceDocument::csharp("/src/a.cs");
        orphan.language = LANGUAGE_BASIC;
        info.add_document(orphan);
        let mut function = answer_function(0x06000001);
        function.lines = vec![DocumentLines::new(DocumentId(5), Vec::new())];
        info.functions.push(function);

        let map: PathMap = [("/src/a.cs", "/src/b.cs")].into_iter().collect();
        assert_eq!(remap_documents(&mut info, &map), 0);
        assert_eq!(info.documents[0].path, "/src/a.cs");
        assert_eq!(info.documents[0].language, LANGUAGE_BASIC);
    }
}
