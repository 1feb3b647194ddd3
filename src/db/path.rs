// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed collection paths.

use std::fmt;

/// A collection addressed by its chain of parent documents.
///
/// `districts/D1/congregations` has one parent segment `("districts", "D1")`
/// and leaf collection `congregations`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath {
    parents: Vec<(String, String)>,
    collection: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("parent document id in '{collection}' cannot be blank")]
    BlankParentId { collection: String },
}

impl CollectionPath {
    /// A top-level collection.
    pub fn root(collection: &str) -> Self {
        Self {
            parents: Vec::new(),
            collection: collection.to_string(),
        }
    }

    /// Descend into `subcollection` of document `id` in this collection.
    pub fn child(&self, id: &str, subcollection: &str) -> Result<Self, PathError> {
        if id.trim().is_empty() {
            return Err(PathError::BlankParentId {
                collection: self.to_string(),
            });
        }
        let mut parents = self.parents.clone();
        parents.push((self.collection.clone(), id.to_string()));
        Ok(Self {
            parents,
            collection: subcollection.to_string(),
        })
    }

    /// Leaf collection name (the collection-group key).
    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn parents(&self) -> &[(String, String)] {
        &self.parents
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Id of the owning document, if nested.
    pub fn parent_id(&self) -> Option<&str> {
        self.parents.last().map(|(_, id)| id.as_str())
    }

    /// Path of the collection that holds the owning document.
    pub fn parent_collection(&self) -> Option<String> {
        let (last, rest) = self.parents.split_last()?;
        let mut out = String::new();
        for (collection, id) in rest {
            out.push_str(collection);
            out.push('/');
            out.push_str(id);
            out.push('/');
        }
        out.push_str(&last.0);
        Some(out)
    }

    /// Human-readable location for error messages.
    pub fn describe(&self) -> String {
        match (self.parent_id(), self.parent_collection()) {
            (Some(parent), Some(parent_path)) => format!(
                "subcollection '{}' under parent '{}' in '{}'",
                self.collection, parent, parent_path
            ),
            _ => format!("collection '{}'", self.collection),
        }
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (collection, id) in &self.parents {
            write!(f, "{}/{}/", collection, id)?;
        }
        f.write_str(&self.collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_path_rendering() {
        let path = CollectionPath::root("districts")
            .child("D1", "congregations")
            .unwrap()
            .child("C1", "speakers")
            .unwrap();

        assert_eq!(path.to_string(), "districts/D1/congregations/C1/speakers");
        assert_eq!(path.collection(), "speakers");
        assert_eq!(path.parent_id(), Some("C1"));
        assert_eq!(
            path.parent_collection().as_deref(),
            Some("districts/D1/congregations")
        );
        assert_eq!(
            path.describe(),
            "subcollection 'speakers' under parent 'C1' in 'districts/D1/congregations'"
        );
    }

    #[test]
    fn test_root_path() {
        let path = CollectionPath::root("speeches");
        assert!(path.is_root());
        assert_eq!(path.to_string(), "speeches");
        assert_eq!(path.parent_id(), None);
        assert_eq!(path.describe(), "collection 'speeches'");
    }

    #[test]
    fn test_blank_parent_id_rejected() {
        let err = CollectionPath::root("districts")
            .child("  ", "congregations")
            .unwrap_err();
        assert_eq!(
            err,
            PathError::BlankParentId {
                collection: "districts".to_string()
            }
        );
    }
}
