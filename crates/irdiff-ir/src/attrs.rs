//! Attribute lists for functions and call sites.

use std::collections::BTreeSet;

/// A behavioral annotation attached to a function, parameter or return slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attr {
    AlwaysInline,
    InlineHint,
    NoInline,
    NoUnwind,
    NoReturn,
    ReadOnly,
    Cold,
}

impl Attr {
    /// Check if this attribute only records an inlining decision.
    pub const fn is_inline_hint(self) -> bool {
        matches!(self, Self::AlwaysInline | Self::InlineHint | Self::NoInline)
    }
}

/// Per-index attribute sets attached to a function or call.
///
/// Indices follow the usual convention: 0 is the return slot, 1..=n are
/// parameters, and the last index is the function itself. The list is
/// immutable in style: removal produces a new list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeList {
    entries: Vec<(u32, BTreeSet<Attr>)>,
}

impl AttributeList {
    /// Create an empty attribute list.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add an attribute at the given index.
    pub fn add(&mut self, index: u32, attr: Attr) {
        match self.entries.binary_search_by_key(&index, |e| e.0) {
            Ok(pos) => {
                self.entries[pos].1.insert(attr);
            }
            Err(pos) => {
                let mut set = BTreeSet::new();
                set.insert(attr);
                self.entries.insert(pos, (index, set));
            }
        }
    }

    /// Return a new list with the attribute removed at the given index.
    #[must_use]
    pub fn without(&self, index: u32, attr: Attr) -> Self {
        let mut result = self.clone();
        if let Ok(pos) = result.entries.binary_search_by_key(&index, |e| e.0) {
            result.entries[pos].1.remove(&attr);
            if result.entries[pos].1.is_empty() {
                result.entries.remove(pos);
            }
        }
        result
    }

    /// Check whether any attributes are present at the given index.
    pub fn has_attributes(&self, index: u32) -> bool {
        self.entries
            .binary_search_by_key(&index, |e| e.0)
            .is_ok()
    }

    /// Indices that carry at least one attribute, in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().map(|e| e.0)
    }

    /// Ordered (index, attribute set) entries.
    pub fn entries(&self) -> &[(u32, BTreeSet<Attr>)] {
        &self.entries
    }

    /// Check if no index carries any attribute.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_query() {
        let mut attrs = AttributeList::new();
        attrs.add(0, Attr::NoUnwind);
        attrs.add(2, Attr::AlwaysInline);
        assert!(attrs.has_attributes(0));
        assert!(attrs.has_attributes(2));
        assert!(!attrs.has_attributes(1));
        assert_eq!(attrs.indices().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_without_drops_empty_entries() {
        let mut attrs = AttributeList::new();
        attrs.add(1, Attr::NoInline);
        let cleaned = attrs.without(1, Attr::NoInline);
        assert!(cleaned.is_empty());
        // Original list is untouched.
        assert!(attrs.has_attributes(1));
    }

    #[test]
    fn test_without_missing_attr_is_noop() {
        let mut attrs = AttributeList::new();
        attrs.add(1, Attr::Cold);
        let cleaned = attrs.without(1, Attr::NoInline);
        assert_eq!(cleaned, attrs);
    }
}
