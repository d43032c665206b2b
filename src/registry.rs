//! # Source Registry
//! Distinct authors of the selected window plus the user's exclusion set.
//!
//! The exclusion set is intersected with the author list on every window
//! switch so names absent from the new window can never stay silently
//! hidden. Excluding every author means display-nothing, not show-all.

use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct SourceRegistry {
    authors: Vec<String>,
    excluded: HashSet<String>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the author list of the newly selected window and drop
    /// exclusions that no longer refer to a present author.
    pub fn set_authors(&mut self, authors: Vec<String>) {
        self.excluded.retain(|a| authors.contains(a));
        self.authors = authors;
    }

    /// Flip exclusion membership for `author`. Returns `true` when the
    /// author is excluded after the call. Names not present in the current
    /// window are ignored, keeping `excluded` a subset of `authors`.
    pub fn toggle(&mut self, author: &str) -> bool {
        if self.excluded.remove(author) {
            false
        } else if self.authors.iter().any(|a| a == author) {
            self.excluded.insert(author.to_string());
            true
        } else {
            false
        }
    }

    pub fn is_excluded(&self, author: &str) -> bool {
        self.excluded.contains(author)
    }

    pub fn excluded(&self) -> &HashSet<String> {
        &self.excluded
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    /// Total number of authors in the current window.
    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    /// Number of authors currently visible.
    pub fn visible_count(&self) -> usize {
        self.authors.len() - self.excluded.len()
    }

    /// True when the user excluded every author of the window.
    pub fn all_excluded(&self) -> bool {
        !self.authors.is_empty() && self.excluded.len() == self.authors.len()
    }

    /// Label text for the sources filter button ("how many of N remain").
    pub fn summary(&self) -> String {
        format!("Sources ({}/{})", self.visible_count(), self.len())
    }
}
