//! Category labels and their display colors.
//!
//! # Invariants
//! - Names are unique and kept in insertion order.
//! - The set is append-only; only import replaces it as a whole.

use serde::{Deserialize, Serialize};

/// Named color entry of the category palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStyle {
    pub name: String,
    /// CSS-style hex color, e.g. `#3B82F6`.
    pub color: String,
}

impl CategoryStyle {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Ordered, duplicate-free set of category names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySet {
    names: Vec<String>,
}

impl CategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from names, dropping blanks and duplicates.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for name in names {
            set.insert(name.as_ref());
        }
        set
    }

    /// Appends `name` (trimmed). Returns `false` for blank or known names.
    pub fn insert(&mut self, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() || self.contains(trimmed) {
            return false;
        }
        self.names.push(trimmed.to_string());
        true
    }

    /// Returns a new set: `self` followed by unseen names from `other`.
    pub fn union<I, S>(&self, other: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut merged = self.clone();
        for name in other {
            merged.insert(name.as_ref());
        }
        merged
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|known| known == name)
    }

    /// First category, used as the default for new scenes.
    pub fn first(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Color lookup table with a fallback for unknown categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPalette {
    styles: Vec<CategoryStyle>,
    fallback: String,
}

impl CategoryPalette {
    pub fn new(styles: Vec<CategoryStyle>, fallback: impl Into<String>) -> Self {
        Self {
            styles,
            fallback: fallback.into(),
        }
    }

    /// Color for `category`, or the fallback color when unknown.
    pub fn color_for(&self, category: &str) -> &str {
        self.styles
            .iter()
            .find(|style| style.name == category)
            .map(|style| style.color.as_str())
            .unwrap_or(self.fallback.as_str())
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

#[cfg(test)]
mod tests {
    use super::{CategoryPalette, CategorySet, CategoryStyle};

    #[test]
    fn insert_trims_and_rejects_blank_or_duplicate() {
        let mut set = CategorySet::from_names(["Setup", "Action"]);
        assert!(!set.insert("  "));
        assert!(!set.insert(" Setup "));
        assert!(set.insert(" Twist "));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["Setup", "Action", "Twist"]);
    }

    #[test]
    fn union_keeps_existing_order_first() {
        let set = CategorySet::from_names(["Setup", "Action"]);
        let merged = set.union(["Climax", "Setup", "Aftermath"]);
        assert_eq!(
            merged.iter().collect::<Vec<_>>(),
            vec!["Setup", "Action", "Climax", "Aftermath"]
        );
    }

    #[test]
    fn palette_falls_back_for_unknown_category() {
        let palette = CategoryPalette::new(vec![CategoryStyle::new("Setup", "#3B82F6")], "#6B7280");
        assert_eq!(palette.color_for("Setup"), "#3B82F6");
        assert_eq!(palette.color_for("Unknown"), "#6B7280");
    }
}
