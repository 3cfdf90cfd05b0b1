//! Aspect-name registry capability.
//!
//! Aspects are named, integer-valued properties defined by the game data,
//! not by this crate. Validation and construction only need to ask whether a
//! name exists and to enumerate names for completion, so the registry is
//! passed in explicitly as an [`AspectRegistry`].

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::autocomplete::Autocomplete;

/// Namespace separator of aspect names (`skill.forge`).
pub const ASPECT_DELIMITER: &str = r"\.";

static ASPECT_DELIMITER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ASPECT_DELIMITER).expect("static regex must compile"));

/// Read-only source of known aspect names.
pub trait AspectRegistry {
    /// Returns `true` if `name` is a known aspect.
    fn exists(&self, name: &str) -> bool;

    /// Returns every known aspect name.
    fn names(&self) -> Vec<String>;
}

/// Builds the namespace-aware completion source over every known aspect.
pub fn aspect_autocomplete(registry: &dyn AspectRegistry) -> Autocomplete {
    Autocomplete::segmented(registry.names(), ASPECT_DELIMITER_RE.clone())
}

/// Sorted in-memory set of aspect names.
///
/// # Examples
///
/// ```
/// use field_prompt_core::{AspectRegistry, AspectSet};
///
/// let aspects: AspectSet = ["forge", "heart", "lore.edge"].into_iter().collect();
/// assert!(aspects.exists("lore.edge"));
/// assert!(!aspects.exists("lore"));
/// assert_eq!(aspects.names(), vec!["forge", "heart", "lore.edge"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AspectSet {
    names: BTreeSet<String>,
}

impl AspectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a name, returning `false` if it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for AspectSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for AspectSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.names.extend(iter.into_iter().map(Into::into));
    }
}

impl AspectRegistry for AspectSet {
    fn exists(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    fn names(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::autocomplete::Completion;

    use super::*;

    #[test]
    fn test_aspect_autocomplete_is_namespace_aware() {
        let aspects: AspectSet = ["lore.edge", "lore.moth", "forge"].into_iter().collect();
        let autocomplete = aspect_autocomplete(&aspects);
        assert_eq!(
            autocomplete.complete("lo"),
            Completion::Ambiguous(vec!["lore.edge".to_string(), "lore.moth".to_string()])
        );
        assert_eq!(
            autocomplete.complete("lore.m"),
            Completion::Complete("lore.moth".to_string())
        );
    }

    #[test]
    fn test_aspect_set_deserializes_from_list() {
        let aspects: AspectSet = serde_json::from_str(r#"["heart", "forge", "heart"]"#).unwrap();
        assert_eq!(aspects.len(), 2);
        assert!(aspects.exists("forge"));
    }
}
