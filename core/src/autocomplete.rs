//! Namespace-aware autocomplete over delimiter-separated options.
//!
//! Options such as `skill.forge` are completed one namespace segment at a
//! time rather than character by character. [`SegmentTrie`] cuts every option
//! into segments (a segment ends right after each delimiter match, so the
//! delimiter stays attached to the segment it closes), appends an empty
//! sentinel segment marking "option complete", and merges the segment paths
//! into a trie.
//!
//! [`SegmentTrie::resolve`] walks the trie case-insensitively. At each node a
//! child matches when its segment is a prefix of the unconsumed input or the
//! unconsumed input is a prefix of the segment, which lets the operator type
//! less than a whole segment:
//!
//! - no matching child: stop and return the completion accumulated so far;
//! - one matching child: append its segment and descend;
//! - several matching children: return every candidate.
//!
//! ```
//! use field_prompt_core::{Completion, SegmentTrie};
//! use regex::Regex;
//!
//! let options = ["s.forge", "s.heart", "skill.forge"];
//! let trie = SegmentTrie::build(&options, &Regex::new(r"\.").unwrap());
//!
//! assert_eq!(
//!     trie.resolve("s"),
//!     Completion::Ambiguous(vec!["s.".to_string(), "skill.".to_string()])
//! );
//! assert_eq!(trie.resolve("s.f"), Completion::Complete("s.forge".to_string()));
//! ```
//!
//! Tries are cheap to build for the option lists a single field carries and
//! are rebuilt on every call.

use regex::Regex;

use crate::error::SchemaError;

/// Outcome of resolving raw input against a list of options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// A single best-effort completion.
    Complete(String),
    /// Several candidates remain; each is a full menu entry.
    Ambiguous(Vec<String>),
}

#[derive(Debug, Default)]
struct TrieNode {
    children: Vec<(String, TrieNode)>,
}

impl TrieNode {
    fn child_mut(&mut self, segment: &str) -> &mut TrieNode {
        let index = match self.children.iter().position(|(s, _)| s == segment) {
            Some(index) => index,
            None => {
                self.children
                    .push((segment.to_string(), TrieNode::default()));
                self.children.len() - 1
            }
        };
        &mut self.children[index].1
    }
}

/// Trie of option segments.
#[derive(Debug, Default)]
pub struct SegmentTrie {
    root: TrieNode,
}

impl SegmentTrie {
    /// Builds a trie from `options`, cutting segments after each match of
    /// `delimiter`.
    pub fn build<S: AsRef<str>>(options: &[S], delimiter: &Regex) -> Self {
        let mut root = TrieNode::default();
        for option in options {
            let mut node = &mut root;
            for segment in split_segments(option.as_ref(), delimiter) {
                node = node.child_mut(segment);
            }
        }
        Self { root }
    }

    /// Resolves raw input to a completion or a list of candidates.
    ///
    /// When nothing matches at all the raw input is returned unchanged.
    pub fn resolve(&self, raw: &str) -> Completion {
        let input: Vec<char> = raw.to_lowercase().chars().collect();
        let mut cursor = 0;
        let mut output = String::new();
        let mut node = &self.root;

        loop {
            let remaining = input.get(cursor..).unwrap_or(&[]);
            let matches: Vec<(&str, usize, &TrieNode)> = node
                .children
                .iter()
                .filter_map(|(segment, child)| {
                    let folded: Vec<char> = segment.to_lowercase().chars().collect();
                    (folded.starts_with(remaining) || remaining.starts_with(&folded))
                        .then_some((segment.as_str(), folded.len(), child))
                })
                .collect();

            match matches.as_slice() {
                [] => break,
                [(segment, width, child)] => {
                    output.push_str(segment);
                    cursor += *width;
                    node = *child;
                }
                candidates => {
                    return Completion::Ambiguous(
                        candidates
                            .iter()
                            .map(|(segment, _, _)| format!("{output}{segment}"))
                            .collect(),
                    );
                }
            }
        }

        if output.is_empty() {
            Completion::Complete(raw.to_string())
        } else {
            Completion::Complete(output)
        }
    }
}

/// Cuts an option into its segments plus the terminal empty sentinel.
fn split_segments<'a>(option: &'a str, delimiter: &Regex) -> Vec<&'a str> {
    let mut segments = Vec::new();
    let mut start = 0;
    for found in delimiter.find_iter(option) {
        if found.end() > start {
            segments.push(&option[start..found.end()]);
            start = found.end();
        }
    }
    if start < option.len() {
        segments.push(&option[start..]);
    }
    segments.push("");
    segments
}

/// Resolves raw input against options without namespaces.
///
/// A case-insensitive exact match wins; otherwise every option starting with
/// the input is a candidate. With no candidate the raw input is returned.
///
/// # Examples
///
/// ```
/// use field_prompt_core::{Completion, complete_plain};
///
/// let options = ["bread", "apple", "candy", "corn"];
/// assert_eq!(complete_plain(&options, "AP"), Completion::Complete("apple".into()));
/// assert_eq!(
///     complete_plain(&options, "c"),
///     Completion::Ambiguous(vec!["candy".into(), "corn".into()])
/// );
/// assert_eq!(complete_plain(&options, "milk"), Completion::Complete("milk".into()));
/// ```
pub fn complete_plain<S: AsRef<str>>(options: &[S], raw: &str) -> Completion {
    let needle = raw.to_lowercase();
    if let Some(exact) = options
        .iter()
        .find(|option| option.as_ref().to_lowercase() == needle)
    {
        return Completion::Complete(exact.as_ref().to_string());
    }

    let prefixed: Vec<String> = options
        .iter()
        .map(AsRef::as_ref)
        .filter(|option| option.to_lowercase().starts_with(&needle))
        .map(String::from)
        .collect();
    match prefixed.as_slice() {
        [] => Completion::Complete(raw.to_string()),
        [only] => Completion::Complete(only.clone()),
        _ => Completion::Ambiguous(prefixed),
    }
}

/// Completion source for one field: its options and, for namespaced
/// options, the delimiter pattern.
#[derive(Debug, Clone)]
pub struct Autocomplete {
    options: Vec<String>,
    delimiter: Option<Regex>,
}

impl Autocomplete {
    /// Plain prefix completion over `options`.
    pub fn plain<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            delimiter: None,
        }
    }

    /// Segment completion over `options`.
    pub fn segmented<I, S>(options: I, delimiter: Regex) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            delimiter: Some(delimiter),
        }
    }

    /// Builds the completion source declared by a string or string-set
    /// field.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidDelimiter`] if `delimiter` is not a
    /// valid regular expression.
    pub fn for_options(options: &[String], delimiter: Option<&str>) -> Result<Self, SchemaError> {
        match delimiter {
            None => Ok(Self::plain(options.iter().cloned())),
            Some(pattern) => {
                let regex = Regex::new(pattern).map_err(|source| SchemaError::InvalidDelimiter {
                    pattern: pattern.to_string(),
                    source,
                })?;
                Ok(Self::segmented(options.iter().cloned(), regex))
            }
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Returns the option equal to `value` ignoring case, in its declared
    /// spelling.
    pub fn member(&self, value: &str) -> Option<&str> {
        let needle = value.to_lowercase();
        self.options
            .iter()
            .find(|option| option.to_lowercase() == needle)
            .map(String::as_str)
    }

    /// Resolves raw input with segment or plain matching.
    pub fn complete(&self, raw: &str) -> Completion {
        match &self.delimiter {
            Some(delimiter) => SegmentTrie::build(&self.options, delimiter).resolve(raw),
            None => complete_plain(&self.options, raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot() -> Regex {
        Regex::new(r"\.").unwrap()
    }

    #[test]
    fn test_split_segments_keeps_delimiter_on_closing_segment() {
        assert_eq!(split_segments("skill.forge", &dot()), vec!["skill.", "forge", ""]);
        assert_eq!(split_segments("a.b.", &dot()), vec!["a.", "b.", ""]);
        assert_eq!(split_segments("plain", &dot()), vec!["plain", ""]);
    }

    #[test]
    fn test_resolve_namespace_ambiguity() {
        let trie = SegmentTrie::build(&["s.forge", "s.heart", "skill.forge"], &dot());
        assert_eq!(
            trie.resolve("s"),
            Completion::Ambiguous(vec!["s.".to_string(), "skill.".to_string()])
        );
        assert_eq!(
            trie.resolve("s."),
            Completion::Ambiguous(vec!["s.forge".to_string(), "s.heart".to_string()])
        );
    }

    #[test]
    fn test_resolve_completes_partial_segments() {
        let trie = SegmentTrie::build(&["s.forge", "s.heart", "skill.forge"], &dot());
        assert_eq!(trie.resolve("s.f"), Completion::Complete("s.forge".to_string()));
        assert_eq!(trie.resolve("sk"), Completion::Complete("skill.forge".to_string()));
        assert_eq!(trie.resolve("S.H"), Completion::Complete("s.heart".to_string()));
    }

    #[test]
    fn test_resolve_typing_past_segment_boundaries() {
        let trie = SegmentTrie::build(&["lore.edge", "lore.moth", "heart"], &dot());
        assert_eq!(
            trie.resolve("lore.moth"),
            Completion::Complete("lore.moth".to_string())
        );
    }

    #[test]
    fn test_resolve_returns_raw_input_when_nothing_matches() {
        let trie = SegmentTrie::build(&["s.forge"], &dot());
        assert_eq!(trie.resolve("xyz"), Completion::Complete("xyz".to_string()));
    }

    #[test]
    fn test_resolve_stops_at_last_matching_segment() {
        let trie = SegmentTrie::build(&["s.forge", "s.heart"], &dot());
        assert_eq!(trie.resolve("s.zz"), Completion::Complete("s.".to_string()));
    }

    #[test]
    fn test_resolve_empty_input_lists_top_level() {
        let trie = SegmentTrie::build(&["a.x", "b.y"], &dot());
        assert_eq!(
            trie.resolve(""),
            Completion::Ambiguous(vec!["a.".to_string(), "b.".to_string()])
        );
    }

    #[test]
    fn test_autocomplete_member_uses_declared_spelling() {
        let autocomplete = Autocomplete::plain(["Forge", "Heart"]);
        assert_eq!(autocomplete.member("forge"), Some("Forge"));
        assert_eq!(autocomplete.member("edge"), None);
    }

    #[test]
    fn test_for_options_rejects_bad_delimiter() {
        let err = Autocomplete::for_options(&["a".to_string()], Some("(")).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDelimiter { .. }));
    }
}
