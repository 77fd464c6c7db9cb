//! Segment-by-segment path matching against a translation tree.
//!
//! Each segment is looked up under the segments that were already translated
//! before it, so a nested key such as `products.latest` only applies when
//! `latest` follows `products` in the path.

use super::tree::TranslationTree;

/// Rewrites paths segment by segment against one translation tree.
///
/// Works with forward trees (canonical -> localized) and reverse trees
/// (localized -> canonical) alike.
#[derive(Debug, Clone, Copy)]
pub struct SegmentMatcher<'a> {
    tree: &'a TranslationTree,
}

impl<'a> SegmentMatcher<'a> {
    pub fn new(tree: &'a TranslationTree) -> Self {
        Self { tree }
    }

    /// Match a single segment under the given context.
    ///
    /// Descends through `prefix` and then `segment`. Returns the reached
    /// node's own name, or `segment` unchanged when a key is missing or the
    /// node has no own name.
    pub fn match_segment<'s>(&self, prefix: &[&str], segment: &'s str) -> MatchResult<'a, 's> {
        let mut node = self.tree;
        for key in prefix.iter().copied().chain(std::iter::once(segment)) {
            match node.child(key) {
                Some(child) => node = child,
                None => return MatchResult::Passthrough(segment),
            }
        }

        match node.own_name() {
            Some(name) => MatchResult::Translated(name),
            None => MatchResult::Passthrough(segment),
        }
    }

    /// Rewrite every segment of `path`.
    ///
    /// A segment whose match differs from itself becomes context for the
    /// segments after it; an unchanged segment does not. A path without
    /// segments (`/` or empty) is returned as-is.
    pub fn rewrite(&self, path: &str) -> String {
        let mut prefix: Vec<&str> = Vec::new();
        let mut output = String::with_capacity(path.len());

        for segment in segments(path) {
            let matched = self.match_segment(&prefix, segment).as_str();
            if matched != segment {
                prefix.push(segment);
            }
            output.push('/');
            output.push_str(matched);
        }

        if output.is_empty() {
            path.to_string()
        } else {
            output
        }
    }
}

/// Outcome of matching one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult<'a, 's> {
    /// The tree names this segment
    Translated(&'a str),
    /// No entry; the segment is kept
    Passthrough(&'s str),
}

impl<'a: 's, 's> MatchResult<'a, 's> {
    pub fn as_str(self) -> &'s str {
        match self {
            MatchResult::Translated(s) => s,
            MatchResult::Passthrough(s) => s,
        }
    }
}

/// Split a path into segments, dropping the leading empty segment and any
/// trailing empty ones. Interior empty segments (`//`) are kept.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.trim_end_matches('/');
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
    (!trimmed.is_empty())
        .then(|| trimmed.split('/'))
        .into_iter()
        .flatten()
}
