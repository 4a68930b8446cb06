//! Glob patterns over path segments
//!
//! Within one segment `*` matches any run of characters and `?` exactly one
//! character; everything else is literal. A whole segment of `**` stands for
//! zero or more segments and is only meaningful in multi-segment patterns.

use crate::error::EntryError;
use crate::path::PathKey;
use regex::Regex;
use std::fmt;

/// The recursive wildcard segment
pub const DOUBLE_STAR: &str = "**";

/// Check whether a segment is the recursive wildcard
#[inline]
#[must_use]
pub fn is_double_star(segment: &str) -> bool {
    segment == DOUBLE_STAR
}

/// Check whether a segment contains glob metacharacters
#[inline]
#[must_use]
pub fn is_pattern(segment: &str) -> bool {
    segment.contains(['*', '?'])
}

/// Compiled single-segment glob
#[derive(Clone)]
pub struct SegmentPattern {
    source: String,
    regex: Regex,
}

impl SegmentPattern {
    /// Compile a segment glob
    ///
    /// # Errors
    /// Returns [`EntryError::InvalidPattern`] if the translated expression
    /// cannot be compiled.
    pub fn new(pattern: &str) -> Result<Self, EntryError> {
        let regex = Regex::new(&glob_to_regex(pattern)).map_err(|e| EntryError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Test a single segment against the glob
    #[inline]
    #[must_use]
    pub fn matches(&self, segment: &str) -> bool {
        self.regex.is_match(segment)
    }

    /// Original glob text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for SegmentPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SegmentPattern").field(&self.source).finish()
    }
}

impl PartialEq for SegmentPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for SegmentPattern {}

fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::from("(?s)^");
    let mut literal = String::new();
    for c in pattern.chars() {
        match c {
            '*' | '?' => {
                out.push_str(&regex::escape(&literal));
                literal.clear();
                out.push_str(if c == '*' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    out.push_str(&regex::escape(&literal));
    out.push('$');
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternSegment {
    Literal(String),
    Glob(SegmentPattern),
    AnyDepth,
}

/// Multi-segment glob such as `src/**/*.c`
///
/// A pattern ending in `/` matches the named folder and everything below
/// it, i.e. `gen/` behaves like `gen/**`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<PatternSegment>,
}

impl PathPattern {
    /// Compile a `/`-delimited pattern
    ///
    /// # Errors
    /// Returns [`EntryError::InvalidPattern`] if a segment glob fails to
    /// compile.
    pub fn new(pattern: &str) -> Result<Self, EntryError> {
        let mut segments = PathKey::parse(pattern)
            .iter()
            .map(|seg| {
                if is_double_star(seg) {
                    Ok(PatternSegment::AnyDepth)
                } else if is_pattern(seg) {
                    SegmentPattern::new(seg).map(PatternSegment::Glob)
                } else {
                    Ok(PatternSegment::Literal(seg.to_string()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        if pattern.ends_with('/') && segments.last() != Some(&PatternSegment::AnyDepth) {
            segments.push(PatternSegment::AnyDepth);
        }
        Ok(Self { segments })
    }

    /// Test a path against the pattern
    #[must_use]
    pub fn matches(&self, path: &PathKey) -> bool {
        Self::match_from(&self.segments, path.segments())
    }

    fn match_from(pattern: &[PatternSegment], path: &[String]) -> bool {
        match pattern.split_first() {
            None => path.is_empty(),
            Some((PatternSegment::AnyDepth, rest)) => {
                (0..=path.len()).any(|skip| Self::match_from(rest, &path[skip..]))
            }
            Some((head, rest)) => match path.split_first() {
                None => false,
                Some((seg, tail)) => {
                    let hit = match head {
                        PatternSegment::Literal(lit) => lit == seg,
                        PatternSegment::Glob(glob) => glob.matches(seg),
                        PatternSegment::AnyDepth => true,
                    };
                    hit && Self::match_from(rest, tail)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_star_and_question() {
        let star = SegmentPattern::new("*.c").unwrap();
        assert!(star.matches("main.c"));
        assert!(star.matches(".c"));
        assert!(!star.matches("main.h"));

        let q = SegmentPattern::new("v?").unwrap();
        assert!(q.matches("v1"));
        assert!(!q.matches("v10"));
        assert!(!q.matches("v"));
    }

    #[test]
    fn segment_regex_metachars_are_literal() {
        let p = SegmentPattern::new("a+b.(x)*").unwrap();
        assert!(p.matches("a+b.(x)"));
        assert!(p.matches("a+b.(x)yz"));
        assert!(!p.matches("aab.(x)"));
    }

    #[test]
    fn is_pattern_detection() {
        assert!(is_pattern("*"));
        assert!(is_pattern("a?"));
        assert!(is_pattern(DOUBLE_STAR));
        assert!(!is_pattern("plain"));
        assert!(is_double_star("**"));
        assert!(!is_double_star("*"));
    }

    #[test]
    fn path_pattern_double_star() {
        let p = PathPattern::new("src/**/*.c").unwrap();
        assert!(p.matches(&PathKey::parse("src/a.c")));
        assert!(p.matches(&PathKey::parse("src/x/y/a.c")));
        assert!(!p.matches(&PathKey::parse("src/x/a.h")));
        assert!(!p.matches(&PathKey::parse("lib/a.c")));
    }

    #[test]
    fn path_pattern_trailing_separator_covers_subtree() {
        let p = PathPattern::new("gen/").unwrap();
        assert!(p.matches(&PathKey::parse("gen")));
        assert!(p.matches(&PathKey::parse("gen/out/x.o")));
        assert!(!p.matches(&PathKey::parse("generated")));
    }
}
