//! Structural field paths for addressing within a document
//!
//! Provides [`FieldPath`] for dot-separated addressing of nested document
//! fields, mixing keyed maps and ordered lists.
//!
//! # Examples
//! - `work_stages.0.stage_name` → list index 0, then key
//! - `foreman_id` → a single top-level key

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// One step of a [`FieldPath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Map key
    Key(String),
    /// List index (a segment consisting only of digits)
    Index(usize),
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{key}"),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Path addressing one field inside a document tree
///
/// Parsed from a dot-separated string. A segment that is all digits
/// addresses a list index, any other segment a map key. Beyond that the
/// shape is deliberately unvalidated: callers use free-form paths for ad
/// hoc field edits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// Build a path from already-parsed segments
    ///
    /// # Errors
    /// Fails on an empty segment list; a path must address something.
    pub fn new(segments: Vec<PathSegment>) -> Result<Self, FieldPathError> {
        if segments.is_empty() {
            return Err(FieldPathError::Empty);
        }
        Ok(Self(segments))
    }

    /// Path segments in root-to-leaf order
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A parsed path is never empty; kept for API symmetry
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.0.iter().enumerate() {
            if position > 0 {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = FieldPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(FieldPathError::Empty);
        }
        let segments: Vec<PathSegment> = s
            .split('.')
            .map(|segment| {
                if segment.is_empty() {
                    Err(FieldPathError::EmptySegment)
                } else if segment.bytes().all(|b| b.is_ascii_digit()) {
                    segment
                        .parse::<usize>()
                        .map(PathSegment::Index)
                        .map_err(|_| FieldPathError::IndexOutOfRange(segment.to_string()))
                } else {
                    Ok(PathSegment::Key(segment.to_string()))
                }
            })
            .collect::<Result<_, _>>()?;
        Ok(Self(segments))
    }
}

/// Errors related to field paths
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FieldPathError {
    /// Whole path is empty
    #[error("field path is empty")]
    Empty,

    /// Empty segment (`a..b`, leading or trailing dot)
    #[error("field path contains an empty segment")]
    EmptySegment,

    /// Numeric segment does not fit a list index
    #[error("numeric segment out of range: {0}")]
    IndexOutOfRange(String),
}
