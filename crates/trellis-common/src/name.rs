//! Qualified names.
//!
//! A `QualifiedName` is the dotted identity of a package, a type, or the
//! owner of a member: `com.example.Foo` is the three segments `com`,
//! `example` and `Foo`. The empty name is the root; every other name has a
//! parent obtained by dropping its last segment.
//!
//! Names compare and hash by their segment sequence, so two names parsed
//! at different times (or in different processes) are interchangeable.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Error returned when a dotted string is not a well-formed qualified name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QualifiedNameError {
    /// A segment between two dots (or at either end) was empty.
    #[error("empty segment at position {position} in qualified name '{source_text}'")]
    EmptySegment {
        source_text: String,
        position: usize,
    },

    /// A segment handed over pre-split itself contained a dot.
    #[error("segment '{segment}' of qualified name '{source_text}' contains a '.'")]
    DottedSegment {
        source_text: String,
        segment: String,
    },
}

/// Check segment `position` of a name being built from `segments`.
fn check_segment(segments: &[String], position: usize) -> Result<(), QualifiedNameError> {
    let segment = &segments[position];
    if segment.is_empty() {
        return Err(QualifiedNameError::EmptySegment {
            source_text: segments.join("."),
            position,
        });
    }
    if segment.contains('.') {
        return Err(QualifiedNameError::DottedSegment {
            source_text: segments.join("."),
            segment: segment.clone(),
        });
    }
    Ok(())
}

/// An immutable dot-segmented name.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    segments: SmallVec<[String; 4]>,
}

impl QualifiedName {
    /// The empty name.
    pub fn root() -> Self {
        Self {
            segments: SmallVec::new(),
        }
    }

    /// Parse a dotted string. The empty string parses to the root name.
    pub fn parse(s: &str) -> Result<Self, QualifiedNameError> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        let mut segments = SmallVec::new();
        for (position, segment) in s.split('.').enumerate() {
            if segment.is_empty() {
                return Err(QualifiedNameError::EmptySegment {
                    source_text: s.to_string(),
                    position,
                });
            }
            segments.push(segment.to_string());
        }
        Ok(Self { segments })
    }

    /// Build a name from already-split segments.
    ///
    /// Returns an error if any segment is empty or contains a dot.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, QualifiedNameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: SmallVec<[String; 4]> = segments.into_iter().map(Into::into).collect();
        for position in 0..segments.len() {
            check_segment(&segments, position)?;
        }
        Ok(Self { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> impl ExactSizeIterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// The last segment, or `None` for the root name.
    pub fn identifier(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// This name minus its last segment.
    ///
    /// The parent of a single-segment name is the root; the root itself has
    /// no parent.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(Self { segments })
    }

    /// This name extended by one segment.
    pub fn child(&self, segment: &str) -> Result<Self, QualifiedNameError> {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        check_segment(&segments, segments.len() - 1)?;
        Ok(Self { segments })
    }

    /// True when every segment of `self` starts `other`, segment-wise.
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.segments.len() <= other.segments.len()
            && self
                .segments
                .iter()
                .zip(other.segments.iter())
                .all(|(a, b)| a == b)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl fmt::Debug for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QualifiedName({self})")
    }
}

impl FromStr for QualifiedName {
    type Err = QualifiedNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for QualifiedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QualifiedName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../tests/name_tests.rs"]
mod tests;
