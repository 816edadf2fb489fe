//! Logical template paths.
//!
//! Templates are addressed by a slash-separated path relative to the
//! application's template root, e.g. `admin/users/list.gtmpl`. The path is
//! kept as its segment sequence plus an optional extension on the final
//! segment, so comparing two paths compares segments rather than raw text.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplatePathError {
    #[error("template path is empty")]
    Empty,
    #[error("empty segment at position {position} in template path '{path}'")]
    EmptySegment { path: String, position: usize },
    #[error("segment '{segment}' of template path '{path}' contains a '.'")]
    DottedSegment { path: String, segment: String },
    #[error("template path '{path}' has an empty name or extension")]
    MalformedName { path: String },
}

/// A segment-ordered template path.
///
/// Every segment but the last is a directory; the last segment is the
/// template name, stored without its extension.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplatePath {
    segments: Vec<String>,
    extension: Option<String>,
}

impl TemplatePath {
    pub fn parse(s: &str) -> Result<Self, TemplatePathError> {
        if s.is_empty() {
            return Err(TemplatePathError::Empty);
        }
        let raw: Vec<&str> = s.split('/').collect();
        let last = raw.len() - 1;
        let mut segments = Vec::with_capacity(raw.len());
        let mut extension = None;
        for (position, segment) in raw.into_iter().enumerate() {
            if segment.is_empty() {
                return Err(TemplatePathError::EmptySegment {
                    path: s.to_string(),
                    position,
                });
            }
            if position < last {
                if segment.contains('.') {
                    return Err(TemplatePathError::DottedSegment {
                        path: s.to_string(),
                        segment: segment.to_string(),
                    });
                }
                segments.push(segment.to_string());
                continue;
            }
            match segment.rsplit_once('.') {
                Some((name, ext)) => {
                    if name.is_empty() || ext.is_empty() || name.contains('.') {
                        return Err(TemplatePathError::MalformedName {
                            path: s.to_string(),
                        });
                    }
                    segments.push(name.to_string());
                    extension = Some(ext.to_string());
                }
                None => segments.push(segment.to_string()),
            }
        }
        Ok(Self {
            segments,
            extension,
        })
    }

    /// All segments, the final one being the template name without extension.
    pub fn segments(&self) -> impl ExactSizeIterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// The directory segments, i.e. every segment except the name.
    pub fn dirs(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    pub fn name(&self) -> &str {
        // Parsing guarantees at least one segment.
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// The same path with its extension dropped.
    ///
    /// `a/b.gtmpl` and `a/b` name the same compiled template; this is the
    /// form they share.
    pub fn without_extension(&self) -> Self {
        Self {
            segments: self.segments.clone(),
            extension: None,
        }
    }
}

impl fmt::Display for TemplatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))?;
        if let Some(ext) = &self.extension {
            write!(f, ".{ext}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TemplatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TemplatePath({self})")
    }
}

impl FromStr for TemplatePath {
    type Err = TemplatePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TemplatePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TemplatePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../tests/path_tests.rs"]
mod tests;
