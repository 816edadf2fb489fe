//! Method signatures.
//!
//! A `MethodSignature` names a method by owner, simple name and parameter
//! type text. Unlike an element handle it cannot be re-resolved; it is the
//! value generated routing tables carry when only identity matters.
//!
//! The textual form is `owner#name(p1,p2)`, e.g.
//! `com.example.Controller#index(java.lang.String)`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MethodSignatureError {
    #[error("method signature '{0}' is missing the '#' separator")]
    MissingSeparator(String),
    #[error("method signature '{0}' has an unbalanced parameter list")]
    UnbalancedParameters(String),
    #[error("method signature '{0}' has an empty owner or method name")]
    EmptyName(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSignature {
    pub type_name: String,
    pub name: String,
    pub parameter_types: Vec<String>,
}

impl MethodSignature {
    pub fn new(
        type_name: impl Into<String>,
        name: impl Into<String>,
        parameter_types: Vec<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
            parameter_types,
        }
    }

    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}({})",
            self.type_name,
            self.name,
            self.parameter_types.join(",")
        )
    }
}

impl FromStr for MethodSignature {
    type Err = MethodSignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (type_name, rest) = s
            .split_once('#')
            .ok_or_else(|| MethodSignatureError::MissingSeparator(s.to_string()))?;
        let (name, params) = rest
            .split_once('(')
            .ok_or_else(|| MethodSignatureError::UnbalancedParameters(s.to_string()))?;
        let params = params
            .strip_suffix(')')
            .ok_or_else(|| MethodSignatureError::UnbalancedParameters(s.to_string()))?;
        if type_name.is_empty() || name.is_empty() {
            return Err(MethodSignatureError::EmptyName(s.to_string()));
        }
        let parameter_types = split_parameters(params)
            .ok_or_else(|| MethodSignatureError::UnbalancedParameters(s.to_string()))?;
        Ok(Self {
            type_name: type_name.to_string(),
            name: name.to_string(),
            parameter_types,
        })
    }
}

/// Split a parameter list on top-level commas.
///
/// Commas nested in generic arguments (`Map<K,V>`) do not split.
fn split_parameters(params: &str) -> Option<Vec<String>> {
    let mut out = Vec::new();
    if params.trim().is_empty() {
        return Some(out);
    }
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in params.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                out.push(params[start..i].trim().to_string());
                start = i + 1;
            }
            '(' | ')' => return None,
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    out.push(params[start..].trim().to_string());
    Some(out)
}

#[cfg(test)]
#[path = "../tests/signature_tests.rs"]
mod tests;
