//! Template plugin configuration.
//!
//! The plugin is configured by a JSON object in the application descriptor:
//!
//! ```json
//! { "package": "app.templates" }
//! ```
//!
//! `package` is the namespace prefix under which generated template stubs
//! live; it defaults to the root package.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use trellis_common::{QualifiedName, TemplatePath};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatesDescriptor {
    #[serde(default)]
    package: QualifiedName,
}

impl TemplatesDescriptor {
    pub fn new(package: QualifiedName) -> Self {
        Self { package }
    }

    pub fn from_json(config: &serde_json::Value) -> Result<Self> {
        Self::deserialize(config).context("invalid template plugin configuration")
    }

    pub fn package(&self) -> &QualifiedName {
        &self.package
    }

    /// Identifier of the compiled stub for `path`: the package, the path
    /// segments joined by `.`, and a trailing `_`.
    ///
    /// `admin/list.gtmpl` under package `app.templates` is
    /// `app.templates.admin.list_`.
    pub fn stub_id(&self, path: &TemplatePath) -> String {
        let mut id = self.package.to_string();
        for segment in path.segments() {
            if !id.is_empty() {
                id.push('.');
            }
            id.push_str(segment);
        }
        id.push('_');
        id
    }
}

pub fn parse_descriptor(source: &str) -> Result<TemplatesDescriptor> {
    let descriptor =
        serde_json::from_str(source).context("failed to parse template descriptor JSON")?;
    Ok(descriptor)
}

pub fn load_descriptor(path: &Path) -> Result<TemplatesDescriptor> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read template descriptor: {}", path.display()))?;
    parse_descriptor(&source)
        .with_context(|| format!("failed to parse template descriptor: {}", path.display()))
}

#[cfg(test)]
#[path = "../tests/descriptor_tests.rs"]
mod tests;
