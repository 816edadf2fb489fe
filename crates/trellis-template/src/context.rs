//! Render-time inputs and the render context handed to a stub.

use crate::error::{LocaleError, RenderError};
use crate::stub::TemplateStub;
use rustc_hash::FxHashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use trellis_common::{TemplatePath, TemplatePathError};

// =============================================================================
// Template
// =============================================================================

/// Identity of a template as seen by controllers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Template {
    path: TemplatePath,
}

impl Template {
    pub fn new(path: TemplatePath) -> Self {
        Self { path }
    }

    pub fn parse(path: &str) -> Result<Self, TemplatePathError> {
        TemplatePath::parse(path).map(Self::new)
    }

    pub fn path(&self) -> &TemplatePath {
        &self.path
    }
}

// =============================================================================
// Locale
// =============================================================================

/// Language and optional country, e.g. `en` or `en_US`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    country: Option<String>,
}

impl Locale {
    pub fn new(language: &str, country: Option<&str>) -> Self {
        Self {
            language: language.to_ascii_lowercase(),
            country: country.map(str::to_ascii_uppercase),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("en", None)
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    /// Accepts `ll`, `ll-CC` and `ll_CC`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(['-', '_']);
        let language = parts.next().unwrap_or_default();
        let country = parts.next();
        let valid = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphabetic());
        if !valid(language) || country.is_some_and(|c| !valid(c)) || parts.next().is_some() {
            return Err(LocaleError(s.to_string()));
        }
        Ok(Self::new(language, country))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if let Some(country) = &self.country {
            write!(f, "_{country}")?;
        }
        Ok(())
    }
}

// =============================================================================
// PropertyMap
// =============================================================================

/// Multi-valued render properties with fallback to a parent map.
#[derive(Debug, Clone, Default)]
pub struct PropertyMap {
    values: FxHashMap<String, Vec<String>>,
    parent: Option<Arc<PropertyMap>>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty map whose lookups fall back to `parent`.
    pub fn with_parent(parent: Arc<PropertyMap>) -> Self {
        Self {
            values: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    /// Replace all values of `key` with `value`.
    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), vec![value.into()]);
    }

    pub fn add_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .entry(key.into())
            .or_default()
            .push(value.into());
    }

    /// Remove `key` from this map. Values in the parent stay visible.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.values.remove(key)
    }

    /// First value of `key`, looking through parents.
    pub fn get_value(&self, key: &str) -> Option<&str> {
        self.get_values(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn get_values(&self, key: &str) -> Option<&[String]> {
        match self.values.get(key) {
            Some(values) => Some(values.as_slice()),
            None => self.parent.as_deref().and_then(|p| p.get_values(key)),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get_values(key).is_some()
    }
}

// =============================================================================
// TemplateRenderContext
// =============================================================================

/// Everything a stub needs to render once.
pub struct TemplateRenderContext {
    template: Template,
    stub: Arc<dyn TemplateStub>,
    properties: PropertyMap,
    parameters: FxHashMap<String, serde_json::Value>,
    locale: Locale,
}

impl TemplateRenderContext {
    pub fn new(
        template: Template,
        stub: Arc<dyn TemplateStub>,
        properties: PropertyMap,
        parameters: FxHashMap<String, serde_json::Value>,
        locale: Locale,
    ) -> Self {
        Self {
            template,
            stub,
            properties,
            parameters,
            locale,
        }
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn stub(&self) -> &Arc<dyn TemplateStub> {
        &self.stub
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    pub fn parameters(&self) -> &FxHashMap<String, serde_json::Value> {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&serde_json::Value> {
        self.parameters.get(name)
    }

    /// Like `parameter`, but a missing value is a render error.
    pub fn require_parameter(&self, name: &str) -> Result<&serde_json::Value, RenderError> {
        self.parameter(name)
            .ok_or_else(|| RenderError::MissingParameter {
                name: name.to_string(),
            })
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn render_to(&self, out: &mut dyn fmt::Write) -> Result<(), RenderError> {
        self.stub.render(self, out)
    }

    pub fn render(&self) -> Result<String, RenderError> {
        let mut out = String::new();
        self.render_to(&mut out)?;
        Ok(out)
    }
}

impl fmt::Debug for TemplateRenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateRenderContext")
            .field("template", &self.template)
            .field("properties", &self.properties)
            .field("parameters", &self.parameters)
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../tests/context_tests.rs"]
mod tests;
