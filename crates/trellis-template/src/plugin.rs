//! The template plugin: configuration, stub resolution and rendering.
//!
//! Deployment state (the descriptor and the loader) is passed to `init`
//! and owned by the plugin instance; nothing is kept in process-wide
//! statics.

use crate::cache::TemplateStubCache;
use crate::context::{Locale, PropertyMap, Template, TemplateRenderContext};
use crate::descriptor::TemplatesDescriptor;
use crate::error::{StubLoadError, TemplateError};
use crate::stub::{StubLoader, TemplateStub};
use anyhow::Result;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::debug;
use trellis_common::TemplatePath;

pub struct TemplatePlugin {
    cache: TemplateStubCache,
}

impl TemplatePlugin {
    pub const NAME: &'static str = "template";

    pub fn new(descriptor: TemplatesDescriptor, loader: Arc<dyn StubLoader>) -> Self {
        Self {
            cache: TemplateStubCache::new(descriptor, loader),
        }
    }

    /// Build the plugin from its JSON configuration and the deployment loader.
    pub fn init(loader: Arc<dyn StubLoader>, config: &serde_json::Value) -> Result<Self> {
        let descriptor = TemplatesDescriptor::from_json(config)?;
        debug!(package = %descriptor.package(), "template plugin initialized");
        Ok(Self::new(descriptor, loader))
    }

    pub fn descriptor(&self) -> &TemplatesDescriptor {
        self.cache.descriptor()
    }

    pub fn cache(&self) -> &TemplateStubCache {
        &self.cache
    }

    pub fn resolve_template_stub(
        &self,
        path: &TemplatePath,
    ) -> Result<Arc<dyn TemplateStub>, StubLoadError> {
        self.cache.resolve(path)
    }

    pub fn resolve_template_stub_str(
        &self,
        path: &str,
    ) -> Result<Arc<dyn TemplateStub>, TemplateError> {
        self.cache.resolve_str(path)
    }

    /// Resolve the stub for `template` and bind it to the render inputs.
    pub fn render(
        &self,
        template: &Template,
        properties: PropertyMap,
        parameters: FxHashMap<String, serde_json::Value>,
        locale: Locale,
    ) -> Result<TemplateRenderContext, StubLoadError> {
        let stub = self.cache.resolve(template.path())?;
        Ok(TemplateRenderContext::new(
            template.clone(),
            stub,
            properties,
            parameters,
            locale,
        ))
    }
}

#[cfg(test)]
#[path = "../tests/plugin_tests.rs"]
mod tests;
