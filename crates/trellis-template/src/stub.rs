//! Template stubs and the deployment loader.
//!
//! A stub is the compiled, executable form of one template. Stubs are
//! produced by the deployment's `StubLoader` from a synthesized identifier
//! (`<package>.<segments>_`) and are initialized once, after they have won
//! their slot in the cache.

use crate::context::TemplateRenderContext;
use crate::error::{RenderError, StubLoadError};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// A compiled template.
pub trait TemplateStub: Send + Sync {
    /// One-time initialization, bound to the loader that produced the stub.
    ///
    /// Called at most once per stub instance and never on a stub that lost
    /// a concurrent resolution race. A stub whose init fails is discarded.
    fn init(&self, loader: &dyn StubLoader) -> Result<(), String>;

    fn render(
        &self,
        ctx: &TemplateRenderContext,
        out: &mut dyn fmt::Write,
    ) -> Result<(), RenderError>;
}

/// The deployment loader: maps a stub identifier to a fresh instance.
pub trait StubLoader: Send + Sync {
    fn load(&self, id: &str) -> Result<Box<dyn TemplateStub>, StubLoadError>;
}

/// Zero-argument stub constructor.
pub type StubFactory = Arc<dyn Fn() -> Result<Box<dyn TemplateStub>, String> + Send + Sync>;

/// A `StubLoader` over registered factories.
///
/// This is what generated code populates at deployment time: one factory per
/// compiled template, keyed by its identifier.
#[derive(Default, Clone)]
pub struct StubRegistry {
    factories: FxHashMap<String, StubFactory>,
}

impl StubRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fallible factory under `id`, replacing any previous one.
    pub fn register<F>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Box<dyn TemplateStub>, String> + Send + Sync + 'static,
    {
        self.factories.insert(id.into(), Arc::new(factory));
    }

    /// Register a stub type built through its `Default` impl.
    pub fn register_default<T>(&mut self, id: impl Into<String>)
    where
        T: TemplateStub + Default + 'static,
    {
        self.register(id, || Ok(Box::new(T::default()) as Box<dyn TemplateStub>));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl StubLoader for StubRegistry {
    fn load(&self, id: &str) -> Result<Box<dyn TemplateStub>, StubLoadError> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| StubLoadError::NotFound { id: id.to_string() })?;
        trace!(id, "instantiating template stub");
        factory().map_err(|reason| StubLoadError::Instantiation {
            id: id.to_string(),
            reason,
        })
    }
}

impl fmt::Debug for StubRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("StubRegistry").field("ids", &ids).finish()
    }
}
