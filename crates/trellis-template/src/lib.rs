//! Template stub resolution and rendering for the trellis framework.
//!
//! Templates are compiled ahead of time into stubs. At runtime a logical
//! template path is resolved to its stub through `TemplateStubCache`, which
//! loads each stub once and initializes it exactly once, and
//! `TemplatePlugin::render` binds the stub to the render inputs.

pub mod cache;
pub use cache::TemplateStubCache;

pub mod context;
pub use context::{Locale, PropertyMap, Template, TemplateRenderContext};

pub mod descriptor;
pub use descriptor::{TemplatesDescriptor, load_descriptor, parse_descriptor};

pub mod error;
pub use error::{LocaleError, RenderError, StubLoadError, TemplateError};

pub mod plugin;
pub use plugin::TemplatePlugin;

pub mod stub;
pub use stub::{StubFactory, StubLoader, StubRegistry, TemplateStub};

#[cfg(test)]
#[path = "../tests/test_stubs.rs"]
pub(crate) mod test_stubs;
