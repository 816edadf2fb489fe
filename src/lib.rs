//! trellis: compile-time element handles and template stub resolution.
//!
//! Facade over the workspace crates:
//! - [`common`]: qualified names, template paths, method signatures
//! - [`compiler`]: element handles and the environments they resolve against
//! - [`template`]: template stub cache and render orchestration

pub use trellis_common as common;
pub use trellis_compiler as compiler;
pub use trellis_template as template;

pub use trellis_common::{MethodSignature, QualifiedName, TemplatePath};
pub use trellis_compiler::{ElementHandle, Environment, Handle, Resolution};
pub use trellis_template::{TemplatePlugin, TemplateStub, TemplateStubCache};

pub mod tracing_config;
pub use tracing_config::init_tracing;
