use std::fmt;
use trellis_common::TemplatePathError;

/// Failure to materialize a template stub from the deployment loader.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StubLoadError {
    /// No compiled stub is registered under the synthesized identifier.
    #[error("template stub '{id}' not found")]
    NotFound { id: String },

    /// The stub exists but could not be constructed.
    #[error("template stub '{id}' could not be instantiated: {reason}")]
    Instantiation { id: String, reason: String },

    /// The stub was constructed but its one-time init failed.
    #[error("template stub '{id}' failed to initialize: {reason}")]
    Initialization { id: String, reason: String },
}

/// Error from the string-path entry points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("invalid template path: {0}")]
    InvalidPath(#[from] TemplatePathError),
    #[error(transparent)]
    Load(#[from] StubLoadError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("missing render parameter '{name}'")]
    MissingParameter { name: String },

    #[error("template '{template}' failed to render: {message}")]
    Failed { template: String, message: String },

    #[error("failed to write template output")]
    Write(#[from] fmt::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid locale tag '{0}'")]
pub struct LocaleError(pub String);
