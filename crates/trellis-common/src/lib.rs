//! Common types shared by the trellis crates.
//!
//! This crate provides the plain value types every other crate builds on:
//! - Dotted qualified names (`QualifiedName`)
//! - Slash-separated template paths (`TemplatePath`)
//! - Method signatures detached from any environment (`MethodSignature`)

// Dotted names for packages, types and member owners
pub mod name;
pub use name::{QualifiedName, QualifiedNameError};

// Logical template paths
pub mod path;
pub use path::{TemplatePath, TemplatePathError};

// Lightweight method identity
pub mod signature;
pub use signature::{MethodSignature, MethodSignatureError};
