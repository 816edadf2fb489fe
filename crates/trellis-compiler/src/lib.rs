//! Program element handles for the trellis framework.
//!
//! Controllers are processed at compile time; the generated routing and
//! wiring code refers back to controller types, methods and fields through
//! `ElementHandle`s, which are re-resolved against whatever environment is
//! current when they are used.

pub mod element;
pub use element::{
    ConstructorElement, Element, ElementKind, FieldElement, Member, MethodElement, PackageElement,
    TypeElement, TypeKind,
};

pub mod environment;
pub use environment::{ElementTable, Environment};

pub mod error;
pub use error::{EnvironmentError, HandleError, ResolveError};

pub mod handle;
pub use handle::{
    ElementHandle, FieldHandle, Handle, MethodHandle, PackageHandle, Resolution, TypeHandle,
};
