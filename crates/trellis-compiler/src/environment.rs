//! Compilation and runtime environments.
//!
//! An `Environment` is the lookup side of a compiler front end: given a
//! qualified name it returns the live package or type, if any. The
//! processing-time environment and the runtime environment are distinct
//! implementations, so nothing captured from one may be assumed to exist in
//! the other.

use crate::element::{PackageElement, TypeElement};
use crate::error::EnvironmentError;
use rustc_hash::FxHashMap;
use trellis_common::QualifiedName;

/// Name-based element lookup.
///
/// Lookups return `Ok(None)` when the element is absent. Implementations
/// report their own internal aborts as `EnvironmentError::Aborted`.
pub trait Environment: Send + Sync {
    fn package_element(
        &self,
        name: &QualifiedName,
    ) -> Result<Option<&PackageElement>, EnvironmentError>;

    fn type_element(&self, name: &QualifiedName) -> Result<Option<&TypeElement>, EnvironmentError>;
}

/// An in-memory environment.
///
/// Registering a type implicitly registers its package.
#[derive(Debug, Default, Clone)]
pub struct ElementTable {
    packages: FxHashMap<QualifiedName, PackageElement>,
    types: FxHashMap<QualifiedName, TypeElement>,
}

impl ElementTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, name: QualifiedName) -> Self {
        self.add_package(name);
        self
    }

    pub fn with_type(mut self, ty: TypeElement) -> Self {
        self.add_type(ty);
        self
    }

    pub fn add_package(&mut self, name: QualifiedName) {
        self.packages
            .entry(name.clone())
            .or_insert_with(|| PackageElement::new(name));
    }

    /// Register a type, replacing any previous declaration with the same name.
    pub fn add_type(&mut self, ty: TypeElement) {
        if let Some(package) = ty.name.parent() {
            self.add_package(package);
        }
        self.types.insert(ty.name.clone(), ty);
    }

    pub fn remove_type(&mut self, name: &QualifiedName) -> Option<TypeElement> {
        self.types.remove(name)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeElement> {
        self.types.values()
    }
}

impl Environment for ElementTable {
    fn package_element(
        &self,
        name: &QualifiedName,
    ) -> Result<Option<&PackageElement>, EnvironmentError> {
        Ok(self.packages.get(name))
    }

    fn type_element(&self, name: &QualifiedName) -> Result<Option<&TypeElement>, EnvironmentError> {
        Ok(self.types.get(name))
    }
}
