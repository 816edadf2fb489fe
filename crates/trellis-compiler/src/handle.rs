//! Element handles.
//!
//! An `ElementHandle` is a serializable, environment-independent identity for
//! a package, type, method or field. It is captured while processing one
//! compilation and re-resolved later against another environment, possibly
//! produced by a different compiler front end, so it only ever stores names
//! and signature text:
//!
//! | Variant | Identity |
//! |---------|----------|
//! | Package | qualified name |
//! | Type    | qualified name |
//! | Method  | owner name, simple name, parameter type text |
//! | Field   | owner name, simple name |
//!
//! Equality and hashing are structural over those tuples. Resolution is a
//! fresh lookup on every call; handles cache nothing.
//!
//! ## Overload discrimination
//!
//! Methods are matched by the *textual* form of their parameter types, so
//! `m(java.lang.String)` and `m(String)` are distinct handles even when both
//! spellings denote the same type.

use crate::element::{Element, ElementKind, FieldElement, MethodElement, PackageElement, TypeElement};
use crate::environment::Environment;
use crate::error::{EnvironmentError, HandleError, ResolveError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};
use trellis_common::{MethodSignature, QualifiedName, QualifiedNameError};

// =============================================================================
// Resolution
// =============================================================================

/// Outcome of re-resolving a handle.
///
/// `NotFound` is an expected result: the element may have been removed or
/// renamed since the handle was captured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution<T> {
    Found(T),
    NotFound,
}

impl<T> Resolution<T> {
    pub const fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Resolution::Found(value) => Some(value),
            Resolution::NotFound => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Resolution::Found(value) => Resolution::Found(f(value)),
            Resolution::NotFound => Resolution::NotFound,
        }
    }
}

impl<T> From<Option<T>> for Resolution<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Resolution::Found(value),
            None => Resolution::NotFound,
        }
    }
}

/// Turn a raw environment lookup into a resolution.
///
/// A compiler abort is swallowed and reported as `NotFound`; every other
/// environment error propagates.
fn settle<'e, T>(
    handle: &dyn fmt::Display,
    lookup: Result<Option<&'e T>, EnvironmentError>,
) -> Result<Resolution<&'e T>, ResolveError> {
    match lookup {
        Ok(found) => {
            trace!(handle = %handle, found = found.is_some(), "resolve");
            Ok(found.into())
        }
        Err(EnvironmentError::Aborted { reason }) => {
            debug!(handle = %handle, %reason, "compilation aborted during resolution, treating as not found");
            Ok(Resolution::NotFound)
        }
        Err(err) => Err(err.into()),
    }
}

// =============================================================================
// Handle capability
// =============================================================================

/// Capability shared by every handle variant.
pub trait Handle {
    /// The live element this handle resolves to.
    type Target;

    /// The package the element lives in.
    fn package_name(&self) -> QualifiedName;

    /// Re-resolve against `env`.
    fn get<'e>(
        &self,
        env: &'e dyn Environment,
    ) -> Result<Resolution<&'e Self::Target>, ResolveError>;
}

// =============================================================================
// PackageHandle
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageHandle {
    name: QualifiedName,
}

impl PackageHandle {
    pub fn new(name: QualifiedName) -> Self {
        Self { name }
    }

    pub fn from_element(element: &PackageElement) -> Self {
        Self::new(element.name.clone())
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }
}

impl Handle for PackageHandle {
    type Target = PackageElement;

    fn package_name(&self) -> QualifiedName {
        self.name.clone()
    }

    fn get<'e>(
        &self,
        env: &'e dyn Environment,
    ) -> Result<Resolution<&'e PackageElement>, ResolveError> {
        settle(self, env.package_element(&self.name))
    }
}

impl fmt::Display for PackageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementHandle.Package[name={}]", self.name)
    }
}

// =============================================================================
// TypeHandle
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeHandle {
    name: QualifiedName,
}

impl TypeHandle {
    pub fn new(name: QualifiedName) -> Self {
        Self { name }
    }

    pub fn parse(fqn: &str) -> Result<Self, QualifiedNameError> {
        QualifiedName::parse(fqn).map(Self::new)
    }

    pub fn from_element(element: &TypeElement) -> Self {
        Self::new(element.name.clone())
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }
}

impl Handle for TypeHandle {
    type Target = TypeElement;

    fn package_name(&self) -> QualifiedName {
        self.name.parent().unwrap_or_default()
    }

    fn get<'e>(
        &self,
        env: &'e dyn Environment,
    ) -> Result<Resolution<&'e TypeElement>, ResolveError> {
        settle(self, env.type_element(&self.name))
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementHandle.Class[name={}]", self.name)
    }
}

/// Serializes an owning type as its bare qualified name.
mod owner_name {
    use super::TypeHandle;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use trellis_common::QualifiedName;

    pub(super) fn serialize<S: Serializer>(owner: &TypeHandle, s: S) -> Result<S::Ok, S::Error> {
        owner.name.serialize(s)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<TypeHandle, D::Error> {
        QualifiedName::deserialize(d).map(TypeHandle::new)
    }
}

// =============================================================================
// MethodHandle
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodHandle {
    #[serde(rename = "type", with = "owner_name")]
    owner: TypeHandle,
    name: String,
    parameter_types: Vec<String>,
}

impl MethodHandle {
    pub fn new(owner: QualifiedName, name: impl Into<String>, parameter_types: Vec<String>) -> Self {
        Self {
            owner: TypeHandle::new(owner),
            name: name.into(),
            parameter_types,
        }
    }

    /// Build a handle from a dotted owner name and parameter type text,
    /// without needing the method to exist anywhere yet.
    pub fn parse(
        owner: &str,
        name: &str,
        parameter_types: &[&str],
    ) -> Result<Self, QualifiedNameError> {
        Ok(Self::new(
            QualifiedName::parse(owner)?,
            name,
            parameter_types.iter().map(|p| p.to_string()).collect(),
        ))
    }

    pub fn from_element(element: &MethodElement) -> Self {
        Self::new(
            element.owner.clone(),
            element.name.clone(),
            element.parameter_types.clone(),
        )
    }

    pub fn from_signature(signature: &MethodSignature) -> Result<Self, QualifiedNameError> {
        Ok(Self::new(
            QualifiedName::parse(&signature.type_name)?,
            signature.name.clone(),
            signature.parameter_types.clone(),
        ))
    }

    pub fn owner(&self) -> &TypeHandle {
        &self.owner
    }

    pub fn type_name(&self) -> &QualifiedName {
        &self.owner.name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameter_types(&self) -> &[String] {
        &self.parameter_types
    }

    /// The signature of this method, without resolution capability.
    pub fn signature(&self) -> MethodSignature {
        MethodSignature::new(
            self.owner.name.to_string(),
            self.name.clone(),
            self.parameter_types.clone(),
        )
    }

    fn matches(&self, method: &MethodElement) -> bool {
        method.name == self.name
            && method.parameter_types.len() == self.parameter_types.len()
            && method
                .parameter_types
                .iter()
                .zip(&self.parameter_types)
                .all(|(declared, wanted)| declared == wanted)
    }
}

impl Handle for MethodHandle {
    type Target = MethodElement;

    fn package_name(&self) -> QualifiedName {
        self.owner.package_name()
    }

    fn get<'e>(
        &self,
        env: &'e dyn Environment,
    ) -> Result<Resolution<&'e MethodElement>, ResolveError> {
        let lookup = env
            .type_element(&self.owner.name)
            .map(|ty| ty.and_then(|ty| ty.methods().find(|m| self.matches(m))));
        settle(self, lookup)
    }
}

impl fmt::Display for MethodHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ElementHandle.Method[type={},name={},parameterTypes=[{}]]",
            self.owner.name,
            self.name,
            self.parameter_types.join(", ")
        )
    }
}

// =============================================================================
// FieldHandle
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldHandle {
    #[serde(rename = "type", with = "owner_name")]
    owner: TypeHandle,
    name: String,
}

impl FieldHandle {
    pub fn new(owner: QualifiedName, name: impl Into<String>) -> Self {
        Self {
            owner: TypeHandle::new(owner),
            name: name.into(),
        }
    }

    pub fn parse(owner: &str, name: &str) -> Result<Self, QualifiedNameError> {
        Ok(Self::new(QualifiedName::parse(owner)?, name))
    }

    pub fn from_element(element: &FieldElement) -> Self {
        Self::new(element.owner.clone(), element.name.clone())
    }

    pub fn owner(&self) -> &TypeHandle {
        &self.owner
    }

    pub fn type_name(&self) -> &QualifiedName {
        &self.owner.name
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Handle for FieldHandle {
    type Target = FieldElement;

    fn package_name(&self) -> QualifiedName {
        self.owner.package_name()
    }

    fn get<'e>(&self, env: &'e dyn Environment) -> Result<Resolution<&'e FieldElement>, ResolveError> {
        let lookup = env
            .type_element(&self.owner.name)
            .map(|ty| ty.and_then(|ty| ty.fields().find(|f| f.name == self.name)));
        settle(self, lookup)
    }
}

impl fmt::Display for FieldHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ElementHandle.Field[type={},name={}]",
            self.owner.name, self.name
        )
    }
}

// =============================================================================
// ElementHandle
// =============================================================================

/// Closed set of handle variants.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementHandle {
    Package(PackageHandle),
    Type(TypeHandle),
    Method(MethodHandle),
    Field(FieldHandle),
}

impl ElementHandle {
    /// Capture a handle from a live element.
    ///
    /// Only packages, classes, methods and fields have a handle variant;
    /// interfaces, enums, annotation types and constructors are rejected.
    pub fn create(element: Element<'_>) -> Result<Self, HandleError> {
        let kind = element.kind();
        match (kind, element) {
            (ElementKind::Field, Element::Field(field)) => {
                Ok(ElementHandle::Field(FieldHandle::from_element(field)))
            }
            (ElementKind::Class, Element::Type(ty)) => {
                Ok(ElementHandle::Type(TypeHandle::from_element(ty)))
            }
            (ElementKind::Package, Element::Package(package)) => {
                Ok(ElementHandle::Package(PackageHandle::from_element(package)))
            }
            (ElementKind::Method, Element::Method(method)) => {
                Ok(ElementHandle::Method(MethodHandle::from_element(method)))
            }
            _ => Err(HandleError::UnsupportedElementKind {
                kind,
                element: element.to_string(),
            }),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            ElementHandle::Package(_) => ElementKind::Package,
            ElementHandle::Type(_) => ElementKind::Class,
            ElementHandle::Method(_) => ElementKind::Method,
            ElementHandle::Field(_) => ElementKind::Field,
        }
    }

    pub fn package_name(&self) -> QualifiedName {
        match self {
            ElementHandle::Package(h) => h.package_name(),
            ElementHandle::Type(h) => h.package_name(),
            ElementHandle::Method(h) => h.package_name(),
            ElementHandle::Field(h) => h.package_name(),
        }
    }

    /// Re-resolve against `env`, yielding the live element of matching kind.
    pub fn get<'e>(&self, env: &'e dyn Environment) -> Result<Resolution<Element<'e>>, ResolveError> {
        Ok(match self {
            ElementHandle::Package(h) => h.get(env)?.map(Element::Package),
            ElementHandle::Type(h) => h.get(env)?.map(Element::Type),
            ElementHandle::Method(h) => h.get(env)?.map(Element::Method),
            ElementHandle::Field(h) => h.get(env)?.map(Element::Field),
        })
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementHandle::Package(h) => fmt::Display::fmt(h, f),
            ElementHandle::Type(h) => fmt::Display::fmt(h, f),
            ElementHandle::Method(h) => fmt::Display::fmt(h, f),
            ElementHandle::Field(h) => fmt::Display::fmt(h, f),
        }
    }
}

impl From<PackageHandle> for ElementHandle {
    fn from(handle: PackageHandle) -> Self {
        ElementHandle::Package(handle)
    }
}

impl From<TypeHandle> for ElementHandle {
    fn from(handle: TypeHandle) -> Self {
        ElementHandle::Type(handle)
    }
}

impl From<MethodHandle> for ElementHandle {
    fn from(handle: MethodHandle) -> Self {
        ElementHandle::Method(handle)
    }
}

impl From<FieldHandle> for ElementHandle {
    fn from(handle: FieldHandle) -> Self {
        ElementHandle::Field(handle)
    }
}

#[cfg(test)]
#[path = "../tests/handle_tests.rs"]
mod tests;
