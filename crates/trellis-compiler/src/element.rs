//! Live program elements.
//!
//! These are the structural views an environment hands out: what the
//! annotation processor sees while compiling, or what the runtime sees after
//! deployment. Handles are captured *from* these values and re-resolved
//! *to* them, but never hold on to them.

use std::fmt;
use trellis_common::QualifiedName;

/// Kind of a program element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Package,
    Class,
    Interface,
    Enum,
    Annotation,
    Method,
    Constructor,
    Field,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ElementKind::Package => "PACKAGE",
            ElementKind::Class => "CLASS",
            ElementKind::Interface => "INTERFACE",
            ElementKind::Enum => "ENUM",
            ElementKind::Annotation => "ANNOTATION_TYPE",
            ElementKind::Method => "METHOD",
            ElementKind::Constructor => "CONSTRUCTOR",
            ElementKind::Field => "FIELD",
        };
        f.write_str(s)
    }
}

/// Flavor of a type declaration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageElement {
    pub name: QualifiedName,
}

impl PackageElement {
    pub fn new(name: QualifiedName) -> Self {
        Self { name }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodElement {
    /// Qualified name of the enclosing type.
    pub owner: QualifiedName,
    pub name: String,
    /// Erased textual representation of each parameter type, in declaration order.
    pub parameter_types: Vec<String>,
}

impl MethodElement {
    pub fn new(owner: QualifiedName, name: impl Into<String>, parameter_types: Vec<String>) -> Self {
        Self {
            owner,
            name: name.into(),
            parameter_types,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstructorElement {
    pub owner: QualifiedName,
    pub parameter_types: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldElement {
    pub owner: QualifiedName,
    pub name: String,
    pub type_name: String,
}

impl FieldElement {
    pub fn new(owner: QualifiedName, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            owner,
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A member declared directly in a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Member {
    Method(MethodElement),
    Constructor(ConstructorElement),
    Field(FieldElement),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeElement {
    pub name: QualifiedName,
    pub kind: TypeKind,
    /// Declared members, in declaration order.
    pub members: Vec<Member>,
}

impl TypeElement {
    pub fn new(name: QualifiedName, kind: TypeKind) -> Self {
        Self {
            name,
            kind,
            members: Vec::new(),
        }
    }

    pub fn class(name: QualifiedName) -> Self {
        Self::new(name, TypeKind::Class)
    }

    /// Declare a method on this type.
    pub fn with_method(mut self, name: &str, parameter_types: &[&str]) -> Self {
        let method = MethodElement::new(
            self.name.clone(),
            name,
            parameter_types.iter().map(|p| p.to_string()).collect(),
        );
        self.members.push(Member::Method(method));
        self
    }

    /// Declare a field on this type.
    pub fn with_field(mut self, name: &str, type_name: &str) -> Self {
        let field = FieldElement::new(self.name.clone(), name, type_name);
        self.members.push(Member::Field(field));
        self
    }

    /// Declare a constructor on this type.
    pub fn with_constructor(mut self, parameter_types: &[&str]) -> Self {
        self.members.push(Member::Constructor(ConstructorElement {
            owner: self.name.clone(),
            parameter_types: parameter_types.iter().map(|p| p.to_string()).collect(),
        }));
        self
    }

    /// Declared methods, constructors excluded.
    pub fn methods(&self) -> impl Iterator<Item = &MethodElement> {
        self.members.iter().filter_map(|m| match m {
            Member::Method(method) => Some(method),
            _ => None,
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldElement> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(field) => Some(field),
            _ => None,
        })
    }

    pub fn constructors(&self) -> impl Iterator<Item = &ConstructorElement> {
        self.members.iter().filter_map(|m| match m {
            Member::Constructor(ctor) => Some(ctor),
            _ => None,
        })
    }
}

/// Any element a handle can be captured from.
#[derive(Clone, Copy, Debug)]
pub enum Element<'a> {
    Package(&'a PackageElement),
    Type(&'a TypeElement),
    Method(&'a MethodElement),
    Constructor(&'a ConstructorElement),
    Field(&'a FieldElement),
}

impl Element<'_> {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Package(_) => ElementKind::Package,
            Element::Type(ty) => match ty.kind {
                TypeKind::Class => ElementKind::Class,
                TypeKind::Interface => ElementKind::Interface,
                TypeKind::Enum => ElementKind::Enum,
                TypeKind::Annotation => ElementKind::Annotation,
            },
            Element::Method(_) => ElementKind::Method,
            Element::Constructor(_) => ElementKind::Constructor,
            Element::Field(_) => ElementKind::Field,
        }
    }
}

impl fmt::Display for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Package(p) => write!(f, "{}", p.name),
            Element::Type(t) => write!(f, "{}", t.name),
            Element::Method(m) => write!(f, "{}.{}({})", m.owner, m.name, m.parameter_types.join(",")),
            Element::Constructor(c) => write!(f, "{}({})", c.owner, c.parameter_types.join(",")),
            Element::Field(field) => write!(f, "{}.{}", field.owner, field.name),
        }
    }
}
