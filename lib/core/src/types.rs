//! Runtime type metadata
//!
//! `TypeDesc` is the reflective surface read by the feature extractor and the
//! overload resolver. It names a concrete Rust type by `TypeId`, records its
//! structure (scalar, sequence, nullable wrapper) and the capabilities the
//! type offers to visitors.

use std::any::{type_name, TypeId};
use std::fmt;

/// Capabilities a value type can offer to visitor operations.
///
/// A capability operation matches every type carrying the capability. Its
/// distance is the capability's specificity; derived capabilities (those
/// implying others) win ties against the capabilities they imply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// Whole numbers, convertible to `f64`
    Integral,
    /// Floating point numbers
    Floating,
    /// Any number
    Numeric,
    /// `true` / `false`
    Boolean,
    /// Renders to text
    Text,
    /// Ordered collection of values
    Sequence,
}

impl Capability {
    /// Match distance of an operation declared on this capability.
    pub fn specificity(self) -> u32 {
        match self {
            Capability::Text => 3,
            _ => 2,
        }
    }

    /// Capabilities implied by this one.
    pub fn implies(self) -> &'static [Capability] {
        match self {
            Capability::Integral | Capability::Floating => &[Capability::Numeric],
            _ => &[],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Capability::Integral => "integral",
            Capability::Floating => "floating",
            Capability::Numeric => "numeric",
            Capability::Boolean => "boolean",
            Capability::Text => "text",
            Capability::Sequence => "sequence",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Structure of a described type
#[derive(Debug, Clone)]
pub enum TypeKind {
    Scalar,
    Sequence(Box<TypeDesc>),
    Nullable(Box<TypeDesc>),
}

/// Description of a concrete value type
#[derive(Debug, Clone)]
pub struct TypeDesc {
    id: TypeId,
    name: &'static str,
    kind: TypeKind,
    capabilities: Vec<Capability>,
}

impl TypeDesc {
    /// Describe a scalar type with the given capabilities
    pub fn scalar<T: ?Sized + 'static>(capabilities: &[Capability]) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            kind: TypeKind::Scalar,
            capabilities: capabilities.to_vec(),
        }
    }

    /// Describe a sequence type `T` whose elements are `element`
    pub fn sequence<T: ?Sized + 'static>(element: TypeDesc) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            kind: TypeKind::Sequence(Box::new(element)),
            capabilities: vec![Capability::Sequence],
        }
    }

    /// Describe a nullable wrapper `T` around `inner`
    pub fn nullable<T: ?Sized + 'static>(inner: TypeDesc) -> Self {
        let capabilities = inner.capabilities.clone();
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            kind: TypeKind::Nullable(Box::new(inner)),
            capabilities,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self.kind, TypeKind::Nullable(_))
    }

    /// Element type of a sequence
    pub fn element(&self) -> Option<&TypeDesc> {
        match &self.kind {
            TypeKind::Sequence(element) => Some(element),
            _ => None,
        }
    }

    /// The type of a present value: the inner type of a nullable wrapper,
    /// `self` otherwise
    pub fn present(&self) -> &TypeDesc {
        match &self.kind {
            TypeKind::Nullable(inner) => inner,
            _ => self,
        }
    }

    /// Element type when this is a non-nullable sequence of a dense element
    /// type (`f64`, `f32`, `i16`, `i32`, `i64`)
    pub fn dense_element(&self) -> Option<&TypeDesc> {
        self.element().filter(|element| is_dense_element(element.id))
    }
}

impl PartialEq for TypeDesc {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDesc {}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

fn is_dense_element(id: TypeId) -> bool {
    id == TypeId::of::<f64>()
        || id == TypeId::of::<f32>()
        || id == TypeId::of::<i16>()
        || id == TypeId::of::<i32>()
        || id == TypeId::of::<i64>()
}

/// Formal parameter of a visitor operation
#[derive(Debug, Clone)]
pub enum ParamType {
    /// Exactly this type
    Exact(TypeDesc),
    /// Unbound generic slot; binds to any type carrying all `bounds`
    Generic {
        name: &'static str,
        bounds: Vec<Capability>,
    },
    /// Any type carrying the capability
    Capability(Capability),
    /// A sequence whose element matches the inner parameter
    Sequence(Box<ParamType>),
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Exact(desc) => write!(f, "{}", desc),
            ParamType::Generic { name, bounds } if bounds.is_empty() => write!(f, "{}", name),
            ParamType::Generic { name, bounds } => {
                write!(f, "{}: ", name)?;
                for (i, bound) in bounds.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" + ")?;
                    }
                    write!(f, "{}", bound)?;
                }
                Ok(())
            }
            ParamType::Capability(capability) => write!(f, "impl {}", capability),
            ParamType::Sequence(inner) => write!(f, "[{}]", inner),
        }
    }
}

/// Overload families a visitor exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationFamily {
    Visit,
    VisitEnumerize,
    Dense,
}

impl fmt::Display for OperationFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperationFamily::Visit => "visit",
            OperationFamily::VisitEnumerize => "visit_enumerize",
            OperationFamily::Dense => "dense",
        })
    }
}
