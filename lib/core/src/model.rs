//! Intermediate model
//!
//! Objects built fresh on every serialization call. Each one exposes a
//! deferred `visit` whose target operation was resolved when the serializer
//! was synthesized; nothing here inspects types.

use crate::visitor::Visitor;

/// Feature metadata owned by a compiled serializer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureMeta {
    pub namespace: Option<String>,
    pub group: Option<char>,
    pub name: String,
    pub enumerize: bool,
}

impl FeatureMeta {
    /// Borrow this metadata around a value
    pub fn feature<'a, T: ?Sized>(&'a self, value: &'a T) -> Feature<'a, T> {
        Feature {
            namespace: self.namespace.as_deref(),
            group: self.group,
            name: &self.name,
            enumerize: self.enumerize,
            value,
        }
    }
}

/// A feature handed to a visitor operation.
///
/// `T` is the field's concrete type for exact operations, `dyn FeatureValue`
/// for generic and capability operations, and the element slice for dense
/// operations.
#[derive(Debug)]
pub struct Feature<'a, T: ?Sized> {
    pub namespace: Option<&'a str>,
    pub group: Option<char>,
    pub name: &'a str,
    /// Stringify and hash instead of using the value numerically
    pub enumerize: bool,
    pub value: &'a T,
}

impl<'a, T: ?Sized> Clone for Feature<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T: ?Sized> Copy for Feature<'a, T> {}

/// Visitable feature of a sparse namespace
pub struct SparseFeature<'a, V: Visitor> {
    meta: &'a FeatureMeta,
    visit: Box<dyn Fn(&mut V) -> V::FeatureResult + 'a>,
}

impl<'a, V: Visitor> SparseFeature<'a, V> {
    pub fn new(meta: &'a FeatureMeta, visit: Box<dyn Fn(&mut V) -> V::FeatureResult + 'a>) -> Self {
        Self { meta, visit }
    }

    pub fn name(&self) -> &'a str {
        &self.meta.name
    }

    pub fn namespace(&self) -> Option<&'a str> {
        self.meta.namespace.as_deref()
    }

    pub fn group(&self) -> Option<char> {
        self.meta.group
    }

    pub fn enumerize(&self) -> bool {
        self.meta.enumerize
    }

    /// Run the operation resolved for this feature
    pub fn visit(&self, visitor: &mut V) -> V::FeatureResult {
        (self.visit)(visitor)
    }
}

/// Namespace holding an ordered list of features
pub struct SparseNamespace<'a, V: Visitor> {
    name: Option<&'a str>,
    group: Option<char>,
    features: Vec<SparseFeature<'a, V>>,
}

impl<'a, V: Visitor> SparseNamespace<'a, V> {
    pub fn new(name: Option<&'a str>, group: Option<char>, features: Vec<SparseFeature<'a, V>>) -> Self {
        Self { name, group, features }
    }

    pub fn name(&self) -> Option<&'a str> {
        self.name
    }

    pub fn group(&self) -> Option<char> {
        self.group
    }

    pub fn features(&self) -> &[SparseFeature<'a, V>] {
        &self.features
    }

    pub fn visit(&self, visitor: &mut V) -> V::NamespaceResult {
        visitor.visit_sparse(self)
    }
}

/// Namespace holding exactly one dense numeric feature
pub struct DenseNamespace<'a, V: Visitor> {
    feature: &'a FeatureMeta,
    visit: Box<dyn Fn(&mut V) -> V::NamespaceResult + 'a>,
}

impl<'a, V: Visitor> DenseNamespace<'a, V> {
    pub fn new(feature: &'a FeatureMeta, visit: Box<dyn Fn(&mut V) -> V::NamespaceResult + 'a>) -> Self {
        Self { feature, visit }
    }

    pub fn name(&self) -> Option<&'a str> {
        self.feature.namespace.as_deref()
    }

    pub fn group(&self) -> Option<char> {
        self.feature.group
    }

    pub fn feature_name(&self) -> &'a str {
        &self.feature.name
    }

    pub fn visit(&self, visitor: &mut V) -> V::NamespaceResult {
        (self.visit)(visitor)
    }
}

/// A namespace handed to [`Visitor::visit_example`]
pub enum Namespace<'a, V: Visitor> {
    Dense(DenseNamespace<'a, V>),
    Sparse(SparseNamespace<'a, V>),
}

impl<'a, V: Visitor> Namespace<'a, V> {
    pub fn name(&self) -> Option<&'a str> {
        match self {
            Namespace::Dense(ns) => ns.name(),
            Namespace::Sparse(ns) => ns.name(),
        }
    }

    pub fn group(&self) -> Option<char> {
        match self {
            Namespace::Dense(ns) => ns.group(),
            Namespace::Sparse(ns) => ns.group(),
        }
    }

    pub fn is_dense(&self) -> bool {
        matches!(self, Namespace::Dense(_))
    }

    pub fn visit(&self, visitor: &mut V) -> V::NamespaceResult {
        match self {
            Namespace::Dense(ns) => ns.visit(visitor),
            Namespace::Sparse(ns) => ns.visit(visitor),
        }
    }
}
