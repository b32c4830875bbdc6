//! Record description
//!
//! Records describe their annotated fields by walking a [`Describe`] sink in
//! declaration order. The sink is generic, so each implementation (the
//! feature extractor, test probes) sees the concrete field types.

use crate::label::Label;
use crate::value::FeatureValue;

/// Feature annotation attached to a record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureAttr {
    field: &'static str,
    name: Option<String>,
    namespace: Option<String>,
    group: Option<char>,
    enumerize: bool,
    order: i32,
}

impl FeatureAttr {
    /// Annotation for the field called `field`; the feature name defaults to it
    pub fn field(field: &'static str) -> Self {
        Self {
            field,
            name: None,
            namespace: None,
            group: None,
            enumerize: false,
            order: 0,
        }
    }

    /// Explicit feature name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Single-character feature group
    pub fn group(mut self, group: char) -> Self {
        self.group = Some(group);
        self
    }

    /// Stringify and hash the value instead of using it numerically
    pub fn enumerize(mut self) -> Self {
        self.enumerize = true;
        self
    }

    /// Ordering key inside the namespace
    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn field_name(&self) -> &'static str {
        self.field
    }

    pub fn feature_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.field)
    }

    pub fn namespace_override(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn group_override(&self) -> Option<char> {
        self.group
    }

    pub fn is_enumerize(&self) -> bool {
        self.enumerize
    }

    pub fn order_key(&self) -> i32 {
        self.order
    }
}

/// Sink receiving a record's annotated fields
pub trait Describe<R: 'static> {
    /// A field always holding a value
    fn field<F: FeatureValue>(&mut self, attr: FeatureAttr, get: fn(&R) -> &F);

    /// A field that may be absent; absent values are never visited
    fn optional<F: FeatureValue>(&mut self, attr: FeatureAttr, get: fn(&R) -> &Option<F>);

    /// A field holding another annotated record; only its fields become
    /// features, with this field's namespace and group inherited
    fn nested<C: Record>(&mut self, attr: FeatureAttr, get: fn(&R) -> &C);

    /// The record's label
    fn label<L: Label>(&mut self, get: fn(&R) -> Option<&L>);
}

/// A type whose instances can be serialized as examples
pub trait Record: 'static {
    fn describe<D: Describe<Self>>(d: &mut D)
    where
        Self: Sized;
}
