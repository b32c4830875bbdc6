//! Feature extraction
//!
//! Walks a record's description and flattens it into feature descriptors.
//! Nested records are followed recursively; their fields inherit the
//! namespace and group of the field holding them unless they override it.

use crate::binding::{BindFeature, DenseThunk, FeatureThunk, OptionalBinder, ValueBinder};
use featx_core::{
    getter, Describe, FeatureAttr, FeatureMeta, FeatureValue, Getter, Label, OperationFamily, OperationTable,
    Record, Result, TypeDesc, Visitor,
};
use std::any::type_name;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Reads the label of a record as engine text
pub type LabelFn<R> = Arc<dyn Fn(&R) -> Option<String> + Send + Sync>;

/// One annotated field, flattened out of the record graph
pub struct FeatureDescriptor<R, V: Visitor> {
    /// Dotted path from the root record, for diagnostics
    pub path: String,
    pub name: String,
    pub namespace: Option<String>,
    pub group: Option<char>,
    /// Declared type; optional fields are nullable wrappers around the type
    /// of the present value
    pub value_type: TypeDesc,
    pub enumerize: bool,
    pub order: i32,
    /// Position in discovery order
    pub index: usize,
    /// Declared type is a sequence of a dense element type
    pub dense: bool,
    binder: Box<dyn BindFeature<R, V>>,
}

impl<R, V: Visitor> FeatureDescriptor<R, V> {
    pub fn meta(&self) -> FeatureMeta {
        FeatureMeta {
            namespace: self.namespace.clone(),
            group: self.group,
            name: self.name.clone(),
            enumerize: self.enumerize,
        }
    }

    pub fn family(&self) -> OperationFamily {
        if self.enumerize {
            OperationFamily::VisitEnumerize
        } else {
            OperationFamily::Visit
        }
    }

    /// Resolve this field's feature operation against `ops`
    pub fn bind_sparse(&self, ops: &OperationTable<V>) -> Result<FeatureThunk<R, V>> {
        self.binder.bind_sparse(ops, self.family(), &self.value_type)
    }

    /// Resolve this field's dense operation against `ops`
    pub fn bind_dense(&self, ops: &OperationTable<V>) -> Option<Result<DenseThunk<R, V>>> {
        self.binder.bind_dense(ops)
    }
}

impl<R, V: Visitor> fmt::Debug for FeatureDescriptor<R, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureDescriptor")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .field("group", &self.group)
            .field("value_type", &self.value_type.name())
            .field("enumerize", &self.enumerize)
            .field("order", &self.order)
            .field("index", &self.index)
            .field("dense", &self.dense)
            .finish()
    }
}

/// Everything extracted from one record type
pub struct Extraction<R, V: Visitor> {
    pub features: Vec<FeatureDescriptor<R, V>>,
    pub label: Option<LabelFn<R>>,
    /// Paths of nested fields whose record contributed no features
    pub empty_nested: Vec<String>,
}

/// Extract the features of `R` with the given inherited namespace and group
pub fn extract<R: Record, V: Visitor>(namespace: Option<&str>, group: Option<char>) -> Extraction<R, V> {
    let mut extractor = Extractor::<R, R, V> {
        parent: getter(|record: &R| record),
        path: String::new(),
        namespace: namespace.map(str::to_string),
        group,
        root: true,
        features: Vec::new(),
        label: None,
        empty_nested: Vec::new(),
    };
    R::describe(&mut extractor);

    let mut features = extractor.features;
    for (index, feature) in features.iter_mut().enumerate() {
        feature.index = index;
    }

    debug!(
        record = type_name::<R>(),
        features = features.len(),
        labelled = extractor.label.is_some(),
        "extracted features"
    );

    Extraction {
        features,
        label: extractor.label,
        empty_nested: extractor.empty_nested,
    }
}

/// Describe sink for records of type `C` reached from root `R`
struct Extractor<R, C, V: Visitor> {
    parent: Getter<R, C>,
    path: String,
    namespace: Option<String>,
    group: Option<char>,
    root: bool,
    features: Vec<FeatureDescriptor<R, V>>,
    label: Option<LabelFn<R>>,
    empty_nested: Vec<String>,
}

impl<R: 'static, C: 'static, V: Visitor> Extractor<R, C, V> {
    fn compose<T: 'static>(&self, get: fn(&C) -> &T) -> Getter<R, T> {
        let parent = self.parent.clone();
        getter(move |record: &R| get(parent(record)))
    }

    fn namespace_for(&self, attr: &FeatureAttr) -> Option<String> {
        attr.namespace_override()
            .map(str::to_string)
            .or_else(|| self.namespace.clone())
    }

    fn push(&mut self, attr: &FeatureAttr, value_type: TypeDesc, dense: bool, binder: Box<dyn BindFeature<R, V>>) {
        self.features.push(FeatureDescriptor {
            path: format!("{}{}", self.path, attr.field_name()),
            name: attr.feature_name().to_string(),
            namespace: self.namespace_for(attr),
            group: attr.group_override().or(self.group),
            value_type,
            enumerize: attr.is_enumerize(),
            order: attr.order_key(),
            index: 0,
            dense,
            binder,
        });
    }
}

impl<R: 'static, C: 'static, V: Visitor> Describe<C> for Extractor<R, C, V> {
    fn field<F: FeatureValue>(&mut self, attr: FeatureAttr, get: fn(&C) -> &F) {
        let get = self.compose(get);
        let dense = F::dense_accessor(get.clone());
        let is_dense = dense.is_some();
        self.push(&attr, F::type_desc(), is_dense, Box::new(ValueBinder::new(get, dense)));
    }

    fn optional<F: FeatureValue>(&mut self, attr: FeatureAttr, get: fn(&C) -> &Option<F>) {
        let get = self.compose(get);
        let value_type = TypeDesc::nullable::<Option<F>>(F::type_desc());
        self.push(&attr, value_type, false, Box::new(OptionalBinder::new(get)));
    }

    fn nested<N: Record>(&mut self, attr: FeatureAttr, get: fn(&C) -> &N) {
        let mut child = Extractor::<R, N, V> {
            parent: self.compose(get),
            path: format!("{}{}.", self.path, attr.field_name()),
            namespace: self.namespace_for(&attr),
            group: attr.group_override().or(self.group),
            root: false,
            features: Vec::new(),
            label: None,
            empty_nested: Vec::new(),
        };
        N::describe(&mut child);

        if child.features.is_empty() {
            let field = format!("{}{}", self.path, attr.field_name());
            debug!(field = %field, record = type_name::<N>(), "nested record has no features");
            self.empty_nested.push(field);
        }
        self.empty_nested.append(&mut child.empty_nested);
        self.features.append(&mut child.features);
    }

    fn label<L: Label>(&mut self, get: fn(&C) -> Option<&L>) {
        if !self.root {
            debug!(path = %self.path, "ignoring label of nested record");
            return;
        }
        let parent = self.parent.clone();
        self.label = Some(Arc::new(move |record: &R| {
            get(parent(record)).map(|label| label.to_engine_text())
        }));
    }
}
