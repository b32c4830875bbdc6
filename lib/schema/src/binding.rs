//! Typed field binders
//!
//! A binder keeps the concrete type of one annotated field. At synthesis
//! time it resolves the visitor operation for that type and closes over the
//! chosen handler, producing a thunk that runs without any type inspection.

use featx_core::{
    DenseAccessor, DenseElement, DenseHandler, Error, FeatureHandler, FeatureMeta, FeatureValue, Getter,
    OperationFamily, OperationTable, Result, TypeDesc, TypedDenseFn, TypedFeatureFn, Visitor,
};
use featx_dispatch::resolve;

/// Compiled sparse dispatch site
pub type FeatureThunk<R, V> =
    Box<dyn Fn(&R, &mut V, &FeatureMeta) -> <V as Visitor>::FeatureResult + Send + Sync>;

/// Compiled dense dispatch site
pub type DenseThunk<R, V> =
    Box<dyn Fn(&R, &mut V, &FeatureMeta) -> <V as Visitor>::NamespaceResult + Send + Sync>;

/// Resolve and bind the operations for one field
pub trait BindFeature<R, V: Visitor>: Send + Sync {
    /// Bind the `visit` / `visit_enumerize` operation for the field's value.
    /// Resolution runs against the present type of `declared`.
    fn bind_sparse(
        &self,
        ops: &OperationTable<V>,
        family: OperationFamily,
        declared: &TypeDesc,
    ) -> Result<FeatureThunk<R, V>>;

    /// Bind the dense operation; `None` when the field is not dense
    fn bind_dense(&self, ops: &OperationTable<V>) -> Option<Result<DenseThunk<R, V>>>;
}

fn feature_thunk<R, V, C>(thunk: C) -> FeatureThunk<R, V>
where
    V: Visitor,
    C: Fn(&R, &mut V, &FeatureMeta) -> V::FeatureResult + Send + Sync + 'static,
{
    Box::new(thunk)
}

fn dense_thunk<R, V, C>(thunk: C) -> DenseThunk<R, V>
where
    V: Visitor,
    C: Fn(&R, &mut V, &FeatureMeta) -> V::NamespaceResult + Send + Sync + 'static,
{
    Box::new(thunk)
}

fn mismatch(family: OperationFamily, value_type: &TypeDesc) -> Error {
    Error::HandlerMismatch {
        family,
        value_type: value_type.name().to_string(),
    }
}

/// Binder for a field that always holds a value
pub(crate) struct ValueBinder<R, F> {
    get: Getter<R, F>,
    dense: Option<DenseAccessor<R>>,
}

impl<R, F> ValueBinder<R, F> {
    pub(crate) fn new(get: Getter<R, F>, dense: Option<DenseAccessor<R>>) -> Self {
        Self { get, dense }
    }
}

impl<R: 'static, V: Visitor, F: FeatureValue> BindFeature<R, V> for ValueBinder<R, F> {
    fn bind_sparse(
        &self,
        ops: &OperationTable<V>,
        family: OperationFamily,
        declared: &TypeDesc,
    ) -> Result<FeatureThunk<R, V>> {
        let value_type = declared.present();
        let resolved = resolve(family, ops.features(family), value_type)?;
        let get = self.get.clone();

        match resolved.operation.handler() {
            FeatureHandler::Typed(any) => {
                let op = any
                    .downcast_ref::<TypedFeatureFn<V, F>>()
                    .cloned()
                    .ok_or_else(|| mismatch(family, value_type))?;
                Ok(feature_thunk(move |record: &R, visitor: &mut V, meta: &FeatureMeta| {
                    op(visitor, &meta.feature(get(record)))
                }))
            }
            FeatureHandler::Erased(op) => {
                let op = op.clone();
                Ok(feature_thunk(move |record: &R, visitor: &mut V, meta: &FeatureMeta| {
                    let value: &(dyn FeatureValue + 'static) = get(record);
                    op(visitor, &meta.feature(value))
                }))
            }
        }
    }

    fn bind_dense(&self, ops: &OperationTable<V>) -> Option<Result<DenseThunk<R, V>>> {
        let bound = match self.dense.clone()? {
            DenseAccessor::F64(get) => bind_dense_slice(get, ops),
            DenseAccessor::F32(get) => bind_dense_slice(get, ops),
            DenseAccessor::I16(get) => bind_dense_slice(get, ops),
            DenseAccessor::I32(get) => bind_dense_slice(get, ops),
            DenseAccessor::I64(get) => bind_dense_slice(get, ops),
        };
        Some(bound)
    }
}

fn bind_dense_slice<R, V, E>(get: Getter<R, [E]>, ops: &OperationTable<V>) -> Result<DenseThunk<R, V>>
where
    R: 'static,
    V: Visitor,
    E: DenseElement,
{
    let element = E::type_desc();
    let resolved = resolve(OperationFamily::Dense, ops.dense_operations(), &element)?;

    match resolved.operation.handler() {
        DenseHandler::Typed(any) => {
            let op = any
                .downcast_ref::<TypedDenseFn<V, E>>()
                .cloned()
                .ok_or_else(|| mismatch(OperationFamily::Dense, &element))?;
            Ok(dense_thunk(move |record: &R, visitor: &mut V, meta: &FeatureMeta| {
                op(visitor, &meta.feature(get(record)))
            }))
        }
        DenseHandler::Erased(op) => {
            let op = op.clone();
            Ok(dense_thunk(move |record: &R, visitor: &mut V, meta: &FeatureMeta| {
                let values = E::wrap(get(record));
                op(visitor, &meta.feature(&values))
            }))
        }
    }
}

/// Binder for a field that may be absent. Absent values short-circuit to
/// the visitor's default feature result.
pub(crate) struct OptionalBinder<R, F> {
    get: Getter<R, Option<F>>,
}

impl<R, F> OptionalBinder<R, F> {
    pub(crate) fn new(get: Getter<R, Option<F>>) -> Self {
        Self { get }
    }
}

impl<R: 'static, V: Visitor, F: FeatureValue> BindFeature<R, V> for OptionalBinder<R, F> {
    fn bind_sparse(
        &self,
        ops: &OperationTable<V>,
        family: OperationFamily,
        declared: &TypeDesc,
    ) -> Result<FeatureThunk<R, V>> {
        let value_type = declared.present();
        let resolved = resolve(family, ops.features(family), value_type)?;
        let get = self.get.clone();

        match resolved.operation.handler() {
            FeatureHandler::Typed(any) => {
                let op = any
                    .downcast_ref::<TypedFeatureFn<V, F>>()
                    .cloned()
                    .ok_or_else(|| mismatch(family, value_type))?;
                Ok(feature_thunk(move |record: &R, visitor: &mut V, meta: &FeatureMeta| {
                    match get(record) {
                        Some(value) => op(visitor, &meta.feature(value)),
                        None => V::FeatureResult::default(),
                    }
                }))
            }
            FeatureHandler::Erased(op) => {
                let op = op.clone();
                Ok(feature_thunk(move |record: &R, visitor: &mut V, meta: &FeatureMeta| {
                    match get(record) {
                        Some(value) => {
                            let value: &(dyn FeatureValue + 'static) = value;
                            op(visitor, &meta.feature(value))
                        }
                        None => V::FeatureResult::default(),
                    }
                }))
            }
        }
    }

    fn bind_dense(&self, _ops: &OperationTable<V>) -> Option<Result<DenseThunk<R, V>>> {
        None
    }
}
