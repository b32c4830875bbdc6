//! Visitor contract
//!
//! A visitor declares its overloads once in an [`OperationTable`]. The
//! synthesizer resolves every dispatch site against that table and keeps the
//! chosen handler; the table itself is not consulted at call time.

use crate::model::{Feature, Namespace, SparseNamespace};
use crate::types::{Capability, OperationFamily, ParamType};
use crate::value::{DenseElement, DenseSlice, FeatureValue};
use std::any::Any;
use std::sync::Arc;

/// Consumer of serialized examples
pub trait Visitor: Sized + 'static {
    type ExampleResult: 'static;
    type NamespaceResult: 'static;
    /// Returned for features whose value is absent
    type FeatureResult: Default + 'static;

    /// Declare the `visit`, `visit_enumerize` and `dense` overloads
    fn register(ops: &mut OperationTable<Self>);

    /// Top-level operation: label text and namespaces in serializer order
    fn visit_example(&mut self, label: Option<&str>, namespaces: &[Namespace<'_, Self>]) -> Self::ExampleResult;

    fn visit_sparse(&mut self, namespace: &SparseNamespace<'_, Self>) -> Self::NamespaceResult;
}

/// Feature operation accepting exactly `F`
pub type TypedFeatureFn<V, F> =
    Arc<dyn Fn(&mut V, &Feature<'_, F>) -> <V as Visitor>::FeatureResult + Send + Sync>;

/// Feature operation accepting any value through its capability views
pub type ErasedFeatureFn<V> =
    Arc<dyn Fn(&mut V, &Feature<'_, dyn FeatureValue>) -> <V as Visitor>::FeatureResult + Send + Sync>;

/// Dense operation accepting exactly `[E]`
pub type TypedDenseFn<V, E> =
    Arc<dyn Fn(&mut V, &Feature<'_, [E]>) -> <V as Visitor>::NamespaceResult + Send + Sync>;

/// Dense operation accepting any dense element type
pub type ErasedDenseFn<V> =
    Arc<dyn Fn(&mut V, &Feature<'_, DenseSlice<'_>>) -> <V as Visitor>::NamespaceResult + Send + Sync>;

pub enum FeatureHandler<V: Visitor> {
    /// Holds a [`TypedFeatureFn`]
    Typed(Arc<dyn Any + Send + Sync>),
    Erased(ErasedFeatureFn<V>),
}

pub enum DenseHandler<V: Visitor> {
    /// Holds a [`TypedDenseFn`]
    Typed(Arc<dyn Any + Send + Sync>),
    Erased(ErasedDenseFn<V>),
}

/// One overload: formal parameter plus handler
pub struct Operation<H> {
    param: ParamType,
    handler: H,
}

impl<H> Operation<H> {
    pub fn param(&self) -> &ParamType {
        &self.param
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}

/// Overload table of a visitor type
pub struct OperationTable<V: Visitor> {
    visit: Vec<Operation<FeatureHandler<V>>>,
    visit_enumerize: Vec<Operation<FeatureHandler<V>>>,
    dense: Vec<Operation<DenseHandler<V>>>,
}

impl<V: Visitor> Default for OperationTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Visitor> OperationTable<V> {
    pub fn new() -> Self {
        Self {
            visit: Vec::new(),
            visit_enumerize: Vec::new(),
            dense: Vec::new(),
        }
    }

    /// Build the table declared by `V`
    pub fn of() -> Self {
        let mut ops = Self::new();
        V::register(&mut ops);
        ops
    }

    /// Feature overloads of `family` (`Visit` or `VisitEnumerize`)
    pub fn features(&self, family: OperationFamily) -> &[Operation<FeatureHandler<V>>] {
        match family {
            OperationFamily::VisitEnumerize => &self.visit_enumerize,
            _ => &self.visit,
        }
    }

    pub fn dense_operations(&self) -> &[Operation<DenseHandler<V>>] {
        &self.dense
    }

    pub fn len(&self) -> usize {
        self.visit.len() + self.visit_enumerize.len() + self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `visit` overload for exactly `F`
    pub fn visit<F, O>(&mut self, op: O) -> &mut Self
    where
        F: FeatureValue,
        O: Fn(&mut V, &Feature<'_, F>) -> V::FeatureResult + Send + Sync + 'static,
    {
        let handler = typed_feature::<V, F, O>(op);
        self.visit.push(Operation {
            param: ParamType::Exact(F::type_desc()),
            handler,
        });
        self
    }

    /// `visit_enumerize` overload for exactly `F`
    pub fn visit_enumerize<F, O>(&mut self, op: O) -> &mut Self
    where
        F: FeatureValue,
        O: Fn(&mut V, &Feature<'_, F>) -> V::FeatureResult + Send + Sync + 'static,
    {
        let handler = typed_feature::<V, F, O>(op);
        self.visit_enumerize.push(Operation {
            param: ParamType::Exact(F::type_desc()),
            handler,
        });
        self
    }

    /// Erased feature overload with an arbitrary formal parameter
    pub fn feature_param<O>(&mut self, family: OperationFamily, param: ParamType, op: O) -> &mut Self
    where
        O: Fn(&mut V, &Feature<'_, dyn FeatureValue>) -> V::FeatureResult + Send + Sync + 'static,
    {
        let operation = Operation {
            param,
            handler: FeatureHandler::Erased(Arc::new(op)),
        };
        match family {
            OperationFamily::VisitEnumerize => self.visit_enumerize.push(operation),
            _ => self.visit.push(operation),
        }
        self
    }

    /// `visit` overload for any type carrying `capability`
    pub fn visit_capability<O>(&mut self, capability: Capability, op: O) -> &mut Self
    where
        O: Fn(&mut V, &Feature<'_, dyn FeatureValue>) -> V::FeatureResult + Send + Sync + 'static,
    {
        self.feature_param(OperationFamily::Visit, ParamType::Capability(capability), op)
    }

    /// `visit_enumerize` overload for any type carrying `capability`
    pub fn visit_enumerize_capability<O>(&mut self, capability: Capability, op: O) -> &mut Self
    where
        O: Fn(&mut V, &Feature<'_, dyn FeatureValue>) -> V::FeatureResult + Send + Sync + 'static,
    {
        self.feature_param(OperationFamily::VisitEnumerize, ParamType::Capability(capability), op)
    }

    /// Generic `visit<T>` overload; `T` binds to any type carrying `bounds`
    pub fn visit_generic<O>(&mut self, name: &'static str, bounds: &[Capability], op: O) -> &mut Self
    where
        O: Fn(&mut V, &Feature<'_, dyn FeatureValue>) -> V::FeatureResult + Send + Sync + 'static,
    {
        let param = ParamType::Generic {
            name,
            bounds: bounds.to_vec(),
        };
        self.feature_param(OperationFamily::Visit, param, op)
    }

    /// Generic `visit_enumerize<T>` overload
    pub fn visit_enumerize_generic<O>(&mut self, name: &'static str, bounds: &[Capability], op: O) -> &mut Self
    where
        O: Fn(&mut V, &Feature<'_, dyn FeatureValue>) -> V::FeatureResult + Send + Sync + 'static,
    {
        let param = ParamType::Generic {
            name,
            bounds: bounds.to_vec(),
        };
        self.feature_param(OperationFamily::VisitEnumerize, param, op)
    }

    /// Dense overload for exactly `[E]`
    pub fn dense<E, O>(&mut self, op: O) -> &mut Self
    where
        E: DenseElement,
        O: Fn(&mut V, &Feature<'_, [E]>) -> V::NamespaceResult + Send + Sync + 'static,
    {
        let op: TypedDenseFn<V, E> = Arc::new(op);
        self.dense.push(Operation {
            param: ParamType::Exact(E::type_desc()),
            handler: DenseHandler::Typed(Arc::new(op)),
        });
        self
    }

    /// Generic dense overload over the element type
    pub fn dense_generic<O>(&mut self, name: &'static str, op: O) -> &mut Self
    where
        O: Fn(&mut V, &Feature<'_, DenseSlice<'_>>) -> V::NamespaceResult + Send + Sync + 'static,
    {
        self.dense.push(Operation {
            param: ParamType::Generic {
                name,
                bounds: vec![Capability::Numeric],
            },
            handler: DenseHandler::Erased(Arc::new(op)),
        });
        self
    }
}

fn typed_feature<V, F, O>(op: O) -> FeatureHandler<V>
where
    V: Visitor,
    F: FeatureValue,
    O: Fn(&mut V, &Feature<'_, F>) -> V::FeatureResult + Send + Sync + 'static,
{
    let op: TypedFeatureFn<V, F> = Arc::new(op);
    FeatureHandler::Typed(Arc::new(op))
}
