//! Serializer bound to a visitor instance

use crate::cache::serializer;
use crate::synthesize::CompiledSerializer;
use featx_core::{Record, Result, Visitor};
use std::fmt;
use std::sync::Arc;

/// A cached compiled serializer paired with the visitor it feeds
pub struct BoundSerializer<R, V: Visitor> {
    compiled: Arc<CompiledSerializer<R, V>>,
    visitor: V,
}

impl<R: Record, V: Visitor> BoundSerializer<R, V> {
    /// Bind `visitor` to the process-wide serializer for `R`
    pub fn create(visitor: V) -> Result<Self> {
        Ok(Self::new(serializer::<R, V>()?, visitor))
    }
}

impl<R, V: Visitor> BoundSerializer<R, V> {
    pub fn new(compiled: Arc<CompiledSerializer<R, V>>, visitor: V) -> Self {
        Self { compiled, visitor }
    }

    pub fn serialize(&mut self, record: &R) -> V::ExampleResult {
        self.compiled.serialize(record, &mut self.visitor)
    }

    pub fn compiled(&self) -> &Arc<CompiledSerializer<R, V>> {
        &self.compiled
    }

    pub fn visitor(&self) -> &V {
        &self.visitor
    }

    pub fn visitor_mut(&mut self) -> &mut V {
        &mut self.visitor
    }

    pub fn into_visitor(self) -> V {
        self.visitor
    }
}

impl<R, V: Visitor> fmt::Debug for BoundSerializer<R, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundSerializer")
            .field("record", &self.compiled.record_type())
            .field("visitor", &self.compiled.visitor_type())
            .finish()
    }
}
