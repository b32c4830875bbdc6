//! Serializer cache
//!
//! Process-wide memo table from (record type, visitor type) to the compiled
//! serializer. Concurrent first requests for one pair wait on a per-pair gate
//! so at most one synthesis runs at a time; failed syntheses leave no entry
//! behind and the next queued caller retries.

use crate::synthesize::{synthesize, CompiledSerializer};
use ahash::AHashMap;
use featx_core::{Record, Result, Visitor};
use parking_lot::{Mutex, RwLock};
use std::any::{type_name, Any, TypeId};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

type Key = (TypeId, TypeId);
type Entry = Arc<dyn Any + Send + Sync>;

/// Memo table of compiled serializers
#[derive(Default)]
pub struct SerializerCache {
    ready: RwLock<AHashMap<Key, Entry>>,
    in_flight: Mutex<AHashMap<Key, Arc<Mutex<()>>>>,
    syntheses: AtomicUsize,
}

impl SerializerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiled serializer for `R` and `V`, synthesized on first use
    pub fn get_or_create<R: Record, V: Visitor>(&self) -> Result<Arc<CompiledSerializer<R, V>>> {
        self.get_or_create_with(synthesize::<R, V>)
    }

    /// Like [`get_or_create`](Self::get_or_create) with a custom synthesis step
    pub fn get_or_create_with<R, V, S>(&self, synthesize: S) -> Result<Arc<CompiledSerializer<R, V>>>
    where
        R: 'static,
        V: Visitor,
        S: FnOnce() -> Result<CompiledSerializer<R, V>>,
    {
        let key = (TypeId::of::<R>(), TypeId::of::<V>());
        if let Some(found) = self.lookup::<R, V>(&key) {
            return Ok(found);
        }

        let slot = Gate::enter(&self.in_flight, key);
        let _held = slot.gate.lock();

        // another caller may have finished while we waited
        if let Some(found) = self.lookup::<R, V>(&key) {
            return Ok(found);
        }

        self.syntheses.fetch_add(1, Ordering::SeqCst);
        match synthesize() {
            Ok(compiled) => {
                let compiled = Arc::new(compiled);
                self.ready.write().insert(key, compiled.clone() as Entry);
                info!(
                    record = type_name::<R>(),
                    visitor = type_name::<V>(),
                    namespaces = compiled.namespace_count(),
                    features = compiled.feature_count(),
                    "cached serializer"
                );
                Ok(compiled)
            }
            Err(e) => {
                warn!(
                    record = type_name::<R>(),
                    visitor = type_name::<V>(),
                    error = %e,
                    "serializer synthesis failed"
                );
                Err(e)
            }
        }
    }

    fn lookup<R: 'static, V: Visitor>(&self, key: &Key) -> Option<Arc<CompiledSerializer<R, V>>> {
        let entry = self.ready.read().get(key).cloned()?;
        entry.downcast::<CompiledSerializer<R, V>>().ok()
    }

    pub fn contains<R: 'static, V: Visitor>(&self) -> bool {
        self.ready.read().contains_key(&(TypeId::of::<R>(), TypeId::of::<V>()))
    }

    /// Number of cached serializers
    pub fn len(&self) -> usize {
        self.ready.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of synthesis attempts, failed ones included
    pub fn synthesis_count(&self) -> usize {
        self.syntheses.load(Ordering::SeqCst)
    }
}

/// A caller's claim on the per-key gate. Callers for one key queue on the
/// same gate until the last of them leaves, even when a synthesis fails or
/// panics; only then is the gate removed.
struct Gate<'a> {
    in_flight: &'a Mutex<AHashMap<Key, Arc<Mutex<()>>>>,
    key: Key,
    gate: Arc<Mutex<()>>,
}

impl<'a> Gate<'a> {
    fn enter(in_flight: &'a Mutex<AHashMap<Key, Arc<Mutex<()>>>>, key: Key) -> Self {
        let gate = in_flight
            .lock()
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        Self { in_flight, key, gate }
    }
}

impl Drop for Gate<'_> {
    fn drop(&mut self) {
        let mut in_flight = self.in_flight.lock();
        // the map and this claim are the only holders: nobody is queued
        if Arc::strong_count(&self.gate) == 2 {
            in_flight.remove(&self.key);
        }
    }
}

static GLOBAL: OnceLock<SerializerCache> = OnceLock::new();

/// The process-wide cache
pub fn global() -> &'static SerializerCache {
    GLOBAL.get_or_init(SerializerCache::new)
}

/// Compiled serializer for `R` and `V` from the process-wide cache
pub fn serializer<R: Record, V: Visitor>() -> Result<Arc<CompiledSerializer<R, V>>> {
    global().get_or_create::<R, V>()
}
