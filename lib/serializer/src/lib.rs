//! # featx Serializer
//!
//! Synthesizes, caches and runs type-specialized example serializers.
//!
//! ```rust
//! use featx_core::{Capability, Describe, FeatureAttr, Namespace, OperationTable, Record, SparseNamespace, Visitor};
//!
//! struct Click {
//!     age: i32,
//! }
//!
//! impl Record for Click {
//!     fn describe<D: Describe<Self>>(d: &mut D) {
//!         d.field(FeatureAttr::field("Age").namespace("user"), |c: &Click| &c.age);
//!     }
//! }
//!
//! struct Names;
//!
//! impl Visitor for Names {
//!     type ExampleResult = Vec<String>;
//!     type NamespaceResult = Vec<String>;
//!     type FeatureResult = String;
//!
//!     fn register(ops: &mut OperationTable<Self>) {
//!         ops.visit_capability(Capability::Numeric, |_, f| f.name.to_string());
//!     }
//!
//!     fn visit_example(&mut self, _label: Option<&str>, namespaces: &[Namespace<'_, Self>]) -> Vec<String> {
//!         namespaces.iter().flat_map(|ns| ns.visit(self)).collect()
//!     }
//!
//!     fn visit_sparse(&mut self, ns: &SparseNamespace<'_, Self>) -> Vec<String> {
//!         ns.features().iter().map(|f| f.visit(self)).collect()
//!     }
//! }
//!
//! let compiled = featx_serializer::serializer::<Click, Names>().unwrap();
//! assert_eq!(compiled.serialize(&Click { age: 30 }, &mut Names), vec!["Age"]);
//! ```

pub mod bound;
pub mod cache;
pub mod synthesize;

pub use bound::BoundSerializer;
pub use cache::{global, serializer, SerializerCache};
pub use synthesize::{synthesize, CompiledSerializer, NamespaceLayout};
