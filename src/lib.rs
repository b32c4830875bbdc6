//! # featx
//!
//! Type-specialized example serializers for learning engines.
//!
//! Records describe their annotated fields once; featx turns each
//! (record type, visitor type) pair into a compiled procedure with every
//! visitor overload resolved up front, caches it process-wide and runs it
//! per record without inspecting types again.
//!
//! ## Quick Start
//!
//! ### As a Binary
//!
//! ```bash
//! featx --input interactions.jsonl > train.txt
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use featx::prelude::*;
//!
//! struct Click {
//!     label: Option<SimpleLabel>,
//!     age: i32,
//!     city: String,
//! }
//!
//! impl Record for Click {
//!     fn describe<D: Describe<Self>>(d: &mut D) {
//!         d.label(|c: &Click| c.label.as_ref());
//!         d.field(FeatureAttr::field("Age").namespace("user"), |c: &Click| &c.age);
//!         d.field(FeatureAttr::field("City").namespace("user").enumerize().order(1), |c: &Click| &c.city);
//!     }
//! }
//!
//! let click = Click { label: Some(SimpleLabel::new(1.0)), age: 30, city: "Seattle".to_string() };
//! assert_eq!(to_line(&click).unwrap(), "1 |user Age:30 CitySeattle");
//! ```
//!
//! ## Crate Structure
//!
//! - `featx-core` - type metadata, record description, visitor contract, per-call model
//! - `featx-dispatch` - overload resolution
//! - `featx-schema` - feature extraction and namespace classification
//! - `featx-serializer` - synthesis and the serializer cache
//! - `featx-line` - text line visitor

pub mod interaction;

// Re-export core types
pub use featx_core::{
    getter, Capability, ContextualBanditLabel, DenseNamespace, DenseSlice, Describe, Error, Feature,
    FeatureAttr, FeatureValue, Label, Namespace, OperationFamily, OperationTable, ParamType, Record, Result,
    SimpleLabel, SparseFeature, SparseNamespace, StringLabel, TypeDesc, Visitor,
};

// Re-export the pipeline
pub use featx_dispatch::{resolve, TypeMatch};
pub use featx_schema::{classify, extract, NamespaceGroup, NamespaceKind};
pub use featx_serializer::{
    global, serializer, synthesize, BoundSerializer, CompiledSerializer, NamespaceLayout, SerializerCache,
};

// Re-export the line visitor
pub use featx_line::{line_writer, to_line, to_line_with, LineConfig, LineVisitor};

pub use interaction::{Interaction, ItemContext, UserContext};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        serializer, to_line, BoundSerializer, Capability, CompiledSerializer, Describe, Error, Feature,
        FeatureAttr, FeatureValue, Label, LineConfig, LineVisitor, Namespace, OperationTable, Record, Result,
        SimpleLabel, SparseNamespace, Visitor,
    };
}
