//! # featx Core
//!
//! Contracts and data types shared by the featx crates:
//!
//! - [`TypeDesc`], [`Capability`] - runtime type metadata read at synthesis time
//! - [`FeatureValue`] - values that can sit in annotated fields
//! - [`Record`], [`Describe`], [`FeatureAttr`] - record description
//! - [`Visitor`], [`OperationTable`] - the consumer contract and its overloads
//! - [`Feature`], [`Namespace`] - the per-call intermediate model
//! - [`Label`] - example labels
//!
//! ## Example
//!
//! ```rust
//! use featx_core::{Describe, FeatureAttr, Record, SimpleLabel};
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
//! ```

pub mod error;
pub mod label;
pub mod model;
pub mod record;
pub mod types;
pub mod value;
pub mod visitor;

pub use error::{Error, Result};
pub use label::{ContextualBanditLabel, Label, SimpleLabel, StringLabel};
pub use model::{DenseNamespace, Feature, FeatureMeta, Namespace, SparseFeature, SparseNamespace};
pub use record::{Describe, FeatureAttr, Record};
pub use types::{Capability, OperationFamily, ParamType, TypeDesc, TypeKind};
pub use value::{getter, DenseAccessor, DenseElement, DenseSlice, FeatureValue, Getter};
pub use visitor::{
    DenseHandler, ErasedDenseFn, ErasedFeatureFn, FeatureHandler, Operation, OperationTable, TypedDenseFn,
    TypedFeatureFn, Visitor,
};
