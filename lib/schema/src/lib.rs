//! # featx Schema
//!
//! Turns a record type into the plan a serializer is synthesized from.
//!
//! ## Overview
//!
//! 1. [`extract`] walks the record description and flattens every annotated
//!    field, following nested records, into a [`FeatureDescriptor`]
//! 2. [`classify`] groups descriptors by namespace and group, marks dense
//!    namespaces and orders the features of sparse ones
//! 3. Each descriptor binds its visitor operation through [`BindFeature`];
//!    the concrete field type is known there, so typed overloads need no
//!    runtime inspection
//!
//! ## Rules
//!
//! - A field's namespace and group default to those of the nested field
//!   holding it, then to the ones passed to [`extract`]
//! - A namespace holding a dense sequence may hold nothing else
//! - Sparse features are ordered by order key, ties by discovery order
//! - Only the root record's label is used

pub mod binding;
pub mod classify;
pub mod extract;

pub use binding::{BindFeature, DenseThunk, FeatureThunk};
pub use classify::{classify, NamespaceGroup, NamespaceKind};
pub use extract::{extract, Extraction, FeatureDescriptor, LabelFn};
