//! # featx Dispatch
//!
//! Overload resolution for visitor operations.
//!
//! A visitor declares several operations per family (`visit`,
//! `visit_enumerize`, `dense`). For a given value type the resolver scores
//! every candidate and keeps the most specific one:
//!
//! | formal parameter          | distance          | tie-break                    |
//! |---------------------------|-------------------|------------------------------|
//! | exact type                | 0                 | -                            |
//! | generic `T: bounds`       | 1                 | number of bounds             |
//! | capability                | its specificity   | 1 + capabilities it implies  |
//! | sequence of `inner`       | inner + 1         | inner + 1                    |
//!
//! No match and equally good best matches are both errors.

pub mod matcher;
pub mod resolve;

pub use matcher::{match_type, TypeMatch};
pub use resolve::{resolve, Candidate, Resolved};
