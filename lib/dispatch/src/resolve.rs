//! Overload resolution
//!
//! Picks the single most specific operation of a family for a value type.
//! Absence and ambiguity are both errors; the caller aborts synthesis.

use crate::matcher::{match_type, TypeMatch};
use featx_core::{Error, OperationFamily, Operation, ParamType, Result, TypeDesc};
use std::cmp::Ordering;
use tracing::debug;

/// Something with a formal parameter that can be resolved against
pub trait Candidate {
    fn param(&self) -> &ParamType;
}

impl<H> Candidate for Operation<H> {
    fn param(&self) -> &ParamType {
        Operation::param(self)
    }
}

impl Candidate for ParamType {
    fn param(&self) -> &ParamType {
        self
    }
}

/// The operation chosen for a dispatch site
#[derive(Debug)]
pub struct Resolved<'a, O> {
    pub operation: &'a O,
    pub index: usize,
    pub matched: TypeMatch,
}

/// Resolve the best candidate of `family` for `actual`
pub fn resolve<'a, O: Candidate>(
    family: OperationFamily,
    candidates: &'a [O],
    actual: &TypeDesc,
) -> Result<Resolved<'a, O>> {
    let mut best: Option<Resolved<'a, O>> = None;
    let mut tied: Vec<usize> = Vec::new();

    for (index, candidate) in candidates.iter().enumerate() {
        let Some(matched) = match_type(candidate.param(), actual) else {
            continue;
        };

        let ordering = match &best {
            Some(current) => matched.compare(&current.matched),
            None => Ordering::Less,
        };

        match ordering {
            Ordering::Less => {
                best = Some(Resolved {
                    operation: candidate,
                    index,
                    matched,
                });
                tied.clear();
            }
            Ordering::Equal => tied.push(index),
            Ordering::Greater => {}
        }
    }

    let Some(best) = best else {
        return Err(Error::NoApplicableOperation {
            family,
            value_type: actual.name().to_string(),
        });
    };

    if !tied.is_empty() {
        let candidates = std::iter::once(best.index)
            .chain(tied)
            .map(|i| candidates[i].param().to_string())
            .collect();
        return Err(Error::AmbiguousOperation {
            family,
            value_type: actual.name().to_string(),
            candidates,
        });
    }

    debug!(
        family = %family,
        value_type = actual.name(),
        param = %best.operation.param(),
        distance = best.matched.distance(),
        bindings = ?best.matched.bindings(),
        "resolved operation"
    );

    Ok(best)
}
