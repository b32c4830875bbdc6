//! Type matching
//!
//! Scores how well a formal parameter accepts a concrete value type.
//! Lower distance is better; among equal distances the match satisfying
//! more capabilities is the more specific one.

use ahash::AHashMap;
use featx_core::{ParamType, TypeDesc};
use std::cmp::{Ordering, Reverse};

/// Result of matching one formal parameter against a value type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeMatch {
    distance: u32,
    capabilities: usize,
    bindings: AHashMap<&'static str, TypeDesc>,
}

impl TypeMatch {
    fn new(distance: u32, capabilities: usize) -> Self {
        Self {
            distance,
            capabilities,
            bindings: AHashMap::new(),
        }
    }

    fn bound(distance: u32, capabilities: usize, name: &'static str, actual: &TypeDesc) -> Self {
        let mut matched = Self::new(distance, capabilities);
        matched.bindings.insert(name, actual.clone());
        matched
    }

    pub fn distance(&self) -> u32 {
        self.distance
    }

    /// Number of capabilities the formal parameter requires and the value
    /// type satisfies
    pub fn capabilities(&self) -> usize {
        self.capabilities
    }

    /// Generic parameter bindings chosen by this match
    pub fn bindings(&self) -> &AHashMap<&'static str, TypeDesc> {
        &self.bindings
    }

    pub fn binding(&self, name: &str) -> Option<&TypeDesc> {
        self.bindings.get(name)
    }

    /// `Less` when `self` is the better (more specific) match
    pub fn compare(&self, other: &TypeMatch) -> Ordering {
        (self.distance, Reverse(self.capabilities)).cmp(&(other.distance, Reverse(other.capabilities)))
    }
}

/// Match `formal` against `actual`
pub fn match_type(formal: &ParamType, actual: &TypeDesc) -> Option<TypeMatch> {
    match formal {
        ParamType::Exact(desc) => (desc == actual).then(|| TypeMatch::new(0, actual.capabilities().len())),
        ParamType::Generic { name, bounds } => bounds
            .iter()
            .all(|bound| actual.has(*bound))
            .then(|| TypeMatch::bound(1, bounds.len(), *name, actual)),
        ParamType::Capability(capability) => actual
            .has(*capability)
            .then(|| TypeMatch::new(capability.specificity(), 1 + capability.implies().len())),
        ParamType::Sequence(inner) => {
            let element = actual.element()?;
            let inner = match_type(inner, element)?;
            // one structural step, plus the sequence capability itself
            Some(TypeMatch {
                distance: inner.distance + 1,
                capabilities: inner.capabilities + 1,
                bindings: inner.bindings,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use featx_core::{Capability, FeatureValue};

    #[test]
    fn test_exact_match() {
        let matched = match_type(&ParamType::Exact(i32::type_desc()), &i32::type_desc()).unwrap();
        assert_eq!(matched.distance(), 0);
        assert!(matched.bindings().is_empty());
        assert!(match_type(&ParamType::Exact(i32::type_desc()), &i64::type_desc()).is_none());
    }

    #[test]
    fn test_generic_binding() {
        let formal = ParamType::Generic {
            name: "T",
            bounds: vec![Capability::Text],
        };
        let matched = match_type(&formal, &String::type_desc()).unwrap();
        assert_eq!(matched.distance(), 1);
        assert!(matched.binding("T").unwrap().is::<String>());

        // bounds must all be carried
        let numeric = ParamType::Generic {
            name: "T",
            bounds: vec![Capability::Numeric],
        };
        assert!(match_type(&numeric, &String::type_desc()).is_none());
    }

    #[test]
    fn test_capability_specificity() {
        let integral = match_type(&ParamType::Capability(Capability::Integral), &i32::type_desc()).unwrap();
        let numeric = match_type(&ParamType::Capability(Capability::Numeric), &i32::type_desc()).unwrap();
        let text = match_type(&ParamType::Capability(Capability::Text), &i32::type_desc()).unwrap();

        assert_eq!(integral.distance(), numeric.distance());
        assert_eq!(integral.compare(&numeric), Ordering::Less);
        assert_eq!(numeric.compare(&text), Ordering::Less);
        assert!(match_type(&ParamType::Capability(Capability::Floating), &i32::type_desc()).is_none());
    }

    #[test]
    fn test_sequence_unification() {
        let formal = ParamType::Sequence(Box::new(ParamType::Generic {
            name: "E",
            bounds: vec![Capability::Numeric],
        }));
        let matched = match_type(&formal, &Vec::<u8>::type_desc()).unwrap();
        assert_eq!(matched.distance(), 2);
        assert!(matched.binding("E").unwrap().is::<u8>());

        assert!(match_type(&formal, &Vec::<String>::type_desc()).is_none());
        assert!(match_type(&formal, &u8::type_desc()).is_none());
    }

    #[test]
    fn test_exact_beats_structural() {
        let actual = Vec::<f32>::type_desc();
        let exact = match_type(&ParamType::Exact(actual.clone()), &actual).unwrap();
        let structural = match_type(
            &ParamType::Sequence(Box::new(ParamType::Exact(f32::type_desc()))),
            &actual,
        )
        .unwrap();
        assert_eq!(exact.compare(&structural), Ordering::Less);
    }
}
