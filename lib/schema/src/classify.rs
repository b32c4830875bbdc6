//! Namespace classification
//!
//! Groups descriptors by `(namespace, group)` and decides whether each group
//! is a dense namespace (a single dense sequence) or a sparse one.

use crate::extract::FeatureDescriptor;
use ahash::AHashMap;
use featx_core::{Error, Result, Visitor};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceKind {
    Dense,
    Sparse,
}

/// Features sharing one namespace, in serialization order
pub struct NamespaceGroup<R, V: Visitor> {
    pub namespace: Option<String>,
    pub group: Option<char>,
    pub kind: NamespaceKind,
    pub features: Vec<FeatureDescriptor<R, V>>,
}

impl<R, V: Visitor> NamespaceGroup<R, V> {
    pub fn is_dense(&self) -> bool {
        self.kind == NamespaceKind::Dense
    }
}

/// Classify the descriptors extracted from `record`.
///
/// Groups come out in order of first appearance; features of a sparse group
/// are stably sorted by their order key.
pub fn classify<R, V: Visitor>(
    record: &'static str,
    features: Vec<FeatureDescriptor<R, V>>,
) -> Result<Vec<NamespaceGroup<R, V>>> {
    if features.is_empty() {
        return Err(Error::NoFeatures { record });
    }

    let mut index: AHashMap<(Option<String>, Option<char>), usize> = AHashMap::new();
    let mut groups: Vec<NamespaceGroup<R, V>> = Vec::new();

    for feature in features {
        let key = (feature.namespace.clone(), feature.group);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(NamespaceGroup {
                namespace: feature.namespace.clone(),
                group: feature.group,
                kind: NamespaceKind::Sparse,
                features: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].features.push(feature);
    }

    for group in &mut groups {
        let dense = group.features.iter().filter(|f| f.dense).count();
        if dense > 0 && group.features.len() > 1 {
            return Err(Error::DenseConflict {
                record,
                namespace: group.namespace.clone(),
                group: group.group,
                features: group.features.len(),
            });
        }

        if dense == 1 {
            group.kind = NamespaceKind::Dense;
        } else {
            group.features.sort_by_key(|f| f.order);
        }

        trace!(
            record = record,
            namespace = ?group.namespace,
            group = ?group.group,
            kind = ?group.kind,
            features = group.features.len(),
            "classified namespace"
        );
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;
    use featx_core::{
        Capability, Describe, FeatureAttr, Namespace, OperationTable, Record, SparseNamespace,
    };

    struct Noop;

    impl Visitor for Noop {
        type ExampleResult = ();
        type NamespaceResult = ();
        type FeatureResult = ();

        fn register(ops: &mut OperationTable<Self>) {
            ops.visit_capability(Capability::Text, |_, _| ());
        }

        fn visit_example(&mut self, _label: Option<&str>, _namespaces: &[Namespace<'_, Self>]) {}

        fn visit_sparse(&mut self, _namespace: &SparseNamespace<'_, Self>) {}
    }

    struct Profile {
        age: i32,
        city: String,
        country: String,
        score: f64,
        embedding: Vec<f64>,
    }

    impl Record for Profile {
        fn describe<D: Describe<Self>>(d: &mut D) {
            d.field(FeatureAttr::field("City").namespace("u").order(2), |p: &Profile| &p.city);
            d.field(FeatureAttr::field("Score"), |p: &Profile| &p.score);
            d.field(FeatureAttr::field("Age").namespace("u").order(1), |p: &Profile| &p.age);
            d.field(FeatureAttr::field("Country").namespace("u").order(1), |p: &Profile| &p.country);
            d.field(FeatureAttr::field("Embedding").namespace("e"), |p: &Profile| &p.embedding);
        }
    }

    struct Crowded {
        a: Vec<f32>,
        b: i32,
    }

    impl Record for Crowded {
        fn describe<D: Describe<Self>>(d: &mut D) {
            d.field(FeatureAttr::field("a").namespace("x"), |c: &Crowded| &c.a);
            d.field(FeatureAttr::field("b").namespace("x"), |c: &Crowded| &c.b);
        }
    }

    struct Grouped {
        a: i32,
        b: i32,
    }

    impl Record for Grouped {
        fn describe<D: Describe<Self>>(d: &mut D) {
            d.field(FeatureAttr::field("a").namespace("x").group('p'), |g: &Grouped| &g.a);
            d.field(FeatureAttr::field("b").namespace("x").group('q'), |g: &Grouped| &g.b);
        }
    }

    struct Nothing;

    impl Record for Nothing {
        fn describe<D: Describe<Self>>(_d: &mut D) {}
    }

    fn names<R, V: Visitor>(group: &NamespaceGroup<R, V>) -> Vec<&str> {
        group.features.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_groups_in_first_appearance_order() {
        let features = extract::<Profile, Noop>(None, None).features;
        let groups = classify("Profile", features).unwrap();

        let keys: Vec<_> = groups.iter().map(|g| g.namespace.as_deref()).collect();
        assert_eq!(keys, vec![Some("u"), None, Some("e")]);
        assert!(groups[2].is_dense());
        assert!(!groups[0].is_dense());
    }

    #[test]
    fn test_stable_order_within_namespace() {
        let features = extract::<Profile, Noop>(None, None).features;
        let groups = classify("Profile", features).unwrap();
        // equal order keys keep discovery order
        assert_eq!(names(&groups[0]), vec!["Age", "Country", "City"]);
    }

    #[test]
    fn test_dense_conflict() {
        let features = extract::<Crowded, Noop>(None, None).features;
        let err = classify("Crowded", features).err().unwrap();
        assert_eq!(
            err,
            Error::DenseConflict {
                record: "Crowded",
                namespace: Some("x".to_string()),
                group: None,
                features: 2,
            }
        );
    }

    #[test]
    fn test_group_splits_namespace() {
        let features = extract::<Grouped, Noop>(None, None).features;
        let groups = classify("Grouped", features).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group, Some('p'));
        assert_eq!(groups[1].group, Some('q'));
    }

    #[test]
    fn test_no_features() {
        let features = extract::<Nothing, Noop>(None, None).features;
        let err = classify("Nothing", features).err().unwrap();
        assert_eq!(err, Error::NoFeatures { record: "Nothing" });
    }
}
