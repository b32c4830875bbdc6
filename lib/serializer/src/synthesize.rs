//! Serializer synthesis
//!
//! Builds the compiled procedure for one (record type, visitor type) pair.
//! Every dispatch site is resolved here; [`CompiledSerializer::serialize`]
//! only builds the per-call namespace graph and runs the stored closures.

use featx_core::{
    DenseNamespace, Error, FeatureMeta, Namespace, OperationFamily, OperationTable, Record, Result,
    SparseFeature, SparseNamespace, Visitor,
};
use featx_schema::{classify, extract, DenseThunk, FeatureThunk, LabelFn, NamespaceKind};
use std::any::type_name;
use std::fmt;
use tracing::debug;

struct FeaturePlan<R, V: Visitor> {
    meta: FeatureMeta,
    thunk: FeatureThunk<R, V>,
}

enum NamespacePlan<R, V: Visitor> {
    Dense {
        meta: FeatureMeta,
        thunk: DenseThunk<R, V>,
    },
    Sparse {
        name: Option<String>,
        group: Option<char>,
        features: Vec<FeaturePlan<R, V>>,
    },
}

/// Shape of one compiled namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceLayout {
    pub namespace: Option<String>,
    pub group: Option<char>,
    pub dense: bool,
    pub features: Vec<String>,
}

impl fmt::Display for NamespaceLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.dense { "dense" } else { "sparse" };
        write!(f, "{} ", kind)?;
        if let Some(group) = self.group {
            write!(f, "{}", group)?;
        }
        write!(f, "{}: {}", self.namespace.as_deref().unwrap_or("<default>"), self.features.join(", "))
    }
}

/// Type-specialized serialization procedure for records `R` and visitors `V`
pub struct CompiledSerializer<R, V: Visitor> {
    record: &'static str,
    visitor: &'static str,
    namespaces: Vec<NamespacePlan<R, V>>,
    label: Option<LabelFn<R>>,
}

impl<R, V: Visitor> CompiledSerializer<R, V> {
    /// Serialize `record` into `visitor`
    pub fn serialize(&self, record: &R, visitor: &mut V) -> V::ExampleResult {
        let namespaces: Vec<Namespace<'_, V>> = self
            .namespaces
            .iter()
            .map(|plan| match plan {
                NamespacePlan::Dense { meta, thunk } => Namespace::Dense(DenseNamespace::new(
                    meta,
                    Box::new(move |visitor: &mut V| thunk(record, visitor, meta)),
                )),
                NamespacePlan::Sparse { name, group, features } => {
                    let features = features
                        .iter()
                        .map(|feature| {
                            SparseFeature::new(
                                &feature.meta,
                                Box::new(move |visitor: &mut V| (feature.thunk)(record, visitor, &feature.meta)),
                            )
                        })
                        .collect();
                    Namespace::Sparse(SparseNamespace::new(name.as_deref(), *group, features))
                }
            })
            .collect();

        let label = self.label.as_ref().and_then(|label| label(record));
        visitor.visit_example(label.as_deref(), &namespaces)
    }

    pub fn record_type(&self) -> &'static str {
        self.record
    }

    pub fn visitor_type(&self) -> &'static str {
        self.visitor
    }

    pub fn namespace_count(&self) -> usize {
        self.namespaces.len()
    }

    pub fn feature_count(&self) -> usize {
        self.namespaces
            .iter()
            .map(|plan| match plan {
                NamespacePlan::Dense { .. } => 1,
                NamespacePlan::Sparse { features, .. } => features.len(),
            })
            .sum()
    }

    pub fn has_label(&self) -> bool {
        self.label.is_some()
    }

    /// Namespaces and feature names in visiting order
    pub fn layout(&self) -> Vec<NamespaceLayout> {
        self.namespaces
            .iter()
            .map(|plan| match plan {
                NamespacePlan::Dense { meta, .. } => NamespaceLayout {
                    namespace: meta.namespace.clone(),
                    group: meta.group,
                    dense: true,
                    features: vec![meta.name.clone()],
                },
                NamespacePlan::Sparse { name, group, features } => NamespaceLayout {
                    namespace: name.clone(),
                    group: *group,
                    dense: false,
                    features: features.iter().map(|f| f.meta.name.clone()).collect(),
                },
            })
            .collect()
    }
}

impl<R, V: Visitor> fmt::Debug for CompiledSerializer<R, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSerializer")
            .field("record", &self.record)
            .field("visitor", &self.visitor)
            .field("layout", &self.layout())
            .field("label", &self.label.is_some())
            .finish()
    }
}

/// Synthesize the serializer for `R` and `V`
pub fn synthesize<R: Record, V: Visitor>() -> Result<CompiledSerializer<R, V>> {
    let record = type_name::<R>();
    let visitor = type_name::<V>();

    let extraction = extract::<R, V>(None, None);
    if let Some(field) = extraction.empty_nested.first() {
        return Err(Error::EmptyNested {
            record,
            field: field.clone(),
        });
    }
    let groups = classify(record, extraction.features)?;
    let ops = OperationTable::<V>::of();

    let mut namespaces = Vec::with_capacity(groups.len());
    for group in groups {
        match group.kind {
            NamespaceKind::Dense => {
                for feature in &group.features {
                    let thunk = feature.bind_dense(&ops).unwrap_or_else(|| {
                        Err(Error::NoApplicableOperation {
                            family: OperationFamily::Dense,
                            value_type: feature.value_type.name().to_string(),
                        })
                    })?;
                    namespaces.push(NamespacePlan::Dense {
                        meta: feature.meta(),
                        thunk,
                    });
                }
            }
            NamespaceKind::Sparse => {
                let features = group
                    .features
                    .iter()
                    .map(|feature| -> Result<FeaturePlan<R, V>> {
                        Ok(FeaturePlan {
                            meta: feature.meta(),
                            thunk: feature.bind_sparse(&ops)?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                namespaces.push(NamespacePlan::Sparse {
                    name: group.namespace,
                    group: group.group,
                    features,
                });
            }
        }
    }

    let compiled = CompiledSerializer {
        record,
        visitor,
        namespaces,
        label: extraction.label,
    };

    debug!(
        record = record,
        visitor = visitor,
        namespaces = compiled.namespace_count(),
        features = compiled.feature_count(),
        "synthesized serializer"
    );

    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use featx_core::{Capability, Describe, FeatureAttr, FeatureValue, StringLabel};

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Visitor for Recorder {
        type ExampleResult = Vec<String>;
        type NamespaceResult = ();
        type FeatureResult = ();

        fn register(ops: &mut OperationTable<Self>) {
            ops.visit::<i32, _>(|v, f| v.events.push(format!("visit {}={}", f.name, f.value)))
                .visit_capability(Capability::Text, |v, f| {
                    let text = f.value.as_text().unwrap_or_default();
                    v.events.push(format!("visit {}={}", f.name, text));
                })
                .visit_enumerize_capability(Capability::Text, |v, f| {
                    let text = f.value.as_text().unwrap_or_default();
                    v.events.push(format!("enumerize {}={}", f.name, text));
                })
                .dense::<f32, _>(|v, f| v.events.push(format!("dense f32 {}[{}]", f.name, f.value.len())))
                .dense::<f64, _>(|v, f| v.events.push(format!("dense f64 {}[{}]", f.name, f.value.len())));
        }

        fn visit_example(&mut self, label: Option<&str>, namespaces: &[Namespace<'_, Self>]) -> Vec<String> {
            for namespace in namespaces {
                namespace.visit(self);
            }
            self.events.push(format!("example {:?}", label));
            std::mem::take(&mut self.events)
        }

        fn visit_sparse(&mut self, namespace: &SparseNamespace<'_, Self>) {
            for feature in namespace.features() {
                feature.visit(self);
            }
            self.events.push(format!("namespace {:?}", namespace.name()));
        }
    }

    struct Profile {
        label: Option<StringLabel>,
        nickname: Option<String>,
        age: i32,
        scores: [f64; 3],
    }

    impl Record for Profile {
        fn describe<D: Describe<Self>>(d: &mut D) {
            d.label(|p: &Profile| p.label.as_ref());
            d.optional(FeatureAttr::field("Nick").namespace("u"), |p: &Profile| &p.nickname);
            d.field(FeatureAttr::field("Age").namespace("u"), |p: &Profile| &p.age);
            d.field(FeatureAttr::field("Scores").namespace("s"), |p: &Profile| &p.scores);
        }
    }

    struct Bare;

    impl Record for Bare {
        fn describe<D: Describe<Self>>(_d: &mut D) {}
    }

    struct Shell {
        id: i32,
        inner: Bare,
    }

    impl Record for Shell {
        fn describe<D: Describe<Self>>(d: &mut D) {
            d.field(FeatureAttr::field("Id"), |s: &Shell| &s.id);
            d.nested(FeatureAttr::field("inner").namespace("in"), |s: &Shell| &s.inner);
        }
    }

    struct Flags {
        on: bool,
    }

    impl Record for Flags {
        fn describe<D: Describe<Self>>(d: &mut D) {
            d.field(FeatureAttr::field("On"), |f: &Flags| &f.on);
        }
    }

    struct Twice;

    impl Visitor for Twice {
        type ExampleResult = ();
        type NamespaceResult = ();
        type FeatureResult = ();

        fn register(ops: &mut OperationTable<Self>) {
            ops.visit_capability(Capability::Boolean, |_, _| ())
                .visit_capability(Capability::Boolean, |_, _| ());
        }

        fn visit_example(&mut self, _label: Option<&str>, _namespaces: &[Namespace<'_, Self>]) {}

        fn visit_sparse(&mut self, _namespace: &SparseNamespace<'_, Self>) {}
    }

    fn profile(nickname: Option<&str>) -> Profile {
        Profile {
            label: Some(StringLabel("2".to_string())),
            nickname: nickname.map(str::to_string),
            age: 41,
            scores: [0.1, 0.2, 0.3],
        }
    }

    #[test]
    fn test_serialize_visits_in_plan_order() {
        let compiled = synthesize::<Profile, Recorder>().unwrap();
        let events = compiled.serialize(&profile(Some("bob")), &mut Recorder::default());
        assert_eq!(
            events,
            vec![
                "visit Nick=bob",
                "visit Age=41",
                "namespace Some(\"u\")",
                "dense f64 Scores[3]",
                "example Some(\"2\")",
            ]
        );
    }

    #[test]
    fn test_absent_value_skips_operation() {
        let compiled = synthesize::<Profile, Recorder>().unwrap();
        let events = compiled.serialize(&profile(None), &mut Recorder::default());
        assert!(!events.iter().any(|e| e.starts_with("visit Nick")));
        assert_eq!(events[0], "visit Age=41");
    }

    #[test]
    fn test_layout_and_counts() {
        let compiled = synthesize::<Profile, Recorder>().unwrap();
        assert_eq!(compiled.namespace_count(), 2);
        assert_eq!(compiled.feature_count(), 3);
        assert!(compiled.has_label());

        let layout = compiled.layout();
        assert!(!layout[0].dense);
        assert_eq!(layout[0].features, vec!["Nick", "Age"]);
        assert!(layout[1].dense);
        assert_eq!(layout[1].to_string(), "dense s: Scores");
    }

    #[test]
    fn test_no_features() {
        let err = synthesize::<Bare, Recorder>().err().unwrap();
        assert!(matches!(err, Error::NoFeatures { .. }));
    }

    #[test]
    fn test_empty_nested_record_is_rejected() {
        let err = synthesize::<Shell, Recorder>().err().unwrap();
        assert_eq!(
            err,
            Error::EmptyNested {
                record: type_name::<Shell>(),
                field: "inner".to_string(),
            }
        );
        assert!(err.to_string().contains("inner"));
    }

    #[test]
    fn test_unresolvable_operation_aborts() {
        // Recorder has no boolean operation, but bool carries text
        assert!(synthesize::<Flags, Recorder>().is_ok());

        let err = synthesize::<Flags, Twice>().err().unwrap();
        assert!(matches!(err, Error::AmbiguousOperation { .. }));
        assert!(bool::type_desc().has(Capability::Boolean));
    }
}
