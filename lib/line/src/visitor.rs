//! Text line rendering
//!
//! `label |ns feature feature:value |group-ns ...`
//!
//! - numeric: `Name:value`, zero values dropped unless configured
//! - boolean: `Name` when true, nothing when false
//! - text: each whitespace separated token
//! - enumerized: `NameValue`
//! - numeric sequence: `Name_i:value`
//! - dense: `i:value`

use crate::config::LineConfig;
use featx_core::{
    Capability, DenseSlice, Feature, FeatureValue, Namespace, OperationFamily, OperationTable, ParamType,
    SparseNamespace, Visitor,
};

/// Replace characters with meaning in the line format
pub fn escape(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_whitespace() || c == '|' || c == ':' { '_' } else { c })
        .collect()
}

fn number(config: &LineConfig, name: &str, value: f64) -> Option<String> {
    if value == 0.0 && !config.keep_zero_values {
        return None;
    }
    Some(format!("{}:{}", escape(name), value))
}

fn joined(tokens: Vec<String>) -> Option<String> {
    (!tokens.is_empty()).then(|| tokens.join(" "))
}

/// Visitor producing one text line per example
#[derive(Debug, Clone, Default)]
pub struct LineVisitor {
    config: LineConfig,
}

impl LineVisitor {
    pub fn new(config: LineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LineConfig {
        &self.config
    }

    fn numeric(&mut self, feature: &Feature<'_, dyn FeatureValue>) -> Option<String> {
        number(&self.config, feature.name, feature.value.as_number()?)
    }

    fn boolean(&mut self, feature: &Feature<'_, dyn FeatureValue>) -> Option<String> {
        feature.value.as_bool()?.then(|| escape(feature.name))
    }

    fn text(&mut self, feature: &Feature<'_, dyn FeatureValue>) -> Option<String> {
        let text = feature.value.as_text()?;
        joined(text.split_whitespace().map(escape).collect())
    }

    fn enumerized(&mut self, feature: &Feature<'_, dyn FeatureValue>) -> Option<String> {
        let text = feature.value.as_text()?;
        Some(escape(&format!("{}{}", feature.name, text)))
    }

    fn numeric_sequence(&mut self, feature: &Feature<'_, dyn FeatureValue>) -> Option<String> {
        let elements = feature.value.elements()?;
        let tokens = elements
            .iter()
            .enumerate()
            .filter_map(|(i, element)| {
                let name = format!("{}_{}", feature.name, i);
                number(&self.config, &name, element.as_number()?)
            })
            .collect();
        joined(tokens)
    }

    fn text_sequence(&mut self, feature: &Feature<'_, dyn FeatureValue>) -> Option<String> {
        let elements = feature.value.elements()?;
        let tokens = elements
            .iter()
            .filter_map(|element| element.as_text())
            .flat_map(|text| text.split_whitespace().map(escape).collect::<Vec<_>>())
            .collect();
        joined(tokens)
    }

    fn enumerized_sequence(&mut self, feature: &Feature<'_, dyn FeatureValue>) -> Option<String> {
        let elements = feature.value.elements()?;
        let tokens = elements
            .iter()
            .filter_map(|element| element.as_text())
            .map(|text| escape(&format!("{}{}", feature.name, text)))
            .collect();
        joined(tokens)
    }

    fn dense(&mut self, feature: &Feature<'_, DenseSlice<'_>>) -> Option<String> {
        let tokens = feature
            .value
            .iter()
            .enumerate()
            .filter_map(|(i, value)| number(&self.config, &i.to_string(), value))
            .collect();
        self.namespace(feature.namespace, feature.group, tokens)
    }

    fn namespace(&self, name: Option<&str>, group: Option<char>, tokens: Vec<String>) -> Option<String> {
        if tokens.is_empty() && self.config.skip_empty_namespaces {
            return None;
        }

        let mut out = String::from("|");
        if let Some(group) = group {
            out.push(group);
        }
        if let Some(name) = name {
            out.push_str(&escape(name));
        }
        for token in tokens {
            out.push(' ');
            out.push_str(&token);
        }
        Some(out)
    }
}

impl Visitor for LineVisitor {
    type ExampleResult = String;
    type NamespaceResult = Option<String>;
    type FeatureResult = Option<String>;

    fn register(ops: &mut OperationTable<Self>) {
        let numeric_elements = ParamType::Sequence(Box::new(ParamType::Capability(Capability::Numeric)));
        let text_elements = ParamType::Sequence(Box::new(ParamType::Capability(Capability::Text)));

        ops.visit_capability(Capability::Numeric, Self::numeric)
            .visit_capability(Capability::Boolean, Self::boolean)
            .visit_capability(Capability::Text, Self::text)
            .feature_param(OperationFamily::Visit, numeric_elements, Self::numeric_sequence)
            .feature_param(OperationFamily::Visit, text_elements.clone(), Self::text_sequence)
            .visit_enumerize_capability(Capability::Text, Self::enumerized)
            .feature_param(OperationFamily::VisitEnumerize, text_elements, Self::enumerized_sequence)
            .dense_generic("E", Self::dense);
    }

    fn visit_example(&mut self, label: Option<&str>, namespaces: &[Namespace<'_, Self>]) -> String {
        let mut line = label.unwrap_or_default().to_string();
        for namespace in namespaces {
            if let Some(text) = namespace.visit(self) {
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(&text);
            }
        }
        line
    }

    fn visit_sparse(&mut self, namespace: &SparseNamespace<'_, Self>) -> Option<String> {
        let tokens = namespace
            .features()
            .iter()
            .filter_map(|feature| feature.visit(self))
            .collect();
        self.namespace(namespace.name(), namespace.group(), tokens)
    }
}
