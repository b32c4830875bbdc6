use serde::{Deserialize, Serialize};

/// Rendering options for [`LineVisitor`](crate::LineVisitor)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineConfig {
    /// Drop namespaces that end up with no features
    pub skip_empty_namespaces: bool,
    /// Emit numeric features whose value is zero
    pub keep_zero_values: bool,
}
