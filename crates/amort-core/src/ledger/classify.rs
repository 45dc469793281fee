use serde::{Deserialize, Serialize};

/// Outcome of classifying a free-text operation description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationClass {
    /// An out-of-schedule payment applied directly to principal.
    AmortizationExtra,
    Other,
}

/// Classifies raw operations by matching their description against a
/// configurable set of recognized patterns, case-insensitively.
///
/// Keeps the ledger builder decoupled from any particular upstream text
/// format: swapping statement providers means swapping patterns, not code.
#[derive(Debug, Clone)]
pub struct OperationClassifier {
    patterns: Vec<String>,
}

impl Default for OperationClassifier {
    fn default() -> Self {
        // Labels used by Brazilian mortgage statements, with and without
        // diacritics.
        Self::new(["amortizacao", "amortização"])
    }
}

impl OperationClassifier {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.into().to_lowercase())
                .collect(),
        }
    }

    pub fn classify(&self, description: &str) -> OperationClass {
        let lowered = description.to_lowercase();
        if self.patterns.iter().any(|p| lowered.contains(p.as_str())) {
            OperationClass::AmortizationExtra
        } else {
            OperationClass::Other
        }
    }
}
