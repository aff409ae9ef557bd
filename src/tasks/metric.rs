use std::fmt;

use serde::Serialize;

/// Scoring functions a task is evaluated with. Only the identifier is
/// carried here; computing scores is the evaluator's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Accuracy,
    F1Macro,
    /// Binary F1 of the positive class.
    F1,
    /// Matthews correlation coefficient.
    Mcc,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Accuracy => "accuracy",
            Metric::F1Macro => "f1_macro",
            Metric::F1 => "f1",
            Metric::Mcc => "mcc",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
