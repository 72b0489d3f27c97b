use std::collections::BTreeMap;

/// Crisp result of one evaluation, keyed by output variable name.
#[derive(Clone, Debug, PartialEq)]
pub struct Outputs {
    values: BTreeMap<String, f64>,
    max_activation: f64,
}

impl Outputs {
    pub(crate) fn new(values: BTreeMap<String, f64>, max_activation: f64) -> Self {
        Self { values, max_activation }
    }

    pub fn get(&self, variable: &str) -> Option<f64> {
        self.values.get(variable).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Strongest rule firing strength seen while producing these outputs.
    pub fn max_activation(&self) -> f64 {
        self.max_activation
    }

    /// No rule fired at all. Every output is then `0.0`, which is
    /// indistinguishable from a genuine zero without this flag.
    pub fn is_inconclusive(&self) -> bool {
        self.max_activation == 0.
    }

    pub fn into_inner(self) -> BTreeMap<String, f64> {
        self.values
    }
}
