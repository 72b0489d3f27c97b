use std::collections::HashMap;

use crate::error::EvaluationError;

/// Crisp readings keyed by input variable name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inputs(pub(crate) HashMap<String, f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(HashMap::new())
    }

    pub fn add(&mut self, variable: impl Into<String>, val: f64) {
        self.0.insert(variable.into(), val);
    }

    pub fn with(mut self, variable: impl Into<String>, val: f64) -> Self {
        self.add(variable, val);
        self
    }

    pub fn get(&self, variable: &str) -> Option<f64> {
        self.0.get(variable).copied()
    }

    /// The value of `variable`, rejecting absent and non-finite readings.
    pub(crate) fn crisp(&self, variable: &str) -> Result<f64, EvaluationError> {
        match self.0.get(variable) {
            None => Err(EvaluationError::MissingInput {
                variable: variable.to_owned(),
            }),
            Some(value) if !value.is_finite() => Err(EvaluationError::NonFiniteInput {
                variable: variable.to_owned(),
                value: *value,
            }),
            Some(value) => Ok(*value),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Inputs {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        Inputs(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[test]
fn test_crisp() {
    let inputs: Inputs = [("temp_room", 17.), ("humidity", f64::NAN)].into_iter().collect();

    assert_eq!(inputs.crisp("temp_room"), Ok(17.));
    assert!(matches!(
        inputs.crisp("humidity"),
        Err(EvaluationError::NonFiniteInput { .. })
    ));
    assert_eq!(
        inputs.crisp("temp_outside"),
        Err(EvaluationError::MissingInput {
            variable: "temp_outside".into()
        })
    );
}
