use std::collections::BTreeMap;

use slotmap::new_key_type;

use crate::dsl::Antecedent;
use crate::error::ValidationError;
use crate::linspace::Universe;
use crate::membership::MembershipFunction;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// A named quantity with a discretized universe and a set of labeled
/// membership functions, e.g. `temp_room` with `cold`, `comfortable`, `warm`.
#[derive(Clone, Debug)]
pub struct LinguisticVariable {
    name: String,
    universe: Universe,
    terms: BTreeMap<String, MembershipFunction>,
}

impl LinguisticVariable {
    pub fn new(name: impl Into<String>, universe: Universe) -> Self {
        Self {
            name: name.into(),
            universe,
            terms: BTreeMap::new(),
        }
    }

    pub fn add_term(&mut self, label: impl Into<String>, membership: MembershipFunction) -> Result<(), ValidationError> {
        let label = label.into();

        if self.terms.contains_key(&label) {
            return Err(ValidationError::DuplicateLabel {
                variable: self.name.clone(),
                label,
            });
        }

        self.terms.insert(label, membership);

        Ok(())
    }

    /// Chaining form of [`add_term`](Self::add_term) for triangular terms.
    pub fn with_triangle(mut self, label: impl Into<String>, a: f64, b: f64, c: f64) -> Result<Self, ValidationError> {
        self.add_term(label, MembershipFunction::triangular(a, b, c)?)?;

        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn term(&self, label: &str) -> Option<&MembershipFunction> {
        self.terms.get(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    /// Degree of membership of `x` in every label of this variable.
    pub fn fuzzify(&self, x: f64) -> BTreeMap<&str, f64> {
        self.terms
            .iter()
            .map(|(label, membership)| (label.as_str(), membership.degree(x)))
            .collect()
    }

    /// The discretized universe; see [`Universe`] for how the last sample is chosen.
    pub fn sample_points(&self) -> Vec<f64> {
        self.universe.points().collect()
    }

    /// Proposition "this variable is `label`", for use in rule antecedents.
    pub fn is(&self, label: impl Into<String>) -> Antecedent {
        Antecedent::term(self.name.clone(), label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn humidity() -> LinguisticVariable {
        LinguisticVariable::new("humidity", Universe::new(20. ..=100., 1.).unwrap())
            .with_triangle("low", 20., 20., 40.)
            .and_then(|v| v.with_triangle("moderate", 35., 60., 80.))
            .and_then(|v| v.with_triangle("high", 70., 100., 100.))
            .unwrap()
    }

    #[test]
    fn test_fuzzify() {
        let var = humidity();
        let degrees = var.fuzzify(37.5);

        assert_eq!(degrees.len(), 3);
        assert_eq!(degrees["low"], 0.125);
        assert_eq!(degrees["moderate"], 0.1);
        assert_eq!(degrees["high"], 0.);
    }

    #[test]
    fn test_fuzzify_outside_universe() {
        let humidity = humidity();
        let degrees = humidity.fuzzify(500.);

        assert!(degrees.values().all(|d| *d == 0.));
    }

    #[test]
    fn test_sample_points() {
        let points = humidity().sample_points();

        assert_eq!(points.len(), 81);
        assert_eq!(points.first(), Some(&20.));
        assert_eq!(points.last(), Some(&100.));
    }

    #[test]
    fn test_duplicate_label() {
        let err = humidity().with_triangle("low", 0., 1., 2.).unwrap_err();

        assert_eq!(
            err,
            ValidationError::DuplicateLabel {
                variable: "humidity".into(),
                label: "low".into()
            }
        );
    }

    #[test]
    fn test_is() {
        assert_eq!(humidity().is("low"), Antecedent::term("humidity", "low"));
    }
}
