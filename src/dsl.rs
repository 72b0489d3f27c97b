use slotmap::SecondaryMap;

use crate::error::EvaluationError;
use crate::inputs::Inputs;
use crate::membership::MembershipFunction;
use crate::ops::{AndOp, OrOp};
use crate::system::ControlSystem;
use crate::variable::VariableKey;

/// The "IF" side of a rule: propositions over input variables joined by
/// fuzzy AND / OR.
#[derive(Clone, Debug, PartialEq)]
pub enum Antecedent {
    Term { variable: String, label: String },
    And(Box<Antecedent>, Box<Antecedent>),
    Or(Box<Antecedent>, Box<Antecedent>),
}

impl Antecedent {
    pub fn term(variable: impl Into<String>, label: impl Into<String>) -> Self {
        Antecedent::Term {
            variable: variable.into(),
            label: label.into(),
        }
    }

    pub fn and(self, rhs: Antecedent) -> Self {
        Antecedent::And(Box::new(self), Box::new(rhs))
    }

    pub fn or(self, rhs: Antecedent) -> Self {
        Antecedent::Or(Box::new(self), Box::new(rhs))
    }

    /// Left fold of `rest` onto `self` with AND.
    pub fn and_all(self, rest: impl IntoIterator<Item = Antecedent>) -> Self {
        rest.into_iter().fold(self, Antecedent::and)
    }

    /// Left fold of `rest` onto `self` with OR.
    pub fn or_all(self, rest: impl IntoIterator<Item = Antecedent>) -> Self {
        rest.into_iter().fold(self, Antecedent::or)
    }

    /// Every `(variable, label)` proposition, left to right.
    pub fn propositions(&self) -> Vec<(&str, &str)> {
        let mut props = Vec::new();

        fn parse<'p>(expr: &'p Antecedent, out: &mut Vec<(&'p str, &'p str)>) {
            match expr {
                Antecedent::Term { variable, label } => out.push((variable.as_str(), label.as_str())),
                Antecedent::And(lhs, rhs) | Antecedent::Or(lhs, rhs) => {
                    parse(lhs, out);
                    parse(rhs, out);
                },
            }
        }

        parse(self, &mut props);

        props
    }

    /// Degree to which this antecedent holds, with Zadeh min / max semantics.
    ///
    /// Terms are evaluated at the exact crisp value, not at universe samples.
    pub fn evaluate(&self, system: &ControlSystem, inputs: &Inputs) -> Result<f64, EvaluationError> {
        self.evaluate_with(AndOp::Min, OrOp::Max, system, inputs)
    }

    pub fn evaluate_with(
        &self,
        and_op: AndOp,
        or_op: OrOp,
        system: &ControlSystem,
        inputs: &Inputs,
    ) -> Result<f64, EvaluationError> {
        match self {
            Antecedent::Term { variable, label } => {
                let var = system.input(variable).ok_or_else(|| EvaluationError::UnknownVariable {
                    name: variable.clone(),
                })?;
                let membership = var.term(label).ok_or_else(|| EvaluationError::UnknownTerm {
                    variable: variable.clone(),
                    label: label.clone(),
                })?;
                let value = inputs.crisp(variable)?;

                Ok(membership.degree(value))
            },
            Antecedent::And(lhs, rhs) => {
                let left = lhs.evaluate_with(and_op, or_op, system, inputs)?;
                let right = rhs.evaluate_with(and_op, or_op, system, inputs)?;

                Ok(and_op.apply(left, right))
            },
            Antecedent::Or(lhs, rhs) => {
                let left = lhs.evaluate_with(and_op, or_op, system, inputs)?;
                let right = rhs.evaluate_with(and_op, or_op, system, inputs)?;

                Ok(or_op.apply(left, right))
            },
        }
    }
}

/// The "THEN" side of a rule: an output variable and one of its labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Consequent {
    pub variable: String,
    pub label: String,
}

impl Consequent {
    pub fn new(variable: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            label: label.into(),
        }
    }
}

/// An [`Antecedent`] whose names have been resolved against a validated
/// system, so evaluating it cannot fail.
#[derive(Clone, Debug)]
pub(crate) enum Premise {
    Is(VariableKey, MembershipFunction),
    And(Box<Premise>, Box<Premise>),
    Or(Box<Premise>, Box<Premise>),
}

impl Premise {
    /// `facts` holds a crisp value for every input variable of the system.
    pub(crate) fn strength(&self, facts: &SecondaryMap<VariableKey, f64>, and_op: AndOp, or_op: OrOp) -> f64 {
        match self {
            Premise::Is(key, membership) => membership.degree(facts[*key]),
            Premise::And(lhs, rhs) => and_op.apply(
                lhs.strength(facts, and_op, or_op),
                rhs.strength(facts, and_op, or_op),
            ),
            Premise::Or(lhs, rhs) => or_op.apply(
                lhs.strength(facts, and_op, or_op),
                rhs.strength(facts, and_op, or_op),
            ),
        }
    }
}

#[test]
fn test_builders() {
    let a = Antecedent::term("temp_room", "cold");
    let b = Antecedent::term("temp_outside", "cold");
    let c = Antecedent::term("humidity", "low");

    let expr = a.clone().and_all([b.clone(), c.clone()]);

    assert_eq!(expr, a.clone().and(b.clone()).and(c.clone()));
    assert_eq!(
        expr.propositions(),
        vec![("temp_room", "cold"), ("temp_outside", "cold"), ("humidity", "low")]
    );

    let expr = a.clone().or_all(Vec::new());

    assert_eq!(expr, a);
}
