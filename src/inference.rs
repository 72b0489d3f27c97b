use std::collections::BTreeMap;

use slotmap::SecondaryMap;
use tracing::{debug, trace};

use crate::error::EvaluationError;
use crate::inputs::Inputs;
use crate::ops::*;
use crate::outputs::Outputs;
use crate::system::{ControlSystem, Role};
use crate::variable::VariableKey;

/// Aggregated membership of one output variable, sampled on its universe.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedCurve {
    pub points: Vec<f64>,
    pub membership: Vec<f64>,
}

/// Everything one evaluation produced, for reporting why an output came out
/// the way it did.
#[derive(Clone, Debug, PartialEq)]
pub struct Explanation {
    /// Firing strength of each rule, in rule declaration order
    pub strengths: Vec<f64>,
    pub curves: BTreeMap<String, AggregatedCurve>,
    pub outputs: Outputs,
}

/// Mamdani style inference: fuzzify crisp inputs, fire every rule, shape each
/// consequent by its rule's strength, aggregate per output variable and
/// defuzzify.
///
/// The engine only holds its operator choices. Every call is a pure function
/// of the system and the inputs, so one engine and one system may serve any
/// number of threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InferenceEngine {
    and_op: AndOp,
    or_op: OrOp,
    imp_op: ImplicationOp,
    aggregation: OrOp,
    defuzz_op: DefuzzificationOp,
}

impl InferenceEngine {
    pub fn new(
        and_op: AndOp,
        or_op: OrOp,
        imp_op: ImplicationOp,
        aggregation: OrOp,
        defuzz_op: DefuzzificationOp,
    ) -> Self {
        Self {
            and_op,
            or_op,
            imp_op,
            aggregation,
            defuzz_op,
        }
    }

    /// min AND, max OR, clipping implication, max aggregation, centroid.
    pub fn mamdani() -> Self {
        Self::default()
    }

    pub fn with_defuzzification(self, defuzz_op: DefuzzificationOp) -> Self {
        Self { defuzz_op, ..self }
    }

    pub fn with_implication(self, imp_op: ImplicationOp) -> Self {
        Self { imp_op, ..self }
    }

    // Missing inputs are reported in declaration order so the error is stable
    fn facts(&self, system: &ControlSystem, inputs: &Inputs) -> Result<SecondaryMap<VariableKey, f64>, EvaluationError> {
        let mut facts = SecondaryMap::with_capacity(system.inputs.len());

        for key in &system.inputs {
            let name = system.variables[*key].variable.name();

            facts.insert(*key, inputs.crisp(name)?);
        }

        Ok(facts)
    }

    /// Firing strength of every rule, in rule declaration order.
    pub fn firing_strengths(&self, system: &ControlSystem, inputs: &Inputs) -> Result<Vec<f64>, EvaluationError> {
        let facts = self.facts(system, inputs)?;

        Ok(self.fire(system, &facts))
    }

    fn fire(&self, system: &ControlSystem, facts: &SecondaryMap<VariableKey, f64>) -> Vec<f64> {
        system
            .compiled
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                let strength = rule.premise.strength(facts, self.and_op, self.or_op);

                trace!(rule = i, strength, "fired rule");

                strength
            })
            .collect()
    }

    /// One aggregated curve per output variable, in declaration order.
    fn aggregate<'s>(&self, system: &'s ControlSystem, strengths: &[f64]) -> Vec<(VariableKey, &'s [f64], Vec<f64>)> {
        let mut curves = Vec::with_capacity(system.outputs.len());

        for key in &system.outputs {
            let Role::Output { samples } = &system.variables[*key].role else {
                continue;
            };
            // No rule targeting this variable leaves it at zero everywhere
            let mut aggregated = vec![0.; samples.len()];

            for (rule, strength) in system.compiled.iter().zip(strengths.iter().copied()) {
                // Zero is the identity of every aggregation operator
                if rule.output != *key || strength == 0. {
                    continue;
                }

                let implied = samples
                    .iter()
                    .map(|x| self.imp_op.apply(strength, rule.consequent.degree(*x)));

                self.aggregation.accumulate(aggregated.as_mut_slice(), implied);
            }

            curves.push((*key, samples.as_slice(), aggregated));
        }

        curves
    }

    fn defuzzify(&self, system: &ControlSystem, curves: &[(VariableKey, &[f64], Vec<f64>)], strengths: &[f64]) -> Outputs {
        let mut values = BTreeMap::new();

        for (key, samples, aggregated) in curves {
            let name = system.variables[*key].variable.name();
            let crisp = self.defuzz_op.call::<f64>(samples, aggregated);

            debug!(output = name, value = crisp, "defuzzified output");

            values.insert(name.to_owned(), crisp);
        }

        let max_activation = strengths.iter().copied().fold(0., f64::max);

        Outputs::new(values, max_activation)
    }

    /// Crisp value of every output variable for the given crisp inputs.
    ///
    /// `inputs` must hold a finite value for every input variable of
    /// `system`; extra entries are ignored. Values outside a variable's
    /// universe are legal and simply have zero membership everywhere.
    pub fn compute(&self, system: &ControlSystem, inputs: &Inputs) -> Result<Outputs, EvaluationError> {
        let strengths = self.firing_strengths(system, inputs)?;
        let curves = self.aggregate(system, &strengths);

        Ok(self.defuzzify(system, &curves, &strengths))
    }

    /// Like [`compute`](Self::compute), also returning the rule strengths and
    /// aggregated curves the outputs were derived from.
    pub fn explain(&self, system: &ControlSystem, inputs: &Inputs) -> Result<Explanation, EvaluationError> {
        let strengths = self.firing_strengths(system, inputs)?;
        let curves = self.aggregate(system, &strengths);
        let outputs = self.defuzzify(system, &curves, &strengths);
        let curves = curves
            .into_iter()
            .map(|(key, samples, membership)| {
                let curve = AggregatedCurve {
                    points: samples.to_vec(),
                    membership,
                };

                (system.variables[key].variable.name().to_owned(), curve)
            })
            .collect();

        Ok(Explanation {
            strengths,
            curves,
            outputs,
        })
    }

    /// Evaluates `output` at every sample point of the input `variable`,
    /// holding the remaining inputs at their values in `fixed`.
    pub fn sweep(
        &self,
        system: &ControlSystem,
        variable: &str,
        fixed: &Inputs,
        output: &str,
    ) -> Result<Vec<(f64, f64)>, EvaluationError> {
        let swept = system.input(variable).ok_or_else(|| EvaluationError::UnknownVariable {
            name: variable.to_owned(),
        })?;

        if system.output(output).is_none() {
            return Err(EvaluationError::UnknownVariable { name: output.to_owned() });
        }

        let mut inputs = fixed.clone();

        swept
            .sample_points()
            .into_iter()
            .map(|x| {
                inputs.add(variable, x);

                let outputs = self.compute(system, &inputs)?;

                Ok((x, outputs.get(output).unwrap_or_default()))
            })
            .collect()
    }
}

#[cfg(test)]
fn thermostat(rules: Vec<crate::Rule>) -> ControlSystem {
    use crate::{LinguisticVariable, Universe};

    let room = LinguisticVariable::new("room", Universe::new(10. ..=30., 1.).unwrap())
        .with_triangle("cold", 10., 10., 18.)
        .and_then(|v| v.with_triangle("comfortable", 16., 21., 25.))
        .and_then(|v| v.with_triangle("warm", 22., 28., 30.))
        .unwrap();
    let humidity = LinguisticVariable::new("humidity", Universe::new(20. ..=100., 1.).unwrap())
        .with_triangle("low", 20., 20., 40.)
        .and_then(|v| v.with_triangle("high", 70., 100., 100.))
        .unwrap();
    let power = LinguisticVariable::new("power", Universe::new(0. ..=100., 1.).unwrap())
        .with_triangle("low", 0., 0., 40.)
        .and_then(|v| v.with_triangle("medium", 20., 50., 80.))
        .and_then(|v| v.with_triangle("high", 60., 100., 100.))
        .unwrap();
    let fan = LinguisticVariable::new("fan", Universe::new(0. ..=10., 1.).unwrap())
        .with_triangle("on", 0., 10., 10.)
        .unwrap();

    ControlSystem::build([room, humidity], [power, fan], rules).unwrap()
}

#[cfg(test)]
fn default_rules() -> Vec<crate::Rule> {
    use crate::{Antecedent, Consequent, Rule};

    vec![
        Rule::new(Antecedent::term("room", "cold"), Consequent::new("power", "high")),
        Rule::new(Antecedent::term("room", "comfortable"), Consequent::new("power", "medium")),
        Rule::new(
            Antecedent::term("room", "warm").or(Antecedent::term("humidity", "high")),
            Consequent::new("power", "low"),
        ),
        Rule::new(
            Antecedent::term("room", "comfortable").and(Antecedent::term("humidity", "low")),
            Consequent::new("power", "high"),
        ),
    ]
}

#[test]
fn test_single_full_rule_lands_on_peak() {
    use crate::{Antecedent, Consequent, Rule};

    let system = thermostat(vec![Rule::new(
        Antecedent::term("room", "comfortable"),
        Consequent::new("power", "medium"),
    )]);
    let inputs = Inputs::new().with("room", 21.).with("humidity", 50.);
    let outputs = InferenceEngine::mamdani().compute(&system, &inputs).unwrap();

    assert_eq!(outputs.max_activation(), 1.);
    assert!((outputs.get("power").unwrap() - 50.).abs() < 1e-9);
}

#[test]
fn test_untargeted_output_is_zero() {
    let system = thermostat(default_rules());
    let inputs = Inputs::new().with("room", 12.).with("humidity", 50.);
    let outputs = InferenceEngine::mamdani().compute(&system, &inputs).unwrap();

    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs.get("fan"), Some(0.));
    assert!(outputs.get("power").unwrap() > 70.);
}

#[test]
fn test_zero_activation_falls_back_to_zero() {
    let system = thermostat(default_rules());
    // Every term of every rule is zero far outside the universes
    let inputs = Inputs::new().with("room", -100.).with("humidity", 50.);
    let outputs = InferenceEngine::mamdani().compute(&system, &inputs).unwrap();

    assert!(outputs.is_inconclusive());
    assert!(outputs.iter().all(|(_, v)| v == 0.));
}

#[test]
fn test_firing_strengths() {
    let system = thermostat(default_rules());
    let inputs = Inputs::new().with("room", 17.).with("humidity", 30.);
    let strengths = InferenceEngine::mamdani().firing_strengths(&system, &inputs).unwrap();

    // cold: (18 - 17) / 8, comfortable: (17 - 16) / 5, humidity low: (40 - 30) / 20
    assert_eq!(strengths, vec![0.125, 0.2, 0., 0.2]);
}

#[test]
fn test_missing_input() {
    let system = thermostat(default_rules());
    let engine = InferenceEngine::mamdani();
    let err = engine.compute(&system, &Inputs::new().with("humidity", 30.));

    assert_eq!(
        err,
        Err(EvaluationError::MissingInput {
            variable: "room".into()
        })
    );

    // The failed call leaves nothing behind
    let inputs = Inputs::new().with("room", 17.).with("humidity", 30.);

    assert!(engine.compute(&system, &inputs).is_ok());
}

#[test]
fn test_non_finite_input() {
    let system = thermostat(default_rules());
    let inputs = Inputs::new().with("room", f64::INFINITY).with("humidity", 30.);

    assert!(matches!(
        InferenceEngine::mamdani().compute(&system, &inputs),
        Err(EvaluationError::NonFiniteInput { .. })
    ));
}

#[test]
fn test_rule_order_is_irrelevant() {
    let forward = thermostat(default_rules());
    let mut reversed_rules = default_rules();
    reversed_rules.reverse();
    let reversed = thermostat(reversed_rules);
    let engine = InferenceEngine::mamdani();

    for room in [11., 15.5, 17., 20., 23., 26., 29.] {
        for humidity in [20., 35., 60., 85.] {
            let inputs = Inputs::new().with("room", room).with("humidity", humidity);

            assert_eq!(
                engine.compute(&forward, &inputs).unwrap(),
                engine.compute(&reversed, &inputs).unwrap()
            );
        }
    }
}

#[test]
fn test_explain_matches_compute() {
    let system = thermostat(default_rules());
    let engine = InferenceEngine::mamdani();
    let inputs = Inputs::new().with("room", 19.).with("humidity", 75.);
    let explanation = engine.explain(&system, &inputs).unwrap();

    assert_eq!(explanation.outputs, engine.compute(&system, &inputs).unwrap());
    assert_eq!(explanation.strengths.len(), 4);

    let curve = &explanation.curves["power"];

    assert_eq!(curve.points.len(), 101);
    assert_eq!(curve.membership.len(), 101);
    assert!(curve.membership.iter().all(|m| (0. ..=1.).contains(m)));
    assert!(explanation.curves["fan"].membership.iter().all(|m| *m == 0.));
}

#[test]
fn test_scaling_implication_keeps_peak() {
    use crate::{Antecedent, Consequent, Rule};

    let system = thermostat(vec![Rule::new(
        Antecedent::term("room", "comfortable"),
        Consequent::new("power", "medium"),
    )]);
    let engine = InferenceEngine::mamdani()
        .with_implication(ImplicationOp::Prod)
        .with_defuzzification(DefuzzificationOp::MeanOfMaximum);
    let inputs = Inputs::new().with("room", 18.5).with("humidity", 50.);

    assert_eq!(engine.compute(&system, &inputs).unwrap().get("power"), Some(50.));
}

#[test]
fn test_sweep() {
    let system = thermostat(default_rules());
    let engine = InferenceEngine::mamdani();
    let fixed = Inputs::new().with("humidity", 50.);
    let curve = engine.sweep(&system, "room", &fixed, "power").unwrap();

    assert_eq!(curve.len(), 21);
    assert_eq!(curve[0].0, 10.);
    assert_eq!(curve[20].0, 30.);
    // Colder rooms get more heat
    assert!(curve[0].1 > curve[20].1);

    assert_eq!(
        engine.sweep(&system, "power", &fixed, "power"),
        Err(EvaluationError::UnknownVariable { name: "power".into() })
    );
    assert_eq!(
        engine.sweep(&system, "room", &Inputs::new(), "power"),
        Err(EvaluationError::MissingInput {
            variable: "humidity".into()
        })
    );
}
