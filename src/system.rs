use std::collections::HashMap;

use slotmap::SlotMap;
use tracing::debug;

use crate::dsl::{Antecedent, Consequent, Premise};
use crate::error::ValidationError;
use crate::membership::MembershipFunction;
use crate::rules::Rule;
use crate::variable::{LinguisticVariable, VariableKey};

pub(crate) enum Role {
    Input,
    /// Outputs are only ever looked at on their sample points, so those are
    /// computed once here.
    Output { samples: Vec<f64> },
}

pub(crate) struct Slot {
    pub(crate) variable: LinguisticVariable,
    pub(crate) role: Role,
}

pub(crate) struct CompiledRule {
    pub(crate) premise: Premise,
    pub(crate) output: VariableKey,
    pub(crate) consequent: MembershipFunction,
}

/// Validated, immutable set of input variables, output variables and rules.
///
/// Every name a rule mentions is checked when the system is built, so a
/// `ControlSystem` in hand is always internally consistent. It holds no
/// per-evaluation state and can be shared freely across threads.
pub struct ControlSystem {
    pub(crate) variables: SlotMap<VariableKey, Slot>,
    names: HashMap<String, VariableKey>,
    // Declaration order, kept for deterministic iteration and error reporting
    pub(crate) inputs: Vec<VariableKey>,
    pub(crate) outputs: Vec<VariableKey>,
    rules: Vec<Rule>,
    pub(crate) compiled: Vec<CompiledRule>,
}

impl ControlSystem {
    pub fn builder() -> ControlSystemBuilder {
        ControlSystemBuilder::default()
    }

    pub fn build(
        inputs: impl IntoIterator<Item = LinguisticVariable>,
        outputs: impl IntoIterator<Item = LinguisticVariable>,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Result<Self, ValidationError> {
        let mut this = Self {
            variables: SlotMap::with_key(),
            names: HashMap::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            rules: Vec::new(),
            compiled: Vec::new(),
        };

        for variable in inputs {
            let key = this.declare(variable, Role::Input)?;
            this.inputs.push(key);
        }

        for variable in outputs {
            let samples = variable.sample_points();
            let key = this.declare(variable, Role::Output { samples })?;
            this.outputs.push(key);
        }

        for rule in rules {
            let premise = this.resolve_premise(&rule.antecedent)?;
            let (output, consequent) = this.resolve_consequent(&rule.consequent)?;

            this.compiled.push(CompiledRule {
                premise,
                output,
                consequent,
            });
            this.rules.push(rule);
        }

        debug!(
            inputs = this.inputs.len(),
            outputs = this.outputs.len(),
            rules = this.rules.len(),
            "built fuzzy control system"
        );

        Ok(this)
    }

    fn declare(&mut self, variable: LinguisticVariable, role: Role) -> Result<VariableKey, ValidationError> {
        let name = variable.name().to_owned();

        if let Some(existing) = self.names.get(&name) {
            let conflict = matches!(
                (&self.variables[*existing].role, &role),
                (Role::Input, Role::Output { .. }) | (Role::Output { .. }, Role::Input)
            );

            return Err(if conflict {
                ValidationError::InputOutputConflict { name }
            } else {
                ValidationError::DuplicateVariable { name }
            });
        }

        if variable.labels().next().is_none() {
            return Err(ValidationError::EmptyVariable { name });
        }

        let key = self.variables.insert(Slot { variable, role });
        self.names.insert(name, key);

        Ok(key)
    }

    fn lookup(&self, name: &str) -> Result<(VariableKey, &Slot), ValidationError> {
        self.names
            .get(name)
            .map(|key| (*key, &self.variables[*key]))
            .ok_or_else(|| ValidationError::UnknownVariable { name: name.to_owned() })
    }

    fn lookup_term(slot: &Slot, label: &str) -> Result<MembershipFunction, ValidationError> {
        slot.variable
            .term(label)
            .copied()
            .ok_or_else(|| ValidationError::UnknownLabel {
                variable: slot.variable.name().to_owned(),
                label: label.to_owned(),
            })
    }

    fn resolve_premise(&self, antecedent: &Antecedent) -> Result<Premise, ValidationError> {
        Ok(match antecedent {
            Antecedent::Term { variable, label } => {
                let (key, slot) = self.lookup(variable)?;

                if !matches!(slot.role, Role::Input) {
                    return Err(ValidationError::WrongRole {
                        name: variable.clone(),
                        expected: "input",
                    });
                }

                Premise::Is(key, Self::lookup_term(slot, label)?)
            },
            Antecedent::And(lhs, rhs) => Premise::And(
                Box::new(self.resolve_premise(lhs)?),
                Box::new(self.resolve_premise(rhs)?),
            ),
            Antecedent::Or(lhs, rhs) => Premise::Or(
                Box::new(self.resolve_premise(lhs)?),
                Box::new(self.resolve_premise(rhs)?),
            ),
        })
    }

    fn resolve_consequent(&self, consequent: &Consequent) -> Result<(VariableKey, MembershipFunction), ValidationError> {
        let (key, slot) = self.lookup(&consequent.variable)?;

        if !matches!(slot.role, Role::Output { .. }) {
            return Err(ValidationError::WrongRole {
                name: consequent.variable.clone(),
                expected: "output",
            });
        }

        Ok((key, Self::lookup_term(slot, &consequent.label)?))
    }

    pub fn input(&self, name: &str) -> Option<&LinguisticVariable> {
        let slot = &self.variables[*self.names.get(name)?];

        matches!(slot.role, Role::Input).then_some(&slot.variable)
    }

    pub fn output(&self, name: &str) -> Option<&LinguisticVariable> {
        let slot = &self.variables[*self.names.get(name)?];

        matches!(slot.role, Role::Output { .. }).then_some(&slot.variable)
    }

    /// Input variables in declaration order.
    pub fn inputs(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.inputs.iter().map(|key| &self.variables[*key].variable)
    }

    /// Output variables in declaration order.
    pub fn outputs(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.outputs.iter().map(|key| &self.variables[*key].variable)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

/// Collects variables and rules, then validates them all at once.
#[derive(Default)]
pub struct ControlSystemBuilder {
    inputs: Vec<LinguisticVariable>,
    outputs: Vec<LinguisticVariable>,
    rules: Vec<Rule>,
}

impl ControlSystemBuilder {
    pub fn input(mut self, variable: LinguisticVariable) -> Self {
        self.inputs.push(variable);
        self
    }

    pub fn output(mut self, variable: LinguisticVariable) -> Self {
        self.outputs.push(variable);
        self
    }

    pub fn rule(mut self, antecedent: Antecedent, consequent: Consequent) -> Self {
        self.rules.push(Rule::new(antecedent, consequent));
        self
    }

    pub fn build(self) -> Result<ControlSystem, ValidationError> {
        ControlSystem::build(self.inputs, self.outputs, self.rules)
    }
}
