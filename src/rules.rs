use crate::dsl::{Antecedent, Consequent};

#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub antecedent: Antecedent,
    pub consequent: Consequent,
}

impl Rule {
    pub fn new(antecedent: Antecedent, consequent: Consequent) -> Self {
        Self { antecedent, consequent }
    }
}

/// Ordered rule base. Order only matters for reporting; it never changes a
/// computed output.
#[derive(Clone, Debug, Default)]
pub struct Rules(pub(crate) Vec<Rule>);

impl Rules {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    pub fn add(&mut self, antecedent: Antecedent, consequent: Consequent) {
        self.0.push(Rule::new(antecedent, consequent));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.0.iter()
    }
}

impl FromIterator<Rule> for Rules {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        Rules(iter.into_iter().collect())
    }
}

impl IntoIterator for Rules {
    type Item = Rule;
    type IntoIter = std::vec::IntoIter<Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
