//! Mamdani fuzzy inference over triangular linguistic variables.
//!
//! A [`ControlSystem`] is built once from input variables, output variables
//! and rules, and validated as a whole. An [`InferenceEngine`] then turns
//! crisp [`Inputs`] into crisp [`Outputs`]: fuzzification, rule firing,
//! implication, aggregation and centroid defuzzification.
//!
//! ```
//! use fuzzy_control::{Consequent, ControlSystem, InferenceEngine, Inputs, LinguisticVariable, Universe};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let room = LinguisticVariable::new("room", Universe::new(10. ..=30., 1.)?)
//!     .with_triangle("cold", 10., 10., 18.)?
//!     .with_triangle("warm", 22., 28., 30.)?;
//! let power = LinguisticVariable::new("power", Universe::new(0. ..=100., 1.)?)
//!     .with_triangle("low", 0., 0., 40.)?
//!     .with_triangle("high", 60., 100., 100.)?;
//!
//! let system = ControlSystem::builder()
//!     .rule(room.is("cold"), Consequent::new("power", "high"))
//!     .rule(room.is("warm"), Consequent::new("power", "low"))
//!     .input(room)
//!     .output(power)
//!     .build()?;
//!
//! let outputs = InferenceEngine::mamdani().compute(&system, &Inputs::new().with("room", 12.))?;
//!
//! assert!(outputs.get("power").unwrap() > 70.);
//! # Ok(())
//! # }
//! ```

mod dsl;
mod error;
pub mod heating;
mod inference;
mod inputs;
mod linspace;
mod membership;
mod ops;
mod outputs;
mod rules;
mod system;
mod variable;

pub use dsl::{Antecedent, Consequent};
pub use error::{EvaluationError, ValidationError};
pub use inference::{AggregatedCurve, Explanation, InferenceEngine};
pub use inputs::Inputs;
pub use linspace::{Linspace, Universe, MAX_SAMPLES};
pub use membership::MembershipFunction;
pub use ops::{AndOp, DefuzzificationOp, ImplicationOp, OrOp};
pub use outputs::Outputs;
pub use rules::{Rule, Rules};
pub use system::{ControlSystem, ControlSystemBuilder};
pub use variable::LinguisticVariable;
