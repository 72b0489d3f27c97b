//! Room heating controller: decides a heating power in percent from the room
//! temperature, the outside temperature and the room humidity.

use crate::dsl::Consequent;
use crate::error::ValidationError;
use crate::linspace::Universe;
use crate::rules::Rule;
use crate::system::ControlSystem;
use crate::variable::LinguisticVariable;

pub const TEMP_ROOM: &str = "temp_room";
pub const TEMP_OUTSIDE: &str = "temp_outside";
pub const HUMIDITY: &str = "humidity";
pub const HEATING_POWER: &str = "heating_power";

/// Builds the controller. Every universe is sampled at a step of one unit.
pub fn heating_controller() -> Result<ControlSystem, ValidationError> {
    let temp_room = LinguisticVariable::new(TEMP_ROOM, Universe::new(10. ..=30., 1.)?)
        .with_triangle("cold", 10., 10., 18.)?
        .with_triangle("comfortable", 16., 21., 25.)?
        .with_triangle("warm", 22., 28., 30.)?;
    let temp_outside = LinguisticVariable::new(TEMP_OUTSIDE, Universe::new(-15. ..=20., 1.)?)
        .with_triangle("very_cold", -15., -15., 0.)?
        .with_triangle("cold", -5., 5., 15.)?
        .with_triangle("warm", 10., 20., 20.)?;
    let humidity = LinguisticVariable::new(HUMIDITY, Universe::new(20. ..=100., 1.)?)
        .with_triangle("low", 20., 20., 40.)?
        .with_triangle("moderate", 35., 60., 80.)?
        .with_triangle("high", 70., 100., 100.)?;
    let heating_power = LinguisticVariable::new(HEATING_POWER, Universe::new(0. ..=100., 1.)?)
        .with_triangle("low", 0., 0., 40.)?
        .with_triangle("medium", 25., 50., 75.)?
        .with_triangle("high", 60., 100., 100.)?;

    let power = |label| Consequent::new(HEATING_POWER, label);
    let rules = [
        Rule::new(
            temp_room.is("cold").and(temp_outside.is("very_cold")),
            power("high"),
        ),
        Rule::new(temp_room.is("cold").and(temp_outside.is("cold")), power("high")),
        Rule::new(temp_room.is("cold").and(temp_outside.is("warm")), power("medium")),
        Rule::new(
            temp_room.is("comfortable").and(temp_outside.is("very_cold")),
            power("high"),
        ),
        Rule::new(
            temp_room.is("comfortable").and(temp_outside.is("cold")),
            power("medium"),
        ),
        Rule::new(
            temp_room.is("comfortable").and(temp_outside.is("warm")),
            power("low"),
        ),
        Rule::new(temp_room.is("warm"), power("low")),
        // Dry air takes more heating to feel comfortable
        Rule::new(humidity.is("low"), power("high")),
        Rule::new(humidity.is("high").and(temp_room.is("comfortable")), power("low")),
    ];

    ControlSystem::build([temp_room, temp_outside, humidity], [heating_power], rules)
}

/// Coarse reading of a heating power for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PowerLevel {
    Low,
    Medium,
    High,
}

impl PowerLevel {
    pub fn from_power(power: f64) -> Self {
        if power >= 70. {
            PowerLevel::High
        } else if power >= 40. {
            PowerLevel::Medium
        } else {
            PowerLevel::Low
        }
    }
}

#[test]
fn test_power_level() {
    assert_eq!(PowerLevel::from_power(85.), PowerLevel::High);
    assert_eq!(PowerLevel::from_power(70.), PowerLevel::High);
    assert_eq!(PowerLevel::from_power(69.9), PowerLevel::Medium);
    assert_eq!(PowerLevel::from_power(40.), PowerLevel::Medium);
    assert_eq!(PowerLevel::from_power(12.), PowerLevel::Low);
}

#[test]
fn test_controller_shape() {
    let system = heating_controller().unwrap();

    assert_eq!(system.inputs().count(), 3);
    assert_eq!(system.outputs().count(), 1);
    assert_eq!(system.rules().len(), 9);
}
