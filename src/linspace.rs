use std::ops::RangeInclusive;

use crate::error::ValidationError;

const DEFAULT_STEP: f64 = 0.1;

/// Largest number of samples a universe may hold.
pub const MAX_SAMPLES: usize = 1_000_000;

// Relative to the number of steps. Absorbs binary rounding of decimal steps,
// e.g. 0.3 / 0.1 == 2.9999999999999996, without rounding up spans that are
// genuinely a hair short of a whole step.
const STEP_TOLERANCE: f64 = 1e-12;

/// Evenly spaced discretization of `[min, max]`.
///
/// Samples are `min + i * step` for `i in 0..len()`, where
/// `len() == floor((max - min) / step) + 1`. The quotient is nudged up by a
/// relative `1e-12` before flooring, so a decimal step that divides the span
/// exactly still samples `max`. When `max - min` is not a multiple of
/// `step`, the last sample is the largest one below `max` and `max` itself
/// is not sampled. At most [`MAX_SAMPLES`] samples are allowed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Universe {
    min: f64,
    max: f64,
    step: f64,
    len: usize,
}

impl Universe {
    /// If the step value is not provided, it defaults to 0.1
    pub fn new(range: RangeInclusive<f64>, step: impl Into<Option<f64>>) -> Result<Self, ValidationError> {
        let min = *range.start();
        let max = *range.end();
        let step = step.into().unwrap_or(DEFAULT_STEP);
        let invalid = || ValidationError::InvalidUniverse { min, max, step };
        let finite = min.is_finite() && max.is_finite() && step.is_finite();

        if !finite || step <= 0. || min >= max {
            return Err(invalid());
        }

        let steps = (max - min) / step;

        // Also catches max - min overflowing to infinity
        if !steps.is_finite() || steps >= MAX_SAMPLES as f64 {
            return Err(invalid());
        }

        // floor matches the truncating integer conversion of a sample count
        let len = ((steps * (1. + STEP_TOLERANCE)).floor() as usize)
            .checked_add(1)
            .filter(|len| *len <= MAX_SAMPLES)
            .ok_or_else(invalid)?;

        Ok(Self { min, max, step, len })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn points(&self) -> Linspace {
        Linspace {
            start: self.min,
            end: self.max,
            step: self.step,
            index: 0,
            len: self.len,
        }
    }
}

/// Iterator over the samples of a [`Universe`].
#[derive(Clone, Debug)]
pub struct Linspace {
    start: f64,
    end: f64,
    step: f64,
    index: usize,
    len: usize,
}

impl Iterator for Linspace {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        if self.index >= self.len {
            return None;
        }

        let i = self.index;
        self.index += 1;

        // Computed from the start on every step so errors don't accumulate
        Some(f64::min(self.start + self.step * i as f64, self.end))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Linspace {}

#[test]
fn test_integer_steps() {
    let universe = Universe::new(10. ..=30., 1.).unwrap();
    let points: Vec<_> = universe.points().collect();

    assert_eq!(universe.len(), 21);
    assert_eq!(points.len(), 21);
    assert_eq!(points[0], 10.);
    assert_eq!(points[20], 30.);
    assert!(points.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_inexact_multiple_stops_below_max() {
    let universe = Universe::new(0. ..=10., 3.).unwrap();

    assert_eq!(universe.points().collect::<Vec<_>>(), vec![0., 3., 6., 9.]);
}

#[test]
fn test_decimal_step_keeps_max() {
    let universe = Universe::new(0. ..=0.3, 0.1).unwrap();
    let points: Vec<_> = universe.points().collect();

    assert_eq!(points.len(), 4);
    assert_eq!(points[3], 0.3);
}

#[test]
fn test_default_step() {
    let universe = Universe::new(0. ..=1., None).unwrap();

    assert_eq!(universe.step(), 0.1);
    assert_eq!(universe.len(), 11);
}

#[test]
fn test_span_just_short_of_a_step() {
    let universe = Universe::new(0. ..=1. - 1e-10, 0.1).unwrap();
    let points: Vec<_> = universe.points().collect();

    assert_eq!(universe.len(), 10);
    assert_eq!(points.len(), 10);
    assert!(points[9] < 0.9 + 1e-9);
}

#[test]
fn test_rejects_oversized_universe() {
    assert!(Universe::new(0. ..=1e10, 1e-300).is_err());
    assert!(Universe::new(0. ..=1e15, 1.).is_err());
    assert!(Universe::new(-1e308..=1e308, 1.).is_err());
    assert!(Universe::new(0. ..=MAX_SAMPLES as f64, 1.).is_err());

    let largest = Universe::new(0. ..=(MAX_SAMPLES - 1) as f64, 1.).unwrap();

    assert_eq!(largest.len(), MAX_SAMPLES);
}

#[test]
fn test_invalid_universe() {
    assert!(Universe::new(0. ..=1., 0.).is_err());
    assert!(Universe::new(0. ..=1., -1.).is_err());
    assert!(Universe::new(1. ..=1., 0.1).is_err());
    assert!(Universe::new(2. ..=1., 0.1).is_err());
    assert!(Universe::new(0. ..=f64::INFINITY, 0.1).is_err());
}
