use std::iter::Sum;

use num::Float;

/// And operator method for combining the propositions of a rule antecedent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AndOp {
    #[default]
    Min,
    Prod,
    BoundedProd,
    DrasticProd,
}

impl AndOp {
    pub fn apply<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Min => F::min(u, v),
            Self::Prod => u * v,
            Self::BoundedProd => F::max(F::zero(), u + v - F::one()),
            Self::DrasticProd => {
                if u == F::one() {
                    v
                } else if v == F::one() {
                    u
                } else {
                    F::zero()
                }
            },
        }
    }
}

/// Or operator method for combining the propositions of a rule antecedent.
///
/// Also used to aggregate the implied consequents of every rule that targets
/// the same output variable, since each of these is an s-norm with zero as
/// its identity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrOp {
    #[default]
    Max,
    ProbOr,
    BoundedSum,
    DrasticSum,
}

impl OrOp {
    pub fn apply<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => F::max(u, v),
            Self::ProbOr => u + v - u * v,
            Self::BoundedSum => F::min(F::one(), u + v),
            Self::DrasticSum => {
                if v == F::zero() {
                    u
                } else if u == F::zero() {
                    v
                } else {
                    F::one()
                }
            },
        }
    }

    /// Folds `curve` into `acc` pointwise.
    pub fn accumulate<F: Float>(self, acc: &mut [F], curve: impl IntoIterator<Item = F>) {
        for (a, c) in acc.iter_mut().zip(curve) {
            *a = self.apply(*a, c);
        }
    }
}

/// Implication method: how a rule's firing strength shapes its consequent
/// membership curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImplicationOp {
    /// Clip the curve at the firing strength (Mamdani)
    #[default]
    Min,
    /// Scale the curve by the firing strength (Larsen)
    Prod,
}

impl ImplicationOp {
    pub fn apply<F: Float>(self, strength: F, membership: F) -> F {
        match self {
            Self::Min => F::min(strength, membership),
            Self::Prod => strength * membership,
        }
    }
}

/// Method for defuzzificating an aggregated membership curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DefuzzificationOp {
    /// Center of gravity over the sample points
    #[default]
    Centroid,
    /// Point splitting the area under the curve in two equal halves
    Bisector,
    /// Mean of the values for which the membership function is maximum
    MeanOfMaximum,
    /// Smallest value for which the membership function is maximum
    SmallestOfMaximum,
    /// Largest value for which the membership function is maximum
    LargestOfMaximum,
}

impl DefuzzificationOp {
    /// `universe` and `membership` are parallel. A curve that is zero
    /// everywhere defuzzifies to zero: no rule fired, so no control action.
    pub fn call<F: Float + Sum>(self, universe: &[F], membership: &[F]) -> F {
        debug_assert_eq!(universe.len(), membership.len());

        let total = membership.iter().copied().sum::<F>();

        if total == F::zero() {
            return F::zero();
        }

        match self {
            Self::Centroid => {
                let num = universe
                    .iter()
                    .zip(membership)
                    .map(|(x, mu)| *x * *mu)
                    .sum::<F>();

                num / total
            },
            Self::Bisector => bisector(universe, membership),
            Self::MeanOfMaximum => {
                let (len, sum) = maxima(universe, membership)
                    .fold((F::zero(), F::zero()), |(len, sum), x| (len + F::one(), sum + x));

                sum / len
            },
            Self::SmallestOfMaximum => maxima(universe, membership).fold(F::infinity(), F::min),
            Self::LargestOfMaximum => maxima(universe, membership).fold(F::neg_infinity(), F::max),
        }
    }
}

fn maxima<'a, F: Float + 'a>(universe: &'a [F], membership: &'a [F]) -> impl Iterator<Item = F> + 'a {
    let maximum = membership.iter().copied().fold(F::zero(), F::max);

    universe
        .iter()
        .zip(membership)
        .filter_map(move |(u, m)| if *m == maximum { Some(*u) } else { None })
}

fn bisector<F: Float + Sum>(universe: &[F], membership: &[F]) -> F {
    let two = F::one() + F::one();
    let areas: Vec<F> = universe
        .windows(2)
        .zip(membership.windows(2))
        .map(|(u, m)| (m[0] + m[1]) * (u[1] - u[0]) / two)
        .collect();
    let total_area = areas.iter().copied().sum::<F>();

    // Single sample universe, the only point is the answer
    if total_area == F::zero() {
        return universe[0];
    }

    let target = total_area / two;
    let mut cum_area = F::zero();

    for (i, area) in areas.iter().copied().enumerate() {
        if cum_area + area >= target {
            let base = universe[i + 1] - universe[i];

            return universe[i] + (target - cum_area) / area * base;
        }

        cum_area = cum_area + area;
    }

    universe[universe.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_ops() {
        assert_eq!(AndOp::Min.apply(0.3, 0.7), 0.3);
        assert_eq!(AndOp::Prod.apply(0.5, 0.5), 0.25);
        assert_eq!(AndOp::BoundedProd.apply(0.25, 0.5), 0.);
        assert_eq!(AndOp::BoundedProd.apply(0.75, 0.5), 0.25);
        assert_eq!(AndOp::DrasticProd.apply(1., 0.4), 0.4);
        assert_eq!(AndOp::DrasticProd.apply(0.9, 0.4), 0.);
    }

    #[test]
    fn test_or_ops() {
        assert_eq!(OrOp::Max.apply(0.3, 0.7), 0.7);
        assert_eq!(OrOp::ProbOr.apply(0.5, 0.5), 0.75);
        assert_eq!(OrOp::BoundedSum.apply(0.75, 0.5), 1.);
        assert_eq!(OrOp::DrasticSum.apply(0., 0.4), 0.4);
        assert_eq!(OrOp::DrasticSum.apply(0.1, 0.4), 1.);
    }

    #[test]
    fn test_accumulate() {
        let mut acc = [0., 0.5, 1.];

        OrOp::Max.accumulate(&mut acc, [0.25, 0.25, 0.25]);

        assert_eq!(acc, [0.25, 0.5, 1.]);
    }

    #[test]
    fn test_implication() {
        assert_eq!(ImplicationOp::Min.apply(0.5, 0.8), 0.5);
        assert_eq!(ImplicationOp::Min.apply(0.5, 0.25), 0.25);
        assert_eq!(ImplicationOp::Prod.apply(0.5, 0.8), 0.4);
    }

    #[test]
    fn test_centroid() {
        let universe = [0., 1., 2., 3., 4.];
        let symmetric = [0., 0.5, 1., 0.5, 0.];

        assert_eq!(DefuzzificationOp::Centroid.call(&universe, &symmetric), 2.);

        let skewed = [0., 0., 0., 1., 1.];

        assert_eq!(DefuzzificationOp::Centroid.call(&universe, &skewed), 3.5);
    }

    #[test]
    fn test_zero_curve_defuzzifies_to_zero() {
        let universe = [10., 11., 12.];
        let membership = [0., 0., 0.];

        for op in [
            DefuzzificationOp::Centroid,
            DefuzzificationOp::Bisector,
            DefuzzificationOp::MeanOfMaximum,
            DefuzzificationOp::SmallestOfMaximum,
            DefuzzificationOp::LargestOfMaximum,
        ] {
            assert_eq!(op.call(&universe, &membership), 0.);
        }
    }

    #[test]
    fn test_maximum_methods() {
        let universe = [0., 1., 2., 3., 4.];
        let membership = [0.2, 0.7, 0.7, 0.7, 0.1];

        assert_eq!(DefuzzificationOp::MeanOfMaximum.call(&universe, &membership), 2.);
        assert_eq!(DefuzzificationOp::SmallestOfMaximum.call(&universe, &membership), 1.);
        assert_eq!(DefuzzificationOp::LargestOfMaximum.call(&universe, &membership), 3.);
    }

    #[test]
    fn test_bisector() {
        let universe = [0., 1., 2., 3., 4.];

        assert_eq!(DefuzzificationOp::Bisector.call(&universe, &[1., 1., 1., 1., 1.]), 2.);
        assert_eq!(DefuzzificationOp::Bisector.call(&universe, &[0., 0.5, 1., 0.5, 0.]), 2.);
        assert_eq!(DefuzzificationOp::Bisector.call(&[5.], &[1.]), 5.);
    }
}
