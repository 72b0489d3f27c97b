use crate::error::ValidationError;

/// Triangular membership curve with left foot `a`, peak `b` and right foot `c`.
///
/// `a == b` or `b == c` are legal and describe a shoulder: the curve is flat at
/// one at the peak and falls off on one side only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MembershipFunction {
    a: f64,
    b: f64,
    c: f64,
}

impl MembershipFunction {
    pub fn triangular(a: f64, b: f64, c: f64) -> Result<Self, ValidationError> {
        let finite = a.is_finite() && b.is_finite() && c.is_finite();

        if !finite || a > b || b > c {
            return Err(ValidationError::InvalidMembership { a, b, c });
        }

        Ok(Self { a, b, c })
    }

    /// Degree of membership of `x`, always in `[0, 1]`.
    ///
    /// The peak wins over the feet, so a shoulder such as `(0, 0, 40)` is
    /// fully satisfied at `0`.
    pub fn degree(&self, x: f64) -> f64 {
        let Self { a, b, c } = *self;

        if x == b {
            1.
        } else if x <= a || x >= c {
            0.
        } else if x < b {
            // b == a is unreachable here since x > a and x < b
            (x - a) / (b - a)
        } else {
            (c - x) / (c - b)
        }
    }

    pub fn params(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }

    pub fn peak(&self) -> f64 {
        self.b
    }
}
