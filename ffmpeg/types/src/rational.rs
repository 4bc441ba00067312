/*!
    Rational number type for time bases and aspect ratios.
*/

use std::fmt;

/**
    A rational number represented as a numerator and denominator.

    Used for time bases (e.g., 1/90000 for MPEG-TS) and sample
    aspect ratios (e.g., 1/1 for square pixels).

    The fields are public so that values read from a container can be
    carried as-is, including the `0/1` "unknown" aspect ratio.
*/
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    pub num: i32,
    pub den: i32,
}

impl Rational {
    /**
        Create a new rational number.

        # Panics

        Panics if `den` is zero.
    */
    #[inline]
    pub const fn new(num: i32, den: i32) -> Self {
        assert!(den != 0, "denominator cannot be zero");
        Self { num, den }
    }

    /**
        Convert to f64.
    */
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /**
        Returns true if both numerator and denominator are positive,
        which is what a usable time base looks like.
    */
    #[inline]
    pub const fn is_valid_time_base(self) -> bool {
        self.num > 0 && self.den > 0
    }

    /**
        Rescale a tick count from time base `from` into time base `to`.

        Computes `value * from / to`, rounding to the nearest integer with
        ties away from zero. Intermediate math is done in 128 bits so large
        timestamps do not overflow, and the result saturates at the `i64`
        range.

        If either time base is not valid, the value is returned unchanged.
    */
    pub fn rescale(value: i64, from: Rational, to: Rational) -> i64 {
        if !from.is_valid_time_base() || !to.is_valid_time_base() || from == to {
            return value;
        }

        let num = value as i128 * from.num as i128 * to.den as i128;
        let den = from.den as i128 * to.num as i128;
        let half = den / 2;

        let rounded = if num >= 0 {
            (num + half) / den
        } else {
            -((-num + half) / den)
        };

        rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl From<(i32, i32)> for Rational {
    fn from((num, den): (i32, i32)) -> Self {
        Self::new(num, den)
    }
}
