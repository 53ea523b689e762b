use std::cmp::Ordering;
use std::fmt::Debug;

use derive_more::Display;
use num_traits::One;
use num_traits::SaturatingAdd;
use num_traits::Zero;
use num_traits::bounds::UpperBounded;
use ordered_float::FloatCore;
use ordered_float::OrderedFloat;

use crate::space::Cost;

/// A totally ordered floating point cost.
///
/// Euclidean edge weights need fractions, and `OrderedFloat` gives them the
/// `Ord` the frontier needs. Infinity is the upper bound, so it marks states
/// that were never reached.
#[derive(Copy, Clone, Default, Debug, Display)]
#[repr(transparent)]
#[display("{_0}")]
pub struct FloatCost<F: FloatCore>(pub OrderedFloat<F>);

impl<F: FloatCore> FloatCost<F> {
    pub fn new(f: F) -> Self {
        Self(OrderedFloat(f))
    }
    pub fn get(&self) -> F {
        self.0.0
    }
}

impl<F> Cost for FloatCost<F>
where
    F: FloatCore + Debug + std::fmt::Display,
{
    /// Rejects negative weights, and also NaNs and infinities which would
    /// either poison or saturate every path through them.
    #[inline(always)]
    fn valid_weight(&self) -> bool {
        self.get().is_finite() && *self >= Self::zero()
    }
}

impl<F> std::str::FromStr for FloatCost<F>
where
    F: FloatCore + std::str::FromStr,
{
    type Err = F::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<F>().map(Self::new)
    }
}

impl<F: FloatCore> std::ops::Add for FloatCost<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.get() + rhs.get())
    }
}
impl<F: FloatCore> std::ops::Sub for FloatCost<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.get() - rhs.get())
    }
}
impl<F: FloatCore> std::ops::Mul for FloatCost<F> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.get() * rhs.get())
    }
}
impl<F: FloatCore> std::ops::AddAssign for FloatCost<F> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Sums reach infinity instead of wrapping, which is already saturation.
impl<F: FloatCore> SaturatingAdd for FloatCost<F> {
    fn saturating_add(&self, rhs: &Self) -> Self {
        *self + *rhs
    }
}

impl<F: FloatCore> Zero for FloatCost<F> {
    fn is_zero(&self) -> bool {
        self.get().is_zero()
    }
    fn zero() -> Self {
        Self::new(F::zero())
    }
}
impl<F: FloatCore> One for FloatCost<F> {
    fn one() -> Self {
        Self::new(F::one())
    }
}
impl<F: FloatCore> UpperBounded for FloatCost<F> {
    fn max_value() -> Self {
        Self::new(F::infinity())
    }
}

// `derive` would ask for `F: Ord`, which floats aren't. `OrderedFloat` is.
impl<F: FloatCore> PartialEq for FloatCost<F> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl<F: FloatCore> Eq for FloatCost<F> {}
impl<F: FloatCore> PartialOrd for FloatCost<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<F: FloatCore> Ord for FloatCost<F> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_is_ordered() {
        let nan = FloatCost::new(f64::NAN);
        assert_eq!(nan, nan);
        assert!(FloatCost::new(f64::INFINITY) < nan);
        assert!(FloatCost::new(-1.0) < FloatCost::new(0.5));
    }

    #[test]
    fn sums_saturate_at_infinity() {
        let mut f = FloatCost::<f32>::zero();
        f += FloatCost::one();
        f += FloatCost::new(1.5);
        assert_eq!(f, FloatCost::new(2.5));
        assert!(f.valid());

        let f = f.saturating_add(&FloatCost::max_value());
        assert_eq!(f, FloatCost::max_value());
        assert!(!f.valid());
    }

    #[test]
    fn weights() {
        assert!(FloatCost::new(0.0f64).valid_weight());
        assert!(FloatCost::new(3.5f64).valid_weight());
        assert!(!FloatCost::new(-0.5f64).valid_weight());
        assert!(!FloatCost::new(f64::NAN).valid_weight());
        assert!(!FloatCost::new(f64::INFINITY).valid_weight());
    }

    #[test]
    fn parse() {
        let c: FloatCost<f64> = "2.5".parse().unwrap();
        assert_eq!(c, FloatCost::new(2.5));
        assert!("two".parse::<FloatCost<f64>>().is_err());
    }
}
