use num_traits::Float;

use crate::Kbn;

/// Central moments of a batch of observations.
///
/// `Moments` reduces a set of values to the sufficient statistics behind every
/// return and correlation summary in this crate: count, mean, the second to
/// fourth central sums, and the extrema. Only finite values participate;
/// `NaN` (missing) and infinite values are skipped without affecting any
/// statistic.
///
/// Sums use the Kahan-Babuska-Neumaier algorithm, and central sums are taken
/// in a second pass around the compensated mean, which keeps the higher
/// moments stable for return series with a large common offset.
///
/// When `ddof` is set (the default), the variance uses the sample `N - 1`
/// denominator and skew/kurtosis apply the usual bias corrections.
#[derive(Debug, Clone, Copy)]
pub struct Moments<T> {
    /// Number of finite observations
    count: usize,
    /// Mean of finite observations
    mean: T,
    /// Sum of squared deviations from the mean
    s2: T,
    /// Sum of cubed deviations from the mean
    s3: T,
    /// Sum of fourth-power deviations from the mean
    s4: T,
    /// Smallest finite observation
    min: Option<T>,
    /// Largest finite observation
    max: Option<T>,
    /// Delta Degrees of Freedom
    ddof: bool,
}

impl<T: Float + Default> Moments<T> {
    /// Computes the moments of the finite values in `values`.
    ///
    /// # Arguments
    ///
    /// * `values` - The observations; non-finite entries are skipped
    ///
    /// # Returns
    ///
    /// * `Self` - The moments, with `ddof` enabled
    ///
    /// # Examples
    ///
    /// ```
    /// # use return_statistics::Moments;
    /// # use assert_approx_eq::assert_approx_eq;
    /// let moments = Moments::new(&[1.0, 2.0, f64::NAN, 3.0, 4.0]);
    /// assert_eq!(moments.count(), 4);
    /// assert_approx_eq!(moments.mean().unwrap(), 2.5);
    /// assert_approx_eq!(moments.variance().unwrap(), 1.6667, 0.0001);
    /// ```
    pub fn new(values: &[T]) -> Self {
        let mut moments = Self {
            count: 0,
            mean: T::zero(),
            s2: T::zero(),
            s3: T::zero(),
            s4: T::zero(),
            min: None,
            max: None,
            ddof: true,
        };
        let Some(shift) = values.iter().copied().find(|v| v.is_finite()) else {
            return moments;
        };

        let mut sum: Kbn<T> = Kbn::default();
        for &v in values.iter().filter(|v| v.is_finite()) {
            moments.count += 1;
            sum += v - shift;
            moments.min = Some(moments.min.map_or(v, |m| m.min(v)));
            moments.max = Some(moments.max.map_or(v, |m| m.max(v)));
        }

        moments.update_central_sums(values, shift, sum.total());
        moments
    }

    /// Second pass over the finite values around the mean.
    ///
    /// The first pass sums offsets from `shift` (the first finite value), so a
    /// constant series gets its mean back exactly and zero central sums.
    fn update_central_sums(&mut self, values: &[T], shift: T, shifted_total: T) {
        let Some(n) = T::from(self.count) else {
            return;
        };
        self.mean = shift + shifted_total / n;

        let mut s2: Kbn<T> = Kbn::default();
        let mut s3: Kbn<T> = Kbn::default();
        let mut s4: Kbn<T> = Kbn::default();
        for &v in values.iter().filter(|v| v.is_finite()) {
            let d = v - self.mean;
            let d2 = d * d;
            s2 += d2;
            s3 += d2 * d;
            s4 += d2 * d2;
        }
        self.s2 = s2.total();
        self.s3 = s3.total();
        self.s4 = s4.total();
    }

    /// Returns the Delta Degrees of Freedom
    ///
    /// # Returns
    ///
    /// * `bool` - The Delta Degrees of Freedom
    #[inline]
    pub const fn ddof(&self) -> bool {
        self.ddof
    }

    /// Sets the Delta Degrees of Freedom
    ///
    /// # Arguments
    ///
    /// * `ddof` - `true` for sample estimators, `false` for population estimators
    ///
    /// # Returns
    ///
    /// * `&mut Self` - The moments object
    #[inline]
    pub const fn set_ddof(&mut self, ddof: bool) -> &mut Self {
        self.ddof = ddof;
        self
    }

    /// Returns the number of finite observations
    #[inline]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Returns `true` when no finite observation was seen
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the smallest finite observation
    #[inline]
    pub const fn min(&self) -> Option<T> {
        self.min
    }

    /// Returns the largest finite observation
    #[inline]
    pub const fn max(&self) -> Option<T> {
        self.max
    }

    /// Returns the arithmetic mean
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The mean, or `None` if there are no finite observations
    #[inline]
    pub fn mean(&self) -> Option<T> {
        (!self.is_empty()).then_some(self.mean)
    }

    /// Returns the variance
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The variance, or `None` when the denominator is not positive
    ///   (fewer than two observations under `ddof`, none otherwise)
    #[inline]
    pub fn variance(&self) -> Option<T> {
        let n = T::from(self.count)?;
        let denom = if self.ddof { n - T::one() } else { n };
        if denom > T::zero() {
            Some(self.s2 / denom)
        } else {
            None
        }
    }

    /// Returns the standard deviation
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The standard deviation, or `None` when the variance is undefined
    #[inline]
    pub fn stddev(&self) -> Option<T> {
        self.variance().and_then(|var| {
            if var >= T::zero() {
                Some(var.sqrt())
            } else {
                None
            }
        })
    }

    /// Flushes floating-point noise below `1e-14` to zero, so a constant
    /// series reports zero skew and kurtosis
    fn flushed(value: T) -> Option<T> {
        let eps = T::from(1e-14)?;
        Some(if value.abs() < eps { T::zero() } else { value })
    }

    /// Returns the skewness
    ///
    /// With `ddof` this is the adjusted Fisher-Pearson coefficient
    /// `n * sqrt(n - 1) / (n - 2) * S3 / S2^1.5`; without it, the population
    /// coefficient `g1`. A constant series has zero skew.
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The skewness, or `None` for fewer than three observations
    pub fn skew(&self) -> Option<T> {
        if self.count < 3 {
            return None;
        }
        let s2 = Self::flushed(self.s2)?;
        if s2.is_zero() {
            return Some(T::zero());
        }
        let s3 = Self::flushed(self.s3)?;

        let n = T::from(self.count)?;
        let _1 = T::one();
        let _2 = T::from(2.0)?;

        if self.ddof {
            Some(n * (n - _1).sqrt() / (n - _2) * (s3 / (s2 * s2.sqrt())))
        } else {
            let m2 = s2 / n;
            let m3 = s3 / n;
            Some(m3 / (m2 * m2.sqrt()))
        }
    }

    /// Returns the excess kurtosis
    ///
    /// With `ddof` this is the bias-corrected
    /// `n(n+1)(n-1) S4 / ((n-2)(n-3) S2^2) - 3(n-1)^2 / ((n-2)(n-3))`;
    /// without it, the population `m4 / m2^2 - 3`. A constant series has zero
    /// kurtosis.
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The excess kurtosis, or `None` for fewer than four observations
    pub fn kurt(&self) -> Option<T> {
        if self.count < 4 {
            return None;
        }
        let n = T::from(self.count)?;
        let _1 = T::one();
        let _2 = T::from(2.0)?;
        let _3 = T::from(3.0)?;

        if self.ddof {
            // numerator and denominator are flushed separately, not S2
            let numerator = Self::flushed(n * (n + _1) * (n - _1) * self.s4)?;
            let denominator = Self::flushed((n - _2) * (n - _3) * self.s2 * self.s2)?;
            if denominator.is_zero() {
                return Some(T::zero());
            }
            let correction = _3 * (n - _1) * (n - _1) / ((n - _2) * (n - _3));
            Some(numerator / denominator - correction)
        } else {
            let s2 = Self::flushed(self.s2)?;
            if s2.is_zero() {
                return Some(T::zero());
            }
            let m2 = s2 / n;
            let m4 = self.s4 / n;
            Some(m4 / (m2 * m2) - _3)
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    const INPUTS: [f64; 9] = [25.4, 26.2, 26.0, 26.1, 25.8, 25.9, 26.3, 26.2, 26.5];

    #[test]
    fn mean_and_extrema_skip_non_finite() {
        let moments = Moments::new(&[f64::NAN, 1.0, f64::INFINITY, 5.0, f64::NEG_INFINITY, 3.0]);
        assert_eq!(moments.count(), 3);
        assert_approx_eq!(moments.mean().unwrap(), 3.0);
        assert_eq!(moments.min(), Some(1.0));
        assert_eq!(moments.max(), Some(5.0));
    }

    #[test]
    fn empty_is_undefined() {
        let moments = Moments::<f64>::new(&[f64::NAN, f64::NAN]);
        assert!(moments.is_empty());
        assert_eq!(moments.mean(), None);
        assert_eq!(moments.variance(), None);
        assert_eq!(moments.stddev(), None);
        assert_eq!(moments.skew(), None);
        assert_eq!(moments.kurt(), None);
        assert_eq!(moments.min(), None);
        assert_eq!(moments.max(), None);
    }

    #[test]
    fn variance_works() {
        let mut moments = Moments::new(&INPUTS[..3]);
        assert_approx_eq!(moments.variance().unwrap(), 0.1733, 0.0001);
        assert_approx_eq!(moments.stddev().unwrap(), 0.4163, 0.0001);

        moments.set_ddof(false);
        assert_approx_eq!(moments.variance().unwrap(), 0.1156, 0.0001);
        assert_approx_eq!(moments.stddev().unwrap(), 0.3399, 0.0001);
    }

    #[test]
    fn single_observation_has_no_sample_variance() {
        let mut moments = Moments::new(&[0.5]);
        assert_eq!(moments.variance(), None);
        moments.set_ddof(false);
        assert_eq!(moments.variance(), Some(0.0));
    }

    #[test]
    fn skew_works() {
        let mut moments = Moments::new(&INPUTS[..4]);
        assert_approx_eq!(moments.skew().unwrap(), -1.6964, 0.0001);
        moments.set_ddof(false);
        assert_approx_eq!(moments.skew().unwrap(), -0.9794, 0.0001);

        assert_eq!(Moments::new(&[1.0, 2.0]).skew(), None);
    }

    #[test]
    fn kurt_works() {
        let mut moments = Moments::new(&INPUTS[..4]);
        assert_approx_eq!(moments.kurt().unwrap(), 3.0144, 0.0001);
        moments.set_ddof(false);
        assert_approx_eq!(moments.kurt().unwrap(), -0.7981, 0.0001);

        assert_eq!(Moments::new(&[1.0, 2.0, 3.0]).kurt(), None);
    }

    #[test]
    fn constant_series_has_zero_shape() {
        let moments = Moments::new(&[0.1, 0.1, 0.1, 0.1, 0.1]);
        assert_eq!(moments.skew(), Some(0.0));
        assert_eq!(moments.kurt(), Some(0.0));
        assert_approx_eq!(moments.stddev().unwrap(), 0.0);
    }

    #[test]
    fn tiny_spread_flushes_higher_moments() {
        // S2 is about 4.7e-10, S3 about 2.2e-15
        let moments = Moments::new(&[0.0, 1e-5, 3e-5]);
        assert!(moments.variance().unwrap() > 0.0);
        assert_eq!(moments.skew(), Some(0.0));

        // (n - 2)(n - 3) S2^2 is far below 1e-14
        let moments = Moments::new(&[0.0, 1e-5, 3e-5, 6e-5]);
        assert!(moments.variance().unwrap() > 0.0);
        assert_eq!(moments.kurt(), Some(0.0));
    }

    #[test]
    fn large_offset_is_stable() {
        let moments = Moments::new(&[1_000_000.1, 1_000_000.2, 1_000_000.3]);
        assert_approx_eq!(moments.mean().unwrap(), 1_000_000.2, 1e-6);
        assert_approx_eq!(moments.variance().unwrap(), 0.01, 1e-6);
    }
}
