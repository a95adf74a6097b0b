use alloc::vec::Vec;

use num_traits::Float;

use crate::Panel;

/// How period-over-period returns are computed from prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnKind {
    /// `p(t) / p(t-1) - 1`
    #[default]
    Simple,
    /// `ln p(t) - ln p(t-1)`
    Log,
}

impl ReturnKind {
    /// Maps a `log_returns` flag to a return kind
    pub const fn from_log_flag(log_returns: bool) -> Self {
        if log_returns { Self::Log } else { Self::Simple }
    }

    /// Returns a short lowercase name, `"simple"` or `"log"`
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Log => "log",
        }
    }

    /// Computes one return from a prior and a current price.
    ///
    /// A missing price on either side yields `NaN`. Under [`ReturnKind::Log`] a
    /// zero or negative price also yields `NaN`. A simple return over a zero
    /// prior price is left to IEEE arithmetic (infinite or `NaN`).
    #[inline]
    pub fn period_return<T: Float>(&self, prev: T, current: T) -> T {
        match self {
            Self::Simple => current / prev - T::one(),
            Self::Log => {
                if prev <= T::zero() || current <= T::zero() {
                    T::nan()
                } else {
                    current.ln() - prev.ln()
                }
            }
        }
    }
}

impl<I, T> Panel<I, T>
where
    I: Clone + PartialOrd,
    T: Float,
{
    /// Converts a price panel into a return panel.
    ///
    /// The result has the same symbols and one row fewer: the first date has
    /// no prior price and is dropped. Each cell is the return from the
    /// previous row to the current row of the same symbol, so a missing price
    /// at date `t` leaves both the return into `t` and the return out of `t`
    /// missing. Nothing is interpolated. A panel with no rows yields an empty
    /// panel.
    ///
    /// # Arguments
    ///
    /// * `kind` - Simple or logarithmic returns
    ///
    /// # Returns
    ///
    /// * `Panel<I, T>` - The return panel, indexed by the later date of each pair
    ///
    /// # Examples
    ///
    /// ```
    /// # use return_statistics::{Panel, ReturnKind};
    /// # use assert_approx_eq::assert_approx_eq;
    /// let prices = Panel::new(vec![1, 2, 3], vec!["SPY".into()], vec![vec![100.0_f64, 110.0, 99.0]]).unwrap();
    ///
    /// let simple = prices.returns(ReturnKind::Simple);
    /// assert_eq!(simple.index(), &[2, 3]);
    /// assert_approx_eq!(simple.value(0, 0).unwrap(), 0.10);
    /// assert_approx_eq!(simple.value(1, 0).unwrap(), -0.10);
    ///
    /// let log = prices.returns(ReturnKind::Log);
    /// assert_approx_eq!(log.value(0, 0).unwrap(), 1.1f64.ln());
    /// assert_approx_eq!(log.value(1, 0).unwrap(), 0.9f64.ln());
    /// ```
    pub fn returns(&self, kind: ReturnKind) -> Panel<I, T> {
        let index: Vec<I> = self.index().iter().skip(1).cloned().collect();
        let columns = self
            .columns()
            .map(|(_, prices)| {
                prices
                    .windows(2)
                    .map(|w| kind.period_return(w[0], w[1]))
                    .collect()
            })
            .collect();
        Panel::from_parts(index, self.symbols().to_vec(), columns)
    }
}
