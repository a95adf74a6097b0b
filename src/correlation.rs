use alloc::{string::String, vec::Vec};

use num_traits::Float;

use crate::{
    Kbn, Moments, Panel,
    helper::{median_from_sorted_slice, sorted_finite},
};

/// Returns the Pearson correlation of two aligned series over the rows where
/// both are finite.
///
/// Means and centered cross/square sums are taken over the overlap only, so
/// each pair is independent of every other column. Means are accumulated as
/// offsets from the first overlapping pair, which keeps a constant series
/// exactly constant. The coefficient is
/// undefined when there is no overlap or either side has zero spread over it.
///
/// # Arguments
///
/// * `x` - The first series
/// * `y` - The second series, aligned with `x`
///
/// # Returns
///
/// * `Option<T>` - The correlation coefficient, or `None` if it is undefined
///
/// # Examples
///
/// ```
/// # use return_statistics::pairwise_corr;
/// # use assert_approx_eq::assert_approx_eq;
/// let x = [0.496714, -0.138264, 0.647689, f64::NAN];
/// let y = [0.115991, -0.329650, 0.574363, 0.5];
/// assert_approx_eq!(pairwise_corr(&x, &y).unwrap(), 0.939464, 0.0001);
///
/// let flat = [1.0, 1.0, 1.0, 1.0];
/// assert_eq!(pairwise_corr(&x, &flat), None);
/// ```
pub fn pairwise_corr<T: Float + Default>(x: &[T], y: &[T]) -> Option<T> {
    let overlap = || {
        x.iter()
            .zip(y)
            .filter(|(a, b)| a.is_finite() && b.is_finite())
            .map(|(&a, &b)| (a, b))
    };

    let (shift_x, shift_y) = overlap().next()?;

    let mut count = 0usize;
    let mut sum: (Kbn<T>, Kbn<T>) = Default::default();
    for (a, b) in overlap() {
        count += 1;
        sum.0 += a - shift_x;
        sum.1 += b - shift_y;
    }

    let n = T::from(count)?;
    let mean_x = shift_x + sum.0.total() / n;
    let mean_y = shift_y + sum.1.total() / n;

    let mut sum_sq: (Kbn<T>, Kbn<T>) = Default::default();
    let mut sum_prod: Kbn<T> = Kbn::default();
    for (a, b) in overlap() {
        let (dx, dy) = (a - mean_x, b - mean_y);
        sum_sq.0 += dx * dx;
        sum_sq.1 += dy * dy;
        sum_prod += dx * dy;
    }

    let divisor = (sum_sq.0.total() * sum_sq.1.total()).sqrt();
    if divisor.is_zero() || !divisor.is_finite() {
        None
    } else {
        Some(sum_prod.total() / divisor)
    }
}

/// Symmetric pairwise correlation matrix of a return panel.
///
/// Entry `(i, j)` is the correlation of symbols `i` and `j` over the dates
/// where both have finite returns, `None` where that is undefined. The
/// diagonal is `1` for any symbol with non-zero spread.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix<T> {
    /// Row and column labels
    symbols: Vec<String>,
    /// Row-major `n x n` entries
    values: Vec<Option<T>>,
}

impl<T: Float + Default> CorrelationMatrix<T> {
    /// Computes the correlation matrix of every pair of columns in `returns`.
    ///
    /// # Arguments
    ///
    /// * `returns` - The return panel
    ///
    /// # Returns
    ///
    /// * `Self` - The `ncols x ncols` matrix
    pub fn new<I: Clone + PartialOrd>(returns: &Panel<I, T>) -> Self {
        let columns: Vec<&[T]> = returns.columns().map(|(_, c)| c).collect();
        let n = columns.len();
        let mut values = vec![None; n * n];

        for i in 0..n {
            for j in i..n {
                let corr = pairwise_corr(columns[i], columns[j]);
                values[i * n + j] = corr;
                values[j * n + i] = corr;
            }
        }

        Self {
            symbols: returns.symbols().to_vec(),
            values,
        }
    }

    /// Returns the number of symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if the matrix has no symbols
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the row and column labels
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Returns the correlation of symbols `i` and `j`
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The coefficient, or `None` if it is undefined or either
    ///   position is out of range
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        let n = self.len();
        if i >= n || j >= n {
            return None;
        }
        self.values[i * n + j]
    }

    /// Returns the matrix row for symbol `i`
    pub fn row(&self, i: usize) -> Option<&[Option<T>]> {
        let n = self.len();
        (i < n).then(|| &self.values[i * n..(i + 1) * n])
    }

    /// Returns the strictly upper triangular entries, each unordered pair of
    /// distinct symbols once, in row-major order
    pub fn upper_triangle(&self) -> impl Iterator<Item = Option<T>> + '_ {
        let n = self.len();
        (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| self.values[i * n + j]))
    }

    /// Summarizes the off-diagonal coefficients
    pub fn offdiag_summary(&self) -> CorrSummary<T> {
        if self.len() < 2 {
            return CorrSummary::undefined();
        }
        let entries = sorted_finite(self.upper_triangle().flatten());
        CorrSummary::from_sorted(&entries)
    }
}

/// Distribution of the pairwise correlations among distinct symbols.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrSummary<T> {
    /// Median coefficient
    pub median: Option<T>,
    /// Mean coefficient
    pub mean: Option<T>,
    /// Sample standard deviation of the coefficients
    pub sd: Option<T>,
    /// Smallest coefficient
    pub min: Option<T>,
    /// Largest coefficient
    pub max: Option<T>,
}

impl<T> Default for CorrSummary<T> {
    fn default() -> Self {
        Self {
            median: None,
            mean: None,
            sd: None,
            min: None,
            max: None,
        }
    }
}

impl<T: Float + Default> CorrSummary<T> {
    /// Field names in report order
    pub const FIELDS: [&'static str; 5] = ["median", "mean", "sd", "min", "max"];

    /// Returns a record with every field undefined
    pub fn undefined() -> Self {
        Self::default()
    }

    /// Summarizes coefficients already filtered to finite values and sorted
    fn from_sorted(entries: &[T]) -> Self {
        if entries.is_empty() {
            return Self::undefined();
        }
        let moments = Moments::new(entries);
        Self {
            median: median_from_sorted_slice(entries),
            mean: moments.mean(),
            sd: moments.stddev(),
            min: entries.first().copied(),
            max: entries.last().copied(),
        }
    }

    /// Returns `(name, value)` pairs in the order of [`CorrSummary::FIELDS`]
    pub fn fields(&self) -> [(&'static str, Option<T>); 5] {
        let [a, b, c, d, e] = Self::FIELDS;
        [
            (a, self.median),
            (b, self.mean),
            (c, self.sd),
            (d, self.min),
            (e, self.max),
        ]
    }

    /// Returns `true` when every field is undefined
    pub fn is_undefined(&self) -> bool {
        self.fields().iter().all(|(_, v)| v.is_none())
    }
}

/// Summarizes the off-diagonal pairwise correlations of a return panel.
///
/// Builds the full [`CorrelationMatrix`], keeps each unordered pair of
/// distinct symbols once, discards undefined coefficients, and reports the
/// median, mean, sample standard deviation, min and max of the rest. Fewer
/// than two symbols, or no defined coefficient, gives an all-undefined
/// record.
///
/// # Examples
///
/// ```
/// # use return_statistics::{Panel, corr_offdiag_stats};
/// # use assert_approx_eq::assert_approx_eq;
/// let returns = Panel::new(
///     vec![1, 2, 3, 4],
///     vec!["A".into(), "B".into()],
///     vec![vec![0.01_f64, -0.02, 0.03, 0.0], vec![-0.01, 0.02, -0.03, 0.0]],
/// )
/// .unwrap();
///
/// let summary = corr_offdiag_stats(&returns);
/// assert_approx_eq!(summary.median.unwrap(), -1.0);
/// assert_approx_eq!(summary.mean.unwrap(), -1.0);
/// assert_eq!(summary.sd, None);
/// ```
pub fn corr_offdiag_stats<I, T>(returns: &Panel<I, T>) -> CorrSummary<T>
where
    I: Clone + PartialOrd,
    T: Float + Default,
{
    if returns.ncols() < 2 {
        return CorrSummary::undefined();
    }
    CorrelationMatrix::new(returns).offdiag_summary()
}
