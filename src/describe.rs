use alloc::{string::String, vec::Vec};

use num_traits::Float;

use crate::{
    Moments, Panel,
    helper::{quantile_from_sorted_slice, sorted_finite},
};

/// Descriptive summary of one column: count, mean, spread and quartiles.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary<T> {
    /// Column label
    pub symbol: String,
    /// Number of finite values
    pub count: usize,
    /// Mean
    pub mean: Option<T>,
    /// Sample standard deviation
    pub std: Option<T>,
    /// Minimum
    pub min: Option<T>,
    /// First quartile
    pub q25: Option<T>,
    /// Median
    pub q50: Option<T>,
    /// Third quartile
    pub q75: Option<T>,
    /// Maximum
    pub max: Option<T>,
}

/// Summarizes each column of a panel over its finite values.
///
/// Quartiles interpolate linearly between the two nearest order statistics.
///
/// # Examples
///
/// ```
/// # use return_statistics::{Panel, describe};
/// let panel = Panel::new(
///     vec![1, 2, 3, 4, 5, 6],
///     vec!["A".into()],
///     vec![vec![10.0, 20.0, f64::NAN, 30.0, 40.0, 50.0]],
/// )
/// .unwrap();
///
/// let summary = &describe(&panel)[0];
/// assert_eq!(summary.count, 5);
/// assert_eq!(summary.q25, Some(20.0));
/// assert_eq!(summary.q50, Some(30.0));
/// assert_eq!(summary.q75, Some(40.0));
/// ```
pub fn describe<I, T>(panel: &Panel<I, T>) -> Vec<ColumnSummary<T>>
where
    I: Clone + PartialOrd,
    T: Float + Default,
{
    panel
        .columns()
        .map(|(symbol, column)| {
            let moments = Moments::new(column);
            let sorted = sorted_finite(column.iter().copied());
            ColumnSummary {
                symbol: symbol.into(),
                count: moments.count(),
                mean: moments.mean(),
                std: moments.stddev(),
                min: moments.min(),
                q25: quantile_from_sorted_slice(&sorted, 0.25),
                q50: quantile_from_sorted_slice(&sorted, 0.5),
                q75: quantile_from_sorted_slice(&sorted, 0.75),
                max: moments.max(),
            }
        })
        .collect()
}
