use alloc::{string::String, vec::Vec};

use num_traits::Float;

use crate::{Moments, Panel};

/// Annualized distributional summary of a set of returns.
///
/// Every field is `None` when it can not be computed from the finite
/// observations available (no observations at all, too few for the moment in
/// question, or a periods-per-year value the numeric type can not hold).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStats<T> {
    /// Mean return times periods per year
    pub ann_mean: Option<T>,
    /// Sample standard deviation times the square root of periods per year
    pub ann_vol: Option<T>,
    /// Adjusted Fisher-Pearson skewness
    pub skew: Option<T>,
    /// Bias-corrected excess kurtosis
    pub kurtosis: Option<T>,
    /// Smallest return
    pub min: Option<T>,
    /// Largest return
    pub max: Option<T>,
}

impl<T> Default for ReturnStats<T> {
    fn default() -> Self {
        Self {
            ann_mean: None,
            ann_vol: None,
            skew: None,
            kurtosis: None,
            min: None,
            max: None,
        }
    }
}

impl<T: Float + Default> ReturnStats<T> {
    /// Field names in report order
    pub const FIELDS: [&'static str; 6] = ["ann_mean", "ann_vol", "skew", "kurtosis", "min", "max"];

    /// Returns a record with every field undefined
    pub fn undefined() -> Self {
        Self::default()
    }

    /// Annualizes a set of moments.
    ///
    /// The moments must carry `ddof`; mean is scaled by `periods_per_year`
    /// and volatility by its square root, assuming independent periods.
    ///
    /// # Arguments
    ///
    /// * `moments` - Moments of the finite returns
    /// * `periods_per_year` - Observation frequency, e.g. 252 for daily data
    pub fn from_moments(moments: &Moments<T>, periods_per_year: u32) -> Self {
        if moments.is_empty() {
            return Self::undefined();
        }
        let ppy = T::from(periods_per_year);
        Self {
            ann_mean: moments.mean().zip(ppy).map(|(m, p)| m * p),
            ann_vol: moments.stddev().zip(ppy).map(|(s, p)| s * p.sqrt()),
            skew: moments.skew(),
            kurtosis: moments.kurt(),
            min: moments.min(),
            max: moments.max(),
        }
    }

    /// Returns `(name, value)` pairs in the order of [`ReturnStats::FIELDS`]
    pub fn fields(&self) -> [(&'static str, Option<T>); 6] {
        let [a, b, c, d, e, f] = Self::FIELDS;
        [
            (a, self.ann_mean),
            (b, self.ann_vol),
            (c, self.skew),
            (d, self.kurtosis),
            (e, self.min),
            (f, self.max),
        ]
    }

    /// Returns the value of the named field, `None` for an unknown name or an
    /// undefined value
    pub fn get(&self, name: &str) -> Option<T> {
        self.fields()
            .into_iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, v)| v)
    }

    /// Returns `true` when every field is undefined
    pub fn is_undefined(&self) -> bool {
        self.fields().iter().all(|(_, v)| v.is_none())
    }
}

/// Computes return statistics pooled over every `(date, symbol)` observation.
///
/// The panel is flattened into one collection, ignoring which symbol each
/// return belongs to, non-finite values are discarded, and the remainder is
/// summarized. An empty remainder gives an all-undefined record.
///
/// # Arguments
///
/// * `returns` - The return panel
/// * `periods_per_year` - Observation frequency, e.g. 252 for daily data
///
/// # Examples
///
/// ```
/// # use return_statistics::{Panel, pooled_return_stats};
/// # use assert_approx_eq::assert_approx_eq;
/// let returns = Panel::new(
///     vec![1, 2, 3],
///     vec!["A".into(), "B".into()],
///     vec![vec![0.01, -0.02, 0.03], vec![0.02, f64::NAN, 0.0]],
/// )
/// .unwrap();
///
/// let stats = pooled_return_stats(&returns, 252);
/// assert_approx_eq!(stats.ann_mean.unwrap(), 0.008 * 252.0);
/// assert_eq!(stats.min, Some(-0.02));
/// assert_eq!(stats.max, Some(0.03));
/// ```
pub fn pooled_return_stats<I, T>(returns: &Panel<I, T>, periods_per_year: u32) -> ReturnStats<T>
where
    I: Clone + PartialOrd,
    T: Float + Default,
{
    let pooled: Vec<T> = returns.values().filter(|v| v.is_finite()).collect();
    ReturnStats::from_moments(&Moments::new(&pooled), periods_per_year)
}

/// Return statistics for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolStats<T> {
    /// Symbol label
    pub symbol: String,
    /// Number of finite returns for the symbol
    pub n_obs: usize,
    /// Annualized statistics over those returns
    pub stats: ReturnStats<T>,
}

/// Per-symbol return statistics, one row per symbol in panel column order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatsTable<T> {
    rows: Vec<SymbolStats<T>>,
}

impl<T> ReturnStatsTable<T> {
    /// Returns the number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the rows in symbol order
    pub fn rows(&self) -> &[SymbolStats<T>] {
        &self.rows
    }

    /// Returns an iterator over the rows
    pub fn iter(&self) -> impl Iterator<Item = &SymbolStats<T>> {
        self.rows.iter()
    }

    /// Returns the row for `symbol`
    pub fn get(&self, symbol: &str) -> Option<&SymbolStats<T>> {
        self.rows.iter().find(|r| r.symbol == symbol)
    }
}

impl<T> IntoIterator for ReturnStatsTable<T> {
    type Item = SymbolStats<T>;
    type IntoIter = alloc::vec::IntoIter<SymbolStats<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// Computes return statistics for each symbol independently.
///
/// Each column is summarized over its own finite returns only, so a symbol
/// with no finite returns gets an all-undefined row and `n_obs == 0` without
/// affecting the others.
///
/// # Arguments
///
/// * `returns` - The return panel
/// * `periods_per_year` - Observation frequency, e.g. 252 for daily data
///
/// # Examples
///
/// ```
/// # use return_statistics::{Panel, return_stats_by_symbol};
/// let returns = Panel::new(
///     vec![1, 2, 3],
///     vec!["A".into(), "B".into()],
///     vec![vec![0.01, -0.02, 0.03], vec![f64::NAN, f64::NAN, 0.0]],
/// )
/// .unwrap();
///
/// let table = return_stats_by_symbol(&returns, 252);
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.get("A").unwrap().n_obs, 3);
/// assert_eq!(table.get("B").unwrap().n_obs, 1);
/// assert_eq!(table.get("B").unwrap().stats.ann_vol, None);
/// ```
pub fn return_stats_by_symbol<I, T>(returns: &Panel<I, T>, periods_per_year: u32) -> ReturnStatsTable<T>
where
    I: Clone + PartialOrd,
    T: Float + Default,
{
    let rows = returns
        .columns()
        .map(|(symbol, column)| {
            let moments = Moments::new(column);
            SymbolStats {
                symbol: symbol.into(),
                n_obs: moments.count(),
                stats: ReturnStats::from_moments(&moments, periods_per_year),
            }
        })
        .collect();
    ReturnStatsTable { rows }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use assert_approx_eq::assert_approx_eq;

    use super::*;

    fn panel(columns: Vec<Vec<f64>>) -> Panel<u32, f64> {
        let rows = columns.first().map_or(0, Vec::len) as u32;
        let symbols = (0..columns.len()).map(|i| format!("S{i}")).collect();
        Panel::new((0..rows).collect(), symbols, columns).unwrap()
    }

    #[test]
    fn pooled_all_missing_is_undefined() {
        let p = panel(vec![vec![f64::NAN; 4], vec![f64::NAN; 4]]);
        let stats = pooled_return_stats(&p, 252);
        assert!(stats.is_undefined());
        assert_eq!(stats, ReturnStats::undefined());
    }

    #[test]
    fn pooled_empty_panel_is_undefined() {
        let p = panel(vec![]);
        assert!(pooled_return_stats(&p, 252).is_undefined());
    }

    #[test]
    fn pooled_matches_hand_computed_values() {
        // 10 pooled values: 1..=10, mean 5.5, sample variance 55/6
        let p = panel(vec![
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![6.0, 7.0, 8.0, 9.0, 10.0],
        ]);
        let stats = pooled_return_stats(&p, 252);
        assert_approx_eq!(stats.ann_mean.unwrap(), 5.5 * 252.0);
        assert_approx_eq!(stats.ann_vol.unwrap(), (55.0f64 / 6.0).sqrt() * 252f64.sqrt());
        assert_approx_eq!(stats.skew.unwrap(), 0.0);
        assert_approx_eq!(stats.kurtosis.unwrap(), -1.2, 1e-9);
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.max, Some(10.0));
    }

    #[test]
    fn pooled_ignores_infinite_returns() {
        let p = panel(vec![vec![f64::INFINITY, 0.01, 0.03], vec![f64::NEG_INFINITY, f64::NAN, 0.02]]);
        let stats = pooled_return_stats(&p, 12);
        assert_approx_eq!(stats.ann_mean.unwrap(), 0.02 * 12.0);
        assert_eq!(stats.max, Some(0.03));
        assert_eq!(stats.min, Some(0.01));
    }

    #[test]
    fn pooled_skew_and_kurtosis_need_enough_points() {
        let p = panel(vec![vec![0.01, 0.02]]);
        let stats = pooled_return_stats(&p, 252);
        assert!(stats.ann_vol.is_some());
        assert_eq!(stats.skew, None);
        assert_eq!(stats.kurtosis, None);
    }

    #[test]
    fn by_symbol_rows_follow_columns() {
        let p = panel(vec![
            vec![0.01, f64::NAN, 0.03, 0.0, -0.01],
            vec![f64::NAN; 5],
            vec![0.02, 0.02, 0.02, 0.02, 0.02],
        ]);
        let table = return_stats_by_symbol(&p, 252);

        assert_eq!(table.len(), p.ncols());
        let symbols: Vec<&str> = table.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, ["S0", "S1", "S2"]);

        let first = table.get("S0").unwrap();
        assert_eq!(first.n_obs, 4);
        assert_approx_eq!(first.stats.ann_mean.unwrap(), 0.0075 * 252.0);

        let empty = table.get("S1").unwrap();
        assert_eq!(empty.n_obs, 0);
        assert!(empty.stats.is_undefined());

        let flat = table.get("S2").unwrap();
        assert_eq!(flat.n_obs, 5);
        assert_approx_eq!(flat.stats.ann_vol.unwrap(), 0.0);
        assert_eq!(flat.stats.skew, Some(0.0));
    }

    #[test]
    fn named_field_access() {
        let p = panel(vec![vec![0.01, 0.02, 0.04]]);
        let stats = pooled_return_stats(&p, 1);
        assert_eq!(stats.get("max"), Some(0.04));
        assert_eq!(stats.get("kurtosis"), None);
        assert_eq!(stats.get("nope"), None);
        let names: Vec<&str> = stats.fields().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ReturnStats::<f64>::FIELDS);
    }

    #[test]
    fn table_into_iter() {
        let p = panel(vec![vec![0.01], vec![0.02]]);
        let rows: Vec<SymbolStats<f64>> = return_stats_by_symbol(&p, 252).into_iter().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].stats.max, Some(0.02));
    }
}
