use alloc::{string::String, vec::Vec};

use num_traits::Float;
use tracing::{debug, warn};

use crate::{
    ColumnSummary, CorrSummary, CorrelationMatrix, FieldPanel, Panel, PanelError, ReturnKind,
    ReturnStats, ReturnStatsTable, describe, pooled_return_stats, return_stats_by_symbol,
};

/// Settings for turning price panels into return summaries.
///
/// The defaults compute percent (x100) simple daily returns annualized with
/// 252 periods per year, with pooled, per-symbol and correlation summaries
/// enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Simple or log returns
    kind: ReturnKind,
    /// Multiplier applied to returns before any statistic
    ret_scale: f64,
    /// Annualization frequency
    periods_per_year: u32,
    /// Fields to compute returns for; `None` means every field
    fields_ret: Option<Vec<String>>,
    /// Keep only the first `n` symbols
    max_symbols: Option<usize>,
    /// Drop price rows holding any missing value before computing returns
    drop_missing: bool,
    /// Compute the pooled summary
    pooled: bool,
    /// Compute the per-symbol table
    by_symbol: bool,
    /// Compute the off-diagonal correlation summary
    corr_summary: bool,
    /// Keep the full correlation matrix
    corr_matrix: bool,
    /// Compute column descriptions of the returns
    describe: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            kind: ReturnKind::Simple,
            ret_scale: 100.0,
            periods_per_year: 252,
            fields_ret: None,
            max_symbols: None,
            drop_missing: false,
            pooled: true,
            by_symbol: true,
            corr_summary: true,
            corr_matrix: false,
            describe: false,
        }
    }
}

impl AnalysisConfig {
    /// Creates a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the return kind
    pub const fn kind(&self) -> ReturnKind {
        self.kind
    }

    /// Sets simple or log returns
    pub fn set_kind(&mut self, kind: ReturnKind) -> &mut Self {
        self.kind = kind;
        self
    }

    /// Switches to log returns when `log_returns` is true
    pub fn set_log_returns(&mut self, log_returns: bool) -> &mut Self {
        self.set_kind(ReturnKind::from_log_flag(log_returns))
    }

    /// Returns the return multiplier
    pub const fn ret_scale(&self) -> f64 {
        self.ret_scale
    }

    /// Sets the return multiplier (100 for percent, 1 for raw)
    pub fn set_ret_scale(&mut self, ret_scale: f64) -> &mut Self {
        self.ret_scale = ret_scale;
        self
    }

    /// Returns the annualization frequency
    pub const fn periods_per_year(&self) -> u32 {
        self.periods_per_year
    }

    /// Sets the annualization frequency
    pub fn set_periods_per_year(&mut self, periods_per_year: u32) -> &mut Self {
        self.periods_per_year = periods_per_year;
        self
    }

    /// Returns the field allow-list
    pub fn fields_ret(&self) -> Option<&[String]> {
        self.fields_ret.as_deref()
    }

    /// Restricts return computation to the given fields, in report order
    pub fn set_fields_ret<S: Into<String>>(&mut self, fields: impl IntoIterator<Item = S>) -> &mut Self {
        self.fields_ret = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Parses a comma separated field list such as `"Open, Close,Adj Close"`.
    ///
    /// Blank entries are skipped.
    pub fn set_fields_ret_csv(&mut self, fields: &str) -> &mut Self {
        self.set_fields_ret(fields.split(',').map(str::trim).filter(|f| !f.is_empty()))
    }

    /// Returns the symbol cap
    pub const fn max_symbols(&self) -> Option<usize> {
        self.max_symbols
    }

    /// Keeps only the first `n` symbols, or all with `None`
    pub fn set_max_symbols(&mut self, max_symbols: Option<usize>) -> &mut Self {
        self.max_symbols = max_symbols;
        self
    }

    /// Drops price rows with any missing value before computing returns
    pub fn set_drop_missing(&mut self, drop_missing: bool) -> &mut Self {
        self.drop_missing = drop_missing;
        self
    }

    /// Enables or disables the pooled summary
    pub fn set_pooled(&mut self, pooled: bool) -> &mut Self {
        self.pooled = pooled;
        self
    }

    /// Enables or disables the per-symbol table
    pub fn set_by_symbol(&mut self, by_symbol: bool) -> &mut Self {
        self.by_symbol = by_symbol;
        self
    }

    /// Enables or disables the off-diagonal correlation summary
    pub fn set_corr_summary(&mut self, corr_summary: bool) -> &mut Self {
        self.corr_summary = corr_summary;
        self
    }

    /// Keeps or discards the full correlation matrix
    pub fn set_corr_matrix(&mut self, corr_matrix: bool) -> &mut Self {
        self.corr_matrix = corr_matrix;
        self
    }

    /// Enables or disables column descriptions of the returns
    pub fn set_describe(&mut self, describe: bool) -> &mut Self {
        self.describe = describe;
        self
    }
}

/// Everything computed for one price field.
///
/// Each output is `None` when the config did not ask for it. Correlation
/// outputs are also `None` for a panel with fewer than two symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAnalysis<T> {
    /// Field name, e.g. `"Close"`
    pub field: String,
    /// Number of price rows after shaping
    pub n_prices: usize,
    /// Number of symbols after shaping
    pub n_symbols: usize,
    /// Pooled return statistics
    pub pooled: Option<ReturnStats<T>>,
    /// Per-symbol return statistics
    pub by_symbol: Option<ReturnStatsTable<T>>,
    /// Off-diagonal correlation summary
    pub corr_summary: Option<CorrSummary<T>>,
    /// Full correlation matrix
    pub corr_matrix: Option<CorrelationMatrix<T>>,
    /// Column descriptions of the returns
    pub describe: Option<Vec<ColumnSummary<T>>>,
}

impl<T: Float + Default> FieldAnalysis<T> {
    /// An analysis for a field the data does not carry: every requested
    /// summary is present but undefined
    fn missing(field: &str, config: &AnalysisConfig) -> Self {
        Self {
            field: field.into(),
            n_prices: 0,
            n_symbols: 0,
            pooled: config.pooled.then(ReturnStats::undefined),
            by_symbol: None,
            corr_summary: config.corr_summary.then(CorrSummary::undefined),
            corr_matrix: None,
            describe: None,
        }
    }
}

/// Computes returns and the configured summaries for one price field.
///
/// Rows with missing prices are dropped first when configured, then returns
/// are computed, multiplied by the configured scale, and summarized.
///
/// # Arguments
///
/// * `prices` - The price panel for this field
/// * `field` - Field name recorded in the result
/// * `config` - What to compute
///
/// # Returns
///
/// * `Result<FieldAnalysis<T>, PanelError>` - The analysis, or
///   `UnrepresentableScale` if the scale does not fit `T`
///
/// # Examples
///
/// ```
/// # use return_statistics::{AnalysisConfig, Panel, analyze_panel};
/// # use assert_approx_eq::assert_approx_eq;
/// let prices = Panel::new(
///     vec![1, 2, 3],
///     vec!["A".into(), "B".into()],
///     vec![vec![100.0_f64, 110.0, 99.0], vec![50.0, 55.0, 49.5]],
/// )
/// .unwrap();
///
/// let mut config = AnalysisConfig::new();
/// config.set_periods_per_year(1);
/// let out = analyze_panel(&prices, "Close", &config).unwrap();
///
/// let pooled = out.pooled.unwrap();
/// assert_approx_eq!(pooled.max.unwrap(), 10.0);
/// assert_approx_eq!(pooled.min.unwrap(), -10.0);
/// assert_approx_eq!(out.corr_summary.unwrap().mean.unwrap(), 1.0);
/// ```
pub fn analyze_panel<I, T>(
    prices: &Panel<I, T>,
    field: &str,
    config: &AnalysisConfig,
) -> Result<FieldAnalysis<T>, PanelError>
where
    I: Clone + PartialOrd,
    T: Float + Default,
{
    let scale = T::from(config.ret_scale).ok_or(PanelError::UnrepresentableScale(config.ret_scale))?;

    let shaped;
    let mut prices = prices;
    if let Some(n) = config.max_symbols {
        shaped = prices.take_symbols(n);
        prices = &shaped;
    }
    let dropped;
    if config.drop_missing {
        dropped = prices.drop_missing_rows();
        prices = &dropped;
    }

    debug!(
        field,
        rows = prices.nrows(),
        symbols = prices.ncols(),
        kind = config.kind.as_str(),
        "computing returns"
    );

    let returns = prices.returns(config.kind).scale(scale);
    let matrix = (returns.ncols() > 1 && (config.corr_summary || config.corr_matrix))
        .then(|| CorrelationMatrix::new(&returns));

    Ok(FieldAnalysis {
        field: field.into(),
        n_prices: prices.nrows(),
        n_symbols: prices.ncols(),
        pooled: config
            .pooled
            .then(|| pooled_return_stats(&returns, config.periods_per_year)),
        by_symbol: config
            .by_symbol
            .then(|| return_stats_by_symbol(&returns, config.periods_per_year)),
        corr_summary: matrix
            .as_ref()
            .filter(|_| config.corr_summary)
            .map(CorrelationMatrix::offdiag_summary),
        corr_matrix: matrix.filter(|_| config.corr_matrix),
        describe: config.describe.then(|| describe(&returns)),
    })
}

/// Computes returns and summaries for every requested field of a
/// multi-field panel.
///
/// Fields are processed in the config's `fields_ret` order, or the panel's
/// field order when no allow-list is set. A requested field the panel does
/// not carry yields an analysis whose requested summaries are all undefined,
/// so reports keep one row per requested field.
///
/// # Arguments
///
/// * `panel` - The multi-field price panel
/// * `config` - What to compute
///
/// # Returns
///
/// * `Result<Vec<FieldAnalysis<T>>, PanelError>` - One analysis per field
pub fn analyze_fields<I, T>(
    panel: &FieldPanel<I, T>,
    config: &AnalysisConfig,
) -> Result<Vec<FieldAnalysis<T>>, PanelError>
where
    I: Clone + PartialOrd,
    T: Float + Default,
{
    let requested: Vec<&str> = match config.fields_ret() {
        Some(fields) => fields.iter().map(String::as_str).collect(),
        None => panel.fields().iter().map(String::as_str).collect(),
    };
    debug!(fields = requested.len(), available = panel.fields().len(), "analyzing fields");

    requested
        .into_iter()
        .map(|field| {
            if !panel.has_field(field) {
                warn!(field, "requested field not present in price panel");
                return Ok(FieldAnalysis::missing(field, config));
            }
            analyze_panel(&panel.field(field)?, field, config)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use assert_approx_eq::assert_approx_eq;

    use super::*;

    fn prices() -> Panel<u32, f64> {
        Panel::new(
            vec![1, 2, 3, 4],
            vec!["A".into(), "B".into(), "C".into()],
            vec![
                vec![100.0, 101.0, 99.0, 102.0],
                vec![50.0, f64::NAN, 51.0, 52.0],
                vec![20.0, 20.2, 19.8, 20.4],
            ],
        )
        .unwrap()
    }

    #[test]
    fn default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.kind(), ReturnKind::Simple);
        assert_eq!(config.ret_scale(), 100.0);
        assert_eq!(config.periods_per_year(), 252);
        assert_eq!(config.fields_ret(), None);
        assert_eq!(config.max_symbols(), None);
    }

    #[test]
    fn fields_from_csv() {
        let mut config = AnalysisConfig::new();
        config.set_fields_ret_csv("Open, Close,,Adj Close ");
        let fields: Vec<&str> = config.fields_ret().unwrap().iter().map(String::as_str).collect();
        assert_eq!(fields, ["Open", "Close", "Adj Close"]);
    }

    #[test]
    fn scale_is_applied_before_statistics() {
        let mut config = AnalysisConfig::new();
        config.set_ret_scale(1.0).set_periods_per_year(1);
        let raw = analyze_panel(&prices(), "Close", &config).unwrap();
        config.set_ret_scale(100.0);
        let pct = analyze_panel(&prices(), "Close", &config).unwrap();

        let (raw, pct) = (raw.pooled.unwrap(), pct.pooled.unwrap());
        assert_approx_eq!(pct.ann_mean.unwrap(), raw.ann_mean.unwrap() * 100.0);
        assert_approx_eq!(pct.max.unwrap(), raw.max.unwrap() * 100.0);
        assert_approx_eq!(pct.skew.unwrap(), raw.skew.unwrap());
    }

    #[test]
    fn shaping_options() {
        let mut config = AnalysisConfig::new();
        config.set_max_symbols(Some(2)).set_drop_missing(true).set_corr_matrix(true);
        let out = analyze_panel(&prices(), "Close", &config).unwrap();
        assert_eq!(out.n_symbols, 2);
        assert_eq!(out.n_prices, 3);

        let table = out.by_symbol.unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("B").unwrap().n_obs, 2);
        assert_eq!(out.corr_matrix.unwrap().len(), 2);
    }

    #[test]
    fn summary_and_matrix_agree() {
        let mut config = AnalysisConfig::new();
        config.set_corr_matrix(true);
        let out = analyze_panel(&prices(), "Close", &config).unwrap();
        let matrix = out.corr_matrix.unwrap();
        assert_eq!(matrix.len(), 3);
        assert_eq!(out.corr_summary, Some(matrix.offdiag_summary()));

        config.set_corr_summary(false);
        let out = analyze_panel(&prices(), "Close", &config).unwrap();
        assert_eq!(out.corr_summary, None);
        assert_eq!(out.corr_matrix, Some(matrix));
    }

    #[test]
    fn single_symbol_skips_correlation() {
        let mut config = AnalysisConfig::new();
        config.set_max_symbols(Some(1)).set_describe(true);
        let out = analyze_panel(&prices(), "Close", &config).unwrap();
        assert_eq!(out.corr_summary, None);
        assert_eq!(out.describe.unwrap().len(), 1);
    }

    #[test]
    fn disabled_outputs_are_absent() {
        let mut config = AnalysisConfig::new();
        config
            .set_pooled(false)
            .set_by_symbol(false)
            .set_corr_summary(false)
            .set_log_returns(true);
        let out = analyze_panel(&prices(), "Close", &config).unwrap();
        assert_eq!(out.pooled, None);
        assert_eq!(out.by_symbol, None);
        assert_eq!(out.corr_summary, None);
    }

    #[test]
    fn analyze_fields_follows_requested_order() {
        let panel = FieldPanel::new(
            vec![1, 2, 3],
            vec![
                (String::from("A"), String::from("Open"), vec![1.0, 1.1, 1.2]),
                (String::from("A"), String::from("Close"), vec![2.0, 2.2, 2.1]),
                (String::from("B"), String::from("Close"), vec![3.0, 2.7, 3.0]),
            ],
        )
        .unwrap();

        let mut config = AnalysisConfig::new();
        config.set_fields_ret(["Close", "Adj Close", "Open"]);
        let out = analyze_fields(&panel, &config).unwrap();

        let names: Vec<&str> = out.iter().map(|a| a.field.as_str()).collect();
        assert_eq!(names, ["Close", "Adj Close", "Open"]);

        assert_eq!(out[0].n_symbols, 2);
        assert!(out[0].corr_summary.is_some());

        let missing = &out[1];
        assert!(missing.pooled.unwrap().is_undefined());
        assert!(missing.corr_summary.unwrap().is_undefined());
        assert_eq!(missing.by_symbol, None);

        assert_eq!(out[2].n_symbols, 1);
        assert_eq!(out[2].corr_summary, None);
    }

    #[test]
    fn analyze_fields_defaults_to_every_field() {
        let panel = FieldPanel::new(
            vec![1, 2],
            vec![
                (String::from("A"), String::from("Open"), vec![1.0, 1.1]),
                (String::from("A"), String::from("Close"), vec![2.0, 2.2]),
            ],
        )
        .unwrap();
        let out = analyze_fields(&panel, &AnalysisConfig::new()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].field, "Open");
    }
}
