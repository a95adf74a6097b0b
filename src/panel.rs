use alloc::{string::String, vec::Vec};

use ahash::RandomState;
use hashbrown::HashSet;
use num_traits::Float;

use crate::PanelError;

/// A date x symbol table of numeric values.
///
/// `Panel<I, T>` is the canonical shape handed to every statistic in this crate:
/// rows are labelled by an index `I` (typically a date), columns by unique
/// symbol labels in caller order. Values are stored column-major, one vector
/// per symbol.
///
/// A missing cell is `NaN`, distinct from zero. Infinite cells may appear in a
/// return panel (a simple return over a zero price) and are treated like
/// missing cells by every statistic.
///
/// Panels are immutable snapshots: every reshaping operation returns a new
/// panel and leaves the receiver untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel<I, T> {
    /// Row labels
    index: Vec<I>,
    /// Column labels, unique
    symbols: Vec<String>,
    /// One vector per symbol, each `index.len()` long
    columns: Vec<Vec<T>>,
}

/// Rejects a duplicate label among `labels`
fn ensure_unique<'a>(labels: impl IntoIterator<Item = &'a str>) -> Result<(), PanelError> {
    let mut seen = HashSet::with_hasher(RandomState::new());
    for label in labels {
        if !seen.insert(label) {
            return Err(PanelError::DuplicateSymbol(label.into()));
        }
    }
    Ok(())
}

impl<I, T> Panel<I, T>
where
    I: Clone + PartialOrd,
    T: Float,
{
    /// Creates a new panel from column vectors.
    ///
    /// # Arguments
    ///
    /// * `index` - The row labels
    /// * `symbols` - The column labels, which must be unique
    /// * `columns` - One vector per symbol, each as long as `index`
    ///
    /// # Returns
    ///
    /// * `Result<Self, PanelError>` - The panel, or a shape/duplicate error
    ///
    /// # Examples
    ///
    /// ```
    /// # use return_statistics::Panel;
    /// let prices = Panel::new(
    ///     vec![1, 2, 3],
    ///     vec!["SPY".into(), "TLT".into()],
    ///     vec![vec![100.0, 101.0, 102.0], vec![90.0, f64::NAN, 91.0]],
    /// )
    /// .unwrap();
    /// assert_eq!(prices.nrows(), 3);
    /// assert_eq!(prices.ncols(), 2);
    /// ```
    pub fn new(index: Vec<I>, symbols: Vec<String>, columns: Vec<Vec<T>>) -> Result<Self, PanelError> {
        if symbols.len() != columns.len() {
            return Err(PanelError::ShapeMismatch {
                what: "columns",
                expected: symbols.len(),
                actual: columns.len(),
            });
        }
        if let Some(bad) = columns.iter().find(|c| c.len() != index.len()) {
            return Err(PanelError::ShapeMismatch {
                what: "rows",
                expected: index.len(),
                actual: bad.len(),
            });
        }
        ensure_unique(symbols.iter().map(String::as_str))?;

        Ok(Self {
            index,
            symbols,
            columns,
        })
    }

    /// Creates a new panel from row vectors, one per index label.
    ///
    /// # Arguments
    ///
    /// * `index` - The row labels
    /// * `symbols` - The column labels, which must be unique
    /// * `rows` - One vector per row, each as long as `symbols`
    ///
    /// # Returns
    ///
    /// * `Result<Self, PanelError>` - The panel, or a shape/duplicate error
    pub fn from_rows(index: Vec<I>, symbols: Vec<String>, rows: &[Vec<T>]) -> Result<Self, PanelError> {
        if rows.len() != index.len() {
            return Err(PanelError::ShapeMismatch {
                what: "rows",
                expected: index.len(),
                actual: rows.len(),
            });
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != symbols.len()) {
            return Err(PanelError::ShapeMismatch {
                what: "columns",
                expected: symbols.len(),
                actual: bad.len(),
            });
        }

        let columns = (0..symbols.len())
            .map(|c| rows.iter().map(|r| r[c]).collect())
            .collect();
        Self::new(index, symbols, columns)
    }

    /// Builds a panel whose shape has already been validated
    pub(crate) fn from_parts(index: Vec<I>, symbols: Vec<String>, columns: Vec<Vec<T>>) -> Self {
        Self {
            index,
            symbols,
            columns,
        }
    }

    /// Returns the row labels
    #[inline]
    pub fn index(&self) -> &[I] {
        &self.index
    }

    /// Returns the column labels in order
    #[inline]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Returns the number of rows
    #[inline]
    pub fn nrows(&self) -> usize {
        self.index.len()
    }

    /// Returns the number of symbol columns
    #[inline]
    pub fn ncols(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if the panel has no rows or no columns
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nrows() == 0 || self.ncols() == 0
    }

    /// Returns an iterator over `(symbol, column)` pairs in column order
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.symbols
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Returns every cell, column by column
    pub fn values(&self) -> impl Iterator<Item = T> + '_ {
        self.columns.iter().flat_map(|c| c.iter().copied())
    }

    /// Returns the column at position `col`
    ///
    /// # Returns
    ///
    /// * `Result<&[T], PanelError>` - The column, or `ColumnOutOfRange`
    pub fn column(&self, col: usize) -> Result<&[T], PanelError> {
        self.columns
            .get(col)
            .map(Vec::as_slice)
            .ok_or(PanelError::ColumnOutOfRange {
                what: "column",
                index: col,
                len: self.ncols(),
            })
    }

    /// Returns the column labelled `symbol`
    ///
    /// # Returns
    ///
    /// * `Result<&[T], PanelError>` - The column, or `UnknownSymbol`
    pub fn column_by_symbol(&self, symbol: &str) -> Result<&[T], PanelError> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .map(|col| self.columns[col].as_slice())
            .ok_or_else(|| PanelError::UnknownSymbol(symbol.into()))
    }

    /// Returns the cell at `(row, col)`
    ///
    /// # Returns
    ///
    /// * `Result<T, PanelError>` - The cell, or `ColumnOutOfRange` for either axis
    pub fn value(&self, row: usize, col: usize) -> Result<T, PanelError> {
        let column = self.column(col)?;
        column.get(row).copied().ok_or(PanelError::ColumnOutOfRange {
            what: "row",
            index: row,
            len: self.nrows(),
        })
    }

    /// Keeps the rows selected by `keep`, in order
    fn filter_rows(&self, keep: impl Fn(usize) -> bool) -> Self {
        let rows: Vec<usize> = (0..self.nrows()).filter(|&r| keep(r)).collect();
        Self {
            index: rows.iter().map(|&r| self.index[r].clone()).collect(),
            symbols: self.symbols.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| rows.iter().map(|&r| c[r]).collect())
                .collect(),
        }
    }

    /// Returns the rows whose label falls in the inclusive window `[min, max]`.
    ///
    /// Either bound may be omitted.
    ///
    /// # Examples
    ///
    /// ```
    /// # use return_statistics::Panel;
    /// let prices = Panel::new(vec![1, 2, 3, 4], vec!["A".into()], vec![vec![1.0, 2.0, 3.0, 4.0]]).unwrap();
    /// let window = prices.between(Some(&2), Some(&3));
    /// assert_eq!(window.index(), &[2, 3]);
    /// assert_eq!(window.column(0).unwrap(), &[2.0, 3.0]);
    /// ```
    pub fn between(&self, min: Option<&I>, max: Option<&I>) -> Self {
        self.filter_rows(|r| {
            let label = &self.index[r];
            min.is_none_or(|lo| label >= lo) && max.is_none_or(|hi| label <= hi)
        })
    }

    /// Returns the panel restricted to its first `n` symbols
    pub fn take_symbols(&self, n: usize) -> Self {
        let n = n.min(self.ncols());
        Self {
            index: self.index.clone(),
            symbols: self.symbols[..n].to_vec(),
            columns: self.columns[..n].to_vec(),
        }
    }

    /// Returns the panel without any row that holds a missing or non-finite cell
    pub fn drop_missing_rows(&self) -> Self {
        self.filter_rows(|r| self.columns.iter().all(|c| c[r].is_finite()))
    }

    /// Returns the panel with every cell multiplied by `factor`.
    ///
    /// Missing cells stay missing.
    pub fn scale(&self, factor: T) -> Self {
        self.map(|v| v * factor)
    }

    /// Applies `f` cell by cell, keeping labels
    pub(crate) fn map(&self, f: impl Fn(T) -> T) -> Self {
        Self {
            index: self.index.clone(),
            symbols: self.symbols.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| c.iter().map(|&v| f(v)).collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec::Vec};

    use super::*;

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Panel<u32, f64> {
        Panel::new(
            vec![1, 2, 3, 4],
            symbols(&["A", "B"]),
            vec![vec![1.0, 2.0, 3.0, 4.0], vec![10.0, f64::NAN, 30.0, 40.0]],
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_ragged_columns() {
        let err = Panel::new(vec![1, 2], symbols(&["A"]), vec![vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            PanelError::ShapeMismatch {
                what: "rows",
                expected: 2,
                actual: 1
            }
        );

        let err = Panel::<u32, f64>::new(vec![1], symbols(&["A", "B"]), vec![vec![1.0]]).unwrap_err();
        assert!(matches!(err, PanelError::ShapeMismatch { what: "columns", .. }));
    }

    #[test]
    fn new_rejects_duplicate_symbols() {
        let err = Panel::new(vec![1], symbols(&["A", "A"]), vec![vec![1.0], vec![2.0]]).unwrap_err();
        assert_eq!(err, PanelError::DuplicateSymbol("A".into()));
    }

    #[test]
    fn from_rows_transposes() {
        let panel = Panel::from_rows(
            vec![1, 2],
            symbols(&["A", "B"]),
            &[vec![1.0, 10.0], vec![2.0, 20.0]],
        )
        .unwrap();
        assert_eq!(panel.column(0).unwrap(), &[1.0, 2.0]);
        assert_eq!(panel.column_by_symbol("B").unwrap(), &[10.0, 20.0]);
    }

    #[test]
    fn lookups_fail_fast() {
        let panel = sample();
        assert_eq!(
            panel.column(2),
            Err(PanelError::ColumnOutOfRange {
                what: "column",
                index: 2,
                len: 2
            })
        );
        assert!(matches!(
            panel.value(9, 0),
            Err(PanelError::ColumnOutOfRange { what: "row", .. })
        ));
        assert_eq!(panel.column_by_symbol("Z"), Err(PanelError::UnknownSymbol("Z".into())));
        assert_eq!(panel.value(2, 1), Ok(30.0));
    }

    #[test]
    fn between_is_inclusive_and_open_ended() {
        let panel = sample();
        assert_eq!(panel.between(Some(&3), None).index(), &[3, 4]);
        assert_eq!(panel.between(None, Some(&1)).index(), &[1]);
        assert_eq!(panel.between(None, None).index(), panel.index());
    }

    #[test]
    fn take_symbols_keeps_order() {
        let panel = sample();
        let first = panel.take_symbols(1);
        assert_eq!(first.symbols(), &symbols(&["A"])[..]);
        assert_eq!(panel.take_symbols(10).ncols(), 2);
    }

    #[test]
    fn drop_missing_rows_removes_whole_rows() {
        let panel = sample().drop_missing_rows();
        assert_eq!(panel.index(), &[1, 3, 4]);
        assert_eq!(panel.column(1).unwrap(), &[10.0, 30.0, 40.0]);
    }

    #[test]
    fn scale_keeps_missing() {
        let scaled = sample().scale(100.0);
        assert_eq!(scaled.column(0).unwrap(), &[100.0, 200.0, 300.0, 400.0]);
        assert!(scaled.value(1, 1).unwrap().is_nan());
    }
}
