use alloc::{string::String, vec::Vec};

use ahash::RandomState;
use hashbrown::HashMap;
use num_traits::Float;

use crate::{Panel, PanelError};

type Positions = HashMap<String, usize, RandomState>;

/// Returns the position of `label`, appending it on first sight
fn position(labels: &mut Vec<String>, positions: &mut Positions, label: &str) -> usize {
    if let Some(&pos) = positions.get(label) {
        return pos;
    }
    let pos = labels.len();
    labels.push(label.into());
    positions.insert(label.into(), pos);
    pos
}

/// A date x (symbol, field) table, e.g. Open/Close/Adj Close prices for many
/// symbols side by side.
///
/// Symbols and fields keep the order in which they are first seen. Use
/// [`FieldPanel::field`] to extract the canonical symbol-indexed [`Panel`]
/// for one field before computing returns.
#[derive(Debug, Clone)]
pub struct FieldPanel<I, T> {
    /// Row labels
    index: Vec<I>,
    /// Symbols in first-seen order
    symbols: Vec<String>,
    /// Fields in first-seen order
    fields: Vec<String>,
    /// Position of each symbol in `symbols`
    symbol_pos: Positions,
    /// Position of each field in `fields`
    field_pos: Positions,
    /// Column data keyed by `(symbol position, field position)`
    columns: HashMap<(usize, usize), Vec<T>, RandomState>,
}

impl<I, T> FieldPanel<I, T>
where
    I: Clone + PartialOrd,
    T: Float,
{
    /// Creates a multi-field panel from `(symbol, field, column)` triples.
    ///
    /// # Arguments
    ///
    /// * `index` - The row labels
    /// * `columns` - The columns; each `(symbol, field)` pair must be unique
    ///   and each column as long as `index`
    ///
    /// # Returns
    ///
    /// * `Result<Self, PanelError>` - The panel, or a shape/duplicate error
    ///
    /// # Examples
    ///
    /// ```
    /// # use return_statistics::FieldPanel;
    /// let panel = FieldPanel::new(
    ///     vec![1, 2],
    ///     vec![
    ///         ("SPY".into(), "Open".into(), vec![1.0, 2.0]),
    ///         ("SPY".into(), "Close".into(), vec![1.5, 2.5]),
    ///         ("TLT".into(), "Close".into(), vec![9.0, 8.0]),
    ///     ],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(panel.fields(), &["Open", "Close"]);
    /// let close = panel.field("Close").unwrap();
    /// assert_eq!(close.symbols(), &["SPY", "TLT"]);
    /// assert_eq!(panel.field("Open").unwrap().ncols(), 1);
    /// ```
    pub fn new(index: Vec<I>, columns: Vec<(String, String, Vec<T>)>) -> Result<Self, PanelError> {
        let mut panel = Self {
            index,
            symbols: Vec::new(),
            fields: Vec::new(),
            symbol_pos: Positions::default(),
            field_pos: Positions::default(),
            columns: HashMap::with_capacity_and_hasher(columns.len(), RandomState::new()),
        };

        for (symbol, field, column) in columns {
            if column.len() != panel.index.len() {
                return Err(PanelError::ShapeMismatch {
                    what: "rows",
                    expected: panel.index.len(),
                    actual: column.len(),
                });
            }
            let s = position(&mut panel.symbols, &mut panel.symbol_pos, &symbol);
            let f = position(&mut panel.fields, &mut panel.field_pos, &field);
            if panel.columns.insert((s, f), column).is_some() {
                return Err(PanelError::DuplicateSymbol(format!("{symbol}/{field}")));
            }
        }

        Ok(panel)
    }

    /// Returns the row labels
    pub fn index(&self) -> &[I] {
        &self.index
    }

    /// Returns the symbols in first-seen order
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Returns the fields in first-seen order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns the number of rows
    pub fn nrows(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the panel carries `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.field_pos.contains_key(field)
    }

    /// Extracts the symbol-indexed panel for one field.
    ///
    /// Symbols that lack the field are left out; the rest keep their order.
    ///
    /// # Returns
    ///
    /// * `Result<Panel<I, T>, PanelError>` - The panel, or `UnknownField`
    pub fn field(&self, field: &str) -> Result<Panel<I, T>, PanelError> {
        let &f = self
            .field_pos
            .get(field)
            .ok_or_else(|| PanelError::UnknownField(field.into()))?;

        let mut symbols = Vec::new();
        let mut columns = Vec::new();
        for (s, symbol) in self.symbols.iter().enumerate() {
            if let Some(column) = self.columns.get(&(s, f)) {
                symbols.push(symbol.clone());
                columns.push(column.clone());
            }
        }
        Ok(Panel::from_parts(self.index.clone(), symbols, columns))
    }

    /// Returns the panel restricted to its first `n` symbols.
    ///
    /// Fields no kept symbol carries are dropped; the rest keep their order.
    pub fn take_symbols(&self, n: usize) -> Self {
        let n = n.min(self.symbols.len());
        let symbols = self.symbols[..n].to_vec();
        let symbol_pos = symbols.iter().cloned().zip(0..).collect();

        let mut fields = Vec::new();
        let mut field_pos = Positions::default();
        let remap: Vec<Option<usize>> = self
            .fields
            .iter()
            .enumerate()
            .map(|(f, field)| {
                (0..n)
                    .any(|s| self.columns.contains_key(&(s, f)))
                    .then(|| position(&mut fields, &mut field_pos, field))
            })
            .collect();

        let columns = self
            .columns
            .iter()
            .filter(|((s, _), _)| *s < n)
            .filter_map(|(&(s, f), column)| remap[f].map(|f| ((s, f), column.clone())))
            .collect();

        Self {
            index: self.index.clone(),
            symbols,
            fields,
            symbol_pos,
            field_pos,
            columns,
        }
    }

    /// Returns the rows whose label falls in the inclusive window `[min, max]`
    pub fn between(&self, min: Option<&I>, max: Option<&I>) -> Self {
        let rows: Vec<usize> = self
            .index
            .iter()
            .enumerate()
            .filter(|(_, label)| min.is_none_or(|lo| *label >= lo) && max.is_none_or(|hi| *label <= hi))
            .map(|(r, _)| r)
            .collect();
        Self {
            index: rows.iter().map(|&r| self.index[r].clone()).collect(),
            symbols: self.symbols.clone(),
            fields: self.fields.clone(),
            symbol_pos: self.symbol_pos.clone(),
            field_pos: self.field_pos.clone(),
            columns: self
                .columns
                .iter()
                .map(|(&k, c)| (k, rows.iter().map(|&r| c[r]).collect()))
                .collect(),
        }
    }
}
