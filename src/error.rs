use alloc::string::String;

use thiserror::Error;

/// Errors raised at the panel boundary.
///
/// These signal caller bugs (malformed panels, bad lookups). Numeric
/// degeneracy inside a statistic is never an error; it yields `None`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PanelError {
    /// A column's length differs from the row index, or the number of
    /// symbols differs from the number of columns.
    #[error("shape mismatch: expected {expected} {what}, got {actual}")]
    ShapeMismatch {
        /// What was being counted (rows, columns)
        what: &'static str,
        /// Expected count
        expected: usize,
        /// Actual count
        actual: usize,
    },

    /// The same symbol label (or symbol/field pair) appears twice.
    #[error("duplicate column label '{0}'")]
    DuplicateSymbol(String),

    /// A positional column or row lookup past the end of the panel.
    #[error("{what} index {index} out of range for length {len}")]
    ColumnOutOfRange {
        /// Which axis was indexed
        what: &'static str,
        /// Requested position
        index: usize,
        /// Axis length
        len: usize,
    },

    /// A symbol lookup for a label the panel does not carry.
    #[error("unknown symbol '{0}'")]
    UnknownSymbol(String),

    /// A field lookup for a field the multi-field panel does not carry.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// The configured return scale can not be represented in the panel's
    /// numeric type.
    #[error("return scale {0} is not representable")]
    UnrepresentableScale(f64),
}
