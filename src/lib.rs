#![doc = include_str!("../README.md")]
#![no_std]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]
#![allow(clippy::just_underscores_and_digits, clippy::len_without_is_empty)]

#[macro_use]
extern crate alloc;

pub(crate) type Kbn<T> = compensated_summation::KahanBabuskaNeumaier<T>;

mod utils;
pub(crate) use utils::helper;

mod error;
pub use error::PanelError;

mod panel;
pub use panel::Panel;

mod field_panel;
pub use field_panel::FieldPanel;

mod returns;
pub use returns::ReturnKind;

mod moments;
pub use moments::Moments;

mod return_stats;
pub use return_stats::{
    ReturnStats, ReturnStatsTable, SymbolStats, pooled_return_stats, return_stats_by_symbol,
};

mod correlation;
pub use correlation::{CorrSummary, CorrelationMatrix, corr_offdiag_stats, pairwise_corr};

mod describe;
pub use describe::{ColumnSummary, describe};

mod analysis;
pub use analysis::{AnalysisConfig, FieldAnalysis, analyze_fields, analyze_panel};

mod symbols;
pub use symbols::parse_symbol_list;
