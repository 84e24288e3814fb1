//! Likert Core - Fundamental types
//!
//! This crate provides the core types used throughout Likert:
//! - `Cell`: Raw survey cell (number, text or missing)
//! - `DataTable`: Rows of cells with listwise numeric extraction
//! - `StatsError`: Structured errors shared by every analysis

mod value;
mod table;
mod error;

pub use value::{Cell, CellError};
pub use table::{DataTable, Row, CaseMatrix};
pub use error::{StatsError, ErrorContext, Severity, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Cell, DataTable, CaseMatrix, StatsError, Severity};
    pub use crate::error::codes;
}
