//! Raw cell values as supplied by the data import layer
//!
//! A cell is whatever the upstream parser produced: a number, a piece of
//! text, or nothing at all. Statistics only ever see the numeric reading.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a cell has no numeric reading
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CellError {
    #[error("missing value")]
    Missing,

    #[error("not a number: '{0}'")]
    NotNumeric(String),

    #[error("non-finite number: {0}")]
    NonFinite(f64),
}

/// Single cell of a data table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Null,
}

impl Cell {
    /// Text content; numbers and missing cells have none
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Parse the cell as a finite real number
    pub fn parse_f64(&self) -> Result<f64, CellError> {
        match self {
            Cell::Number(n) if n.is_finite() => Ok(*n),
            Cell::Number(n) => Err(CellError::NonFinite(*n)),
            Cell::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(CellError::Missing);
                }
                match trimmed.parse::<f64>() {
                    Ok(n) if n.is_finite() => Ok(n),
                    Ok(n) => Err(CellError::NonFinite(n)),
                    Err(_) => Err(CellError::NotNumeric(trimmed.to_string())),
                }
            }
            Cell::Null => Err(CellError::Missing),
        }
    }

    /// Numeric reading, `None` when missing or non-numeric
    pub fn to_f64(&self) -> Option<f64> {
        self.parse_f64().ok()
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Cell::Null)
    }
}
