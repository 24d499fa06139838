use crate::macros::{MacroResult, MacroType};

use super::{Matrix, MatrixEntry, MatrixType, MatrixValue};

/// Stands in for a metric type nobody registered. Extracts nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Invalid;

impl Matrix for Invalid {
    fn matrix_type(&self) -> MatrixType {
        MatrixType::Invalid
    }

    fn macro_job(&self) -> MacroType {
        MacroType::Invalid
    }

    fn extract(&mut self, _entry: &MatrixEntry, _result: &MacroResult) {}

    fn value(&self) -> MatrixValue {
        MatrixValue::Empty
    }
}
