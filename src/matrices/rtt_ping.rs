use crate::macros::{MacroResult, MacroType};

use super::{Matrix, MatrixEntry, MatrixType, MatrixValue, log_mismatch};

/// Mean round trip of a ping job, in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RttPing {
    pub value: u16,
}

impl Matrix for RttPing {
    fn matrix_type(&self) -> MatrixType {
        MatrixType::RttPing
    }

    fn macro_job(&self) -> MacroType {
        MacroType::Ping
    }

    fn extract(&mut self, _entry: &MatrixEntry, result: &MacroResult) {
        match result {
            MacroResult::Ping(ping) => self.value = ping.rtt,
            other => log_mismatch(self.matrix_type(), other),
        }
    }

    fn value(&self) -> MatrixValue {
        MatrixValue::Millis(self.value)
    }
}
