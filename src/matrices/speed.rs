use crate::macros::{MacroResult, MacroType};

use super::{Matrix, MatrixEntry, MatrixType, MatrixValue, log_mismatch};

/// Average throughput of a speed run, in bytes per second.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AverageSpeed {
    pub value: u64,
}

impl Matrix for AverageSpeed {
    fn matrix_type(&self) -> MatrixType {
        MatrixType::AverageSpeed
    }

    fn macro_job(&self) -> MacroType {
        MacroType::Speed
    }

    fn extract(&mut self, _entry: &MatrixEntry, result: &MacroResult) {
        match result {
            MacroResult::Speed(speed) => self.value = speed.average_speed,
            other => log_mismatch(self.matrix_type(), other),
        }
    }

    fn value(&self) -> MatrixValue {
        MatrixValue::BytesPerSecond(self.value)
    }
}

/// Peak throughput of a speed run, in bytes per second.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaxSpeed {
    pub value: u64,
}

impl Matrix for MaxSpeed {
    fn matrix_type(&self) -> MatrixType {
        MatrixType::MaxSpeed
    }

    fn macro_job(&self) -> MacroType {
        MacroType::Speed
    }

    fn extract(&mut self, _entry: &MatrixEntry, result: &MacroResult) {
        match result {
            MacroResult::Speed(speed) => self.value = speed.max_speed,
            other => log_mismatch(self.matrix_type(), other),
        }
    }

    fn value(&self) -> MatrixValue {
        MatrixValue::BytesPerSecond(self.value)
    }
}

/// Throughput of every second of a speed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerSecondSpeed {
    pub value: Vec<u64>,
}

impl Matrix for PerSecondSpeed {
    fn matrix_type(&self) -> MatrixType {
        MatrixType::PerSecondSpeed
    }

    fn macro_job(&self) -> MacroType {
        MacroType::Speed
    }

    fn extract(&mut self, _entry: &MatrixEntry, result: &MacroResult) {
        match result {
            MacroResult::Speed(speed) => self.value = speed.per_second.clone(),
            other => log_mismatch(self.matrix_type(), other),
        }
    }

    fn value(&self) -> MatrixValue {
        MatrixValue::Series(self.value.clone())
    }
}
