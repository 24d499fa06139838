use crate::macros::{MacroResult, MacroType};

use super::{Matrix, MatrixEntry, MatrixType, MatrixValue, log_mismatch};

/// Share of ping attempts that produced no measurement, in percent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PacketLoss {
    pub value: f64,
}

impl Matrix for PacketLoss {
    fn matrix_type(&self) -> MatrixType {
        MatrixType::PacketLoss
    }

    fn macro_job(&self) -> MacroType {
        MacroType::Ping
    }

    fn extract(&mut self, _entry: &MatrixEntry, result: &MacroResult) {
        match result {
            MacroResult::Ping(ping) => self.value = ping.packet_loss,
            other => log_mismatch(self.matrix_type(), other),
        }
    }

    fn value(&self) -> MatrixValue {
        MatrixValue::Percent(self.value)
    }
}
