use crate::macros::{MacroResult, MacroType, NatType};

use super::{Matrix, MatrixEntry, MatrixType, MatrixValue, log_mismatch};

/// NAT behaviour seen through the vendor's UDP relay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UdpType {
    pub value: NatType,
}

impl Matrix for UdpType {
    fn matrix_type(&self) -> MatrixType {
        MatrixType::UdpType
    }

    fn macro_job(&self) -> MacroType {
        MacroType::Udp
    }

    fn extract(&mut self, _entry: &MatrixEntry, result: &MacroResult) {
        match result {
            MacroResult::Udp(udp) => self.value = udp.nat_type,
            other => log_mismatch(self.matrix_type(), other),
        }
    }

    fn value(&self) -> MatrixValue {
        MatrixValue::Nat(self.value)
    }
}
