use crate::macros::{MacroResult, MacroType};

use super::{Matrix, MatrixEntry, MatrixType, MatrixValue, log_mismatch};

/// Mean request time of a ping job, connection setup included, in
/// milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpPing {
    pub value: u16,
}

impl Matrix for HttpPing {
    fn matrix_type(&self) -> MatrixType {
        MatrixType::HttpPing
    }

    fn macro_job(&self) -> MacroType {
        MacroType::Ping
    }

    fn extract(&mut self, _entry: &MatrixEntry, result: &MacroResult) {
        match result {
            MacroResult::Ping(ping) => self.value = ping.request,
            other => log_mismatch(self.matrix_type(), other),
        }
    }

    fn value(&self) -> MatrixValue {
        MatrixValue::Millis(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::UdpNat;
    use crate::ping::result::Ping;

    #[test]
    fn test_extracts_request() {
        let ping = Ping {
            rtt: 42,
            request: 180,
            ..Ping::default()
        };
        let mut matrix = HttpPing::default();
        matrix.extract(&MatrixEntry::new(MatrixType::HttpPing), &ping.into());
        assert_eq!(matrix.value, 180);
    }

    #[test]
    fn test_udp_result_is_ignored() {
        let mut matrix = HttpPing { value: 7 };
        matrix.extract(
            &MatrixEntry::new(MatrixType::HttpPing),
            &MacroResult::Udp(UdpNat::default()),
        );
        assert_eq!(matrix.value, 7);
    }
}
