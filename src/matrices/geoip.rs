use crate::macros::{GeoInfo, MacroResult, MacroType};

use super::{Matrix, MatrixEntry, MatrixType, MatrixValue, log_mismatch};

/// Location of the address the vendor is reached at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InboundGeoIp {
    pub value: Vec<GeoInfo>,
}

impl Matrix for InboundGeoIp {
    fn matrix_type(&self) -> MatrixType {
        MatrixType::InboundGeoIp
    }

    fn macro_job(&self) -> MacroType {
        MacroType::GeoIp
    }

    fn extract(&mut self, _entry: &MatrixEntry, result: &MacroResult) {
        match result {
            MacroResult::GeoIp(geo) => self.value = geo.inbound.clone(),
            other => log_mismatch(self.matrix_type(), other),
        }
    }

    fn value(&self) -> MatrixValue {
        MatrixValue::Geo(self.value.clone())
    }
}

/// Location of the address the vendor's traffic leaves from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutboundGeoIp {
    pub value: Vec<GeoInfo>,
}

impl Matrix for OutboundGeoIp {
    fn matrix_type(&self) -> MatrixType {
        MatrixType::OutboundGeoIp
    }

    fn macro_job(&self) -> MacroType {
        MacroType::GeoIp
    }

    fn extract(&mut self, _entry: &MatrixEntry, result: &MacroResult) {
        match result {
            MacroResult::GeoIp(geo) => self.value = geo.outbound.clone(),
            other => log_mismatch(self.matrix_type(), other),
        }
    }

    fn value(&self) -> MatrixValue {
        MatrixValue::Geo(self.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::GeoIp;

    fn info(ip: &str, country_code: &str) -> GeoInfo {
        GeoInfo {
            ip: ip.to_string(),
            country_code: country_code.to_string(),
            ..GeoInfo::default()
        }
    }

    #[test]
    fn test_inbound_and_outbound_split() {
        let result = MacroResult::GeoIp(GeoIp {
            inbound: vec![info("198.51.100.4", "DE")],
            outbound: vec![info("203.0.113.9", "JP"), info("2001:db8::1", "JP")],
        });

        let mut inbound = InboundGeoIp::default();
        let mut outbound = OutboundGeoIp::default();
        inbound.extract(&MatrixEntry::new(MatrixType::InboundGeoIp), &result);
        outbound.extract(&MatrixEntry::new(MatrixType::OutboundGeoIp), &result);

        assert_eq!(inbound.value, vec![info("198.51.100.4", "DE")]);
        assert_eq!(outbound.value.len(), 2);
        assert_eq!(outbound.value[0].country_code, "JP");
    }
}
