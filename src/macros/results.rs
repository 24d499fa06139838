//! Results of the raw measurement runs other than ping. The runs that
//! produce them live outside this crate; only their shape is shared here.

use serde::{Deserialize, Serialize};

/// Throughput of a speed run, in bytes per second.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Speed {
    pub average_speed: u64,
    pub max_speed: u64,
    pub per_second: Vec<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NatType {
    #[default]
    Unknown,
    OpenInternet,
    FullCone,
    RestrictedCone,
    PortRestrictedCone,
    Symmetric,
    Blocked,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UdpNat {
    pub nat_type: NatType,
}

/// Location and ownership of one address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoInfo {
    pub ip: String,
    pub isp: String,
    pub organization: String,
    pub latitude: f64,
    pub longitude: f64,
    pub asn: u32,
    pub asn_organization: String,
    pub timezone: String,
    pub region: String,
    pub city: String,
    pub country: String,
    pub country_code: String,
}

/// Where the vendor's entry point is and where its traffic leaves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GeoIp {
    pub inbound: Vec<GeoInfo>,
    pub outbound: Vec<GeoInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScriptOutcome {
    pub text: String,
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_info_accepts_partial_lookup() {
        let info: GeoInfo =
            serde_json::from_str(r#"{"ip":"203.0.113.7","asn":64500,"country_code":"NL"}"#).unwrap();
        assert_eq!(info.ip, "203.0.113.7");
        assert_eq!(info.asn, 64500);
        assert_eq!(info.country_code, "NL");
        assert!(info.city.is_empty());
    }
}
