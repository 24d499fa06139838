pub mod results;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ping::result::Ping;

pub use results::{GeoInfo, GeoIp, NatType, ScriptOutcome, Speed, UdpNat};

/// Identifies a raw measurement run.
///
/// One run can feed several metrics, e.g. a single ping job provides packet
/// loss as well as both latency metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacroType {
    Speed,
    Ping,
    Udp,
    GeoIp,
    Script,
    Invalid,
}

impl MacroType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MacroType::Speed => "SPEED",
            MacroType::Ping => "PING",
            MacroType::Udp => "UDP",
            MacroType::GeoIp => "GEOIP",
            MacroType::Script => "SCRIPT",
            MacroType::Invalid => "INVALID",
        }
    }
}

impl From<&str> for MacroType {
    fn from(value: &str) -> Self {
        match value {
            "SPEED" => MacroType::Speed,
            "PING" => MacroType::Ping,
            "UDP" => MacroType::Udp,
            "GEOIP" => MacroType::GeoIp,
            "SCRIPT" => MacroType::Script,
            _ => MacroType::Invalid,
        }
    }
}

impl fmt::Display for MacroType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MacroType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MacroType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(MacroType::from(name.as_str()))
    }
}

/// The finished result of a raw measurement run, handed to every metric
/// extractor that depends on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MacroResult {
    Ping(Ping),
    Speed(Speed),
    Udp(UdpNat),
    GeoIp(GeoIp),
    Script(ScriptOutcome),
    Invalid,
}

impl MacroResult {
    pub fn macro_type(&self) -> MacroType {
        match self {
            MacroResult::Ping(_) => MacroType::Ping,
            MacroResult::Speed(_) => MacroType::Speed,
            MacroResult::Udp(_) => MacroType::Udp,
            MacroResult::GeoIp(_) => MacroType::GeoIp,
            MacroResult::Script(_) => MacroType::Script,
            MacroResult::Invalid => MacroType::Invalid,
        }
    }
}

impl From<Ping> for MacroResult {
    fn from(value: Ping) -> Self {
        MacroResult::Ping(value)
    }
}
