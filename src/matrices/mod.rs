pub mod geoip;
pub mod http_ping;
pub mod invalid;
pub mod packet_loss;
pub mod registry;
pub mod rtt_ping;
pub mod speed;
pub mod udp_type;

use std::fmt;

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::macros::{GeoInfo, MacroResult, MacroType, NatType, ScriptOutcome};

pub use geoip::{InboundGeoIp, OutboundGeoIp};
pub use http_ping::HttpPing;
pub use invalid::Invalid;
pub use packet_loss::PacketLoss;
pub use registry::{find, find_batch, find_batch_from_entry, required_macros};
pub use rtt_ping::RttPing;
pub use script_test::ScriptTest;
pub use speed::{AverageSpeed, MaxSpeed, PerSecondSpeed};
pub use udp_type::UdpType;

/// Identifies a kind of metric a caller can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixType {
    AverageSpeed,
    MaxSpeed,
    PerSecondSpeed,
    UdpType,
    InboundGeoIp,
    OutboundGeoIp,
    ScriptTest,
    HttpPing,
    RttPing,
    PacketLoss,
    Invalid,
}

impl MatrixType {
    pub const ALL: [MatrixType; 11] = [
        MatrixType::AverageSpeed,
        MatrixType::MaxSpeed,
        MatrixType::PerSecondSpeed,
        MatrixType::UdpType,
        MatrixType::InboundGeoIp,
        MatrixType::OutboundGeoIp,
        MatrixType::ScriptTest,
        MatrixType::HttpPing,
        MatrixType::RttPing,
        MatrixType::PacketLoss,
        MatrixType::Invalid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatrixType::AverageSpeed => "SPEED_AVERAGE",
            MatrixType::MaxSpeed => "SPEED_MAX",
            MatrixType::PerSecondSpeed => "SPEED_PER_SECOND",
            MatrixType::UdpType => "UDP_TYPE",
            MatrixType::InboundGeoIp => "GEOIP_INBOUND",
            MatrixType::OutboundGeoIp => "GEOIP_OUTBOUND",
            MatrixType::ScriptTest => "TEST_SCRIPT",
            MatrixType::HttpPing => "TEST_PING_CONN",
            MatrixType::RttPing => "TEST_PING_RTT",
            MatrixType::PacketLoss => "TEST_PING_PACKET_LOSS",
            MatrixType::Invalid => "INVALID",
        }
    }
}

impl From<&str> for MatrixType {
    /// Unknown names map to [`MatrixType::Invalid`].
    fn from(value: &str) -> Self {
        MatrixType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .unwrap_or(MatrixType::Invalid)
    }
}

impl fmt::Display for MatrixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MatrixType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MatrixType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(MatrixType::from(name.as_str()))
    }
}

/// Caller supplied parameters of a metric request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct MatrixParams {
    pub attempts: u16,
    pub timeout_ms: u64,
    pub url: Option<String>,
}

impl Default for MatrixParams {
    fn default() -> Self {
        Self {
            attempts: 3,
            timeout_ms: 1_000,
            url: None,
        }
    }
}

/// One requested metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MatrixEntry {
    #[serde(rename = "Type")]
    pub kind: MatrixType,
    #[serde(default)]
    pub params: MatrixParams,
}

impl MatrixEntry {
    pub fn new(kind: MatrixType) -> Self {
        Self {
            kind,
            params: MatrixParams::default(),
        }
    }
}

/// The value an extractor holds, ready to be serialized into a response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MatrixValue {
    Percent(f64),
    Millis(u16),
    BytesPerSecond(u64),
    Series(Vec<u64>),
    Nat(NatType),
    Geo(Vec<GeoInfo>),
    Script(ScriptOutcome),
    Empty,
}

/// A metric extractor.
///
/// An extractor names the metric it produces and the raw job it needs, and
/// copies its value out of that job's finished result. Handing it a result
/// of another job leaves the value untouched.
#[enum_dispatch]
pub trait Matrix {
    fn matrix_type(&self) -> MatrixType;

    fn macro_job(&self) -> MacroType;

    fn extract(&mut self, entry: &MatrixEntry, result: &MacroResult);

    fn value(&self) -> MatrixValue;
}

#[enum_dispatch(Matrix)]
#[derive(Debug, Clone, PartialEq)]
pub enum AnyMatrix {
    AverageSpeed(AverageSpeed),
    MaxSpeed(MaxSpeed),
    PerSecondSpeed(PerSecondSpeed),
    UdpType(UdpType),
    InboundGeoIp(InboundGeoIp),
    OutboundGeoIp(OutboundGeoIp),
    ScriptTest(ScriptTest),
    HttpPing(HttpPing),
    RttPing(RttPing),
    PacketLoss(PacketLoss),
    Invalid(Invalid),
}

/// A serialized metric slot as sent back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MatrixOutput {
    #[serde(rename = "Type")]
    pub kind: MatrixType,
    pub value: String,
}

impl AnyMatrix {
    pub fn output(&self) -> serde_json::Result<MatrixOutput> {
        Ok(MatrixOutput {
            kind: self.matrix_type(),
            value: serde_json::to_string(&self.value())?,
        })
    }
}

pub(crate) fn log_mismatch(kind: MatrixType, result: &MacroResult) {
    log::warn!(
        "{kind} cannot be extracted from a {} result, value left unset",
        result.macro_type()
    );
}
