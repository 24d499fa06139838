use std::time::Duration;

use serde::Deserialize;

/// Settings shared by every probe run in the process.
///
/// Every field has a default, so an empty YAML document is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// Identifies this prober towards the target. Substituted into the
    /// plaintext payload and sent as the TLS probe's user agent.
    pub caller_version: String,

    /// Raw request written twice per plaintext probe. The three `{}`
    /// placeholders receive the path with query, the host name and
    /// `caller_version`, in that order.
    pub payload_template: String,

    /// Budget for a whole plaintext exchange on one connection.
    pub netcat_deadline_ms: u64,

    /// Budget for reading the status line once the round trip is measured.
    pub status_read_deadline_ms: u64,

    /// Most bytes read while looking for the status line.
    pub status_read_limit_bytes: u64,

    /// Name servers used by the direct vendor.
    pub dns_hosts: Vec<String>,

    /// Target used for ping jobs when a request entry does not name one.
    pub ping_url: String,
}

pub const DEFAULT_PAYLOAD_TEMPLATE: &str = "GET {} HTTP/1.1\r\nHost: {}\r\nUser-Agent: probekit/{}\r\nAccept: */*\r\nConnection: keep-alive\r\n\r\n";

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            caller_version: env!("CARGO_PKG_VERSION").to_string(),
            payload_template: DEFAULT_PAYLOAD_TEMPLATE.to_string(),
            netcat_deadline_ms: 6_000,
            status_read_deadline_ms: 5_000,
            status_read_limit_bytes: 1024 * 1024,
            dns_hosts: vec!["1.1.1.1".to_string(), "8.8.8.8".to_string()],
            ping_url: "https://www.gstatic.com/generate_204".to_string(),
        }
    }
}

impl ProbeSettings {
    pub fn netcat_deadline(&self) -> Duration {
        Duration::from_millis(self.netcat_deadline_ms)
    }

    pub fn status_read_deadline(&self) -> Duration {
        Duration::from_millis(self.status_read_deadline_ms)
    }
}
