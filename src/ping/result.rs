use std::time::Duration;

use serde::Serialize;

use super::stats::{mean, sample_std_dev};

/// One successful probe attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSample {
    /// A single round trip on an already established connection.
    pub rtt: Duration,
    /// The request including connection setup.
    pub request: Duration,
    /// Status code of the response, 0 when it could not be parsed.
    pub status: u16,
}

impl ProbeSample {
    /// A sample whose round trip was measured but whose response could
    /// not be understood.
    pub fn degraded(rtt: Duration) -> Self {
        Self {
            rtt,
            request: Duration::ZERO,
            status: 0,
        }
    }
}

/// Milliseconds, saturating at `u16::MAX`.
pub fn millis(d: Duration) -> u16 {
    u16::try_from(d.as_millis()).unwrap_or(u16::MAX)
}

/// Aggregate of a ping job. All latencies are in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ping {
    #[serde(rename = "RTT")]
    pub rtt: u16,
    #[serde(rename = "RTTSD")]
    pub rtt_sd: u16,
    #[serde(rename = "MaxRTT")]
    pub max_rtt: u16,
    pub request: u16,
    #[serde(rename = "RequestSD")]
    pub request_sd: u16,
    pub max_request: u16,
    /// Same as `rtt_sd`.
    pub jitter: u16,
    #[serde(rename = "RTTList")]
    pub rtt_list: Vec<u16>,
    pub request_list: Vec<u16>,
    pub status_codes: Vec<u16>,
    /// Percentage of attempts without a usable measurement.
    pub packet_loss: f64,
}

impl Ping {
    /// The result of a run where nothing could be measured.
    pub fn unreachable() -> Self {
        Self {
            packet_loss: 100.0,
            ..Self::default()
        }
    }

    pub(crate) fn record(&mut self, sample: ProbeSample) {
        let rtt = millis(sample.rtt);
        let request = millis(sample.request);

        self.max_rtt = self.max_rtt.max(rtt);
        self.max_request = self.max_request.max(request);
        self.rtt_list.push(rtt);
        self.request_list.push(request);
        self.status_codes.push(sample.status);
    }

    pub(crate) fn finish(&mut self, failed: u32, total: u32) {
        if total == 0 || self.rtt_list.is_empty() {
            *self = Self::unreachable();
            return;
        }

        self.packet_loss = f64::from(failed) / f64::from(total) * 100.0;

        self.rtt = mean(&self.rtt_list);
        self.rtt_sd = sample_std_dev(&self.rtt_list);
        self.jitter = self.rtt_sd;

        self.request = mean(&self.request_list);
        self.request_sd = sample_std_dev(&self.request_list);
    }
}
