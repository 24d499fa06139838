use std::sync::Arc;
use std::time::Duration;

use rustls::{ClientConfig, RootCertStore};
use url::Url;

use crate::config::ProbeSettings;
use crate::matrices::MatrixEntry;
use crate::vendor::Vendor;

use super::error::ProbeError;
use super::netcat::ping_via_netcat;
use super::report;
use super::result::{Ping, ProbeSample};
use super::trace::{ping_via_trace, tls13_client_config};

/// One ping job: how often and how patiently to probe which target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingJob {
    pub url: String,
    pub attempts: u16,
    pub timeout: Duration,
}

impl PingJob {
    /// Build a job from a metric request entry, falling back to the
    /// configured target when the entry names none.
    pub fn from_entry(entry: &MatrixEntry, settings: &ProbeSettings) -> Self {
        Self {
            url: entry
                .params
                .url
                .clone()
                .unwrap_or_else(|| settings.ping_url.clone()),
            attempts: entry.params.attempts,
            timeout: Duration::from_millis(entry.params.timeout_ms),
        }
    }
}

/// Runs ping jobs.
///
/// A `Pinger` holds no per-run state and can drive any number of jobs
/// concurrently; each [`Pinger::run`] owns its own result.
#[derive(Clone)]
pub struct Pinger {
    settings: Arc<ProbeSettings>,
    tls: Arc<ClientConfig>,
}

impl Pinger {
    pub fn new(settings: Arc<ProbeSettings>, roots: Arc<RootCertStore>) -> Result<Self, ProbeError> {
        Ok(Self {
            settings,
            tls: tls13_client_config(roots)?,
        })
    }

    /// Probe `job.url` `job.attempts` times, one attempt after the other.
    ///
    /// Failed attempts only count towards packet loss and never stop the
    /// attempts after them. Without a vendor, or with nothing to attempt,
    /// no traffic is sent and the result reports 100% loss.
    pub async fn run(&self, vendor: Option<&dyn Vendor>, job: &PingJob) -> Ping {
        let Some(vendor) = vendor else {
            log::debug!("no vendor to ping {} with", job.url);
            return Ping::unreachable();
        };
        let url = match Url::parse(&job.url) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("cannot ping {}: {e}", job.url);
                return Ping::unreachable();
            }
        };

        let mut ping = Ping::default();
        let mut failed = 0u32;

        for attempt in 0..job.attempts {
            match self.attempt(vendor, &url, job.timeout).await {
                Ok(sample) => ping.record(sample),
                Err(e) => {
                    failed += 1;
                    log::debug!("ping {url} attempt {attempt} failed: {}", report(&e));
                }
            }
        }

        ping.finish(failed, u32::from(job.attempts));
        log::debug!(
            "ping {url}: rtt {}ms, request {}ms, loss {:.1}%",
            ping.rtt,
            ping.request,
            ping.packet_loss
        );
        ping
    }

    /// A single attempt, picking the probe by scheme.
    ///
    /// `limit` bounds the whole traced exchange. On the plaintext path it
    /// bounds the dial only, the exchange itself runs on the configured
    /// netcat deadlines so that a slow status line still yields a sample.
    pub async fn attempt(
        &self,
        vendor: &dyn Vendor,
        url: &Url,
        limit: Duration,
    ) -> Result<ProbeSample, ProbeError> {
        if url.scheme() == "https" {
            tokio::time::timeout(limit, ping_via_trace(vendor, url, self.tls.clone(), &self.settings))
                .await
                .map_err(|_| ProbeError::Timeout {
                    phase: "traced request",
                })?
        } else {
            ping_via_netcat(vendor, url, &self.settings, limit).await
        }
    }
}
