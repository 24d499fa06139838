use std::env;
use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::time::Duration;

use rustls::RootCertStore;
use thiserror::Error;
use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{NameServerConfig, NameServerConfigGroup, Protocol, ResolverConfig, ResolverOpts},
};

use super::model::ProbeSettings;

const CONFIG_FILE_VAR: &str = "PROBE_CONFIG_FILE";
const DNS_HOSTS_VAR: &str = "PROBE_DNS_HOSTS";
const DNS_PORT: u16 = 53;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings YAML")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid DNS host {host:?}")]
    DnsHost {
        host: String,
        #[source]
        source: AddrParseError,
    },
}

/// Load the probe settings.
///
/// A `.env` file in the working directory is honoured when present. The
/// YAML file named by `PROBE_CONFIG_FILE` is parsed if the variable is set,
/// otherwise the defaults apply. `PROBE_DNS_HOSTS` (comma separated)
/// replaces the configured name servers.
pub fn load_settings() -> Result<ProbeSettings, ConfigError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            log::warn!("Ignoring unreadable .env file: {e}");
        }
    }

    let settings = match env::var(CONFIG_FILE_VAR) {
        Ok(path) => {
            let yaml = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            load_settings_from_str(&yaml)?
        }
        Err(_) => ProbeSettings::default(),
    };

    let settings = apply_env_overrides(settings, |key| env::var(key).ok());
    log::info!("Using DNS hosts: {:?}", settings.dns_hosts);
    Ok(settings)
}

pub fn load_settings_from_str(yaml: &str) -> Result<ProbeSettings, ConfigError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Apply environment overrides, reading variables through `lookup`.
pub fn apply_env_overrides<F>(mut settings: ProbeSettings, lookup: F) -> ProbeSettings
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(hosts) = lookup(DNS_HOSTS_VAR) {
        settings.dns_hosts = hosts
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }
    settings
}

/// Root certificates used to verify TLS probe targets.
pub fn default_root_store() -> RootCertStore {
    RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    }
}

fn name_server(host: &str) -> Result<NameServerConfig, ConfigError> {
    let ip: IpAddr = host.trim().parse().map_err(|source| ConfigError::DnsHost {
        host: host.to_string(),
        source,
    })?;
    Ok(NameServerConfig {
        socket_addr: SocketAddr::new(ip, DNS_PORT),
        protocol: Protocol::Tcp,
        tls_dns_name: None,
        trust_negative_responses: false,
        bind_addr: None,
    })
}

/// Build the resolver used by [`crate::vendor::DirectVendor`].
///
/// Only `dns_hosts` are queried, over TCP. Lookups are cached, and each
/// name server gets two tries of 100ms.
pub fn setup_resolver(dns_hosts: &[String]) -> Result<TokioAsyncResolver, ConfigError> {
    let name_servers = dns_hosts
        .iter()
        .map(|host| name_server(host))
        .collect::<Result<Vec<_>, _>>()?;

    let mut opts = ResolverOpts::default();
    opts.attempts = 2;
    opts.timeout = Duration::from_millis(100);
    opts.cache_size = 1024;

    Ok(TokioAsyncResolver::tokio(
        ResolverConfig::from_parts(None, Vec::new(), NameServerConfigGroup::from(name_servers)),
        opts,
    ))
}
