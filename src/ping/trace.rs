use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::Empty;
use hyper::Request;
use hyper::client::conn::http1;
use hyper::header::{HOST, HeaderValue, USER_AGENT};
use hyper_util::rt::TokioIo;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ProtocolVersion, RootCertStore};
use tokio_rustls::TlsConnector;
use url::{Host, Position, Url};

use crate::config::ProbeSettings;
use crate::vendor::{DialOptions, Vendor};

use super::error::ProbeError;
use super::result::ProbeSample;
use super::traced_io::TracedIo;

/// Client configuration for traced probes.
///
/// Only TLS 1.3 is offered: older versions need an extra round trip to
/// complete the handshake and would skew the measurement. Certificates are
/// always verified against `roots`.
pub fn tls13_client_config(roots: Arc<RootCertStore>) -> Result<Arc<ClientConfig>, ProbeError> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let mut config = ClientConfig::builder_with_provider(provider)
        .with_protocol_versions(&[&rustls::version::TLS13])?
        .with_root_certificates(roots)
        .with_no_client_auth();
    config.alpn_protocols = vec![b"http/1.1".to_vec()];
    Ok(Arc::new(config))
}

fn server_name(url: &Url) -> Result<ServerName<'static>, ProbeError> {
    let name = match url.host() {
        Some(Host::Domain(domain)) => domain.to_string(),
        Some(Host::Ipv4(ip)) => ip.to_string(),
        Some(Host::Ipv6(ip)) => ip.to_string(),
        None => return Err(ProbeError::InvalidUrl(format!("{url} has no host"))),
    };
    ServerName::try_from(name).map_err(|e| ProbeError::InvalidUrl(format!("{url}: {e}")))
}

fn build_request(url: &Url, settings: &ProbeSettings) -> Result<Request<Empty<Bytes>>, ProbeError> {
    let invalid = |e: &dyn std::fmt::Display| ProbeError::InvalidUrl(format!("{url}: {e}"));

    let mut request = Request::new(Empty::<Bytes>::new());
    *request.uri_mut() = url[Position::BeforePath..Position::AfterQuery]
        .parse()
        .map_err(|e| invalid(&e))?;

    let headers = request.headers_mut();
    headers.insert(
        HOST,
        HeaderValue::from_str(&url[Position::BeforeHost..Position::AfterPort])
            .map_err(|e| invalid(&e))?,
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&format!("probekit/{}", settings.caller_version))
            .map_err(|e| invalid(&e))?,
    );
    Ok(request)
}

/// Measure an HTTPS target on a fresh connection.
///
/// The handshake is timed around the TLS connect, the request through a
/// [`TracedIo`] that notes when the first response byte arrives. The
/// returned sample's `rtt` is first byte minus handshake completion, its
/// `request` first byte minus handshake start.
pub async fn ping_via_trace(
    vendor: &dyn Vendor,
    url: &Url,
    tls: Arc<ClientConfig>,
    settings: &ProbeSettings,
) -> Result<ProbeSample, ProbeError> {
    let name = server_name(url)?;
    let request = build_request(url, settings)?;

    let conn = vendor
        .dial(url, &DialOptions::tcp())
        .await
        .map_err(ProbeError::Dial)?;

    let handshake_start = Instant::now();
    let stream = TlsConnector::from(tls)
        .connect(name, conn)
        .await
        .map_err(|e| ProbeError::HandshakeIncomplete {
            reason: e.to_string(),
        })?;
    let handshake_done = Instant::now();

    let (_, session) = stream.get_ref();
    if session.is_handshaking() || session.protocol_version() != Some(ProtocolVersion::TLSv1_3) {
        return Err(ProbeError::HandshakeIncomplete {
            reason: format!("negotiated {:?}", session.protocol_version()),
        });
    }

    let (io, marks) = TracedIo::new(stream);
    let (mut sender, connection) = http1::handshake(TokioIo::new(io)).await?;
    let driver = tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::debug!("traced connection closed: {e}");
        }
    });

    let response = sender.send_request(request).await;
    // One request per connection, the next attempt handshakes again.
    driver.abort();
    let response = response?;

    let first_byte = marks.first_byte().unwrap_or_else(Instant::now);
    if let Some(wrote) = marks.wrote_request() {
        log::debug!(
            "{url}: handshake {:?}, headers written after {:?}, first byte after {:?}",
            handshake_done - handshake_start,
            wrote.saturating_duration_since(handshake_done),
            first_byte.saturating_duration_since(handshake_done),
        );
    }

    Ok(ProbeSample {
        rtt: first_byte.saturating_duration_since(handshake_done),
        request: first_byte.saturating_duration_since(handshake_start),
        status: response.status().as_u16(),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::super::testing::{tls_server, tls_vendor};
    use super::*;

    #[test]
    fn test_build_request() {
        let url = Url::parse("https://example.com:8443/generate_204?x=1").unwrap();
        let request = build_request(&url, &ProbeSettings::default()).unwrap();

        assert_eq!(request.uri(), "/generate_204?x=1");
        assert_eq!(request.headers()[HOST], "example.com:8443");
        assert!(
            request.headers()[USER_AGENT]
                .to_str()
                .unwrap()
                .starts_with("probekit/")
        );
    }

    #[test]
    fn test_server_name_for_ip_literal() {
        let url = Url::parse("https://127.0.0.1/").unwrap();
        assert!(matches!(server_name(&url), Ok(ServerName::IpAddress(_))));
    }

    #[tokio::test]
    async fn test_tls13_exchange() {
        let (acceptor, roots) = tls_server(&[&rustls::version::TLS13]);
        let vendor = tls_vendor(acceptor, b"HTTP/1.1 204 No Content\r\nContent-Length: 0\r\n\r\n");
        let url = Url::parse("https://localhost/generate_204").unwrap();
        let tls = tls13_client_config(roots).unwrap();

        let sample = ping_via_trace(&vendor, &url, tls, &ProbeSettings::default())
            .await
            .unwrap();

        assert_eq!(sample.status, 204);
        assert!(sample.request >= sample.rtt);
        assert!(sample.request < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_tls12_server_is_rejected() {
        let (acceptor, roots) = tls_server(&[&rustls::version::TLS12]);
        let vendor = tls_vendor(acceptor, b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");
        let url = Url::parse("https://localhost/").unwrap();
        let tls = tls13_client_config(roots).unwrap();

        let err = ping_via_trace(&vendor, &url, tls, &ProbeSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::HandshakeIncomplete { .. }));
    }

    #[tokio::test]
    async fn test_untrusted_certificate_is_rejected() {
        let (acceptor, _) = tls_server(&[&rustls::version::TLS13]);
        let vendor = tls_vendor(acceptor, b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");
        let url = Url::parse("https://localhost/").unwrap();
        let tls = tls13_client_config(Arc::new(RootCertStore::empty())).unwrap();

        let err = ping_via_trace(&vendor, &url, tls, &ProbeSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::HandshakeIncomplete { .. }));
    }
}
