use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::time::{Instant, timeout, timeout_at};
use url::Url;

use crate::config::ProbeSettings;
use crate::vendor::{BoxedConn, DialOptions, Vendor};

use super::bounded_reader::parse_status;
use super::error::ProbeError;
use super::result::ProbeSample;

/// Fill the `{}` placeholders of `template` with `args`, in order.
///
/// Placeholders without a matching argument are left empty.
pub fn fill_template(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len() + args.iter().map(|a| a.len()).sum::<usize>());
    let mut args = args.iter();
    let mut parts = template.split("{}").peekable();
    while let Some(part) = parts.next() {
        out.push_str(part);
        if parts.peek().is_some() {
            out.push_str(args.next().copied().unwrap_or_default());
        }
    }
    out
}

/// The request written to the target, identical for both writes and for
/// every attempt against the same URL.
pub fn build_payload(url: &Url, settings: &ProbeSettings) -> String {
    let path_and_query = format!("{}?{}", url.path(), url.query().unwrap_or_default());
    fill_template(
        &settings.payload_template,
        &[
            &path_and_query,
            url.host_str().unwrap_or_default(),
            &settings.caller_version,
        ],
    )
}

/// Measure a plaintext target over a raw connection.
///
/// The payload is written once to establish the exchange, then a second
/// time on the same connection. The returned sample's `rtt` is the round
/// trip of the second write, its `request` the time from dialing to the
/// first response byte. When the response head cannot be parsed the round
/// trip still counts, with `request` and `status` left at zero.
///
/// `dial_timeout` bounds the dial only. Once connected, the exchange has
/// `netcat_deadline` to measure both round trips, and the status read gets
/// whatever is left of it, capped at `status_read_deadline`.
pub async fn ping_via_netcat(
    vendor: &dyn Vendor,
    url: &Url,
    settings: &ProbeSettings,
    dial_timeout: Duration,
) -> Result<ProbeSample, ProbeError> {
    let payload = build_payload(url, settings);

    let conn_start = Instant::now();
    let conn = timeout(dial_timeout, vendor.dial(url, &DialOptions::tcp()))
        .await
        .map_err(|_| ProbeError::Timeout { phase: "dial" })?
        .map_err(ProbeError::Dial)?;

    let deadline = Instant::now() + settings.netcat_deadline();
    let mut reader = BufReader::new(conn);
    let (connect_rtt, request_rtt) =
        timeout_at(deadline, measure(&mut reader, payload.as_bytes(), conn_start))
            .await
            .map_err(|_| ProbeError::Timeout {
                phase: "netcat exchange",
            })??;

    let within = settings
        .status_read_deadline()
        .min(deadline.saturating_duration_since(Instant::now()));
    match parse_status(&mut reader, within, settings.status_read_limit_bytes).await {
        Ok(status) => Ok(ProbeSample {
            rtt: request_rtt,
            request: connect_rtt,
            status,
        }),
        Err(e) => {
            log::debug!("status line from {url} unreadable: {e}");
            Ok(ProbeSample::degraded(request_rtt))
        }
    }
}

/// Both writes and their round trips. Returns the time from dialing to the
/// first reply and the round trip of the second write. The second reply is
/// left in the buffer for the status parse.
async fn measure(
    reader: &mut BufReader<BoxedConn>,
    payload: &[u8],
    conn_start: Instant,
) -> Result<(Duration, Duration), ProbeError> {
    reader
        .write_all(payload)
        .await
        .map_err(ProbeError::write("first write"))?;
    reader
        .flush()
        .await
        .map_err(ProbeError::write("first write"))?;
    // Only the arrival matters here, a short read is caught by the second exchange.
    let _ = reader.read_u8().await;
    let connect_rtt = conn_start.elapsed();

    let leftover = reader.buffer().len();
    reader.consume(leftover);

    let request_start = Instant::now();
    reader
        .write_all(payload)
        .await
        .map_err(ProbeError::write("second write"))?;
    reader
        .flush()
        .await
        .map_err(ProbeError::write("second write"))?;
    let peeked = reader
        .fill_buf()
        .await
        .map_err(ProbeError::read("second read"))?;
    if peeked.is_empty() {
        return Err(ProbeError::Read {
            phase: "second read",
            source: std::io::ErrorKind::UnexpectedEof.into(),
        });
    }
    Ok((connect_rtt, request_start.elapsed()))
}

#[cfg(test)]
mod tests {
    use super::super::testing::{PendingVendor, silent_vendor, stalling_vendor};
    use super::*;

    const OK: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n";

    #[test]
    fn test_fill_template_in_order() {
        assert_eq!(fill_template("{}-{}-{}", &["a", "b", "c"]), "a-b-c");
        assert_eq!(fill_template("no holes", &["a"]), "no holes");
        assert_eq!(fill_template("{}{}", &["a"]), "a");
    }

    #[test]
    fn test_build_payload() {
        let settings = ProbeSettings {
            caller_version: "4.3.1".to_string(),
            ..ProbeSettings::default()
        };
        let url = Url::parse("http://example.com:8080/generate_204?a=1&b=two").unwrap();

        assert_eq!(
            build_payload(&url, &settings),
            "GET /generate_204?a=1&b=two HTTP/1.1\r\nHost: example.com\r\nUser-Agent: probekit/4.3.1\r\nAccept: */*\r\nConnection: keep-alive\r\n\r\n"
        );
    }

    #[test]
    fn test_build_payload_without_query() {
        let url = Url::parse("http://example.com").unwrap();
        let payload = build_payload(&url, &ProbeSettings::default());
        assert!(payload.starts_with("GET /? HTTP/1.1\r\n"));
    }

    #[tokio::test]
    async fn test_stalled_status_line_keeps_round_trip() {
        // The second reply stops after the status line and never finishes its head.
        let vendor = stalling_vendor(&[OK, b"HTTP/1.1 200 OK\r\n"]);
        let settings = ProbeSettings {
            netcat_deadline_ms: 300,
            ..ProbeSettings::default()
        };
        let url = Url::parse("http://example.com/generate_204").unwrap();

        let started = Instant::now();
        let sample = ping_via_netcat(&vendor, &url, &settings, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(sample.status, 0);
        assert_eq!(sample.request, Duration::ZERO);
        assert!(sample.rtt < Duration::from_millis(300));
        // The status read is cut to the exchange budget, not the 5s read deadline.
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_status_read_deadline_applies_within_budget() {
        let vendor = stalling_vendor(&[OK, b"HTTP/1.1 204 No Content\r\n"]);
        let settings = ProbeSettings {
            status_read_deadline_ms: 100,
            ..ProbeSettings::default()
        };
        let url = Url::parse("http://example.com/").unwrap();

        let started = Instant::now();
        let sample = ping_via_netcat(&vendor, &url, &settings, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(sample.status, 0);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_silent_peer_runs_out_of_budget() {
        let settings = ProbeSettings {
            netcat_deadline_ms: 100,
            ..ProbeSettings::default()
        };
        let url = Url::parse("http://example.com/").unwrap();

        let err = ping_via_netcat(&silent_vendor(), &url, &settings, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProbeError::Timeout {
                phase: "netcat exchange"
            }
        ));
    }

    #[tokio::test]
    async fn test_dial_timeout() {
        let url = Url::parse("http://example.com/").unwrap();
        let err = ping_via_netcat(
            &PendingVendor,
            &url,
            &ProbeSettings::default(),
            Duration::from_millis(50),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ProbeError::Timeout { phase: "dial" }));
    }
}
