use std::io;

use thiserror::Error;

/// Why a single probe attempt failed.
///
/// The engine only counts these; the variant matters for logs and for
/// callers driving a probe directly.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("dial failed")]
    Dial(#[source] io::Error),

    #[error("{phase} timed out")]
    Timeout { phase: &'static str },

    #[error("tls handshake incomplete: {reason}")]
    HandshakeIncomplete { reason: String },

    #[error("cannot parse status line: {0}")]
    ProtocolParse(String),

    #[error("write failed during {phase}")]
    Write {
        phase: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("read failed during {phase}")]
    Read {
        phase: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("http exchange failed")]
    Http(#[from] hyper::Error),

    #[error("invalid target url: {0}")]
    InvalidUrl(String),

    #[error("invalid tls configuration")]
    TlsConfig(#[from] rustls::Error),
}

impl ProbeError {
    pub(crate) fn write(phase: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |source| match source.kind() {
            io::ErrorKind::TimedOut => Self::Timeout { phase },
            _ => Self::Write { phase, source },
        }
    }

    pub(crate) fn read(phase: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |source| match source.kind() {
            io::ErrorKind::TimedOut => Self::Timeout { phase },
            _ => Self::Read { phase, source },
        }
    }
}
