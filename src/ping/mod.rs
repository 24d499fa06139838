pub mod bounded_reader;
pub mod engine;
pub mod error;
pub mod netcat;
pub mod result;
pub mod stats;
pub mod trace;
pub mod traced_io;

pub mod prelude {
    pub use super::engine::{PingJob, Pinger};
    pub use super::error::ProbeError;
    pub use super::result::{Ping, ProbeSample};
}

/// Render an error followed by every error in its `source` chain, one
/// `Caused by:` paragraph each.
pub fn report(err: &(dyn std::error::Error + 'static)) -> String {
    std::iter::successors(err.source(), |cause| cause.source()).fold(
        err.to_string(),
        |mut out, cause| {
            out.push_str("\n\nCaused by: ");
            out.push_str(&cause.to_string());
            out
        },
    )
}


#[cfg(test)]
mod tests {
    use std::io;

    use super::error::ProbeError;
    use super::*;

    #[test]
    fn test_report_walks_cause_chain() {
        let err = ProbeError::Dial(io::Error::new(io::ErrorKind::ConnectionRefused, "refused by relay"));
        assert_eq!(report(&err), "dial failed\n\nCaused by: refused by relay");

        let err = ProbeError::ProtocolParse("no head".to_string());
        assert_eq!(report(&err), "cannot parse status line: no head");
    }
}
