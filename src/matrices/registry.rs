//! Lookup of metric extractors by type.
//!
//! The table is built on first use and never changes afterwards, so lookups
//! from any number of tasks need no locking.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::macros::MacroType;

use super::{
    AnyMatrix, AverageSpeed, HttpPing, InboundGeoIp, Invalid, Matrix, MatrixEntry, MatrixType,
    MaxSpeed, OutboundGeoIp, PacketLoss, PerSecondSpeed, RttPing, ScriptTest, UdpType,
};

type Factory = fn() -> AnyMatrix;

static REGISTERED: LazyLock<HashMap<MatrixType, Factory>> = LazyLock::new(|| {
    let factories: [(MatrixType, Factory); 10] = [
        (MatrixType::AverageSpeed, || AnyMatrix::from(AverageSpeed::default())),
        (MatrixType::MaxSpeed, || AnyMatrix::from(MaxSpeed::default())),
        (MatrixType::PerSecondSpeed, || AnyMatrix::from(PerSecondSpeed::default())),
        (MatrixType::UdpType, || AnyMatrix::from(UdpType::default())),
        (MatrixType::InboundGeoIp, || AnyMatrix::from(InboundGeoIp::default())),
        (MatrixType::OutboundGeoIp, || AnyMatrix::from(OutboundGeoIp::default())),
        (MatrixType::ScriptTest, || AnyMatrix::from(ScriptTest::default())),
        (MatrixType::HttpPing, || AnyMatrix::from(HttpPing::default())),
        (MatrixType::RttPing, || AnyMatrix::from(RttPing::default())),
        (MatrixType::PacketLoss, || AnyMatrix::from(PacketLoss::default())),
    ];
    factories.into_iter().collect()
});

/// A fresh extractor for `kind`, or [`Invalid`] when nothing is registered
/// under it.
pub fn find(kind: MatrixType) -> AnyMatrix {
    match REGISTERED.get(&kind) {
        Some(factory) => factory(),
        None => {
            log::debug!("no extractor registered for {kind}");
            Invalid.into()
        }
    }
}

/// One extractor per requested type, in request order. Duplicates are kept.
pub fn find_batch(kinds: &[MatrixType]) -> Vec<AnyMatrix> {
    kinds.iter().copied().map(find).collect()
}

pub fn find_batch_from_entry(entries: &[MatrixEntry]) -> Vec<AnyMatrix> {
    entries.iter().map(|entry| find(entry.kind)).collect()
}

/// The distinct raw jobs a batch of extractors depends on, in the order they
/// are first needed.
pub fn required_macros(matrices: &[AnyMatrix]) -> Vec<MacroType> {
    let mut jobs = Vec::new();
    for matrix in matrices {
        let job = matrix.macro_job();
        if job != MacroType::Invalid && !jobs.contains(&job) {
            jobs.push(job);
        }
    }
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::MacroResult;
    use crate::matrices::MatrixValue;
    use crate::ping::result::Ping;

    #[test]
    fn test_every_known_type_is_registered() {
        for kind in MatrixType::ALL {
            assert_eq!(find(kind).matrix_type(), kind);
        }
    }

    #[test]
    fn test_unknown_type_yields_inert_extractor() {
        let mut matrix = find(MatrixType::from("TEST_TRACEROUTE"));
        assert_eq!(matrix.matrix_type(), MatrixType::Invalid);
        assert_eq!(matrix.macro_job(), MacroType::Invalid);

        let ping = Ping {
            packet_loss: 40.0,
            ..Ping::default()
        };
        matrix.extract(&MatrixEntry::new(MatrixType::Invalid), &MacroResult::Ping(ping));
        assert_eq!(matrix, AnyMatrix::from(Invalid));
        assert_eq!(matrix.value(), MatrixValue::Empty);
    }

    #[test]
    fn test_batch_keeps_order_and_unknowns() {
        let kinds = [
            MatrixType::PacketLoss,
            MatrixType::RttPing,
            MatrixType::from("NOT_A_METRIC"),
        ];
        let batch = find_batch(&kinds);

        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].matrix_type(), MatrixType::PacketLoss);
        assert_eq!(batch[1].matrix_type(), MatrixType::RttPing);
        assert_eq!(batch[2].matrix_type(), MatrixType::Invalid);
    }

    #[test]
    fn test_batch_keeps_duplicates() {
        let batch = find_batch(&[MatrixType::RttPing, MatrixType::RttPing]);
        assert_eq!(batch.len(), 2);
        assert!(batch.iter().all(|m| m.matrix_type() == MatrixType::RttPing));
    }

    #[test]
    fn test_batch_from_entries() {
        let entries: Vec<MatrixEntry> = serde_json::from_str(
            r#"[{"Type":"SPEED_MAX"},{"Type":"GEOIP_OUTBOUND"},{"Type":"SOMETHING_ELSE"}]"#,
        )
        .unwrap();
        let kinds: Vec<MatrixType> = find_batch_from_entry(&entries)
            .iter()
            .map(|m| m.matrix_type())
            .collect();
        assert_eq!(
            kinds,
            vec![MatrixType::MaxSpeed, MatrixType::OutboundGeoIp, MatrixType::Invalid]
        );
    }

    #[test]
    fn test_required_macros_runs_each_job_once() {
        let batch = find_batch(&[
            MatrixType::RttPing,
            MatrixType::AverageSpeed,
            MatrixType::Invalid,
            MatrixType::PacketLoss,
            MatrixType::HttpPing,
            MatrixType::PerSecondSpeed,
            MatrixType::UdpType,
        ]);
        assert_eq!(
            required_macros(&batch),
            vec![MacroType::Ping, MacroType::Speed, MacroType::Udp]
        );
    }

    #[test]
    fn test_one_ping_feeds_several_extractors() {
        let mut batch = find_batch(&[MatrixType::PacketLoss, MatrixType::RttPing, MatrixType::HttpPing]);
        let ping = Ping {
            rtt: 21,
            request: 48,
            packet_loss: 20.0,
            ..Ping::default()
        };
        let result = MacroResult::from(ping);
        for matrix in &mut batch {
            let entry = MatrixEntry::new(matrix.matrix_type());
            matrix.extract(&entry, &result);
        }

        let values: Vec<MatrixValue> = batch.iter().map(|m| m.value()).collect();
        assert_eq!(
            values,
            vec![
                MatrixValue::Percent(20.0),
                MatrixValue::Millis(21),
                MatrixValue::Millis(48),
            ]
        );
    }
}
