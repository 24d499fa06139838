//! Latency probing over caller supplied transports, and the metric
//! extractors that turn raw probe results into reported values.

pub mod config;
pub mod macros;
pub mod matrices;
pub mod ping;
pub mod vendor;

pub use config::ProbeSettings;
pub use macros::{MacroResult, MacroType};
pub use matrices::{AnyMatrix, Matrix, MatrixEntry, MatrixOutput, MatrixType, MatrixValue};
pub use ping::prelude::*;
pub use vendor::{DialOptions, DirectVendor, Vendor};
