//! Multi-chain event scanner (component F): batched log filtering across
//! configured endpoints, with a bounded-soundness reorg policy and a
//! refresh chore that drives it on a fixed cadence.

mod chore;
mod engine;
mod error;
mod types;

pub use chore::{run_refresh_chore, AddressSource};
pub use engine::Scanner;
pub use error::ScannerError;
pub use types::{Endpoint, ScanConfig};
