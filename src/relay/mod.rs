//! Search relay: query a provider, resolve every hit, keep provider order.

mod service;
mod types;

pub use service::{MAX_RESULTS_CAP, RelayConfig, RelayService};
pub use types::{RelayedResult, SearchRelayResponse};
