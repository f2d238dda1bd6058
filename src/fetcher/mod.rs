pub mod client;
pub mod errors;
pub mod pipeline;
pub mod types;

pub use client::{HttpTransport, Transport, is_public_url};
pub use errors::FetchError;
pub use types::{FetchAttempt, FetchConfig};

#[cfg(test)]
pub use client::MockTransport;
