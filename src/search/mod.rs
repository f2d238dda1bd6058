//! Search-provider boundary: the trait the relay queries and a Brave client.

pub mod brave;
pub mod provider;
pub mod types;

pub use brave::BraveSearchProvider;
pub use provider::SearchProvider;
pub use types::{SearchError, SearchResult};

#[cfg(test)]
pub use provider::MockSearchProvider;
