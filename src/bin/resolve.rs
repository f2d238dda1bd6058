//! Resolve one URL through the soft-redirect chain and print the outcome as JSON.
//!
//! Usage: `resolve <url> [max-content-length]`

use anyhow::{Context, Result, bail};
use searchrelay::{config::Config, fetcher::HttpTransport, resolver::Resolver, telemetry};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(url) = args.first() else {
        bail!("usage: resolve <url> [max-content-length]");
    };

    let config = Config::from_env()?;
    telemetry::init_tracing(config.log_format());

    let max_content_length = match args.get(1) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid max-content-length {raw:?}"))?,
        None => config.resolve_config().max_content_length,
    };

    let transport = HttpTransport::new(config.fetch_config())?;
    let resolver = Resolver::new(Arc::new(transport), config.resolve_config());
    let outcome = resolver
        .resolve_with(url, config.resolve_config().hop_budget, max_content_length)
        .await;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
