#![allow(dead_code)]

use searchrelay::{
    fetcher::{FetchConfig, HttpTransport},
    resolver::{ResolveConfig, Resolver},
};
use std::sync::Arc;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// Transport that may talk to the loopback mock server.
pub fn local_transport() -> HttpTransport {
    HttpTransport::new(FetchConfig {
        allow_private_hosts: true,
        ..FetchConfig::default()
    })
    .unwrap()
}

pub fn local_resolver(hop_budget: u32) -> Resolver {
    Resolver::new(
        Arc::new(local_transport()),
        ResolveConfig {
            hop_budget,
            ..ResolveConfig::default()
        },
    )
}

pub fn parse(url: &str) -> Url {
    Url::parse(url).unwrap()
}

/// Serve `markup` as an HTML page at `route`.
pub async fn mount_page(server: &MockServer, route: &str, markup: impl Into<String>) {
    let markup: String = markup.into();
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(markup.into_bytes())
                .insert_header("Content-Type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

pub fn meta_refresh(target: &str) -> String {
    format!(
        r#"<html><head><meta http-equiv="refresh" content="0;url={target}"><title>Redirecting</title></head><body></body></html>"#
    )
}

pub fn article(text: &str) -> String {
    format!("<html><head><title>Article</title></head><body><nav>Menu</nav><article><p>{text}</p></article></body></html>")
}
