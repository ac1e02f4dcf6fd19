//! Tests for the default reqwest transport.

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use courier::http::{create_http_client, Agent, HttpClientConfig};
use courier::{Error, Request, RequestOptions};

mod common;
use common::helpers::*;

// Nothing listens on port 1, so connections are refused straight away.
const REFUSED_URL: &str = "http://127.0.0.1:1/";

#[test]
fn test_default_config() {
    let config = HttpClientConfig::default();
    assert_eq!(config.retries, 0);
    assert!(config.proxy.is_none());
    assert!(config.headers.is_none());
}

#[test]
fn test_create_http_client_with_headers() {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("courier-test-agent"));
    let config = HttpClientConfig {
        retries: 2,
        proxy: None,
        headers: Some(headers),
    };
    assert!(create_http_client(config, 20).is_ok());
}

#[tokio::test]
async fn test_connection_refused_is_a_transport_error() {
    init_tracing();
    let err = Request::get(REFUSED_URL, None)
        .expect("valid request")
        .execute()
        .await
        .expect_err("nothing listens on port 1");
    assert!(matches!(err, Error::Transport { .. }));
    assert!(err.status().is_none());
}

#[tokio::test]
async fn test_agent_config_is_honoured() {
    let agent = Agent::new(HttpClientConfig::default());
    let err = Request::get(REFUSED_URL, RequestOptions::new().agent(agent))
        .expect("valid request")
        .execute()
        .await
        .expect_err("nothing listens on port 1");
    assert!(matches!(err, Error::Transport { .. }));
}

#[tokio::test]
async fn test_prebuilt_client_agent() {
    let client = create_http_client(HttpClientConfig::default(), 0).expect("client");
    let err = Request::get(REFUSED_URL, None)
        .expect("valid request")
        .agent(Agent::new(client))
        .execute()
        .await
        .expect_err("nothing listens on port 1");
    assert!(matches!(err, Error::Transport { .. }));
}
