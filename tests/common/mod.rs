//! Shared utilities for integration tests.

use std::time::Duration;

use stub_server::observability::logging;
use stub_server::{StubConfig, StubServer};

/// Install a quiet subscriber once per test binary.
pub fn init_tracing() {
    logging::init("stub_server=debug,tower_http=warn");
}

/// A started stub on an ephemeral loopback port.
#[allow(dead_code)]
pub fn started_stub() -> StubServer {
    init_tracing();
    let stub = StubServer::new(StubConfig::default());
    stub.start().expect("stub should start on an ephemeral port");
    stub
}

/// A client that never reuses connections and ignores proxy settings.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}
