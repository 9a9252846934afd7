//! Helpers for tests that talk to a local mock HTTP server.

use std::net::TcpListener;

use wiremock::MockServer;

/// Set to `1` to make socket-bound tests fail instead of skipping.
const REQUIRE_SOCKETS_ENV: &str = "PAGEGRAB_REQUIRE_SOCKET_TESTS";

fn sockets_required() -> bool {
    std::env::var(REQUIRE_SOCKETS_ENV)
        .is_ok_and(|value| matches!(value.trim(), "1" | "true" | "yes"))
}

/// Whether loopback sockets are usable here. Panics when they are not and
/// [`REQUIRE_SOCKETS_ENV`] is set.
fn loopback_available() -> bool {
    match TcpListener::bind("127.0.0.1:0") {
        Ok(_) => true,
        Err(e) if sockets_required() => {
            panic!("cannot bind 127.0.0.1 ({e}) and {REQUIRE_SOCKETS_ENV} is set")
        }
        Err(e) => {
            eprintln!(
                "skipping mock-server test: cannot bind 127.0.0.1 ({e}); \
                 set {REQUIRE_SOCKETS_ENV}=1 to fail instead"
            );
            false
        }
    }
}

/// Starts a mock server, or returns `None` when the test should be skipped.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if loopback_available() {
        Some(MockServer::start().await)
    } else {
        None
    }
}

/// Returns a port on 127.0.0.1 that nothing is listening on.
#[allow(dead_code)]
#[must_use]
pub fn unused_local_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .map(|addr| addr.port())
        .unwrap_or(9)
}

/// Lists the names of the regular files in `dir`, sorted.
#[allow(dead_code)]
#[must_use]
pub fn file_names(dir: &std::path::Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Value a skipped `()` test returns early with.
#[allow(dead_code)]
pub fn socket_skip_return() {}
