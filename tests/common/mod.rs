//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use model_server::config::ServerConfig;
use model_server::http::HttpServer;
use model_server::lifecycle::Shutdown;
use model_server::store::{load_from_reader, RecordStore};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const VEHICLES: &str = "\
id,make,model,year
1,Ford,Focus,2012
2,Toyota,Corolla,2018
3,Honda,Civic,2020
";

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: RecordStore,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server seeded from `csv`.
pub async fn start_server(csv: &str) -> TestServer {
    start_server_with(csv, ServerConfig::default()).await
}

/// Start a server seeded from `csv` with a custom configuration.
pub async fn start_server_with(csv: &str, config: ServerConfig) -> TestServer {
    let store = load_from_reader(csv.as_bytes()).unwrap();
    let server = HttpServer::new(config, store.clone()).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer { addr, store, shutdown }
}

/// Client that never pools connections, so each test request is independent.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Raw HTTP exchange for requests reqwest would normalize (missing headers).
///
/// Returns the status code and the full response text.
#[allow(dead_code)]
pub async fn raw_request(addr: SocketAddr, head: &str, body: &str) -> (u16, String) {
    let mut socket = TcpStream::connect(addr).await.unwrap();
    let request = format!("{}\r\nHost: {}\r\nConnection: close\r\n\r\n{}", head, addr, body);
    socket.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    socket.read_to_string(&mut response).await.unwrap();

    let status = response
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .unwrap();
    (status, response)
}
