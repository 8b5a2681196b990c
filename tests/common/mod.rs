//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use compliment_proxy::config::ProxyConfig;
use compliment_proxy::http::HttpServer;
use compliment_proxy::lifecycle::Shutdown;

/// How the mock upstream answers every request.
#[derive(Clone)]
#[allow(dead_code)]
pub enum Reply {
    /// 200 SSE response made of these chunks, then close.
    Stream(Vec<Vec<u8>>),
    /// 200 SSE response made of these chunks, then silence with the socket open.
    StreamThenHang(Vec<Vec<u8>>),
    /// A text frame every 50ms until the peer goes away.
    Drip,
    /// Non-success status with a plain body.
    Status(u16, &'static str),
}

/// Handle to a running mock upstream.
#[allow(dead_code)]
pub struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    peer_closed: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl MockUpstream {
    /// Raw text (head and body) of every request received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Whether a streaming connection was closed by the proxy.
    pub fn peer_closed(&self) -> bool {
        self.peer_closed.load(Ordering::SeqCst)
    }
}

/// Split SSE text into chunks at the given byte offsets.
#[allow(dead_code)]
pub fn split_at(text: &str, cuts: &[usize]) -> Vec<Vec<u8>> {
    let bytes = text.as_bytes();
    let mut chunks = Vec::new();
    let mut start = 0;
    for &cut in cuts {
        chunks.push(bytes[start..cut].to_vec());
        start = cut;
    }
    chunks.push(bytes[start..].to_vec());
    chunks
}

/// Start a programmable raw-TCP upstream on an ephemeral port.
pub async fn start_mock_upstream(reply: Reply) -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let peer_closed = Arc::new(AtomicBool::new(false));

    let recorded = requests.clone();
    let closed = peer_closed.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let reply = reply.clone();
            let recorded = recorded.clone();
            let closed = closed.clone();

            tokio::spawn(async move {
                let request = read_request(&mut socket).await;
                recorded.lock().unwrap().push(request);
                respond(&mut socket, reply, &closed).await;
            });
        }
    });

    MockUpstream {
        addr,
        requests,
        peer_closed,
    }
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

const SSE_HEAD: &str =
    "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nCache-Control: no-cache\r\nConnection: close\r\n\r\n";

async fn respond(socket: &mut TcpStream, reply: Reply, closed: &AtomicBool) {
    match reply {
        Reply::Status(status, body) => {
            let response = format!(
                "HTTP/1.1 {} Upstream Error\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
        Reply::Stream(chunks) => {
            write_chunks(socket, &chunks).await;
            let _ = socket.shutdown().await;
        }
        Reply::StreamThenHang(chunks) => {
            write_chunks(socket, &chunks).await;
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        Reply::Drip => {
            if socket.write_all(SSE_HEAD.as_bytes()).await.is_err() {
                return;
            }
            let frame = b"data: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\n\n";
            for _ in 0..600 {
                if socket.write_all(frame).await.is_err() || socket.flush().await.is_err() {
                    closed.store(true, Ordering::SeqCst);
                    return;
                }
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        }
    }
}

async fn write_chunks(socket: &mut TcpStream, chunks: &[Vec<u8>]) {
    let _ = socket.write_all(SSE_HEAD.as_bytes()).await;
    let _ = socket.flush().await;
    for chunk in chunks {
        let _ = socket.write_all(chunk).await;
        let _ = socket.flush().await;
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Start a proxy pointed at `upstream` on an ephemeral port.
///
/// The returned `Shutdown` must be kept alive for the proxy to keep serving.
pub async fn start_proxy(upstream: SocketAddr, idle_timeout_secs: u64) -> (SocketAddr, Shutdown) {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.base_url = format!("http://{}/v1", upstream);
    config.upstream.api_key = Some("test-key".to_string());
    config.upstream.idle_timeout_secs = idle_timeout_secs;
    config.upstream.system_proxy = false;

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    let server = HttpServer::new(config).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });

    (addr, shutdown)
}

/// Client that never reuses connections.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
