//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use serde_json::{json, Value};
use dservice_client::blockchain::{BlockchainResult, ChainContext, TextRecord, TextRecordResolver};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A request as the mock backend received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// A running mock backend.
pub struct MockBackend {
    pub addr: SocketAddr,
    hits: Arc<AtomicU32>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockBackend {
    /// Base URL, without trailing slash.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests served so far.
    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a backend that always answers `status` with `body`.
pub async fn start_fixed_backend(status: u16, body: &'static str) -> MockBackend {
    start_programmable_backend(move || async move { (status, body.to_string()) }).await
}

/// Start a programmable mock backend on an ephemeral port.
pub async fn start_programmable_backend<F, Fut>(f: F) -> MockBackend
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    start_backend_with(move |_req: &RecordedRequest| f()).await
}

/// Start a backend whose answer depends on the received request.
pub async fn start_backend_with<F, Fut>(f: F) -> MockBackend
where
    F: Fn(&RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let counter = hits.clone();
    let log = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let counter = counter.clone();
                    let log = log.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        counter.fetch_add(1, Ordering::SeqCst);
                        log.lock().unwrap().push(request.clone());
                        let (status, body) = f(&request).await;
                        let reason = reqwest::StatusCode::from_u16(status)
                            .ok()
                            .and_then(|s| s.canonical_reason())
                            .unwrap_or("Unknown");

                        let response_str = format!(
                            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            reason,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockBackend {
        addr,
        hits,
        requests,
    }
}

/// Read the request head and any Content-Length body.
async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return None,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();

    let header = |name: &str| {
        head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case(name).then(|| value.trim().to_string())
        })
    };
    let content_type = header("content-type");
    let content_length = header("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[head_end..].to_vec();
    while body.len() < content_length {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return None,
            Ok(n) => body.extend_from_slice(&chunk[..n]),
        }
    }

    Some(RecordedRequest {
        method,
        path,
        content_type,
        body,
    })
}

/// Start a JSON-RPC node.
///
/// `eth_chainId` answers `chain_id`. `eth_call` is passed the target
/// contract and calldata, and its return data is hex-encoded into the
/// response. Every `eth_call` target is recorded in order.
pub async fn start_rpc_backend<F>(chain_id: u64, on_call: F) -> (MockBackend, Arc<Mutex<Vec<Address>>>)
where
    F: Fn(Address, &[u8]) -> Vec<u8> + Send + Sync + 'static,
{
    let targets = Arc::new(Mutex::new(Vec::new()));
    let seen = targets.clone();
    let on_call = Arc::new(on_call);

    let backend = start_backend_with(move |req: &RecordedRequest| {
        let request: Value = serde_json::from_slice(&req.body).unwrap_or(Value::Null);
        let result = match request["method"].as_str() {
            Some("eth_chainId") => json!(format!("{:#x}", chain_id)),
            Some("eth_call") => {
                let tx = &request["params"][0];
                let to: Address = tx["to"].as_str().and_then(|s| s.parse().ok()).unwrap_or_default();
                let input: Bytes = tx["input"]
                    .as_str()
                    .or_else(|| tx["data"].as_str())
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_default();
                seen.lock().unwrap().push(to);
                json!(alloy::primitives::hex::encode_prefixed(on_call(to, &input)))
            }
            _ => Value::Null,
        };
        let response = json!({ "jsonrpc": "2.0", "id": request["id"], "result": result });
        async move { (200, response.to_string()) }
    })
    .await;

    (backend, targets)
}

/// A URL nothing listens on.
pub async fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// In-memory text records keyed by domain.
#[derive(Default)]
pub struct TableResolver {
    records: HashMap<String, Option<String>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl TableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `value` for `domain`.
    pub fn with_record(mut self, domain: &str, value: &str) -> Self {
        self.records.insert(domain.to_string(), Some(value.to_string()));
        self
    }

    /// Register a resolver for `domain` with no record set.
    pub fn with_empty(mut self, domain: &str) -> Self {
        self.records.insert(domain.to_string(), None);
        self
    }

    /// Delay every lookup.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextRecordResolver for TableResolver {
    async fn resolve_text_record(
        &self,
        domain: &str,
        _context: ChainContext,
        _key: &str,
    ) -> BlockchainResult<TextRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(match self.records.get(domain) {
            Some(value) => TextRecord {
                resolver: Some(Address::repeat_byte(0xaa)),
                value: value.clone(),
            },
            None => TextRecord::unresolved(),
        })
    }
}
