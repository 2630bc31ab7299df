//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use project_portal::http::{ApiClient, ApiError, ApiResponse, Transport};
use project_portal::signing::{
    Credentials, CredentialsProvider, SigV4Signer, SignedRequest, SigningError, SigningResult,
    StaticCredentialsProvider,
};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing_subscriber::layer::SubscriberExt;

/// A request as seen by a mock backend. Header names are lowercased.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Response a mock backend writes back.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl MockResponse {
    /// JSON body with `X-Content-Type-Options: nosniff`.
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: vec![
                ("Content-Type".into(), "application/json".into()),
                ("X-Content-Type-Options".into(), "nosniff".into()),
            ],
            body: body.into(),
        }
    }

    pub fn without_nosniff(mut self) -> Self {
        self.headers
            .retain(|(n, _)| !n.eq_ignore_ascii_case("x-content-type-options"));
        self
    }
}

async fn read_request(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(n, v)| (n.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(n, _)| n == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < head_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body_end = (head_end + content_length).min(buf.len());
    Some(CapturedRequest {
        method,
        path,
        headers,
        body: buf[head_end..body_end].to_vec(),
    })
}

async fn write_response(socket: &mut TcpStream, response: &MockResponse) {
    let reason = StatusCode::from_u16(response.status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown");

    let mut out = format!("HTTP/1.1 {} {}\r\n", response.status, reason);
    for (name, value) in &response.headers {
        out.push_str(&format!("{}: {}\r\n", name, value));
    }
    out.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.body.len(),
        response.body
    ));

    let _ = socket.write_all(out.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Start a programmable mock backend on an ephemeral port.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(CapturedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MockResponse> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        if let Some(request) = read_request(&mut socket).await {
                            let response = f(request).await;
                            write_response(&mut socket, &response).await;
                        }
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock backend that answers every request with `response` and
/// forwards each captured request to the returned channel.
pub async fn start_recording_backend(
    response: MockResponse,
) -> (SocketAddr, mpsc::UnboundedReceiver<CapturedRequest>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let addr = start_programmable_backend(move |request| {
        let _ = tx.send(request);
        let response = response.clone();
        async move { response }
    })
    .await;
    (addr, rx)
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn test_credentials() -> Credentials {
    Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY", None, None)
}

/// SigV4 signer over fixed credentials.
pub fn test_signer() -> Arc<SigV4Signer> {
    let provider = Arc::new(StaticCredentialsProvider::new(test_credentials()));
    Arc::new(SigV4Signer::new(provider, "us-east-1", "execute-api"))
}

/// Provider that always fails.
pub struct FailingProvider;

#[async_trait]
impl CredentialsProvider for FailingProvider {
    async fn credentials(&self) -> SigningResult<Credentials> {
        Err(SigningError::Credentials("identity pool unavailable".into()))
    }
}

pub fn json_response(status: u16, body: &str) -> ApiResponse {
    let mut headers = HeaderMap::new();
    headers.insert("content-type", HeaderValue::from_static("application/json"));
    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    ApiResponse::new(
        StatusCode::from_u16(status).unwrap(),
        headers,
        body.as_bytes().to_vec(),
    )
}

type Handler = Box<dyn Fn(&SignedRequest) -> Result<ApiResponse, ApiError> + Send + Sync>;

/// In-memory transport recording every request it is asked to send.
pub struct FakeTransport {
    handler: Handler,
    delay: Option<Duration>,
    sent: Mutex<Vec<SignedRequest>>,
}

impl FakeTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&SignedRequest) -> Result<ApiResponse, ApiError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            delay: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `status` and a JSON `body`.
    pub fn json(status: u16, body: &'static str) -> Self {
        Self::new(move |_| Ok(json_response(status, body)))
    }

    /// Wait `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn sent(&self) -> Vec<SignedRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: SignedRequest) -> Result<ApiResponse, ApiError> {
        self.sent.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.handler)(&request)
    }
}

/// Client wired to `transport` with the test signer.
pub fn client_with(transport: Arc<FakeTransport>) -> ApiClient {
    ApiClient::new(test_signer(), transport)
}

/// Events recorded by [`capture_logs`]: level and rendered message.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    events: Arc<Mutex<Vec<(tracing::Level, String)>>>,
}

impl CapturedLogs {
    pub fn contains(&self, level: tracing::Level, message: &str) -> bool {
        self.events
            .lock()
            .unwrap()
            .iter()
            .any(|(l, m)| *l == level && m == message)
    }

    pub fn count(&self, message: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, m)| m == message)
            .count()
    }
}

struct MessageVisitor(Option<String>);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = Some(format!("{:?}", value));
        }
    }
}

struct CapturingLayer {
    logs: CapturedLogs,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CapturingLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = MessageVisitor(None);
        event.record(&mut visitor);
        if let Some(message) = visitor.0 {
            self.logs
                .events
                .lock()
                .unwrap()
                .push((*event.metadata().level(), message));
        }
    }
}

/// Route this thread's tracing events into a buffer until the guard drops.
/// Use with the current-thread test runtime.
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::registry().with(CapturingLayer { logs: logs.clone() });
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}
