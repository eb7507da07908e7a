#![allow(dead_code)]

use async_trait::async_trait;
use proxy_probe::{CheckError, Config, Identity, IdentityOracle};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Minimal HTTP/1.1 server answering every request with the same response.
///
/// Works as a plain endpoint and as a forward proxy for `http://` targets,
/// since those requests arrive as ordinary absolute-form GETs.
pub struct FakeServer {
    pub addr: SocketAddr,
    request_lines: Arc<Mutex<Vec<String>>>,
}

impl FakeServer {
    pub async fn start(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake server");
        let addr = listener.local_addr().expect("fake server address");
        let request_lines = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&request_lines);
        let response = Arc::new(format!(
            "HTTP/1.1 {status} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            reason(status),
            body.len(),
        ));

        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let seen = Arc::clone(&seen);
                let response = Arc::clone(&response);
                tokio::spawn(async move {
                    let mut head = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                        match stream.read(&mut chunk).await {
                            Ok(0) | Err(_) => break,
                            Ok(n) => head.extend_from_slice(&chunk[..n]),
                        }
                    }
                    if let Some(line) = String::from_utf8_lossy(&head).lines().next() {
                        seen.lock().unwrap().push(line.to_string());
                    }
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        Self {
            addr,
            request_lines,
        }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn request_lines(&self) -> Vec<String> {
        self.request_lines.lock().unwrap().clone()
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Oracle answering from a table keyed by proxy URL (`None` = direct lookup)
pub struct ScriptedOracle {
    answers: HashMap<Option<String>, Identity>,
}

impl ScriptedOracle {
    pub fn new(baseline: Identity) -> Self {
        let mut answers = HashMap::new();
        answers.insert(None, baseline);
        Self { answers }
    }

    pub fn through(mut self, proxy_url: &str, identity: Identity) -> Self {
        self.answers.insert(Some(proxy_url.to_string()), identity);
        self
    }
}

#[async_trait]
impl IdentityOracle for ScriptedOracle {
    async fn fetch_identity(
        &self,
        _endpoint: &str,
        proxy: Option<&str>,
    ) -> Result<Identity, CheckError> {
        self.answers
            .get(&proxy.map(str::to_string))
            .cloned()
            .ok_or_else(|| CheckError::Connection("connection refused".to_string()))
    }
}

/// Temporary `Data/` layout with a candidate list
pub struct Workspace {
    _tmp: TempDir,
    pub data: PathBuf,
}

impl Workspace {
    pub fn with_candidates(content: &str) -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let data = tmp.path().join("Data");
        std::fs::create_dir_all(&data).expect("create data dir");
        std::fs::write(data.join("ProxyIsp.txt"), content).expect("write candidate list");
        Self { _tmp: tmp, data }
    }

    pub fn config(&self) -> Config {
        Config::new()
            .with_data_dir(self.data.clone())
            .with_proxy_file(self.data.join("ProxyIsp.txt"))
            .with_output_file(self.output())
    }

    pub fn output(&self) -> PathBuf {
        self.data.join("alive.txt")
    }

    pub fn read_output(&self) -> String {
        std::fs::read_to_string(self.output()).expect("read output file")
    }
}
