#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Map;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use suma_migrate::api::{
    ActionId, ManagerApi, MigrationRequest, MigrationTarget, ScheduleOptions, Session, SystemId,
    SystemRecord,
};
use suma_migrate::auth::Credentials;
use suma_migrate::migration::MigrationJob;
use suma_migrate::{MigrateError, Result};

/// In-memory manager that records every call it receives
pub struct FakeManager {
    pub reject_login: Option<StatusCode>,
    pub systems: Vec<SystemRecord>,
    pub targets: Vec<MigrationTarget>,
    pub calls: Mutex<Vec<&'static str>>,
    pub scheduled: Mutex<Vec<MigrationRequest>>,
    next_action: AtomicI64,
}

impl FakeManager {
    pub fn new(systems: Vec<SystemRecord>, targets: Vec<MigrationTarget>) -> Self {
        Self {
            reject_login: None,
            systems,
            targets,
            calls: Mutex::new(Vec::new()),
            scheduled: Mutex::new(Vec::new()),
            next_action: AtomicI64::new(4242),
        }
    }

    /// One host, SP6 and SP7 targets
    pub fn healthy() -> Self {
        Self::new(
            vec![system(1000010001, "myserver")],
            targets(&["SLES15-SP6-Pool", "SLES15-SP7-Pool"]),
        )
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn scheduled(&self) -> Vec<MigrationRequest> {
        self.scheduled.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ManagerApi for FakeManager {
    async fn login(&self, _login: &str, _password: &str) -> Result<Session> {
        self.record("auth.login");
        if let Some(status) = self.reject_login {
            return Err(MigrateError::AuthenticationFailed {
                status,
                body: "Either the password or username is incorrect.".to_string(),
            });
        }
        Ok(Session::from_cookie("pxt-session-cookie=fake").unwrap())
    }

    async fn get_system_id(
        &self,
        _session: &Session,
        _hostname: &str,
    ) -> Result<Vec<SystemRecord>> {
        self.record("system.getId");
        Ok(self.systems.clone())
    }

    async fn list_latest_migrations(
        &self,
        _session: &Session,
        _sid: SystemId,
    ) -> Result<Vec<MigrationTarget>> {
        self.record("system.listLatestMigrations");
        Ok(self.targets.clone())
    }

    async fn schedule_product_migration(
        &self,
        _session: &Session,
        request: &MigrationRequest,
    ) -> Result<ActionId> {
        self.record("system.scheduleProductMigration");
        self.scheduled.lock().unwrap().push(request.clone());
        Ok(ActionId::new(self.next_action.fetch_add(1, Ordering::SeqCst)))
    }
}

pub fn system(id: i64, name: &str) -> SystemRecord {
    SystemRecord {
        id: SystemId(id),
        name: Some(name.to_string()),
        extra: Map::new(),
    }
}

pub fn targets(labels: &[&str]) -> Vec<MigrationTarget> {
    labels.iter().map(|label| MigrationTarget::new(*label)).collect()
}

pub fn job(target: &str) -> MigrationJob {
    MigrationJob {
        credentials: Credentials::new("spupgapi", "secret"),
        hostname: "myserver".to_string(),
        target: target.to_string(),
        schedule: ScheduleOptions::default(),
        list_only: false,
    }
}

/// A canned HTTP response for [`StubServer`]
#[derive(Clone)]
pub struct StubResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl StubResponse {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Minimal HTTP/1.1 server answering requests in order with canned responses
pub struct StubServer {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub async fn start(responses: Vec<StubResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        tokio::spawn(async move {
            for response in responses {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut stream).await;
                seen.lock().unwrap().push(request);

                let mut raw = format!(
                    "HTTP/1.1 {} Stub\r\n\
                     content-type: application/json\r\n\
                     content-length: {}\r\n\
                     connection: close\r\n",
                    response.status,
                    response.body.len()
                );
                for (name, value) in &response.headers {
                    raw.push_str(&format!("{}: {}\r\n", name, value));
                }
                raw.push_str("\r\n");
                raw.push_str(&response.body);

                let _ = stream.write_all(raw.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self { url, requests }
    }

    /// Raw text of every request received so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];

    loop {
        let n = stream.read(&mut buf).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);

        let text = String::from_utf8_lossy(&data);
        if let Some(split) = text.find("\r\n\r\n") {
            let content_length = text[..split]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if data.len() >= split + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&data).into_owned()
}
