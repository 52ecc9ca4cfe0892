use async_trait::async_trait;
use log::debug;
use reqwest::{Certificate, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::ManagerApi;
use super::auth::Session;
use super::constants::{self, headers};
use super::models::{
    ActionId, ApiResponse, GetIdRequest, LoginRequest, MigrationRequest, MigrationTarget,
    SidRequest, SystemId, SystemRecord,
};
use crate::error::{MigrateError, Result};

/// How the server certificate is checked
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "mode", content = "path")]
pub enum TlsVerification {
    /// System trust store
    #[default]
    Verify,
    /// Trust an additional PEM root, e.g. the SUSE Manager CA
    CaFile(PathBuf),
    /// No certificate verification at all
    Insecure,
}

/// Everything needed to reach the server
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub url: String,
    pub tls: TlsVerification,
    pub timeout: Option<Duration>,
}

/// HTTP client for the manager API
pub struct SumaClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl SumaClient {
    pub fn new(settings: &ConnectionSettings) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(constants::user_agent());

        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }

        match &settings.tls {
            TlsVerification::Verify => {}
            TlsVerification::CaFile(path) => {
                let pem = std::fs::read(path).map_err(|e| {
                    MigrateError::Config(format!("Failed to read CA file {:?}: {}", path, e))
                })?;
                let certificate = Certificate::from_pem(&pem).map_err(|e| {
                    MigrateError::Config(format!("Invalid CA certificate {:?}: {}", path, e))
                })?;
                builder = builder.add_root_certificate(certificate);
            }
            TlsVerification::Insecure => {
                debug!("TLS certificate verification disabled for {}", settings.url);
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        Ok(Self::with_custom_client(settings.url.clone(), builder.build()?))
    }

    /// Create a client around an already configured HTTP client
    pub fn with_custom_client(base_url: String, http_client: reqwest::Client) -> Self {
        Self {
            base_url,
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send<B: Serialize + ?Sized + Sync>(
        &self,
        method: &str,
        body: &B,
        session: Option<&Session>,
    ) -> Result<Response> {
        let url = constants::endpoint(&self.base_url, method);
        let started = Instant::now();

        let mut request = self
            .http_client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, headers::CONTENT_TYPE_JSON)
            .json(body);
        if let Some(session) = session {
            let (name, value) = session.header();
            request = request.header(name, value);
        }

        let response = request.send().await?;
        debug!(
            "POST {} -> {} in {:?}",
            method,
            response.status(),
            started.elapsed()
        );
        Ok(response)
    }

    /// Send an authenticated call and decode its `result`
    async fn call<B, T>(
        &self,
        operation: &'static str,
        method: &str,
        body: &B,
        session: &Session,
    ) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned + Default,
    {
        let response = self.send(method, body, Some(session)).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("{} returned {}: {}", operation, status, body);
            return Err(MigrateError::Transport {
                operation,
                status,
                body,
            });
        }

        let envelope: ApiResponse<T> = response.json().await?;
        Ok(envelope.result)
    }
}

#[async_trait]
impl ManagerApi for SumaClient {
    async fn login(&self, login: &str, password: &str) -> Result<Session> {
        debug!("Logging in to {} as {}", self.base_url, login);

        let response = self
            .send(constants::AUTH_LOGIN, &LoginRequest { login, password }, None)
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("Login rejected with {}: {}", status, body);
            return Err(MigrateError::AuthenticationFailed { status, body });
        }

        Session::from_set_cookie(response.headers()).ok_or(MigrateError::UnexpectedResponse {
            operation: "auth.login",
            reason: "no session cookie in response".to_string(),
        })
    }

    async fn get_system_id(
        &self,
        session: &Session,
        hostname: &str,
    ) -> Result<Vec<SystemRecord>> {
        self.call(
            "system.getId",
            constants::SYSTEM_GET_ID,
            &GetIdRequest { name: hostname },
            session,
        )
        .await
    }

    async fn list_latest_migrations(
        &self,
        session: &Session,
        sid: SystemId,
    ) -> Result<Vec<MigrationTarget>> {
        self.call(
            "system.listLatestMigrations",
            constants::SYSTEM_LIST_LATEST_MIGRATIONS,
            &SidRequest { sid },
            session,
        )
        .await
    }

    async fn schedule_product_migration(
        &self,
        session: &Session,
        request: &MigrationRequest,
    ) -> Result<ActionId> {
        let action: Option<ActionId> = self
            .call(
                "system.scheduleProductMigration",
                constants::SYSTEM_SCHEDULE_PRODUCT_MIGRATION,
                request,
                session,
            )
            .await?;

        action.ok_or(MigrateError::UnexpectedResponse {
            operation: "system.scheduleProductMigration",
            reason: "response carried no action id".to_string(),
        })
    }
}
