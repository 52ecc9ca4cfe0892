//! SUSE Manager / Uyuni API module
//!
//! Thin typed layer over the JSON-over-HTTP manager API: session handling,
//! request and response models, and a reqwest-backed client. The
//! [`ManagerApi`] trait is the seam the migration pipeline talks to.

pub mod auth;
pub mod client;
pub mod constants;
pub mod models;

use async_trait::async_trait;

use crate::error::Result;

pub use auth::Session;
pub use client::{ConnectionSettings, SumaClient, TlsVerification};
pub use models::{
    ActionId, MigrationRequest, MigrationTarget, ScheduleOptions, SystemId, SystemRecord,
};

/// The four manager API calls the migration workflow needs
#[async_trait]
pub trait ManagerApi: Send + Sync {
    /// `auth.login`: exchange credentials for a session
    async fn login(&self, login: &str, password: &str) -> Result<Session>;

    /// `system.getId`: every system registered under `hostname`
    async fn get_system_id(&self, session: &Session, hostname: &str) -> Result<Vec<SystemRecord>>;

    /// `system.listLatestMigrations`
    async fn list_latest_migrations(
        &self,
        session: &Session,
        sid: SystemId,
    ) -> Result<Vec<MigrationTarget>>;

    /// `system.scheduleProductMigration`
    async fn schedule_product_migration(
        &self,
        session: &Session,
        request: &MigrationRequest,
    ) -> Result<ActionId>;
}
