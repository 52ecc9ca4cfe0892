//! Dry-run product migration workflow
//!
//! Authenticate → resolve host → list targets → select target → schedule
//! dry run. Each stage feeds the next and the first failure ends the run;
//! none of the stages change anything on the server that would need undoing.

pub mod selector;

use log::{debug, info};

use crate::api::{
    ActionId, ManagerApi, MigrationRequest, MigrationTarget, ScheduleOptions, Session, SystemId,
};
use crate::auth::Credentials;
use crate::error::{MigrateError, Result};
use crate::ui::Console;

pub use selector::{candidate_labels, select_target};

/// What to migrate and how
#[derive(Debug, Clone)]
pub struct MigrationJob {
    pub credentials: Credentials,
    pub hostname: String,
    /// Substring of the desired base channel label, e.g. `sp7`
    pub target: String,
    pub schedule: ScheduleOptions,
    /// Stop after listing targets
    pub list_only: bool,
}

/// Result of a scheduled dry run
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledMigration {
    pub sid: SystemId,
    pub base_channel_label: String,
    pub action_id: ActionId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Scheduled(ScheduledMigration),
    Listed(Vec<MigrationTarget>),
}

/// Drives the workflow against any [`ManagerApi`]
pub struct MigrationPipeline<'a, A: ManagerApi> {
    api: &'a A,
    console: &'a mut Console,
}

impl<'a, A: ManagerApi> MigrationPipeline<'a, A> {
    pub fn new(api: &'a A, console: &'a mut Console) -> Self {
        Self { api, console }
    }

    pub async fn run(&mut self, job: &MigrationJob) -> Result<RunOutcome> {
        let session = self.authenticate(&job.credentials).await?;
        let sid = self.resolve_host(&session, &job.hostname).await?;
        let targets = self.list_targets(&session, sid).await?;

        if job.list_only {
            self.console.info("Base channel labels:");
            for label in candidate_labels(&targets) {
                self.console.line(format!(" - {}", label));
            }
            return Ok(RunOutcome::Listed(targets));
        }

        let base_channel_label = self.select(&targets, &job.target)?;
        let action_id = self
            .schedule_dry_run(&session, sid, &base_channel_label, &job.schedule)
            .await?;

        Ok(RunOutcome::Scheduled(ScheduledMigration {
            sid,
            base_channel_label,
            action_id,
        }))
    }

    pub async fn authenticate(&mut self, credentials: &Credentials) -> Result<Session> {
        let session = self
            .api
            .login(&credentials.login, &credentials.password)
            .await?;
        self.console.info("Logged in to SUSE Manager");
        Ok(session)
    }

    pub async fn resolve_host(&mut self, session: &Session, hostname: &str) -> Result<SystemId> {
        let systems = self.api.get_system_id(session, hostname).await?;

        let first = systems.first().ok_or_else(|| MigrateError::HostNotFound {
            hostname: hostname.to_string(),
        })?;

        if systems.len() > 1 {
            let ids: Vec<String> = systems.iter().map(|s| s.id.to_string()).collect();
            self.console.warn(format!(
                "{} systems are registered as {} (SIDs {}); using the first",
                systems.len(),
                hostname,
                ids.join(", ")
            ));
        }

        self.console
            .info(format!("System {} has SID {}", hostname, first.id));
        Ok(first.id)
    }

    pub async fn list_targets(
        &mut self,
        session: &Session,
        sid: SystemId,
    ) -> Result<Vec<MigrationTarget>> {
        let targets = self.api.list_latest_migrations(session, sid).await?;
        if targets.is_empty() {
            return Err(MigrateError::NoTargets { sid });
        }

        self.console.info("Available migration targets:");
        let dump = serde_json::to_string_pretty(&targets).map_err(|e| {
            MigrateError::UnexpectedResponse {
                operation: "system.listLatestMigrations",
                reason: e.to_string(),
            }
        })?;
        self.console.line(dump);

        debug!("{} migration targets for SID {}", targets.len(), sid);
        Ok(targets)
    }

    /// Pick the target for `desired`, or report every candidate and fail
    pub fn select(&mut self, targets: &[MigrationTarget], desired: &str) -> Result<String> {
        match select_target(targets, desired) {
            Some(target) => {
                self.console.info(format!(
                    "Selected base channel: {}",
                    target.base_channel_label
                ));
                Ok(target.base_channel_label.clone())
            }
            None => {
                let available = candidate_labels(targets);
                self.console
                    .warn(format!("{} migration target not found.", desired));
                self.console.line("Pick manually from:");
                for label in &available {
                    self.console.line(format!(" - {}", label));
                }
                Err(MigrateError::NoMatchingTarget {
                    desired: desired.to_string(),
                    available,
                })
            }
        }
    }

    pub async fn schedule_dry_run(
        &mut self,
        session: &Session,
        sid: SystemId,
        base_channel_label: &str,
        options: &ScheduleOptions,
    ) -> Result<ActionId> {
        let request = MigrationRequest::dry_run(sid, base_channel_label, options);
        info!(
            "Scheduling dry-run migration of SID {} to {}",
            sid, base_channel_label
        );

        let action_id = self.api.schedule_product_migration(session, &request).await?;
        self.console
            .dry_run(format!("Migration scheduled. Action ID: {}", action_id));
        Ok(action_id)
    }
}
