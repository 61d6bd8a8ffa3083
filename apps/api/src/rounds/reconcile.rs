//! Round reconciliation: bring stored results for one (job, round) in line
//! with an admin-supplied roster.
//!
//! Request-level checks (job, round, input shape) run before any write. After
//! that every candidate is handled on its own: a missing user, a failed write
//! or a failed notice is filed in the summary and the batch carries on.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::job::Job;
use crate::models::round::Round;
use crate::models::user::Candidate;
use crate::notify::{Notice, Notifier};
use crate::rounds::summary::{CandidateOutcome, Change, Missing, Operation, ReconcileSummary};
use crate::store::{ResultKey, RoundStore, StoreError, Upserted};

pub const QUALIFIED: &str = "Qualified";
pub const DISQUALIFIED: &str = "Disqualified";

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Job {0} not found")]
    JobNotFound(Uuid),

    #[error("Round '{round_name}' not found for job {job_id}")]
    RoundNotFound { job_id: Uuid, round_name: String },

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What to do with one candidate's result row.
#[derive(Debug, Clone, Copy)]
enum Directive<'a> {
    /// Write only if the stored status differs; notify only on a write.
    Converge(&'a str),
    /// Upsert unconditionally and always notify.
    Overwrite(&'a str),
    /// Delete an existing row and send a correction.
    Remove,
}

struct RoundTarget {
    job: Job,
    round: Round,
}

pub struct RoundReconciler {
    store: Arc<dyn RoundStore>,
    notifier: Arc<dyn Notifier>,
}

impl RoundReconciler {
    pub fn new(store: Arc<dyn RoundStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Every applicant of the job ends up "Qualified" if named in `qualified`,
    /// "Disqualified" otherwise. Re-running with the same set writes nothing.
    pub async fn reconcile_by_set(
        &self,
        job_id: Uuid,
        round_name: &str,
        qualified: &HashSet<String>,
    ) -> Result<ReconcileSummary, ReconcileError> {
        let target = self.resolve_target(job_id, round_name).await?;
        let applicants = self.store.list_applications(job_id).await?;

        let mut summary = ReconcileSummary::new(
            Operation::Qualify,
            job_id,
            &target.job.job_title,
            &target.round.round_name,
            applicants.len(),
        );

        for applicant in &applicants {
            let candidate = &applicant.candidate;
            let status = if qualified.contains(&candidate.username) {
                QUALIFIED
            } else {
                DISQUALIFIED
            };
            debug!(
                username = %candidate.username,
                applied_at = %applicant.applied_at,
                status,
                "Reconciling applicant"
            );
            let outcome = self
                .reconcile_candidate(&target, candidate, Directive::Converge(status))
                .await;
            summary.record(&candidate.username, outcome);
        }

        log_summary(&summary);
        Ok(summary)
    }

    /// Applies one `status` to every listed user. Unknown usernames are skipped.
    /// A username listed twice is processed (and notified) twice.
    pub async fn reconcile_by_list(
        &self,
        job_id: Uuid,
        round_name: &str,
        usernames: &[String],
        status: &str,
    ) -> Result<ReconcileSummary, ReconcileError> {
        let status = status.trim();
        if status.is_empty() {
            return Err(ReconcileError::InvalidInput(
                "status cannot be empty".to_string(),
            ));
        }
        require_usernames(usernames)?;
        let target = self.resolve_target(job_id, round_name).await?;

        Ok(self
            .reconcile_roster(&target, usernames, Directive::Overwrite(status), Operation::Upload)
            .await)
    }

    /// Deletes the listed users' results. A delete is never undone because
    /// its correction notice failed.
    pub async fn bulk_delete(
        &self,
        job_id: Uuid,
        round_name: &str,
        usernames: &[String],
    ) -> Result<ReconcileSummary, ReconcileError> {
        require_usernames(usernames)?;
        let target = self.resolve_target(job_id, round_name).await?;

        Ok(self
            .reconcile_roster(&target, usernames, Directive::Remove, Operation::Delete)
            .await)
    }

    async fn resolve_target(
        &self,
        job_id: Uuid,
        round_name: &str,
    ) -> Result<RoundTarget, ReconcileError> {
        let round_name = round_name.trim();
        if round_name.is_empty() {
            return Err(ReconcileError::InvalidInput(
                "round_name cannot be empty".to_string(),
            ));
        }

        let job = self
            .store
            .find_job(job_id)
            .await?
            .ok_or(ReconcileError::JobNotFound(job_id))?;
        let round = self
            .store
            .find_round(job_id, round_name)
            .await?
            .ok_or_else(|| ReconcileError::RoundNotFound {
                job_id,
                round_name: round_name.to_string(),
            })?;

        Ok(RoundTarget { job, round })
    }

    async fn reconcile_roster(
        &self,
        target: &RoundTarget,
        usernames: &[String],
        directive: Directive<'_>,
        operation: Operation,
    ) -> ReconcileSummary {
        let mut summary = ReconcileSummary::new(
            operation,
            target.job.id,
            &target.job.job_title,
            &target.round.round_name,
            usernames.len(),
        );

        for username in usernames {
            let outcome = match self.store.find_candidate_by_username(username).await {
                Ok(Some(candidate)) => {
                    self.reconcile_candidate(target, &candidate, directive)
                        .await
                }
                Ok(None) => {
                    debug!(%username, "Skipping unknown user");
                    CandidateOutcome::NotFound(Missing::Candidate)
                }
                Err(e) => {
                    warn!(%username, "User lookup failed: {e}");
                    CandidateOutcome::WriteError(e.to_string())
                }
            };
            summary.record(username, outcome);
        }

        log_summary(&summary);
        summary
    }

    /// The one step every operation shares: decide, write, then notify.
    async fn reconcile_candidate(
        &self,
        target: &RoundTarget,
        candidate: &Candidate,
        directive: Directive<'_>,
    ) -> CandidateOutcome {
        let round_name = target.round.round_name.as_str();
        let key = ResultKey::new(candidate.id, target.job.id, round_name);

        let written = match self.apply_directive(&key, target.round.id, directive).await {
            Ok(Some(Change::Unchanged)) => return CandidateOutcome::Ok(Change::Unchanged),
            Ok(Some(change)) => change,
            Ok(None) => {
                debug!(username = %candidate.username, round_name, "No result to remove");
                return CandidateOutcome::NotFound(Missing::Result);
            }
            Err(e) => {
                warn!(
                    username = %candidate.username,
                    round_name,
                    "Result write failed: {e}"
                );
                return CandidateOutcome::WriteError(e.to_string());
            }
        };

        let notice = match directive {
            Directive::Converge(status) | Directive::Overwrite(status) => {
                Notice::round_status(candidate, &target.job, round_name, status)
            }
            Directive::Remove => Notice::round_result_withdrawn(candidate, &target.job, round_name),
        };

        match self.notifier.notify(&notice).await {
            Ok(()) => CandidateOutcome::Ok(written),
            Err(e) => {
                warn!(
                    username = %candidate.username,
                    recipient = %notice.recipient,
                    "Notice failed after result write: {e}"
                );
                CandidateOutcome::NotifyError(written, e.to_string())
            }
        }
    }

    /// `Ok(None)` means the directive needed an existing row and there was none.
    async fn apply_directive(
        &self,
        key: &ResultKey,
        round_id: Uuid,
        directive: Directive<'_>,
    ) -> Result<Option<Change>, StoreError> {
        let now = Utc::now();
        match directive {
            Directive::Converge(status) => match self.store.find_result(key).await? {
                None => {
                    self.store.create_result(key, round_id, status, now).await?;
                    Ok(Some(Change::Added))
                }
                Some(existing) if existing.status == status => Ok(Some(Change::Unchanged)),
                Some(_) => {
                    self.store.update_result(key, status, now).await?;
                    Ok(Some(Change::Updated))
                }
            },
            Directive::Overwrite(status) => {
                match self.store.upsert_result(key, round_id, status, now).await? {
                    Upserted::Created => Ok(Some(Change::Added)),
                    Upserted::Updated => Ok(Some(Change::Updated)),
                }
            }
            Directive::Remove => {
                if self.store.find_result(key).await?.is_none() {
                    return Ok(None);
                }
                Ok(self
                    .store
                    .delete_result(key)
                    .await?
                    .then_some(Change::Deleted))
            }
        }
    }
}

fn require_usernames(usernames: &[String]) -> Result<(), ReconcileError> {
    if usernames.is_empty() {
        return Err(ReconcileError::InvalidInput(
            "usernames cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn log_summary(summary: &ReconcileSummary) {
    let c = &summary.counts;
    info!(
        operation = ?summary.operation,
        job_id = %summary.job_id,
        round_name = %summary.round_name,
        total = summary.total_requested,
        writes = summary.writes(),
        added = c.added,
        updated = c.updated,
        deleted = c.deleted,
        unchanged = c.unchanged,
        not_found = c.not_found,
        failed = c.failed,
        email_errors = c.email_errors,
        "Round reconciliation complete"
    );
}
