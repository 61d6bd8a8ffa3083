use serde::Serialize;
use uuid::Uuid;

/// Which reconciliation produced a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Qualify,
    Upload,
    Delete,
}

/// The write applied to one candidate's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Added,
    Updated,
    Deleted,
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Candidate,
    Result,
}

/// Per-candidate outcome. Only `Ok` and `NotifyError` carry a committed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOutcome {
    Ok(Change),
    NotFound(Missing),
    WriteError(String),
    NotifyError(Change, String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateFailure {
    pub username: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryCounts {
    #[serde(skip_serializing_if = "is_zero")]
    pub added: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub updated: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub deleted: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub unchanged: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub not_found: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub failed: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub email_errors: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Report returned by every reconciliation. Empty buckets are omitted when serialized.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileSummary {
    pub operation: Operation,
    pub job_id: Uuid,
    pub job_title: String,
    pub round_name: String,
    pub total_requested: usize,
    pub counts: SummaryCounts,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added_users: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub updated_users: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted_users: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unchanged_users: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub not_found_users: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_users: Vec<CandidateFailure>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub email_errors: Vec<CandidateFailure>,
}

impl ReconcileSummary {
    pub fn new(
        operation: Operation,
        job_id: Uuid,
        job_title: &str,
        round_name: &str,
        total_requested: usize,
    ) -> Self {
        Self {
            operation,
            job_id,
            job_title: job_title.to_string(),
            round_name: round_name.to_string(),
            total_requested,
            counts: SummaryCounts::default(),
            added_users: Vec::new(),
            updated_users: Vec::new(),
            deleted_users: Vec::new(),
            unchanged_users: Vec::new(),
            not_found_users: Vec::new(),
            failed_users: Vec::new(),
            email_errors: Vec::new(),
        }
    }

    /// Files one candidate's outcome into its bucket(s).
    pub fn record(&mut self, username: &str, outcome: CandidateOutcome) {
        match outcome {
            CandidateOutcome::Ok(change) => self.record_change(username, change),
            CandidateOutcome::NotifyError(change, error) => {
                self.record_change(username, change);
                self.counts.email_errors += 1;
                self.email_errors.push(CandidateFailure {
                    username: username.to_string(),
                    error,
                });
            }
            CandidateOutcome::NotFound(_) => {
                self.counts.not_found += 1;
                self.not_found_users.push(username.to_string());
            }
            CandidateOutcome::WriteError(error) => {
                self.counts.failed += 1;
                self.failed_users.push(CandidateFailure {
                    username: username.to_string(),
                    error,
                });
            }
        }
    }

    fn record_change(&mut self, username: &str, change: Change) {
        let username = username.to_string();
        match change {
            Change::Added => {
                self.counts.added += 1;
                self.added_users.push(username);
            }
            Change::Updated => {
                self.counts.updated += 1;
                self.updated_users.push(username);
            }
            Change::Deleted => {
                self.counts.deleted += 1;
                self.deleted_users.push(username);
            }
            Change::Unchanged => {
                self.counts.unchanged += 1;
                self.unchanged_users.push(username);
            }
        }
    }

    /// Number of result rows this call created, updated or deleted.
    pub fn writes(&self) -> usize {
        self.counts.added + self.counts.updated + self.counts.deleted
    }
}
