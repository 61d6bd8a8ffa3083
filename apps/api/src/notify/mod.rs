//! Outbound candidate notices.
//!
//! Delivery failures surface as `NotifyError` and are never retried; callers
//! decide whether a failed notice matters (the round engine only records it).

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::models::job::Job;
use crate::models::user::Candidate;

pub mod relay;
#[cfg(test)]
pub mod recording;

pub use relay::RelayNotifier;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mail relay rejected notice (status {status}): {message}")]
    Rejected { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub recipient: String,
    pub username: String,
    pub subject: String,
    pub body: String,
}

impl Notice {
    pub fn round_status(candidate: &Candidate, job: &Job, round_name: &str, status: &str) -> Self {
        Self {
            recipient: candidate.email.clone(),
            username: candidate.username.clone(),
            subject: format!("{} - {} round update", job.job_title, round_name),
            body: format!(
                "Hi {},\n\nYour result for the {} round of {} at {} is now: {}.\n",
                candidate.display_name(),
                round_name,
                job.job_title,
                job.company_name,
                status
            ),
        }
    }

    /// Correction sent when a previously announced result is removed.
    pub fn round_result_withdrawn(candidate: &Candidate, job: &Job, round_name: &str) -> Self {
        Self {
            recipient: candidate.email.clone(),
            username: candidate.username.clone(),
            subject: format!("{} - correction to your {} round result", job.job_title, round_name),
            body: format!(
                "Hi {},\n\nThe {} round result we sent you for {} at {} was recorded in error \
                 and has been withdrawn. You will hear from us again once it is final.\n",
                candidate.display_name(),
                round_name,
                job.job_title,
                job.company_name
            ),
        }
    }

    pub fn application_received(candidate: &Candidate, job: &Job) -> Self {
        Self {
            recipient: candidate.email.clone(),
            username: candidate.username.clone(),
            subject: format!("Application received: {}", job.job_title),
            body: format!(
                "Hi {},\n\nThanks for applying to {} at {}. We'll be in touch about next steps.\n",
                candidate.display_name(),
                job.job_title,
                job.company_name
            ),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: &Notice) -> Result<(), NotifyError>;
}

/// Used when no mail relay is configured. Logs the notice and reports success.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notice: &Notice) -> Result<(), NotifyError> {
        info!(
            recipient = %notice.recipient,
            subject = %notice.subject,
            "Mail relay not configured; notice logged only"
        );
        Ok(())
    }
}
