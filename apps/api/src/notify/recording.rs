//! Test notifier that records every notice and fails for chosen recipients.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Notice, Notifier, NotifyError};

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notice>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, recipient: &str) {
        self.failing
            .lock()
            .expect("notifier lock poisoned")
            .insert(recipient.to_string());
    }

    /// Notices that were accepted, in send order.
    pub fn sent(&self) -> Vec<Notice> {
        self.sent.lock().expect("notifier lock poisoned").clone()
    }

    pub fn sent_to(&self, recipient: &str) -> usize {
        self.sent().iter().filter(|n| n.recipient == recipient).count()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notice: &Notice) -> Result<(), NotifyError> {
        if self
            .failing
            .lock()
            .expect("notifier lock poisoned")
            .contains(&notice.recipient)
        {
            return Err(NotifyError::Rejected {
                status: 503,
                message: "relay down".to_string(),
            });
        }
        self.sent
            .lock()
            .expect("notifier lock poisoned")
            .push(notice.clone());
        Ok(())
    }
}
