//! In-memory `RoundStore` for tests. Enforces the `(user, job, round name)`
//! uniqueness the real schema enforces and counts every write it performs.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::{Applicant, ResultKey, RoundStore, StoreError, Upserted};
use crate::models::job::Job;
use crate::models::round::{Round, RoundResult};
use crate::models::user::Candidate;

#[derive(Default)]
struct MemoryState {
    candidates: Vec<Candidate>,
    jobs: Vec<Job>,
    rounds: Vec<Round>,
    results: HashMap<ResultKey, RoundResult>,
    applications: Vec<(Uuid, Applicant)>,
    writes: usize,
    failing_users: HashSet<Uuid>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().expect("memory store lock poisoned")
    }

    pub fn add_candidate(&self, username: &str) -> Candidate {
        let candidate = Candidate {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: None,
            last_name: None,
        };
        self.lock().candidates.push(candidate.clone());
        candidate
    }

    pub fn add_job(&self, title: &str) -> Job {
        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4(),
            job_title: title.to_string(),
            company_name: "Acme".to_string(),
            description: None,
            location: None,
            created_at: now,
            updated_at: now,
        };
        self.lock().jobs.push(job.clone());
        job
    }

    pub fn add_round(&self, job: &Job, round_name: &str) -> Round {
        let round = Round {
            id: Uuid::new_v4(),
            job_id: job.id,
            round_name: round_name.to_string(),
            created_at: Utc::now(),
        };
        self.lock().rounds.push(round.clone());
        round
    }

    /// Applications are listed back in the order they were added.
    pub fn add_application(&self, job: &Job, candidate: &Candidate) {
        let mut state = self.lock();
        let offset = state.applications.len() as i64;
        state.applications.push((
            job.id,
            Applicant {
                candidate: candidate.clone(),
                applied_at: Utc::now() - Duration::minutes(offset),
            },
        ));
    }

    /// Seeds a result with an old timestamp. Not counted as a write.
    pub fn seed_result(&self, candidate: &Candidate, round: &Round, status: &str) -> RoundResult {
        let result = RoundResult {
            id: Uuid::new_v4(),
            user_id: candidate.id,
            job_id: round.job_id,
            round_id: round.id,
            round_name: round.round_name.clone(),
            status: status.to_string(),
            recorded_at: Utc::now() - Duration::days(1),
        };
        self.lock().results.insert(
            ResultKey::new(candidate.id, round.job_id, &round.round_name),
            result.clone(),
        );
        result
    }

    /// Every subsequent write touching this candidate fails.
    pub fn fail_writes_for(&self, candidate: &Candidate) {
        self.lock().failing_users.insert(candidate.id);
    }

    pub fn result(&self, candidate: &Candidate, round: &Round) -> Option<RoundResult> {
        self.lock()
            .results
            .get(&ResultKey::new(candidate.id, round.job_id, &round.round_name))
            .cloned()
    }

    pub fn result_count(&self) -> usize {
        self.lock().results.len()
    }

    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    fn begin_write(state: &mut MemoryState, key: &ResultKey) -> Result<(), StoreError> {
        if state.failing_users.contains(&key.user_id) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        state.writes += 1;
        Ok(())
    }
}

#[async_trait]
impl RoundStore for MemoryStore {
    async fn find_candidate_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Candidate>, StoreError> {
        Ok(self
            .lock()
            .candidates
            .iter()
            .find(|c| c.username == username)
            .cloned())
    }

    async fn find_job(&self, job_id: Uuid) -> Result<Option<Job>, StoreError> {
        Ok(self.lock().jobs.iter().find(|j| j.id == job_id).cloned())
    }

    async fn find_round(
        &self,
        job_id: Uuid,
        round_name: &str,
    ) -> Result<Option<Round>, StoreError> {
        Ok(self
            .lock()
            .rounds
            .iter()
            .find(|r| r.job_id == job_id && r.round_name == round_name)
            .cloned())
    }

    async fn find_result(&self, key: &ResultKey) -> Result<Option<RoundResult>, StoreError> {
        Ok(self.lock().results.get(key).cloned())
    }

    async fn create_result(
        &self,
        key: &ResultKey,
        round_id: Uuid,
        status: &str,
        at: DateTime<Utc>,
    ) -> Result<RoundResult, StoreError> {
        let mut state = self.lock();
        if state.results.contains_key(key) {
            return Err(StoreError::Conflict(format!(
                "result already exists for user {}",
                key.user_id
            )));
        }
        Self::begin_write(&mut state, key)?;
        let result = RoundResult {
            id: Uuid::new_v4(),
            user_id: key.user_id,
            job_id: key.job_id,
            round_id,
            round_name: key.round_name.clone(),
            status: status.to_string(),
            recorded_at: at,
        };
        state.results.insert(key.clone(), result.clone());
        Ok(result)
    }

    async fn update_result(
        &self,
        key: &ResultKey,
        status: &str,
        at: DateTime<Utc>,
    ) -> Result<RoundResult, StoreError> {
        let mut state = self.lock();
        if !state.results.contains_key(key) {
            return Err(StoreError::Missing(format!("result for user {}", key.user_id)));
        }
        Self::begin_write(&mut state, key)?;
        let result = state
            .results
            .get_mut(key)
            .ok_or_else(|| StoreError::Missing(format!("result for user {}", key.user_id)))?;
        result.status = status.to_string();
        result.recorded_at = at;
        Ok(result.clone())
    }

    async fn upsert_result(
        &self,
        key: &ResultKey,
        round_id: Uuid,
        status: &str,
        at: DateTime<Utc>,
    ) -> Result<Upserted, StoreError> {
        let mut state = self.lock();
        Self::begin_write(&mut state, key)?;
        match state.results.get_mut(key) {
            Some(existing) => {
                existing.status = status.to_string();
                existing.recorded_at = at;
                existing.round_id = round_id;
                Ok(Upserted::Updated)
            }
            None => {
                let result = RoundResult {
                    id: Uuid::new_v4(),
                    user_id: key.user_id,
                    job_id: key.job_id,
                    round_id,
                    round_name: key.round_name.clone(),
                    status: status.to_string(),
                    recorded_at: at,
                };
                state.results.insert(key.clone(), result);
                Ok(Upserted::Created)
            }
        }
    }

    async fn delete_result(&self, key: &ResultKey) -> Result<bool, StoreError> {
        let mut state = self.lock();
        if !state.results.contains_key(key) {
            return Ok(false);
        }
        Self::begin_write(&mut state, key)?;
        Ok(state.results.remove(key).is_some())
    }

    async fn list_applications(&self, job_id: Uuid) -> Result<Vec<Applicant>, StoreError> {
        Ok(self
            .lock()
            .applications
            .iter()
            .filter(|(id, _)| *id == job_id)
            .map(|(_, applicant)| applicant.clone())
            .collect())
    }
}
