// src/session/store.rs

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use crate::{
    catalog::QuizRepository,
    error::{AppError, SessionError},
    models::attempt::ResultBundle,
    services::{recorder::AttemptRecorder, scoring},
};

use super::{
    countdown::{CountdownHandle, TickOutcome},
    machine::{QuizSession, SessionState, SessionView, SubmitTrigger},
};

pub type SharedSession = Arc<Mutex<QuizSession>>;

const TICK: Duration = Duration::from_secs(1);

/// How often the background sweeper calls [`SessionStore::prune`].
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Bounds on how long and how many sessions the store keeps.
#[derive(Debug, Clone, Copy)]
pub struct SessionLimits {
    /// How long a completed session keeps its result after completion.
    pub retention: Duration,
    /// Unfinished sessions older than this are dropped unless their
    /// countdown is still running.
    pub max_age: Duration,
    /// Sessions kept per user; starting one more evicts the oldest.
    pub per_user: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            retention: Duration::from_secs(600),
            max_age: Duration::from_secs(86_400),
            per_user: 16,
        }
    }
}

struct SessionEntry {
    user_id: String,
    session: SharedSession,
    /// Present while a timed session is running.
    timer: Option<CountdownHandle>,
    /// Start order, for per-user eviction.
    seq: u64,
    started: Instant,
    /// When the store first saw the session completed.
    completed: Option<Instant>,
}

/// Live questionnaire sessions, keyed by session ID.
///
/// Each timed session owns a ticking task; removing the session drops the
/// task's handle, which aborts it before it can submit.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    next_seq: Arc<AtomicU64>,
    catalog: Arc<dyn QuizRepository>,
    recorder: AttemptRecorder,
    limits: SessionLimits,
}

impl SessionStore {
    pub fn new(
        catalog: Arc<dyn QuizRepository>,
        recorder: AttemptRecorder,
        limits: SessionLimits,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            next_seq: Arc::new(AtomicU64::new(0)),
            catalog,
            recorder,
            limits,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Opens a session on `quiz_id` for `user_id` and starts its countdown
    /// when the quiz is timed.
    pub async fn start(&self, user_id: &str, quiz_id: &str) -> Result<SessionView, AppError> {
        let session = QuizSession::load(self.catalog.as_ref(), quiz_id, user_id, Utc::now())?;
        let id = session.id();
        let view = session.view();
        let timed = session.is_timed();

        let session = Arc::new(Mutex::new(session));
        let timer = timed.then(|| spawn_countdown(session.clone(), self.recorder.clone()));

        let mut sessions = self.sessions.write().await;
        evict_oldest(&mut sessions, user_id, self.limits.per_user.saturating_sub(1));
        sessions.insert(
            id,
            SessionEntry {
                user_id: user_id.to_string(),
                session,
                timer,
                seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                started: Instant::now(),
                completed: None,
            },
        );
        drop(sessions);
        tracing::info!(session_id = %id, quiz_id, user_id, timed, "Session started");

        Ok(view)
    }

    /// Looks up a session owned by `user_id`. Sessions of other users are
    /// reported as missing.
    pub async fn get(&self, user_id: &str, id: Uuid) -> Result<SharedSession, AppError> {
        let sessions = self.sessions.read().await;
        match sessions.get(&id) {
            Some(entry) if entry.user_id == user_id => Ok(entry.session.clone()),
            _ => Err(AppError::NotFound(format!("Session '{}' not found", id))),
        }
    }

    /// User-initiated submission.
    pub async fn submit(&self, user_id: &str, id: Uuid) -> Result<ResultBundle, AppError> {
        let shared = self.get(user_id, id).await?;
        let bundle = {
            let mut session = shared.lock().await;
            let result = session
                .submit(&self.recorder, SubmitTrigger::User, Utc::now())?
                .result
                .clone();
            scoring::bundle(session.quiz(), result)
        };

        if let Some(entry) = self.sessions.write().await.get_mut(&id) {
            if let Some(timer) = entry.timer.take() {
                timer.cancel();
            }
            entry.completed = Some(Instant::now());
        }

        Ok(bundle)
    }

    /// Result bundle of a completed session.
    pub async fn result(&self, user_id: &str, id: Uuid) -> Result<ResultBundle, AppError> {
        let shared = self.get(user_id, id).await?;
        let session = shared.lock().await;
        match session.outcome() {
            Some(outcome) => Ok(scoring::bundle(session.quiz(), outcome.result.clone())),
            None => Err(SessionError::InvalidState {
                expected: SessionState::Completed.as_str(),
                actual: session.state().as_str(),
            }
            .into()),
        }
    }

    /// Tears a session down, cancelling its countdown.
    pub async fn remove(&self, user_id: &str, id: Uuid) -> Result<(), AppError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(&id) {
            Some(entry) if entry.user_id == user_id => {}
            _ => return Err(AppError::NotFound(format!("Session '{}' not found", id))),
        }
        if let Some(entry) = sessions.remove(&id) {
            if let Some(timer) = entry.timer {
                timer.cancel();
            }
        }
        tracing::info!(session_id = %id, "Session removed");
        Ok(())
    }

    /// Drops completed sessions past their retention window and unfinished
    /// ones past the maximum age. Returns the number of sessions dropped.
    pub async fn prune(&self) -> usize {
        let now = Instant::now();
        let limits = self.limits;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|id, entry| {
            if entry.timer.as_ref().is_some_and(CountdownHandle::is_finished) {
                entry.timer = None;
            }
            // A session busy with a request is checked again on the next sweep.
            if entry.completed.is_none()
                && entry
                    .session
                    .try_lock()
                    .is_ok_and(|s| s.state() == SessionState::Completed)
            {
                entry.completed = Some(now);
            }

            let keep = match entry.completed {
                Some(at) => now.duration_since(at) < limits.retention,
                None => entry.timer.is_some() || now.duration_since(entry.started) < limits.max_age,
            };
            if !keep {
                tracing::debug!(session_id = %id, "Session evicted");
            }
            keep
        });

        before - sessions.len()
    }

    /// Prunes the store every `every` on a background task.
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.tick().await;

            loop {
                interval.tick().await;
                let evicted = store.prune().await;
                if evicted > 0 {
                    tracing::info!(evicted, "Pruned sessions");
                }
            }
        })
    }
}

/// Evicts `user_id`'s oldest sessions until at most `keep` remain.
fn evict_oldest(sessions: &mut HashMap<Uuid, SessionEntry>, user_id: &str, keep: usize) {
    let mut owned: Vec<(u64, Uuid)> = sessions
        .iter()
        .filter(|(_, entry)| entry.user_id == user_id)
        .map(|(id, entry)| (entry.seq, *id))
        .collect();
    if owned.len() <= keep {
        return;
    }
    owned.sort_unstable();

    let excess = owned.len() - keep;
    for (_, id) in owned.into_iter().take(excess) {
        sessions.remove(&id);
        tracing::info!(session_id = %id, user_id, "Session evicted, per-user limit reached");
    }
}

/// Ticks the session once per second and submits it when time runs out.
fn spawn_countdown(session: SharedSession, recorder: AttemptRecorder) -> CountdownHandle {
    CountdownHandle::new(tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;
            let mut guard = session.lock().await;
            match guard.tick() {
                TickOutcome::Running(_) => {}
                TickOutcome::Expired => {
                    let id = guard.id();
                    if let Err(e) = guard.submit(&recorder, SubmitTrigger::Timeout, Utc::now()) {
                        tracing::error!(session_id = %id, "Auto-submit failed: {:?}", e);
                    }
                    break;
                }
                TickOutcome::Stopped => break,
            }
        }
    }))
}
