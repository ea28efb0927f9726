use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    catalog::QuizRepository,
    config::Config,
    services::{
        identity::IdentityProvider,
        recorder::{AttemptRecorder, AttemptSink},
    },
    session::{SessionLimits, SessionStore},
};

pub type Catalog = Arc<dyn QuizRepository>;
pub type Identity = Arc<dyn IdentityProvider>;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Catalog,
    pub identity: Identity,
    pub recorder: AttemptRecorder,
    pub sessions: SessionStore,
}

impl AppState {
    /// Wires the recorder and session store around one shared catalog.
    pub fn new(
        config: Config,
        catalog: Catalog,
        identity: Identity,
        sink: Arc<dyn AttemptSink>,
    ) -> Self {
        let recorder = AttemptRecorder::new(catalog.clone(), sink);
        let limits = SessionLimits {
            retention: config.session_retention,
            max_age: config.session_max_age,
            per_user: config.max_sessions_per_user,
        };
        let sessions = SessionStore::new(catalog.clone(), recorder.clone(), limits);
        Self {
            config,
            catalog,
            identity,
            recorder,
            sessions,
        }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Catalog {
    fn from_ref(state: &AppState) -> Self {
        state.catalog.clone()
    }
}

impl FromRef<AppState> for Identity {
    fn from_ref(state: &AppState) -> Self {
        state.identity.clone()
    }
}

impl FromRef<AppState> for AttemptRecorder {
    fn from_ref(state: &AppState) -> Self {
        state.recorder.clone()
    }
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
