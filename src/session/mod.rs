// src/session/mod.rs

pub mod countdown;
pub mod machine;
pub mod store;

pub use machine::{QuizSession, SessionState, SessionView, SubmitTrigger};
pub use store::{SessionLimits, SessionStore};
