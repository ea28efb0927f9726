// src/services/identity.rs

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{error::AppError, models::user::User};

/// Identifier handed out by the mock provider for every sign-in.
pub const MOCK_USER_ID: &str = "mock-user-id";
const MOCK_DISPLAY_NAME: &str = "Demo User";

/// Capability for establishing who the user is.
///
/// Handlers depend only on this trait, so a real credential backend can be
/// plugged in without touching scoring or the catalog.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<User, AppError>;

    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<User, AppError>;

    async fn logout(&self, user_id: &str) -> Result<(), AppError>;

    async fn current_user(&self, user_id: &str) -> Option<User>;
}

/// Stand-in provider: waits a fixed delay, then accepts any credentials.
/// Passwords are never inspected.
#[derive(Debug, Default)]
pub struct MockIdentityProvider {
    delay: Duration,
    signed_in: RwLock<HashMap<String, User>>,
}

impl MockIdentityProvider {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            signed_in: RwLock::new(HashMap::new()),
        }
    }

    async fn sign_in(&self, email: &str, display_name: &str) -> User {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let user = User {
            id: MOCK_USER_ID.to_string(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            photo_url: None,
            created_at: Utc::now(),
        };
        self.signed_in
            .write()
            .await
            .insert(user.id.clone(), user.clone());
        tracing::debug!("Mock sign-in for {}", email);
        user
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn login(&self, email: &str, _password: &str) -> Result<User, AppError> {
        Ok(self.sign_in(email, MOCK_DISPLAY_NAME).await)
    }

    async fn register(
        &self,
        email: &str,
        _password: &str,
        display_name: &str,
    ) -> Result<User, AppError> {
        Ok(self.sign_in(email, display_name).await)
    }

    async fn logout(&self, user_id: &str) -> Result<(), AppError> {
        self.signed_in.write().await.remove(user_id);
        Ok(())
    }

    async fn current_user(&self, user_id: &str) -> Option<User> {
        self.signed_in.read().await.get(user_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn login_fabricates_fixed_identity() {
        let idp = MockIdentityProvider::new(Duration::ZERO);
        let user = idp.login("ada@example.com", "whatever").await.unwrap();

        assert_eq!(user.id, MOCK_USER_ID);
        assert_eq!(user.display_name, "Demo User");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(idp.current_user(MOCK_USER_ID).await, Some(user));
    }

    #[tokio::test]
    async fn register_keeps_display_name() {
        let idp = MockIdentityProvider::new(Duration::ZERO);
        let user = idp.register("g@example.com", "pw", "Grace").await.unwrap();
        assert_eq!(user.display_name, "Grace");
    }

    #[tokio::test]
    async fn logout_clears_current_user() {
        let idp = MockIdentityProvider::new(Duration::ZERO);
        idp.login("a@example.com", "pw").await.unwrap();
        idp.logout(MOCK_USER_ID).await.unwrap();
        assert!(idp.current_user(MOCK_USER_ID).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn login_waits_for_configured_delay() {
        let idp = MockIdentityProvider::new(Duration::from_secs(1));
        let started = tokio::time::Instant::now();
        idp.login("a@example.com", "pw").await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(1));
    }
}
