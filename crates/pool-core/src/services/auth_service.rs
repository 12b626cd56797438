// ============================================================================
// Pool Core - Authentication Service
// File: crates/pool-core/src/services/auth_service.rs
// ============================================================================
//! Authentication service with login, session resolution and logout.
//!
//! Every entry point returns a structured outcome. Store faults are logged
//! here and reach the caller only as a localized message.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use pool_security::{CredentialVerifier, PasswordService, SessionStore, SessionToken};
use pool_shared::constants::DEFAULT_SESSION_MAX_AGE_SECONDS;
use pool_shared::messages;

use crate::domain::User;
use crate::error::DomainError;
use crate::repositories::UserRepository;

/// Authentication service for handling login/session flows
pub struct AuthService<R: UserRepository + ?Sized> {
    user_repo: Arc<R>,
    sessions: SessionStore,
    session_max_age: Duration,
    verifier: Arc<dyn CredentialVerifier>,
}

impl<R: UserRepository + ?Sized> AuthService<R> {
    pub fn new(user_repo: Arc<R>, sessions: SessionStore) -> Self {
        Self {
            user_repo,
            sessions,
            session_max_age: Duration::from_secs(DEFAULT_SESSION_MAX_AGE_SECONDS),
            verifier: Arc::new(PasswordService),
        }
    }

    pub fn with_session_max_age(mut self, max_age: Duration) -> Self {
        self.session_max_age = max_age;
        self
    }

    /// Swaps the hash verification primitive.
    pub fn with_verifier(mut self, verifier: Arc<dyn CredentialVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Verify a username/password pair against the credential store.
    pub async fn authenticate(&self, username: &str, password: &str) -> AuthOutcome {
        if username.is_empty() || password.is_empty() {
            return AuthOutcome::rejected(AuthFailure::MissingCredentials);
        }

        // 1. Find user by exact username
        let user = match self.user_repo.find_by_username(username).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!("Authentication attempt for non-existent user: {}", username);
                return AuthOutcome::rejected(AuthFailure::UserNotFound);
            }
            Err(e) => {
                error!("Authentication error for {}: {}", username, e);
                return AuthOutcome::rejected(AuthFailure::StoreUnavailable);
            }
        };

        // 2. Verify password off the async workers
        match self.verify_password(password, &user.password_hash).await {
            Ok(true) => {
                info!("Successful authentication for user: {}", username);
                AuthOutcome::Authenticated {
                    user,
                    message: messages::AUTH_SUCCESS.to_string(),
                }
            }
            Ok(false) => {
                warn!("Failed authentication for user: {}", username);
                AuthOutcome::rejected(AuthFailure::InvalidCredential)
            }
            Err(e) => {
                error!("Password verification error for {}: {}", username, e);
                AuthOutcome::rejected(AuthFailure::InvalidCredential)
            }
        }
    }

    async fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, DomainError> {
        let verifier = Arc::clone(&self.verifier);
        let password = password.to_owned();
        let stored_hash = stored_hash.to_owned();

        tokio::task::spawn_blocking(move || verifier.verify(&password, &stored_hash))
            .await
            .map_err(|e| DomainError::InternalError(e.to_string()))?
            .map_err(|e| DomainError::InternalError(e.to_string()))
    }

    /// Resolve the user bound to a session token.
    ///
    /// A token whose user no longer exists, or whose session outlived the
    /// max age, is cleared on the spot, so a repeated call with the same
    /// token finds no session at all.
    pub async fn resolve_current_user(&self, token: &SessionToken) -> Option<User> {
        let entry = self.sessions.entry(token)?;
        if entry.is_expired(self.session_max_age) {
            info!("Session {} expired for user_id={}", token, entry.user_id);
            self.clear_session(token);
            return None;
        }
        let user_id = entry.user_id;

        match self.user_repo.find_by_id(&user_id).await {
            Ok(Some(user)) => Some(user),
            Ok(None) => {
                warn!("Stale session detected for user_id={}", user_id);
                self.clear_session(token);
                None
            }
            Err(e) => {
                error!("Error retrieving current user {}: {}", user_id, e);
                None
            }
        }
    }

    pub fn store_session(&self, token: &SessionToken, user: &User) {
        self.sessions.insert(token, user.id);
        debug!("Session {} created for user: {}", token, user.username);
    }

    pub fn clear_session(&self, token: &SessionToken) {
        if self.sessions.remove(token).is_some() {
            debug!("Session {} cleared", token);
        }
    }

    /// Authenticate and, on success, bind a fresh token to the user.
    /// Expired sessions of any user are swept at the same time.
    pub async fn login(&self, username: &str, password: &str) -> LoginResult {
        let outcome = self.authenticate(username, password).await;
        let token = outcome.user().map(|user| {
            let purged = self.sessions.purge_expired(self.session_max_age);
            if purged > 0 {
                debug!("Purged {} expired sessions", purged);
            }
            let token = SessionToken::generate();
            self.store_session(&token, user);
            token
        });
        LoginResult { outcome, token }
    }

    pub fn logout(&self, token: &SessionToken) {
        self.clear_session(token);
    }
}

/// Why an authentication attempt was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    MissingCredentials,
    UserNotFound,
    InvalidCredential,
    StoreUnavailable,
}

impl AuthFailure {
    pub fn message(&self) -> &'static str {
        match self {
            AuthFailure::MissingCredentials => messages::AUTH_MISSING_CREDENTIALS,
            AuthFailure::UserNotFound => messages::AUTH_USER_NOT_FOUND,
            AuthFailure::InvalidCredential => messages::AUTH_INVALID_PASSWORD,
            AuthFailure::StoreUnavailable => messages::AUTH_FAILURE,
        }
    }
}

/// Result of an authentication attempt
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    Authenticated { user: User, message: String },
    Rejected { failure: AuthFailure, message: String },
}

impl AuthOutcome {
    fn rejected(failure: AuthFailure) -> Self {
        AuthOutcome::Rejected {
            failure,
            message: failure.message().to_string(),
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            AuthOutcome::Authenticated { message, .. } | AuthOutcome::Rejected { message, .. } => {
                message
            }
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            AuthOutcome::Authenticated { user, .. } => Some(user),
            AuthOutcome::Rejected { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<AuthFailure> {
        match self {
            AuthOutcome::Authenticated { .. } => None,
            AuthOutcome::Rejected { failure, .. } => Some(*failure),
        }
    }
}

/// Result of a login: the outcome plus the issued token on success
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub outcome: AuthOutcome,
    pub token: Option<SessionToken>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Hotel;
    use crate::repositories::MockUserRepository;
    use pool_security::PasswordError;

    /// Accepts exactly `hash == "plain:" + password`.
    struct PlainVerifier;

    impl CredentialVerifier for PlainVerifier {
        fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
            match stored_hash.strip_prefix("plain:") {
                Some(expected) => Ok(expected == password),
                None => Err(PasswordError::UnsupportedFormat),
            }
        }
    }

    fn staff() -> User {
        User::new("ayse", "plain:havuz", Some(Hotel::new("Grand Otel")))
    }

    fn service(repo: MockUserRepository) -> AuthService<MockUserRepository> {
        AuthService::new(Arc::new(repo), SessionStore::new()).with_verifier(Arc::new(PlainVerifier))
    }

    #[tokio::test]
    async fn test_empty_input_skips_store() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().never();
        let auth = service(repo);

        for (u, p) in [("", "havuz"), ("ayse", ""), ("", "")] {
            let outcome = auth.authenticate(u, p).await;
            assert!(!outcome.success());
            assert_eq!(outcome.failure(), Some(AuthFailure::MissingCredentials));
            assert_eq!(outcome.message(), messages::AUTH_MISSING_CREDENTIALS);
        }
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().times(1).returning(|_| Ok(None));
        let outcome = service(repo).authenticate("ghost", "x").await;

        assert_eq!(outcome.failure(), Some(AuthFailure::UserNotFound));
        assert!(outcome.user().is_none());
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let user = staff();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(move |_| Ok(Some(user.clone())));
        let outcome = service(repo).authenticate("ayse", "yanlis").await;

        assert_eq!(outcome.failure(), Some(AuthFailure::InvalidCredential));
        assert_eq!(outcome.message(), messages::AUTH_INVALID_PASSWORD);
    }

    #[tokio::test]
    async fn test_unverifiable_hash_is_invalid_credential() {
        let user = User::new("ayse", "md5$abc", None);
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(move |_| Ok(Some(user.clone())));
        let outcome = service(repo).authenticate("ayse", "havuz").await;

        assert_eq!(outcome.failure(), Some(AuthFailure::InvalidCredential));
    }

    #[tokio::test]
    async fn test_success_returns_user_with_hotel() {
        let user = staff();
        let expected_id = user.id;
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(move |_| Ok(Some(user.clone())));
        let outcome = service(repo).authenticate("ayse", "havuz").await;

        assert!(outcome.success());
        assert_eq!(outcome.message(), messages::AUTH_SUCCESS);
        let user = outcome.user().unwrap();
        assert_eq!(user.id, expected_id);
        assert_eq!(user.hotel.as_ref().unwrap().name, "Grand Otel");
    }

    #[tokio::test]
    async fn test_store_failure_is_downgraded() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .returning(|_| Err(DomainError::DatabaseError("connection reset".into())));
        let outcome = service(repo).authenticate("ayse", "havuz").await;

        assert_eq!(outcome.failure(), Some(AuthFailure::StoreUnavailable));
        assert!(!outcome.message().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_resolve_without_session() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().never();
        let auth = service(repo);

        assert!(auth.resolve_current_user(&SessionToken::generate()).await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_stored_session() {
        let user = staff();
        let stored = user.clone();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(stored.clone())));
        let auth = service(repo);
        let token = SessionToken::generate();

        auth.store_session(&token, &user);
        assert_eq!(auth.resolve_current_user(&token).await, Some(user));
    }

    #[tokio::test]
    async fn test_stale_session_is_cleared_once() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().times(1).returning(|_| Ok(None));
        let auth = service(repo);
        let token = SessionToken::generate();

        auth.store_session(&token, &staff());
        assert!(auth.resolve_current_user(&token).await.is_none());
        assert!(auth.sessions().user_id(&token).is_none());
        // Second call never reaches the store: the session is gone.
        assert!(auth.resolve_current_user(&token).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_expires_after_max_age() {
        let user = staff();
        let stored = user.clone();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().times(1).returning(move |_| Ok(Some(stored.clone())));
        let auth = service(repo).with_session_max_age(Duration::from_secs(3600));
        let token = SessionToken::generate();

        auth.store_session(&token, &user);
        tokio::time::advance(Duration::from_secs(3599)).await;
        assert!(auth.resolve_current_user(&token).await.is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(auth.resolve_current_user(&token).await.is_none());
        assert!(auth.sessions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_sweeps_expired_sessions() {
        let user = staff();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(move |_| Ok(Some(user.clone())));
        let auth = service(repo).with_session_max_age(Duration::from_secs(60));

        let first = auth.login("ayse", "havuz").await.token.unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;
        let second = auth.login("ayse", "havuz").await.token.unwrap();

        assert_eq!(auth.sessions().len(), 1);
        assert!(auth.sessions().user_id(&first).is_none());
        assert!(auth.sessions().user_id(&second).is_some());
    }

    #[tokio::test]
    async fn test_resolve_store_error_keeps_session() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Err(DomainError::DatabaseError("timeout".into())));
        let auth = service(repo);
        let token = SessionToken::generate();

        auth.store_session(&token, &staff());
        assert!(auth.resolve_current_user(&token).await.is_none());
        assert!(auth.sessions().user_id(&token).is_some());
    }

    #[tokio::test]
    async fn test_login_issues_distinct_tokens_and_logout_clears() {
        let user = staff();
        let user_id = user.id;
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(move |_| Ok(Some(user.clone())));
        let auth = service(repo);

        let first = auth.login("ayse", "havuz").await;
        let second = auth.login("ayse", "havuz").await;
        let first_token = first.token.unwrap();
        let second_token = second.token.unwrap();
        assert_ne!(first_token, second_token);
        assert_eq!(auth.sessions().user_id(&first_token), Some(user_id));

        auth.logout(&first_token);
        assert!(auth.sessions().user_id(&first_token).is_none());
        assert_eq!(auth.sessions().user_id(&second_token), Some(user_id));
    }

    #[tokio::test]
    async fn test_failed_login_issues_no_token() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(|_| Ok(None));
        let auth = service(repo);

        let result = auth.login("ghost", "x").await;
        assert!(result.token.is_none());
        assert!(auth.sessions().is_empty());
    }
}
