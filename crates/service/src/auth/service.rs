use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use rand::rngs::OsRng;
use tracing::{info, debug, instrument};

use super::domain::{RegisterInput, LoginInput, AuthUser, AuthSession};
use super::errors::AuthError;
use super::repository::AuthRepository;
use super::session::SessionTokens;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub session_secret: String,
    pub session_ttl_secs: i64,
}

impl AuthConfig {
    pub fn new(session_secret: impl Into<String>, session_ttl_secs: i64) -> Self {
        Self { session_secret: session_secret.into(), session_ttl_secs }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    tokens: SessionTokens,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self {
        let tokens = SessionTokens::new(cfg.session_secret, cfg.session_ttl_secs);
        Self { repo, tokens }
    }

    /// Register a new user with a salted Argon2 hash of the password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::new("secret", 3600));
    /// let input = RegisterInput { username: "alice".into(), email: Some("alice@example.com".into()), password: "pw1".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.username, "alice");
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        let username = input.username.trim();
        if username.is_empty() || input.password.is_empty() {
            return Err(AuthError::Validation("username and password are required".into()));
        }
        let email = models::user::normalize_email(input.email.as_deref());

        if let Some(existing) = self.repo.find_user_by_username(username).await? {
            debug!("user exists: {}", existing.username);
            return Err(AuthError::Conflict);
        }
        if let Some(e) = &email {
            if self.repo.find_user_by_email(e).await?.is_some() {
                debug!("email already registered");
                return Err(AuthError::Conflict);
            }
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let user = self.repo.create_user(username, email.as_deref(), &hash).await?;
        info!(user_id = user.id, username = %user.username, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue a session token naming them.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig::new("secret", 3600));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { username: "alice".into(), email: None, password: "pw1".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { username: "alice".into(), password: "pw1".into() })).unwrap();
    /// assert_eq!(session.user.username, "alice");
    /// assert_eq!(svc.verify_session(&session.token).unwrap(), "alice");
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let username = input.username.trim();
        if username.is_empty() || input.password.is_empty() {
            return Err(AuthError::Validation("enter both username and password".into()));
        }

        let user = self.repo
            .find_user_by_username(username)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(username)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let token = self.tokens.issue(&user.username)?;
        info!(user_id = user.id, username = %user.username, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    /// Resolve a session token to the username it names.
    pub fn verify_session(&self, token: &str) -> Result<String, AuthError> {
        self.tokens.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc() -> (Arc<MockAuthRepository>, AuthService<MockAuthRepository>) {
        let repo = Arc::new(MockAuthRepository::default());
        (repo.clone(), AuthService::new(repo, AuthConfig::new("test-secret", 3600)))
    }

    fn reg(username: &str, email: Option<&str>, password: &str) -> RegisterInput {
        RegisterInput { username: username.into(), email: email.map(Into::into), password: password.into() }
    }

    #[tokio::test]
    async fn second_registration_of_username_conflicts() {
        let (repo, svc) = svc();
        svc.register(reg("alice", None, "pw1")).await.unwrap();
        let err = svc.register(reg("alice", None, "pw2")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn reused_email_conflicts() {
        let (_, svc) = svc();
        svc.register(reg("alice", Some("a@example.com"), "pw1")).await.unwrap();
        let err = svc.register(reg("bob", Some("a@example.com"), "pw2")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
    }

    #[tokio::test]
    async fn blank_email_never_conflicts() {
        let (repo, svc) = svc();
        svc.register(reg("alice", Some(""), "pw1")).await.unwrap();
        svc.register(reg("bob", Some(" "), "pw2")).await.unwrap();
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn empty_fields_rejected() {
        let (repo, svc) = svc();
        assert!(matches!(svc.register(reg("", None, "pw")).await, Err(AuthError::Validation(_))));
        assert!(matches!(svc.register(reg("alice", None, "")).await, Err(AuthError::Validation(_))));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn stored_password_is_hashed() {
        let (repo, svc) = svc();
        svc.register(reg("alice", None, "pw1")).await.unwrap();
        let cred = repo.get_credentials("alice").await.unwrap().unwrap();
        assert_ne!(cred.password_hash, "pw1");
        assert!(cred.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn login_establishes_identity() {
        let (_, svc) = svc();
        svc.register(reg("alice", Some("a@example.com"), "pw1")).await.unwrap();
        let session = svc.login(LoginInput { username: "alice".into(), password: "pw1".into() }).await.unwrap();
        assert_eq!(session.user.username, "alice");
        assert_eq!(svc.verify_session(&session.token).unwrap(), "alice");
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let (_, svc) = svc();
        svc.register(reg("alice", None, "pw1")).await.unwrap();
        let err = svc.login(LoginInput { username: "alice".into(), password: "wrong".into() }).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn unknown_user_is_unauthorized() {
        let (_, svc) = svc();
        let err = svc.login(LoginInput { username: "ghost".into(), password: "pw".into() }).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn token_from_other_service_rejected() {
        let (_, svc) = svc();
        svc.register(reg("alice", None, "pw1")).await.unwrap();
        let session = svc.login(LoginInput { username: "alice".into(), password: "pw1".into() }).await.unwrap();
        let other = AuthService::new(Arc::new(MockAuthRepository::default()), AuthConfig::new("other-secret", 3600));
        assert!(other.verify_session(&session.token).is_err());
    }
}
