use async_trait::async_trait;

use super::domain::{AuthUser, Credentials};
use super::errors::AuthError;

/// Repository abstraction for credential persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    /// Insert a user; a uniqueness violation is reported as `AuthError::Conflict`.
    async fn create_user(&self, username: &str, email: Option<&str>, password_hash: &str) -> Result<AuthUser, AuthError>;

    async fn get_credentials(&self, username: &str) -> Result<Option<Credentials>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, (AuthUser, String)>>, // key: username
    }

    impl MockAuthRepository {
        pub fn len(&self) -> usize {
            self.users.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(username).map(|(u, _)| u.clone()))
        }

        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.values().find(|(u, _)| u.email.as_deref() == Some(email)).map(|(u, _)| u.clone()))
        }

        async fn create_user(&self, username: &str, email: Option<&str>, password_hash: &str) -> Result<AuthUser, AuthError> {
            let mut users = self.users.lock().unwrap();
            let email_taken = email.is_some() && users.values().any(|(u, _)| u.email.as_deref() == email);
            if users.contains_key(username) || email_taken {
                return Err(AuthError::Conflict);
            }
            let user = AuthUser { id: users.len() as i32 + 1, username: username.to_string(), email: email.map(str::to_string) };
            users.insert(username.to_string(), (user.clone(), password_hash.to_string()));
            Ok(user)
        }

        async fn get_credentials(&self, username: &str) -> Result<Option<Credentials>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(username).map(|(u, hash)| Credentials { user_id: u.id, password_hash: hash.clone() }))
        }
    }
}
