use std::sync::Arc;

use tracing::{info, warn};

use super::{conflict_as, ServiceError};
use crate::auth::password::{hash_password_async, verify_password_async, HashCost};
use crate::auth::{issue_token, TokenUser};
use crate::config::SecurityConfig;
use crate::database::models::{NewUser, User};
use crate::store::Store;

pub const USERNAME_TAKEN: &str = "The username already exists";

/// Registration fields that already passed shape validation
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub fullname: Option<String>,
}

pub struct UserService {
    store: Arc<dyn Store>,
    security: SecurityConfig,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    /// Hash the password and persist the account. The digest never leaves this call.
    pub async fn register(&self, registration: Registration) -> Result<User, ServiceError> {
        let digest =
            hash_password_async(registration.password, HashCost::from(&self.security)).await?;

        let user = self
            .store
            .insert_user(NewUser {
                username: registration.username,
                fullname: registration.fullname,
                password_digest: digest,
            })
            .await
            .map_err(conflict_as(USERNAME_TAKEN))?;

        info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Check credentials and issue a token. Unknown users and wrong passwords
    /// are indistinguishable to the caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<String, ServiceError> {
        let Some(user) = self.store.find_user_by_username(username).await? else {
            warn!("Login attempt for unknown user");
            return Err(ServiceError::Unauthorized);
        };

        let valid = verify_password_async(password.to_string(), user.password.clone()).await?;
        if !valid {
            warn!("Login failed for user {}", user.id);
            return Err(ServiceError::Unauthorized);
        }

        Ok(issue_token(TokenUser::from(&user), &self.security)?)
    }

    /// New token for an identity whose current token already verified
    pub fn refresh(&self, user: TokenUser) -> Result<String, ServiceError> {
        Ok(issue_token(user, &self.security)?)
    }
}
