//! Domain operations over the store: ownership scoping, referential
//! integrity, and the cascade protocol for folder and tag removal.

pub mod folders;
pub mod notes;
pub mod references;
pub mod tags;
pub mod users;

use thiserror::Error;

use crate::auth::password::PasswordError;
use crate::auth::JwtError;
use crate::error::ApiError;
use crate::filter::FilterError;
use crate::store::StoreError;

pub use folders::FolderService;
pub use notes::{ExpandedNote, NoteService};
pub use tags::TagService;
pub use users::UserService;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Not Found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Jwt(#[from] JwtError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }
}

/// Map a unique violation to the entity's conflict message, pass anything else through
pub(crate) fn conflict_as(message: &'static str) -> impl Fn(StoreError) -> ServiceError {
    move |err| match err {
        StoreError::Conflict(_) => ServiceError::Conflict(message.to_string()),
        other => ServiceError::Store(other),
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => ApiError::validation_error(msg),
            ServiceError::Conflict(msg) => ApiError::conflict(msg),
            ServiceError::NotFound => ApiError::not_found("Not Found"),
            ServiceError::Unauthorized => ApiError::unauthorized("Unauthorized"),
            ServiceError::Store(e) => e.into(),
            ServiceError::Filter(e) => e.into(),
            ServiceError::Jwt(e) => e.into(),
            ServiceError::Password(e) => e.into(),
        }
    }
}
