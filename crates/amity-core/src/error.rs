use amity_store::StoreError;
use thiserror::Error;
use uuid::Uuid;

use crate::validation::ValidationErrors;

/// Failures surfaced by the core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("User {id} not found")]
    UserNotFound { id: Uuid },

    /// The target of a friend action does not exist.
    #[error("Friend {friend_id} of user {user_id} not found")]
    FriendNotFound { user_id: Uuid, friend_id: Uuid },

    #[error("Users {user_id} and {friend_id} are already friends")]
    FriendshipExists { user_id: Uuid, friend_id: Uuid },

    #[error("User {user_id} is not friends with user {friend_id}")]
    FriendshipNotFound { user_id: Uuid, friend_id: Uuid },

    #[error("Message {id} not found")]
    MessageNotFound { id: Uuid },

    #[error("{0}")]
    Validation(ValidationErrors),

    /// Persistence or otherwise unclassified failure.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// How a boundary layer should present a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    NotFound,
    Conflict,
    BadInput,
    Internal,
}

impl CoreError {
    pub fn class(&self) -> ErrorClass {
        match self {
            CoreError::UserNotFound { .. }
            | CoreError::FriendNotFound { .. }
            | CoreError::FriendshipNotFound { .. }
            | CoreError::MessageNotFound { .. } => ErrorClass::NotFound,
            CoreError::FriendshipExists { .. } => ErrorClass::Conflict,
            CoreError::Validation(_) => ErrorClass::BadInput,
            CoreError::Internal { .. } => ErrorClass::Internal,
        }
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "store failure");
        CoreError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        CoreError::Validation(errors)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes() {
        let id = Uuid::new_v4();
        assert_eq!(CoreError::UserNotFound { id }.class(), ErrorClass::NotFound);
        assert_eq!(
            CoreError::FriendNotFound { user_id: id, friend_id: id }.class(),
            ErrorClass::NotFound
        );
        assert_eq!(
            CoreError::FriendshipExists { user_id: id, friend_id: id }.class(),
            ErrorClass::Conflict
        );
        assert_eq!(
            CoreError::Validation(ValidationErrors::new()).class(),
            ErrorClass::BadInput
        );
        assert_eq!(
            CoreError::from(StoreError::NotFound).class(),
            ErrorClass::Internal
        );
    }

    #[test]
    fn store_errors_become_internal() {
        let err = CoreError::from(StoreError::Migration("boom".into()));
        match err {
            CoreError::Internal { message } => assert!(message.contains("boom")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
