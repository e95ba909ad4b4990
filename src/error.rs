use thiserror::Error;

/// Failure kinds raised by the service layer. Every operation either
/// completes or fails fast with one of these; nothing here retries.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The caller violated a precondition the service can check locally
    /// (self-friend-request, negative trending limit, wrong author).
    #[error("{0}")]
    InvalidOperation(String),

    /// A friendship already exists for the pair.
    #[error("users are already friends")]
    AlreadyFriends,

    /// A pending friend request already exists in either direction for the
    /// pair.
    #[error("a friend request is already pending between these users")]
    DuplicateRequest,

    /// The post already has an original; a post's original is immutable
    /// once set.
    #[error("post is already a remix")]
    AlreadyRemix,

    /// Registration collided with an existing username.
    #[error("username is already taken")]
    UsernameTaken,

    /// The referenced record or relation does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Bad credentials or an unknown session token.
    #[error("authentication failed")]
    Unauthorized,

    /// Storage or other infrastructure failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
