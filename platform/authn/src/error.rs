use thiserror::Error;

/// Failure taxonomy for the authentication and authorization layer.
///
/// Variants map one-to-one onto transport status codes so callers never have
/// to match on message text.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credential missing, malformed, or rejected by the identity service.
    #[error("{0}")]
    Unauthenticated(String),
    /// Authenticated identity lacks a permission required by the action.
    #[error("{0}")]
    Forbidden(String),
    /// Auth backend unavailable.
    #[error("{0}")]
    Internal(String),
}

impl AuthError {
    /// HTTP status code for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Unauthenticated(_) => 401,
            AuthError::Forbidden(_) => 403,
            AuthError::Internal(_) => 500,
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        AuthError::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AuthError::Forbidden(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AuthError::Internal(message.into())
    }
}

/// Shared result type for authn/authz operations.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(AuthError::unauthenticated("x").status_code(), 401);
        assert_eq!(AuthError::forbidden("x").status_code(), 403);
        assert_eq!(AuthError::internal("x").status_code(), 500);
    }
}
