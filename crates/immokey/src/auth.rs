use serde::{Deserialize, Serialize};

/// Opaque identity issued by the external authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub user_id: String,
}

impl CallerIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Request-scoped caller context, built at the HTTP or CLI boundary and
/// passed explicitly into every operation that needs it. There is no ambient
/// "current user" state anywhere in the crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    Anonymous,
    Authenticated(CallerIdentity),
}

impl AuthContext {
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self::Authenticated(CallerIdentity::new(user_id))
    }

    /// Resolve the caller or fail with the error surfaced to unauthenticated
    /// requests.
    pub fn require(&self) -> Result<&CallerIdentity, AuthError> {
        match self {
            Self::Authenticated(identity) => Ok(identity),
            Self::Anonymous => Err(AuthError::Required),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("an authenticated caller is required")]
    Required,
}
