use crate::error::{FinanceError, Result};

/// Identity of the signed-in user. Every stored row is scoped by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Returns `None` for blank identifiers.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The authenticated context handed to everything that touches user data.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<UserId>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn authenticated(user: UserId) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    pub fn require_user(&self) -> Result<&UserId> {
        self.user.as_ref().ok_or(FinanceError::NotAuthenticated)
    }
}
