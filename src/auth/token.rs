use crate::model::user::UserProfile;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

const TOKEN_PREFIX: &str = "atk_";

/// Active bearer tokens.
///
/// Tokens are opaque, never expire and are kept until the process exits.
#[derive(Default)]
pub struct Sessions {
    tokens: RwLock<HashMap<String, UserProfile>>,
}

fn new_token() -> String {
    format!("{}{}", TOKEN_PREFIX, Uuid::new_v4().to_simple())
}

/// Accepts either `Bearer <token>` or the bare token.
pub fn strip_bearer(header: &str) -> &str {
    header.strip_prefix("Bearer ").unwrap_or(header)
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a token not currently in use and binds it to `user`.
    pub fn issue(&self, user: UserProfile) -> String {
        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);

        let token = loop {
            let candidate = new_token();
            if !tokens.contains_key(&candidate) {
                break candidate;
            }
        };

        tokens.insert(token.clone(), user);
        token
    }

    /// Looks up the user behind an `Authorization` header value.
    pub fn resolve(&self, header: Option<&str>) -> Option<UserProfile> {
        let token = strip_bearer(header?);
        if token.is_empty() {
            return None;
        }

        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;

    fn jane() -> UserProfile {
        UserProfile {
            id: 2,
            username: "jane_smith".into(),
            email: "jane@company.com".into(),
            role: Role::Employee,
            manager_id: Some(5),
        }
    }

    #[test]
    fn issued_token_resolves_with_or_without_bearer_prefix() {
        let sessions = Sessions::new();
        let token = sessions.issue(jane());

        assert!(token.starts_with(TOKEN_PREFIX));
        assert_eq!(sessions.resolve(Some(&format!("Bearer {token}"))), Some(jane()));
        assert_eq!(sessions.resolve(Some(&token)), Some(jane()));
    }

    #[test]
    fn unknown_or_missing_tokens_do_not_resolve() {
        let sessions = Sessions::new();
        sessions.issue(jane());

        assert_eq!(sessions.resolve(None), None);
        assert_eq!(sessions.resolve(Some("")), None);
        assert_eq!(sessions.resolve(Some("Bearer ")), None);
        assert_eq!(sessions.resolve(Some("Bearer atk_unknown")), None);
    }

    #[test]
    fn every_login_gets_a_distinct_token() {
        let sessions = Sessions::new();
        let first = sessions.issue(jane());
        let second = sessions.issue(jane());

        assert_ne!(first, second);
        assert_eq!(sessions.len(), 2);
        // earlier tokens stay valid
        assert!(sessions.resolve(Some(&first)).is_some());
    }
}
