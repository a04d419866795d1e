//! Token-table identity provider.
//!
//! Maps bearer tokens configured in `[[users]]` to users. Stands in for the
//! hosted identity service in development and tests.

use async_trait::async_trait;
use bondalayze_core::config::UserSeed;
use bondalayze_core::error::Result;
use bondalayze_core::identity::{IdentityProvider, User};
use std::collections::HashMap;

pub struct StaticTokenIdentityProvider {
    users: HashMap<String, User>,
}

impl StaticTokenIdentityProvider {
    pub fn new(users: impl IntoIterator<Item = (String, User)>) -> Self {
        Self {
            users: users.into_iter().collect(),
        }
    }

    pub fn from_seeds(seeds: &[UserSeed]) -> Self {
        Self::new(seeds.iter().map(|seed| {
            (
                seed.token.clone(),
                User {
                    id: seed.id.clone(),
                    email: seed.email.clone(),
                },
            )
        }))
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenIdentityProvider {
    async fn current_user(&self, access_token: &str) -> Result<Option<User>> {
        let token = access_token.trim();
        if token.is_empty() {
            return Ok(None);
        }
        Ok(self.users.get(token).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bondalayze_core::plan::Plan;

    #[tokio::test]
    async fn test_resolves_seeded_tokens() {
        let provider = StaticTokenIdentityProvider::from_seeds(&[UserSeed {
            token: "dev-token".to_string(),
            id: "user-1".to_string(),
            email: Some("me@example.com".to_string()),
            plan: Plan::Free,
        }]);

        let user = provider.current_user("dev-token").await.unwrap().unwrap();
        assert_eq!(user.id, "user-1");
        assert!(provider.current_user("other").await.unwrap().is_none());
        assert!(provider.current_user("  ").await.unwrap().is_none());
    }
}
