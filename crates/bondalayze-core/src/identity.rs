//! Identity collaborator.
//!
//! Sign-in and sign-out belong to the external identity provider; the
//! backend only asks who the caller is.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves the signed-in user for an access token, `None` if the token
    /// is unknown or expired.
    async fn current_user(&self, access_token: &str) -> Result<Option<User>>;
}
