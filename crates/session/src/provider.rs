//! Contracts with the external identity service and profile store.

use async_trait::async_trait;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A failed call to an external service, carrying its failure code
/// (e.g. `auth/wrong-password`).
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
#[display("identity service failed with code {code}")]
pub struct ServiceError {
    pub code: String,
}
impl ServiceError {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Identifier the identity service assigns to an account.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);
impl UserId {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A signed-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub uid: UserId,
    pub email: String,
    pub display_name: Option<String>,
}

/// The profile document written once per new account, keyed by uid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub user_type: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Name of the provider for logging.
    fn name(&self) -> &str;

    async fn sign_in(&self, email: &str, password: &str) -> ServiceResult<Account>;

    async fn create_user(&self, email: &str, password: &str) -> ServiceResult<Account>;

    async fn set_display_name(&self, uid: &UserId, name: &str) -> ServiceResult<()>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Create or replace the profile stored under `uid`.
    async fn put(&self, uid: &UserId, profile: &Profile) -> ServiceResult<()>;
}
