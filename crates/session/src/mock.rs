//! In-memory identity service and profile store for testing.
//!
//! They answer with the same failure codes the hosted service uses, so the
//! gateway's error mapping can be exercised without a network.

use crate::provider::{Account, IdentityProvider, Profile, ProfileStore, ServiceError, ServiceResult, UserId};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Same as the hosted service's default: it rejects shorter passwords as weak.
const MIN_PASSWORD_LENGTH: usize = 6;

struct Record {
    password: String,
    account: Account,
}

#[derive(Default)]
pub struct MemoryIdentity {
    accounts: RwLock<HashMap<String, Record>>,
}

impl MemoryIdentity {
    /// Number of registered accounts.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }
}

fn check_email(email: &str) -> ServiceResult<()> {
    match email.split_once('@') {
        Some((user, domain)) if !user.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ServiceError::new("auth/invalid-email")),
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    fn name(&self) -> &str {
        "memory"
    }

    async fn sign_in(&self, email: &str, password: &str) -> ServiceResult<Account> {
        check_email(email)?;
        let accounts = self.accounts.read().await;
        let record = accounts.get(email).ok_or_else(|| ServiceError::new("auth/user-not-found"))?;
        if record.password != password {
            return Err(ServiceError::new("auth/wrong-password"));
        }
        Ok(record.account.clone())
    }

    async fn create_user(&self, email: &str, password: &str) -> ServiceResult<Account> {
        check_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ServiceError::new("auth/weak-password"));
        }
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(email) {
            return Err(ServiceError::new("auth/email-already-in-use"));
        }
        let account = Account {
            uid: UserId::new(format!("uid-{}", accounts.len() + 1)),
            email: email.to_string(),
            display_name: None,
        };
        let record = Record { password: password.to_string(), account: account.clone() };
        accounts.insert(email.to_string(), record);
        Ok(account)
    }

    async fn set_display_name(&self, uid: &UserId, name: &str) -> ServiceResult<()> {
        let mut accounts = self.accounts.write().await;
        let record = accounts
            .values_mut()
            .find(|record| &record.account.uid == uid)
            .ok_or_else(|| ServiceError::new("auth/user-not-found"))?;
        record.account.display_name = Some(name.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryProfiles {
    profiles: RwLock<HashMap<UserId, Profile>>,
    unavailable: bool,
}

impl MemoryProfiles {
    /// A store that fails every write with code `unavailable`.
    pub fn unavailable() -> Self {
        Self { unavailable: true, ..Self::default() }
    }

    pub async fn get(&self, uid: &UserId) -> Option<Profile> {
        self.profiles.read().await.get(uid).cloned()
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfiles {
    async fn put(&self, uid: &UserId, profile: &Profile) -> ServiceResult<()> {
        if self.unavailable {
            return Err(ServiceError::new("unavailable"));
        }
        self.profiles.write().await.insert(uid.clone(), profile.clone());
        Ok(())
    }
}
