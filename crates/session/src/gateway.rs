use crate::error::{AuthFailure, ErrorKind, Result};
use crate::provider::{Account, IdentityProvider, Profile, ProfileStore, ServiceResult};
use crate::rules::Rules;
use exn::ResultExt;
use stacks_catalog::ClockHandle;
use std::sync::Arc;
use tracing::instrument;

pub type IdentityHandle = Arc<dyn IdentityProvider>;
pub type ProfileHandle = Arc<dyn ProfileStore>;

/// Everything the sign-up form collects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUp {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub user_type: String,
}

/// Validates session requests locally and passes them on to the identity
/// service and profile store.
///
/// Service failure codes come back as [`ErrorKind::Service`], whose message
/// is ready to show.
pub struct Gateway {
    identity: IdentityHandle,
    profiles: ProfileHandle,
    clock: ClockHandle,
    rules: Rules,
}

impl Gateway {
    /// `clock` stamps the `createdAt` of new profiles.
    pub fn new(identity: IdentityHandle, profiles: ProfileHandle, clock: ClockHandle) -> Self {
        Self { identity, profiles, clock, rules: Rules::default() }
    }

    #[instrument(skip(self, password), fields(provider = self.identity.name()))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Account> {
        if email.is_empty() || password.is_empty() {
            exn::bail!(ErrorKind::MissingFields);
        }
        let account = service(self.identity.sign_in(email, password).await)?;
        tracing::info!(uid = %account.uid, "Signed in");
        Ok(account)
    }

    /// Register a new account: validate the form, create the user, set its
    /// display name, then write its profile.
    ///
    /// Checks run in a fixed order and stop at the first failure: all fields
    /// filled, passwords match, password length, phone number.
    #[instrument(skip_all, fields(provider = self.identity.name(), email = %form.email))]
    pub async fn sign_up(&self, form: SignUp) -> Result<Account> {
        let SignUp { name, email, phone, password, confirm_password, user_type } = form;
        if [&name, &email, &phone, &password, &confirm_password].iter().any(|field| field.is_empty()) {
            exn::bail!(ErrorKind::MissingFields);
        }
        self.rules.check_password(&password, &confirm_password)?;
        self.rules.check_phone(&phone)?;

        let mut account = service(self.identity.create_user(&email, &password).await)?;
        service(self.identity.set_display_name(&account.uid, &name).await)?;
        account.display_name = Some(name.clone());
        let profile = Profile { name, email, phone, user_type, created_at: self.clock.now() };
        service(self.profiles.put(&account.uid, &profile).await)?;
        tracing::info!(uid = %account.uid, "Registered new account");
        Ok(account)
    }

    /// Phone-number sign-in. The number is validated, but the channel itself
    /// is not available, so this never succeeds.
    #[instrument(skip(self))]
    pub async fn sign_in_by_phone(&self, phone: &str) -> Result<Account> {
        self.rules.check_phone(phone)?;
        tracing::info!("Phone sign-in requested but no USSD gateway is configured");
        exn::bail!(ErrorKind::ChannelUnavailable)
    }
}

fn service<T>(result: ServiceResult<T>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => {
            let failure = AuthFailure::from_code(&err.code);
            tracing::debug!(code = %err.code, %failure, "Identity service refused request");
            Err(err).or_raise(|| ErrorKind::Service(failure))
        },
    }
}
