//! Session gateway.
//!
//! A thin layer in front of an external identity service: it validates
//! sign-in and sign-up input locally, delegates credentials to an
//! [`IdentityProvider`], writes new profiles to a [`ProfileStore`], and turns
//! the service's failure codes into fixed, user-facing messages.

pub mod error;
mod gateway;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod provider;
mod rules;

pub use crate::error::AuthFailure;
pub use crate::gateway::{Gateway, IdentityHandle, ProfileHandle, SignUp};
pub use crate::provider::{Account, IdentityProvider, Profile, ProfileStore, ServiceError, UserId};
pub use crate::rules::Rules;
