use crate::error::{ErrorKind, Result};

/// Local validation limits applied before anything reaches the identity
/// service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    /// Every phone number must start with this country code.
    pub phone_prefix: String,
    /// Exact phone number length, prefix included.
    pub phone_length: usize,
    pub min_password_length: usize,
}
impl Default for Rules {
    fn default() -> Self {
        Self { phone_prefix: "263".to_string(), phone_length: 12, min_password_length: 6 }
    }
}
impl Rules {
    pub fn check_phone(&self, phone: &str) -> Result<()> {
        if !phone.starts_with(&self.phone_prefix) || phone.chars().count() != self.phone_length {
            exn::bail!(ErrorKind::InvalidPhone(self.phone_prefix.clone()));
        }
        Ok(())
    }

    /// Checks that the confirmation matches, then the length.
    pub fn check_password(&self, password: &str, confirm: &str) -> Result<()> {
        if password != confirm {
            exn::bail!(ErrorKind::PasswordMismatch);
        }
        if password.chars().count() < self.min_password_length {
            exn::bail!(ErrorKind::PasswordTooShort(self.min_password_length));
        }
        Ok(())
    }
}
