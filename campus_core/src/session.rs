use crate::error::{Error, Result};
use crate::storage::Storage;

/// Where the session flag lives in storage.
pub const SESSION_KEY: &str = "isAdminAuthenticated";

/// The value the session flag holds while an admin is logged in.
const AUTHENTICATED: &str = "true";

/// The code used when none is configured.
pub const DEFAULT_ACCESS_CODE: &str = "12345678";

/// Tracks whether the admin panel is unlocked.
///
/// This compares a plaintext code that anyone with access to the config can
/// read. It gates the UI and nothing else; it is not an access-control
/// boundary.
#[derive(Debug, Clone)]
pub struct SessionGate {
    /// The code we compare against
    access_code: String,
}

impl SessionGate {
    /// Create a gate that opens for `access_code`.
    pub fn new(access_code: impl Into<String>) -> Self {
        Self {
            access_code: access_code.into(),
        }
    }

    /// Is the session flag set? Anything other than the exact marker counts
    /// as logged out.
    pub fn is_authenticated(&self, storage: &impl Storage) -> Result<bool> {
        Ok(storage.get(SESSION_KEY)?.as_deref() == Some(AUTHENTICATED))
    }

    /// Try to log in. Surrounding whitespace in the submitted code is ignored.
    /// On a mismatch nothing in storage changes.
    pub fn login(&self, storage: &mut impl Storage, submitted: &str) -> Result<()> {
        if submitted.trim() != self.access_code {
            tracing::warn!("rejected admin login");
            return Err(Error::InvalidCode);
        }

        storage.set(SESSION_KEY, AUTHENTICATED)?;
        tracing::info!("admin logged in");

        Ok(())
    }

    /// Clear the session flag, whether or not it was set.
    pub fn logout(&self, storage: &mut impl Storage) -> Result<()> {
        storage.remove(SESSION_KEY)?;
        tracing::info!("admin logged out");

        Ok(())
    }
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new(DEFAULT_ACCESS_CODE)
    }
}
