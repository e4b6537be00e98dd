//! The reasons a log-in or registration can fail, worded for the user.

use crate::Error;

/// A failed log-in or registration.
///
/// The display text is shown in the credential form as is.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Email already in use. Try logging in or use a different email.")]
    EmailAlreadyInUse,

    #[error("Invalid email address format.")]
    InvalidEmail,

    #[error("Password should be at least 6 characters.")]
    WeakPassword,

    /// No user has registered with the email. Reads the same as
    /// [CredentialError::WrongPassword] so emails cannot be probed.
    #[error("Invalid email or password.")]
    UserNotFound,

    #[error("Invalid email or password.")]
    WrongPassword,

    #[error("Authentication failed. Please try again.")]
    Other,
}

impl CredentialError {
    /// A stable code for the logs, e.g. "auth/wrong-password".
    pub fn code(self) -> &'static str {
        match self {
            CredentialError::EmailAlreadyInUse => "auth/email-already-in-use",
            CredentialError::InvalidEmail => "auth/invalid-email",
            CredentialError::WeakPassword => "auth/weak-password",
            CredentialError::UserNotFound => "auth/user-not-found",
            CredentialError::WrongPassword => "auth/wrong-password",
            CredentialError::Other => "auth/internal-error",
        }
    }

    /// Whether the message belongs next to the email input rather than the
    /// password input.
    pub fn concerns_email(self) -> bool {
        matches!(
            self,
            CredentialError::EmailAlreadyInUse | CredentialError::InvalidEmail
        )
    }
}

impl From<Error> for CredentialError {
    fn from(error: Error) -> Self {
        match error {
            Error::DuplicateEmail => CredentialError::EmailAlreadyInUse,
            Error::InvalidEmail(_) => CredentialError::InvalidEmail,
            Error::TooWeak(_) => CredentialError::WeakPassword,
            Error::NotFound => CredentialError::UserNotFound,
            Error::InvalidCredentials => CredentialError::WrongPassword,
            error => {
                tracing::error!("Unhandled error while checking credentials: {error}");
                CredentialError::Other
            }
        }
    }
}
