use std::future::Future;

use thiserror::Error;
use yzagere_models::contact::{ContactField, ContactFormFields, FieldErrors, SpamReason};

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactService: Send + Sync + 'static {
    /// Checks a raw contact form submission and forwards it to the business
    /// inbox.
    ///
    /// Suspected spam is dropped without an error so that the caller cannot
    /// tell it apart from a delivered lead.
    fn relay(
        &self,
        fields: ContactFormFields,
    ) -> impl Future<Output = Result<RelayOutcome, ContactRelayError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Delivered,
    Dropped(SpamReason),
}

#[derive(Debug, Error)]
pub enum ContactRelayError {
    #[error("Missing required fields (name, email, message)")]
    MissingRequiredFields,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Invalid submission")]
    Invalid(FieldErrors),
    #[error("Failed to send message.")]
    Send,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<FieldErrors> for ContactRelayError {
    fn from(errors: FieldErrors) -> Self {
        if errors.has_missing_required() {
            Self::MissingRequiredFields
        } else if errors.get(ContactField::Email).is_some() {
            Self::InvalidEmail
        } else {
            Self::Invalid(errors)
        }
    }
}

#[cfg(feature = "mock")]
impl MockContactService {
    pub fn with_relay(
        mut self,
        fields: ContactFormFields,
        result: Result<RelayOutcome, ContactRelayError>,
    ) -> Self {
        self.expect_relay()
            .once()
            .with(mockall::predicate::eq(fields))
            .return_once(|_| Box::pin(std::future::ready(result)));
        self
    }
}
