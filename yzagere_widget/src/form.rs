use chrono::{DateTime, Utc};
use yzagere_models::contact::{ContactField, ContactFormFields, FieldErrors};

use crate::api::SubmitResponse;

/// Entries of the service dropdown as `(value, label)`. The empty value is the
/// placeholder and makes the relay fall back to its default service label.
pub const SERVICE_OPTIONS: [(&str, &str); 5] = [
    ("", "Select a service (optional)"),
    ("Sprinkler/Irrigation Repair", "Sprinkler/Irrigation Repair"),
    ("Small Engine Repair", "Small Engine Repair"),
    ("Junk Hauling", "Junk Hauling"),
    ("Landscaping", "Landscaping"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ContactForm {
    fields: ContactFormFields,
    errors: FieldErrors,
    status: SubmitStatus,
}

impl ContactForm {
    /// Creates an empty form rendered at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            fields: ContactFormFields::rendered_at(now),
            errors: FieldErrors::default(),
            status: SubmitStatus::Idle,
        }
    }

    pub fn fields(&self) -> &ContactFormFields {
        &self.fields
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    /// Updates a field as the user types.
    ///
    /// A pending error on the field is cleared. Non-empty required fields are
    /// checked again right away so the user sees problems before submitting.
    pub fn set_field(&mut self, field: ContactField, value: impl Into<String>) {
        *self.fields.get_mut(field) = value.into();
        self.errors.remove(field);

        if field.is_required() && !self.fields.get(field).trim().is_empty() {
            if let Some(error) = self.fields.validate_field(field) {
                self.errors.insert(field, error);
            }
        }
    }

    pub fn set_service(&mut self, service: impl Into<String>) {
        self.fields.service = service.into();
    }

    /// Binds the hidden honeypot input. Only automated senders ever fill it in.
    pub fn set_honeypot(&mut self, value: impl Into<String>) {
        self.fields.honeypot = value.into();
    }

    /// Validates the whole form and returns the payload to send.
    ///
    /// Returns `None` and keeps the collected errors if any field is invalid,
    /// or if a submission is already in flight.
    pub fn begin_submit(&mut self) -> Option<ContactFormFields> {
        if self.status == SubmitStatus::Submitting {
            return None;
        }

        if let Err(errors) = self.fields.validate() {
            self.errors = errors;
            return None;
        }

        self.status = SubmitStatus::Submitting;
        Some(self.fields.clone())
    }

    /// Applies the result of the request started by [`Self::begin_submit`].
    ///
    /// On success the form is reset and rendered again at `now`, so a second
    /// lead gets a fresh dwell time. Field errors reported by the relay are
    /// shown inline and the form can be corrected. Any other failure shows the
    /// error banner.
    pub fn finish_submit(&mut self, result: anyhow::Result<SubmitResponse>, now: DateTime<Utc>) {
        match result {
            Ok(response) if response.is_success() => {
                self.status = SubmitStatus::Success;
                self.fields = ContactFormFields::rendered_at(now);
                self.errors = FieldErrors::default();
            }
            Ok(response) if !response.fields.is_empty() => {
                for (field, error) in response.fields.iter() {
                    self.errors.insert(field, error);
                }
                self.status = SubmitStatus::Idle;
            }
            _ => self.status = SubmitStatus::Error,
        }
    }

    /// Leaves the thank-you view and shows the empty form again.
    pub fn send_another(&mut self) {
        if self.status == SubmitStatus::Success {
            self.status = SubmitStatus::Idle;
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.status {
            SubmitStatus::Submitting => "Sending Message...",
            _ => "Send Message",
        }
    }

    /// The banner shown below the form after a failed submission.
    pub fn error_banner(&self, fallback_phone: &str) -> Option<String> {
        (self.status == SubmitStatus::Error).then(|| {
            format!(
                "Sorry, there was an error sending your message. Please try again or call us at \
                 {fallback_phone}."
            )
        })
    }
}
