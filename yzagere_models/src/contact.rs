use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use chrono::{DateTime, Utc};
use nutype::nutype;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{email_address::EmailAddress, macros::nutype_string};

pub const DEFAULT_SERVICE: &str = "General Inquiry";

pub static CONTACT_EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub static CONTACT_PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\-()+.]{10,}$").unwrap());

/// The raw contact form as it travels from the widget to the relay endpoint.
///
/// Every field is optional on the wire. Nothing in here has been checked yet,
/// see [`ContactFormFields::validate`] and [`ContactFormFields::spam_check`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactFormFields {
    #[serde(with = "yzagere_utils::serde::lenient_string")]
    pub name: String,
    #[serde(with = "yzagere_utils::serde::lenient_string")]
    pub email: String,
    #[serde(with = "yzagere_utils::serde::lenient_string")]
    pub phone: String,
    #[serde(with = "yzagere_utils::serde::lenient_string")]
    pub service: String,
    #[serde(with = "yzagere_utils::serde::lenient_string")]
    pub message: String,
    /// Honeypot, hidden from humans.
    #[serde(rename = "_hp", with = "yzagere_utils::serde::lenient_string")]
    pub honeypot: String,
    /// Unix timestamp in milliseconds of when the form was rendered.
    #[serde(rename = "_startTime", with = "yzagere_utils::serde::lenient_millis")]
    pub start_time: i64,
}

/// A validated contact form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: ContactName,
    pub email: ContactEmail,
    pub phone: Option<ContactPhone>,
    pub service: ServiceLabel,
    pub message: ContactMessageContent,
}

nutype_string!(ContactName(sanitize(trim), validate(len_char_min = 2)));
nutype_string!(ContactEmail(
    sanitize(trim),
    validate(regex = CONTACT_EMAIL_REGEX)
));
nutype_string!(ContactPhone(
    sanitize(trim),
    validate(predicate = |phone| CONTACT_PHONE_REGEX
        .is_match(&phone.split_whitespace().collect::<String>()))
));
nutype_string!(ContactMessageContent(
    sanitize(trim),
    validate(len_char_min = 10)
));

#[nutype(
    sanitize(trim, with = |s: String| if s.is_empty() { DEFAULT_SERVICE.into() } else { s }),
    derive(Debug, Clone, PartialEq, Eq, Hash, From, Deref, AsRef, Display, Serialize, Deserialize)
)]
pub struct ServiceLabel(String);

impl ContactEmail {
    /// Converts the submitted address into one the mail transport accepts.
    ///
    /// The form pattern is looser than RFC 5322, so this can fail for
    /// addresses that passed validation.
    pub fn to_email_address(&self) -> Option<EmailAddress> {
        self.parse().ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Email,
    Phone,
    Message,
}

impl ContactField {
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Phone, Self::Message];
    pub const REQUIRED: [Self; 3] = [Self::Name, Self::Email, Self::Message];

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldError {
    Required(ContactField),
    NameTooShort,
    InvalidEmail,
    MessageTooShort,
    InvalidPhone,
}

impl FieldError {
    pub const ALL: [Self; 8] = [
        Self::Required(ContactField::Name),
        Self::Required(ContactField::Email),
        Self::Required(ContactField::Phone),
        Self::Required(ContactField::Message),
        Self::NameTooShort,
        Self::InvalidEmail,
        Self::MessageTooShort,
        Self::InvalidPhone,
    ];

    /// Looks up the error shown with the given message.
    pub fn from_message(message: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|x| x.message() == message)
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Required(ContactField::Name) => "Name is required",
            Self::Required(ContactField::Email) => "Email is required",
            Self::Required(ContactField::Phone) => "Phone is required",
            Self::Required(ContactField::Message) => "Message is required",
            Self::NameTooShort => "Name must be at least 2 characters",
            Self::InvalidEmail => "Please enter a valid email address",
            Self::MessageTooShort => "Message must be at least 10 characters",
            Self::InvalidPhone => "Please enter a valid phone number",
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

impl<'de> Deserialize<'de> for FieldError {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let message = String::deserialize(deserializer)?;
        Self::from_message(&message).ok_or_else(|| {
            serde::de::Error::custom(format!("unknown field error message: {message:?}"))
        })
    }
}

/// Field errors keyed by field, serialized as `{"name": "...", ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<ContactField, FieldError>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: ContactField) -> Option<FieldError> {
        self.0.get(&field).copied()
    }

    pub fn insert(&mut self, field: ContactField, error: FieldError) {
        self.0.insert(field, error);
    }

    pub fn remove(&mut self, field: ContactField) -> Option<FieldError> {
        self.0.remove(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContactField, FieldError)> + '_ {
        self.0.iter().map(|(&field, &error)| (field, error))
    }

    /// Whether any of the required fields was left blank.
    pub fn has_missing_required(&self) -> bool {
        self.0
            .values()
            .any(|error| matches!(error, FieldError::Required(_)))
    }

    fn record<T>(&mut self, field: ContactField, result: Result<T, FieldError>) -> Option<T> {
        result
            .map_err(|error| self.insert(field, error))
            .ok()
    }
}

impl ContactFormFields {
    /// Creates an empty form rendered at `now`.
    pub fn rendered_at(now: DateTime<Utc>) -> Self {
        Self {
            start_time: now.timestamp_millis(),
            ..Default::default()
        }
    }

    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
            ContactField::Message => &self.message,
        }
    }

    pub fn get_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Phone => &mut self.phone,
            ContactField::Message => &mut self.message,
        }
    }

    /// Validates every field and collects all errors instead of stopping at
    /// the first one.
    pub fn validate(&self) -> Result<ContactSubmission, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = errors.record(ContactField::Name, self.check_name());
        let email = errors.record(ContactField::Email, self.check_email());
        let phone = errors.record(ContactField::Phone, self.check_phone());
        let message = errors.record(ContactField::Message, self.check_message());

        match (name, email, phone, message) {
            (Some(name), Some(email), Some(phone), Some(message)) => Ok(ContactSubmission {
                name,
                email,
                phone,
                service: ServiceLabel::new(self.service.as_str()),
                message,
            }),
            _ => Err(errors),
        }
    }

    /// Validates a single field.
    pub fn validate_field(&self, field: ContactField) -> Option<FieldError> {
        match field {
            ContactField::Name => self.check_name().err(),
            ContactField::Email => self.check_email().err(),
            ContactField::Phone => self.check_phone().err(),
            ContactField::Message => self.check_message().err(),
        }
    }

    /// Returns the reason if this submission looks automated.
    ///
    /// A missing start time (`0`) counts as "rendered long ago".
    pub fn spam_check(&self, now: DateTime<Utc>, min_dwell_time: Duration) -> Option<SpamReason> {
        if !self.honeypot.is_empty() {
            return Some(SpamReason::Honeypot);
        }

        let elapsed_ms = now.timestamp_millis().saturating_sub(self.start_time);
        let min_dwell_ms = i64::try_from(min_dwell_time.as_millis()).unwrap_or(i64::MAX);
        (elapsed_ms < min_dwell_ms).then_some(SpamReason::TooFast { elapsed_ms })
    }

    fn check_name(&self) -> Result<ContactName, FieldError> {
        ContactName::try_new(required(&self.name, ContactField::Name)?)
            .map_err(|_| FieldError::NameTooShort)
    }

    fn check_email(&self) -> Result<ContactEmail, FieldError> {
        ContactEmail::try_new(required(&self.email, ContactField::Email)?)
            .map_err(|_| FieldError::InvalidEmail)
    }

    fn check_phone(&self) -> Result<Option<ContactPhone>, FieldError> {
        match self.phone.trim() {
            "" => Ok(None),
            phone => ContactPhone::try_new(phone)
                .map(Some)
                .map_err(|_| FieldError::InvalidPhone),
        }
    }

    fn check_message(&self) -> Result<ContactMessageContent, FieldError> {
        ContactMessageContent::try_new(required(&self.message, ContactField::Message)?)
            .map_err(|_| FieldError::MessageTooShort)
    }
}

fn required(value: &str, field: ContactField) -> Result<&str, FieldError> {
    match value.trim() {
        "" => Err(FieldError::Required(field)),
        value => Ok(value),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpamReason {
    Honeypot,
    TooFast { elapsed_ms: i64 },
}

impl std::fmt::Display for SpamReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Honeypot => write!(f, "honeypot field filled"),
            Self::TooFast { elapsed_ms } => write!(f, "form submitted after {elapsed_ms}ms"),
        }
    }
}

/// The body of every relay endpoint response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RelayResponse {
    pub fn ok() -> Self {
        Self {
            ok: true,
            ..Default::default()
        }
    }

    pub fn ok_with_message(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}
