use std::sync::LazyLock;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use yzagere_models::{
    contact::ContactFormFields,
    email_address::{EmailAddress, EmailAddressWithName},
};

/// Fixed clock used throughout the tests: 2026-10-18 16:30:00 UTC,
/// which is 9:30 AM in Arizona.
pub static NOW: LazyLock<DateTime<Utc>> =
    LazyLock::new(|| Utc.with_ymd_and_hms(2026, 10, 18, 16, 30, 0).unwrap());

pub const NOW_ARIZONA: &str = "10/18/2026, 9:30:00 AM MST";

pub const BUSINESS_NAME: &str = "Yzagere Enterprises";
pub const FALLBACK_PHONE: &str = "(623) 931-0846";

pub static LEADS_INBOX: LazyLock<EmailAddressWithName> =
    LazyLock::new(|| "yzagere.enterprises@gmail.com".parse().unwrap());

pub static JANE_DOE_EMAIL: LazyLock<EmailAddress> =
    LazyLock::new(|| "jane@example.com".parse().unwrap());

/// A human filling in the form, rendered ten seconds before [`NOW`].
pub static JANE_DOE: LazyLock<ContactFormFields> = LazyLock::new(|| ContactFormFields {
    name: "Jane Doe".into(),
    email: "jane@example.com".into(),
    phone: String::new(),
    service: String::new(),
    message: "Please fix my sprinkler system soon.".into(),
    honeypot: String::new(),
    start_time: (*NOW - TimeDelta::seconds(10)).timestamp_millis(),
});

/// [`JANE_DOE`] with every optional field filled in.
pub static JANE_DOE_FULL: LazyLock<ContactFormFields> = LazyLock::new(|| ContactFormFields {
    phone: "(623) 555-0123".into(),
    service: "Sprinkler/Irrigation Repair".into(),
    ..JANE_DOE.clone()
});

/// A bot that filled in the honeypot.
pub static BOT: LazyLock<ContactFormFields> = LazyLock::new(|| ContactFormFields {
    honeypot: "https://cheap-pills.example".into(),
    ..JANE_DOE.clone()
});

/// A bot that submitted one second after the form was rendered.
pub static HASTY_BOT: LazyLock<ContactFormFields> = LazyLock::new(|| ContactFormFields {
    start_time: (*NOW - TimeDelta::seconds(1)).timestamp_millis(),
    ..JANE_DOE.clone()
});
