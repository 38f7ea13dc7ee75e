use std::{sync::Arc, time::Duration};

use chrono::{DateTime, FixedOffset, Offset, Utc};
use tracing::{info, warn};
use yzagere_core_contact_contracts::{ContactRelayError, ContactService, RelayOutcome};
use yzagere_email_contracts::{Email, EmailBody, EmailService};
use yzagere_models::{
    contact::{ContactFormFields, ContactSubmission},
    email_address::EmailAddressWithName,
};
use yzagere_shared_contracts::time::TimeService;
use yzagere_templates_contracts::{
    LeadNotification, LeadNotificationHtmlTemplate, LeadNotificationTextTemplate, TemplateService,
};

#[cfg(test)]
mod tests;

/// Arizona does not observe daylight saving time, so MST is UTC-07:00 all
/// year round.
const ARIZONA_UTC_OFFSET_SECS: i32 = -7 * 3600;

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<Time, Email, Template> {
    time: Time,
    email: Email,
    template: Template,
    config: ContactServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ContactServiceConfig {
    /// Inbox receiving the lead notifications.
    pub recipient: Arc<EmailAddressWithName>,
    pub business_name: Arc<str>,
    /// Submissions sent sooner than this after the form was rendered are
    /// considered automated.
    pub min_dwell_time: Duration,
}

impl<Time, Email, Template> ContactServiceImpl<Time, Email, Template> {
    pub fn new(time: Time, email: Email, template: Template, config: ContactServiceConfig) -> Self {
        Self {
            time,
            email,
            template,
            config,
        }
    }
}

impl<Time, EmailS, TemplateS> ContactService for ContactServiceImpl<Time, EmailS, TemplateS>
where
    Time: TimeService,
    EmailS: EmailService,
    TemplateS: TemplateService,
{
    async fn relay(&self, fields: ContactFormFields) -> Result<RelayOutcome, ContactRelayError> {
        let now = self.time.now();

        if let Some(reason) = fields.spam_check(now, self.config.min_dwell_time) {
            info!(%reason, "dropping suspected spam");
            return Ok(RelayOutcome::Dropped(reason));
        }

        let submission = fields.validate()?;
        let email = self.notification_email(&submission, now)?;

        if !self.email.send(email).await? {
            return Err(ContactRelayError::Send);
        }

        info!(name = %submission.name, service = %submission.service, "relayed new lead");

        Ok(RelayOutcome::Delivered)
    }
}

impl<Time, EmailS, TemplateS> ContactServiceImpl<Time, EmailS, TemplateS>
where
    TemplateS: TemplateService,
{
    fn notification_email(
        &self,
        submission: &ContactSubmission,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Email> {
        let notification = LeadNotification {
            business_name: self.config.business_name.to_string(),
            service: submission.service.to_string(),
            name: submission.name.to_string(),
            email: submission.email.to_string(),
            phone: submission.phone.as_ref().map(ToString::to_string),
            message: submission.message.to_string(),
            submitted_at: format_arizona_time(now),
        };

        let text = self
            .template
            .render(&LeadNotificationTextTemplate(notification.clone()))?;
        let html = self
            .template
            .render(&LeadNotificationHtmlTemplate(notification))?;

        let reply_to = submission.email.to_email_address().map(Into::into);
        if reply_to.is_none() {
            warn!(email = %submission.email, "submitter address not usable as Reply-To");
        }

        Ok(Email {
            recipient: (*self.config.recipient).clone(),
            subject: format!("New Lead: {} — {}", *submission.service, *submission.name),
            body: EmailBody::Alternative { text, html },
            reply_to,
        })
    }
}

/// Formats a timestamp the way a US locale shows Arizona local time, e.g.
/// `10/18/2026, 9:30:00 AM MST`.
fn format_arizona_time(time: DateTime<Utc>) -> String {
    let offset = FixedOffset::east_opt(ARIZONA_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
    time.with_timezone(&offset)
        .format("%-m/%-d/%Y, %-I:%M:%S %p MST")
        .to_string()
}
