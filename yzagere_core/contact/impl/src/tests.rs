use std::{sync::Arc, time::Duration};

use pretty_assertions::assert_eq;
use yzagere_core_contact_contracts::{ContactRelayError, ContactService, RelayOutcome};
use yzagere_demo::{
    BOT, BUSINESS_NAME, HASTY_BOT, JANE_DOE, JANE_DOE_EMAIL, JANE_DOE_FULL, LEADS_INBOX, NOW,
    NOW_ARIZONA,
};
use yzagere_email_contracts::{Email, EmailBody, MockEmailService};
use yzagere_models::contact::{
    ContactField, ContactFormFields, FieldError, SpamReason, DEFAULT_SERVICE,
};
use yzagere_shared_contracts::time::MockTimeService;
use yzagere_templates_contracts::{
    LeadNotification, LeadNotificationHtmlTemplate, LeadNotificationTextTemplate,
    MockTemplateService,
};
use yzagere_utils::assert_matches;

use crate::{format_arizona_time, ContactServiceConfig, ContactServiceImpl};

type Sut = ContactServiceImpl<MockTimeService, MockEmailService, MockTemplateService>;

fn config() -> ContactServiceConfig {
    ContactServiceConfig {
        recipient: Arc::new(LEADS_INBOX.clone()),
        business_name: BUSINESS_NAME.into(),
        min_dwell_time: Duration::from_secs(4),
    }
}

fn sut(time: MockTimeService, email: MockEmailService, template: MockTemplateService) -> Sut {
    ContactServiceImpl::new(time, email, template, config())
}

fn notification(fields: &ContactFormFields) -> LeadNotification {
    let service = match fields.service.trim() {
        "" => DEFAULT_SERVICE,
        service => service,
    };
    LeadNotification {
        business_name: BUSINESS_NAME.into(),
        service: service.into(),
        name: fields.name.trim().into(),
        email: fields.email.trim().into(),
        phone: Some(fields.phone.trim())
            .filter(|phone| !phone.is_empty())
            .map(Into::into),
        message: fields.message.trim().into(),
        submitted_at: NOW_ARIZONA.into(),
    }
}

fn template_for(fields: &ContactFormFields) -> MockTemplateService {
    MockTemplateService::new()
        .with_render(
            LeadNotificationTextTemplate(notification(fields)),
            "text body".into(),
        )
        .with_render(
            LeadNotificationHtmlTemplate(notification(fields)),
            "<p>html body</p>".into(),
        )
}

fn expected_email(subject: &str) -> Email {
    Email {
        recipient: LEADS_INBOX.clone(),
        subject: subject.into(),
        body: EmailBody::Alternative {
            text: "text body".into(),
            html: "<p>html body</p>".into(),
        },
        reply_to: Some(JANE_DOE_EMAIL.clone().into()),
    }
}

#[tokio::test]
async fn ok() {
    // Arrange
    let time = MockTimeService::new().with_now(*NOW);
    let template = template_for(&JANE_DOE);
    let email = MockEmailService::new().with_send(
        expected_email("New Lead: General Inquiry — Jane Doe"),
        true,
    );

    let sut = sut(time, email, template);

    // Act
    let result = sut.relay(JANE_DOE.clone()).await;

    // Assert
    assert_eq!(result.unwrap(), RelayOutcome::Delivered);
}

#[tokio::test]
async fn ok_with_phone_and_service() {
    // Arrange
    let time = MockTimeService::new().with_now(*NOW);
    let template = template_for(&JANE_DOE_FULL);
    let email = MockEmailService::new().with_send(
        expected_email("New Lead: Sprinkler/Irrigation Repair — Jane Doe"),
        true,
    );

    let sut = sut(time, email, template);

    // Act
    let result = sut.relay(JANE_DOE_FULL.clone()).await;

    // Assert
    assert_eq!(result.unwrap(), RelayOutcome::Delivered);
}

#[tokio::test]
async fn honeypot() {
    // Arrange
    let time = MockTimeService::new().with_now(*NOW);
    let sut = sut(time, MockEmailService::new(), MockTemplateService::new());

    // Act
    let result = sut.relay(BOT.clone()).await;

    // Assert
    assert_eq!(
        result.unwrap(),
        RelayOutcome::Dropped(SpamReason::Honeypot)
    );
}

#[tokio::test]
async fn too_fast() {
    // Arrange
    let time = MockTimeService::new().with_now(*NOW);
    let sut = sut(time, MockEmailService::new(), MockTemplateService::new());

    // Act
    let result = sut.relay(HASTY_BOT.clone()).await;

    // Assert
    assert_eq!(
        result.unwrap(),
        RelayOutcome::Dropped(SpamReason::TooFast { elapsed_ms: 1000 })
    );
}

#[tokio::test]
async fn spam_is_checked_before_validation() {
    // Arrange
    let time = MockTimeService::new().with_now(*NOW);
    let sut = sut(time, MockEmailService::new(), MockTemplateService::new());
    let fields = ContactFormFields {
        honeypot: "x".into(),
        ..Default::default()
    };

    // Act
    let result = sut.relay(fields).await;

    // Assert
    assert_eq!(
        result.unwrap(),
        RelayOutcome::Dropped(SpamReason::Honeypot)
    );
}

#[tokio::test]
async fn missing_required_fields() {
    for field in ContactField::REQUIRED {
        // Arrange
        let time = MockTimeService::new().with_now(*NOW);
        let sut = sut(time, MockEmailService::new(), MockTemplateService::new());
        let mut fields = JANE_DOE.clone();
        *fields.get_mut(field) = "   ".into();

        // Act
        let result = sut.relay(fields).await;

        // Assert
        assert_matches!(result, Err(ContactRelayError::MissingRequiredFields));
    }
}

#[tokio::test]
async fn invalid_email() {
    for email in ["foo", "foo@bar", "@bar.com"] {
        // Arrange
        let time = MockTimeService::new().with_now(*NOW);
        let sut = sut(time, MockEmailService::new(), MockTemplateService::new());
        let fields = ContactFormFields {
            email: email.into(),
            ..JANE_DOE.clone()
        };

        // Act
        let result = sut.relay(fields).await;

        // Assert
        assert_matches!(result, Err(ContactRelayError::InvalidEmail));
    }
}

#[tokio::test]
async fn invalid_phone() {
    // Arrange
    let time = MockTimeService::new().with_now(*NOW);
    let sut = sut(time, MockEmailService::new(), MockTemplateService::new());
    let fields = ContactFormFields {
        phone: "555-CALL".into(),
        ..JANE_DOE.clone()
    };

    // Act
    let result = sut.relay(fields).await;

    // Assert
    assert_matches!(
        result,
        Err(ContactRelayError::Invalid(errors))
            if errors.get(ContactField::Phone) == Some(FieldError::InvalidPhone)
    );
}

#[tokio::test]
async fn send_rejected() {
    // Arrange
    let time = MockTimeService::new().with_now(*NOW);
    let template = template_for(&JANE_DOE);
    let email = MockEmailService::new().with_send(
        expected_email("New Lead: General Inquiry — Jane Doe"),
        false,
    );

    let sut = sut(time, email, template);

    // Act
    let result = sut.relay(JANE_DOE.clone()).await;

    // Assert
    assert_matches!(result, Err(ContactRelayError::Send));
}

#[tokio::test]
async fn transport_error() {
    // Arrange
    let time = MockTimeService::new().with_now(*NOW);
    let template = template_for(&JANE_DOE);
    let email = MockEmailService::new().with_send_error(
        expected_email("New Lead: General Inquiry — Jane Doe"),
        "535 Authentication failed: bad api key",
    );

    let sut = sut(time, email, template);

    // Act
    let result = sut.relay(JANE_DOE.clone()).await;

    // Assert
    assert_matches!(result, Err(ContactRelayError::Other(_)));
}

#[test]
fn arizona_time() {
    assert_eq!(format_arizona_time(*NOW), NOW_ARIZONA);
    assert_eq!(
        format_arizona_time("2026-07-01T06:05:09Z".parse().unwrap()),
        "6/30/2026, 11:05:09 PM MST"
    );
}
