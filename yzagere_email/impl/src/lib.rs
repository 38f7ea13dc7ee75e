use std::time::Duration;

use anyhow::ensure;
use lettre::{
    message::{header::ContentType, MessageBuilder, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;
use yzagere_email_contracts::{Email, EmailBody, EmailService};
use yzagere_models::email_address::EmailAddressWithName;
use yzagere_utils::Apply;

#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    from: EmailAddressWithName,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

#[derive(Debug, Clone)]
pub struct SmtpTransportConfig {
    pub host: String,
    pub port: u16,
    pub tls: SmtpTls,
    pub username: String,
    pub password: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpTls {
    /// Plain connection upgraded with `STARTTLS`.
    StartTls,
    /// Implicit TLS from the first byte.
    Wrapper,
    /// No encryption at all. Only for local test servers.
    None,
}

impl EmailServiceImpl {
    pub fn new(config: &SmtpTransportConfig, from: EmailAddressWithName) -> anyhow::Result<Self> {
        let builder = match config.tls {
            SmtpTls::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?,
            SmtpTls::Wrapper => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?,
            SmtpTls::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
        };

        let transport = builder
            .port(config.port)
            .timeout(Some(config.timeout))
            .apply_map(config.password.clone(), |builder, password| {
                builder.credentials(Credentials::new(config.username.clone(), password))
            })
            .build();

        Ok(Self { from, transport })
    }
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> anyhow::Result<bool> {
        let message = build_message(&self.from, email)?;
        let response = self.transport.send(message).await?;
        debug!(code = %response.code(), "smtp server answered");
        Ok(response.is_positive())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        ensure!(
            self.transport.test_connection().await?,
            "Failed to connect to smtp server"
        );
        Ok(())
    }
}

fn build_message(from: &EmailAddressWithName, email: Email) -> anyhow::Result<Message> {
    let builder = Message::builder()
        .from(from.0.clone())
        .to(email.recipient.0)
        .apply_map(email.reply_to.map(|x| x.0), MessageBuilder::reply_to)
        .subject(email.subject);

    let message = match email.body {
        EmailBody::Text(text) => builder.header(ContentType::TEXT_PLAIN).body(text)?,
        EmailBody::Html(html) => builder.header(ContentType::TEXT_HTML).body(html)?,
        EmailBody::Alternative { text, html } => {
            builder.multipart(MultiPart::alternative_plain_html(text, html))?
        }
    };

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from() -> EmailAddressWithName {
        "\"Yzagere Enterprises\" <yzagere.enterprises@gmail.com>"
            .parse()
            .unwrap()
    }

    fn formatted(message: Message) -> String {
        String::from_utf8(message.formatted()).unwrap()
    }

    #[test]
    fn alternative_with_reply_to() {
        // Arrange
        let email = Email {
            recipient: "leads@example.com".parse().unwrap(),
            subject: "New Lead: Landscaping".into(),
            body: EmailBody::Alternative {
                text: "plain body".into(),
                html: "<p>html body</p>".into(),
            },
            reply_to: Some("jane@example.com".parse().unwrap()),
        };

        // Act
        let message = formatted(build_message(&from(), email).unwrap());

        // Assert
        assert!(message.contains("Reply-To: jane@example.com"));
        assert!(message.contains("To: leads@example.com"));
        assert!(message.contains("Subject: New Lead: Landscaping"));
        assert!(message.contains("multipart/alternative"));
        assert!(message.contains("plain body"));
        assert!(message.contains("<p>html body</p>"));
    }

    #[test]
    fn text_without_reply_to() {
        // Arrange
        let email = Email {
            recipient: "leads@example.com".parse().unwrap(),
            subject: "Email Deliverability Test".into(),
            body: EmailBody::Text("It works".into()),
            reply_to: None,
        };

        // Act
        let message = formatted(build_message(&from(), email).unwrap());

        // Assert
        assert!(!message.contains("Reply-To"));
        assert!(message.contains("Content-Type: text/plain"));
    }

    #[tokio::test]
    async fn new_with_credentials() {
        let config = SmtpTransportConfig {
            host: "smtp.sendgrid.net".into(),
            port: 587,
            tls: SmtpTls::StartTls,
            username: "apikey".into(),
            password: Some("secret".into()),
            timeout: Duration::from_secs(10),
        };

        EmailServiceImpl::new(&config, from()).unwrap();
    }
}
