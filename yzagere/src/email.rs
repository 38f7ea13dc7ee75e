use anyhow::Context;
use yzagere_config::{EmailConfig, SmtpTls};
use yzagere_email_impl::{EmailServiceImpl, SmtpTransportConfig};

/// Connect to the SMTP server
pub fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    let smtp = SmtpTransportConfig {
        host: config.smtp.host.clone(),
        port: config.smtp.port,
        tls: match config.smtp.tls {
            SmtpTls::Starttls => yzagere_email_impl::SmtpTls::StartTls,
            SmtpTls::Tls => yzagere_email_impl::SmtpTls::Wrapper,
            SmtpTls::None => yzagere_email_impl::SmtpTls::None,
        },
        username: config.smtp.username.clone(),
        password: config.smtp.password.clone(),
        timeout: config.timeout.into(),
    };

    EmailServiceImpl::new(&smtp, config.from.clone()).context("Failed to connect to SMTP server")
}
