use std::{collections::HashMap, net::IpAddr, path::Path};

use anyhow::Context;
use config::{Environment, File, FileFormat};
use serde::Deserialize;
use url::Url;
use yzagere_models::email_address::EmailAddressWithName;

pub use crate::duration::Duration;

mod duration;

/// The defaults, always loaded before any other source.
pub const DEFAULT_CONFIG: &str = include_str!("../../config.toml");

/// Colon separated list of config files loaded on top of the defaults.
pub const CONFIG_PATHS_ENV: &str = "YZAGERE_CONFIG";

/// Environment variables of the previous deployment and the config keys they
/// override.
const LEGACY_ENV: [(&str, &str); 6] = [
    ("SMTP_HOST", "email.smtp.host"),
    ("SMTP_PORT", "email.smtp.port"),
    ("SMTP_USER", "email.smtp.username"),
    ("SMTP_PASS", "email.smtp.password"),
    ("MAIL_FROM", "email.from"),
    ("MAIL_TO", "contact.recipient"),
];

/// Loads the defaults and the files listed in `YZAGERE_CONFIG`, then applies
/// overrides from the process environment.
pub fn load() -> anyhow::Result<Config> {
    let env = std::env::vars().collect::<HashMap<_, _>>();
    let paths = env
        .get(CONFIG_PATHS_ENV)
        .map(|paths| {
            paths
                .split(':')
                .filter(|x| !x.is_empty())
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    load_with_env(&paths, env)
}

fn load_with_env(
    paths: &[impl AsRef<Path>],
    env: HashMap<String, String>,
) -> anyhow::Result<Config> {
    let defaults = File::from_str(DEFAULT_CONFIG, FileFormat::Toml);
    let builder = paths
        .iter()
        .try_fold(config::Config::builder().add_source(defaults), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?
        .add_source(
            Environment::with_prefix("YZAGERE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(Some(env.clone().into_iter().collect())),
        );

    LEGACY_ENV
        .iter()
        .try_fold(builder, |builder, &(var, key)| {
            let value = env.get(var).filter(|x| !x.is_empty()).cloned();
            builder.set_override_option(key, value)
        })?
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
    pub health: HealthConfig,
    pub widget: WidgetConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub smtp: SmtpConfig,
    pub from: EmailAddressWithName,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub tls: SmtpTls,
    pub username: String,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpTls {
    Starttls,
    Tls,
    None,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub recipient: EmailAddressWithName,
    pub business_name: String,
    pub min_dwell_time: Duration,
    pub fallback_phone: String,
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Deserialize)]
pub struct WidgetConfig {
    pub endpoint: Url,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const NO_PATHS: &[&str] = &[];

    fn env(vars: &[(&str, &str)]) -> HashMap<String, String> {
        vars.iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect()
    }

    #[test]
    fn load_default_config() {
        let config = load_with_env(NO_PATHS, HashMap::new()).unwrap();

        assert_eq!(config.email.smtp.host, "smtp.sendgrid.net");
        assert_eq!(config.email.smtp.port, 587);
        assert_eq!(config.email.smtp.tls, SmtpTls::Starttls);
        assert_eq!(config.email.smtp.username, "apikey");
        assert_eq!(config.email.smtp.password, None);
        assert_eq!(config.email.from.name(), Some("Yzagere Enterprises"));
        assert_eq!(config.email.from.email(), "yzagere.enterprises@gmail.com");
        assert_eq!(config.contact.recipient.email(), "yzagere.enterprises@gmail.com");
        assert_eq!(config.contact.min_dwell_time.as_millis(), 4000);
        assert_eq!(config.contact.fallback_phone, "(623) 931-0846");
    }

    #[test]
    fn legacy_env_overrides() {
        // Arrange
        let env = env(&[
            ("SMTP_HOST", "localhost"),
            ("SMTP_PORT", "2525"),
            ("SMTP_USER", "leads"),
            ("SMTP_PASS", "hunter2"),
            ("MAIL_FROM", "website@example.com"),
            ("MAIL_TO", "Leads <leads@example.com>"),
        ]);

        // Act
        let config = load_with_env(NO_PATHS, env).unwrap();

        // Assert
        assert_eq!(config.email.smtp.host, "localhost");
        assert_eq!(config.email.smtp.port, 2525);
        assert_eq!(config.email.smtp.username, "leads");
        assert_eq!(config.email.smtp.password.as_deref(), Some("hunter2"));
        assert_eq!(config.email.from.email(), "website@example.com");
        assert_eq!(config.contact.recipient.name(), Some("Leads"));
        assert_eq!(config.contact.recipient.email(), "leads@example.com");
    }

    #[test]
    fn empty_legacy_env_is_ignored() {
        let env = env(&[("SMTP_PASS", "")]);

        let config = load_with_env(NO_PATHS, env).unwrap();

        assert_eq!(config.email.smtp.password, None);
    }

    #[test]
    fn prefixed_env_overrides() {
        // Arrange
        let env = env(&[
            ("YZAGERE__HTTP__PORT", "9000"),
            ("YZAGERE__CONTACT__MIN_DWELL_TIME", "2500ms"),
        ]);

        // Act
        let config = load_with_env(NO_PATHS, env).unwrap();

        // Assert
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.contact.min_dwell_time.as_millis(), 2500);
    }

    #[test]
    fn later_files_override_earlier() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("yzagere-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let first = dir.join("first.toml");
        let second = dir.join("second.toml");
        std::fs::write(&first, "[http]\nport = 1234\n[contact]\nbusiness_name = \"A\"\n").unwrap();
        std::fs::write(&second, "[http]\nport = 4321\n").unwrap();

        // Act
        let config = load_with_env(&[&first, &second], HashMap::new()).unwrap();

        // Assert
        assert_eq!(config.http.port, 4321);
        assert_eq!(config.contact.business_name, "A");
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_file() {
        let result = load_with_env(&["/nonexistent/config.toml"], HashMap::new());

        assert!(result.is_err());
    }
}
