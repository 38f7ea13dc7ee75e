use std::sync::Arc;

use yzagere_api_rest::RestServerConfig;
use yzagere_config::Config;
use yzagere_core_contact_impl::ContactServiceConfig;
use yzagere_core_health_impl::HealthServiceConfig;

use self::types::{Contact, Email, Health, RestServer, Template, Time};

pub mod types;

/// Wires the services configured in `config` into a [`RestServer`].
pub fn rest_server(config: &Config, email: Email, template: Template) -> RestServer {
    let time = Time::default();

    let health = Health::new(
        time,
        email.clone(),
        HealthServiceConfig {
            cache_ttl: config.health.cache_ttl.into(),
        },
    );

    let contact = Contact::new(
        time,
        email,
        template,
        ContactServiceConfig {
            recipient: Arc::new(config.contact.recipient.clone()),
            business_name: config.contact.business_name.as_str().into(),
            min_dwell_time: config.contact.min_dwell_time.into(),
        },
    );

    RestServer::new(
        health,
        contact,
        RestServerConfig {
            fallback_phone: config.contact.fallback_phone.as_str().into(),
        },
    )
}
