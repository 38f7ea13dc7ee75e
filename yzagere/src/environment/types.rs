use yzagere_core_contact_impl::ContactServiceImpl;
use yzagere_core_health_impl::HealthServiceImpl;
use yzagere_email_impl::EmailServiceImpl;
use yzagere_shared_impl::time::TimeServiceImpl;
use yzagere_templates_impl::TemplateServiceImpl;

pub type RestServer = yzagere_api_rest::RestServer<Health, Contact>;

// Core
pub type Contact = ContactServiceImpl<Time, Email, Template>;
pub type Health = HealthServiceImpl<Time, Email>;

// Shared
pub type Email = EmailServiceImpl;
pub type Template = TemplateServiceImpl;
pub type Time = TimeServiceImpl;
