use tracing::info;
use yzagere_config::Config;
use yzagere_email_contracts::EmailService;
use yzagere_templates_impl::TemplateServiceImpl;

use crate::{email, environment};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Connecting to smtp server");
    let email = email::connect(&config.email)?;
    email.ping().await?;

    let template = TemplateServiceImpl::new()?;

    let server = environment::rest_server(&config, email, template);
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}
