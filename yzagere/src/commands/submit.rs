use anyhow::{bail, Context};
use chrono::TimeDelta;
use clap::Args;
use url::Url;
use yzagere_config::Config;
use yzagere_models::contact::{ContactField, FieldErrors};
use yzagere_shared_contracts::time::TimeService;
use yzagere_shared_impl::time::TimeServiceImpl;
use yzagere_widget::{
    api::{HttpClient, HttpContactApi},
    form::{ContactForm, SubmitStatus},
};

/// Fills in the contact form like a customer would and submits it.
#[derive(Debug, Args)]
pub struct SubmitCommand {
    #[arg(long, default_value = "Test Customer")]
    name: String,
    #[arg(long, default_value = "test@example.com")]
    email: String,
    #[arg(long, default_value = "(623) 555-0123")]
    phone: String,
    #[arg(long, default_value = "Sprinkler/Irrigation Repair")]
    service: String,
    #[arg(
        long,
        default_value = "My sprinkler system is leaking and needs repair. Can you come take a look?"
    )]
    message: String,
    /// Fill in the hidden honeypot field
    #[arg(long)]
    honeypot: Option<String>,
    /// Seconds between rendering the form and submitting it
    #[arg(long, default_value_t = 10)]
    dwell: i64,
    /// Overrides `widget.endpoint`
    #[arg(long)]
    endpoint: Option<Url>,
    /// Only run the checks the relay would perform, without sending anything
    #[arg(long)]
    dry_run: bool,
}

impl SubmitCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        let time = TimeServiceImpl;

        let dwell = TimeDelta::try_seconds(self.dwell).context("Invalid dwell time")?;
        let mut form = ContactForm::new(time.now() - dwell);
        form.set_field(ContactField::Name, self.name);
        form.set_field(ContactField::Email, self.email);
        form.set_field(ContactField::Phone, self.phone);
        form.set_field(ContactField::Message, self.message);
        form.set_service(self.service);
        if let Some(honeypot) = self.honeypot {
            form.set_honeypot(honeypot);
        }

        if self.dry_run {
            return dry_run(&form, &config, &time);
        }

        let endpoint = self.endpoint.unwrap_or(config.widget.endpoint);
        let api = HttpContactApi::new(HttpClient::new()?, endpoint);

        if !yzagere_widget::submit(&mut form, &api, &time).await {
            print_errors(form.errors());
            bail!("The form has validation errors");
        }

        match form.status() {
            SubmitStatus::Success => {
                println!("Thank you! Your message has been sent.");
                Ok(())
            }
            SubmitStatus::Idle => {
                print_errors(form.errors());
                bail!("The relay rejected the form");
            }
            SubmitStatus::Submitting | SubmitStatus::Error => bail!(form
                .error_banner(&config.contact.fallback_phone)
                .unwrap_or_default()),
        }
    }
}

fn dry_run(form: &ContactForm, config: &Config, time: &impl TimeService) -> anyhow::Result<()> {
    let fields = form.fields();

    if let Some(reason) = fields.spam_check(time.now(), config.contact.min_dwell_time.into()) {
        println!("Would be dropped as spam: {reason}");
        return Ok(());
    }

    let submission = match fields.validate() {
        Ok(submission) => submission,
        Err(errors) => {
            print_errors(&errors);
            bail!("The form would be rejected");
        }
    };

    println!("To: {}", config.contact.recipient.0);
    println!(
        "Subject: New Lead: {} — {}",
        *submission.service, *submission.name
    );
    println!("Reply-To: {}", *submission.email);
    Ok(())
}

fn print_errors(errors: &FieldErrors) {
    for (field, error) in errors.iter() {
        eprintln!("{field:?}: {error}");
    }
}
