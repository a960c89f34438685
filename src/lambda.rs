use anyhow::Context;
use contact_form_mailer::configuration::get_configuration;
use contact_form_mailer::serverless;
use contact_form_mailer::startup::build_contact_mailer;
use contact_form_mailer::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {

    let subscriber = get_subscriber("contact_form_mailer_lambda".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().context("Failed to read configuration")?;

    // Built once per cold start, reused by every invocation
    let mailer = build_contact_mailer(&configuration);

    serverless::run(mailer)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}
