use anyhow::Context;
use contact_form_mailer::configuration::get_configuration;
use contact_form_mailer::startup::Application;
use contact_form_mailer::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {

    let subscriber = get_subscriber("contact_form_mailer".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().context("Failed to read configuration")?;

    let application = Application::build(configuration)
        .await
        .context("Failed to bind the HTTP listener")?;
    tracing::info!(port = application.port(), "Contact form mailer is listening");

    application.run_until_stopped().await?;
    Ok(())
}
