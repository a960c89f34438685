use std::net::TcpListener;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use crate::configuration::Settings;
use crate::contact_mailer::ContactMailer;
use crate::routes::{health_check, send_mail};

pub struct Application {
    port: u16,
    server: Server
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, std::io::Error> {
        let mailer = build_contact_mailer(&configuration);

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        // Port 0 asks the OS for a random one, report what we actually got
        let port = listener.local_addr()?.port();
        let server = run(listener, mailer)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Only returns when the application is stopped
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

/// Build the shared submission handler. A configuration problem is logged
/// here once and then answered on every submission.
pub fn build_contact_mailer(configuration: &Settings) -> ContactMailer {
    let email_client = configuration.email_client.client();
    if let Err(e) = &email_client {
        tracing::error!(
            error.cause_chain = ?e,
            "Email client is not configured, submissions will fail with a server configuration error"
        );
    }
    ContactMailer::new(
        configuration.application.allowed_origin.clone(),
        email_client
    )
}

pub fn run(listener: TcpListener, mailer: ContactMailer) -> Result<Server, std::io::Error> {

    // web::Data wraps the handler in an Arc, shared by every worker
    let mailer = web::Data::new(mailer);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/send-mail", web::route().to(send_mail))
            .app_data(mailer.clone())
    })
        .listen(listener)?
        .run();
    // No .await here
    Ok(server)
}
