use std::fmt::{Debug, Formatter};
use crate::configuration::ConfigurationError;
use crate::domain::contact_form::ContactForm;
use crate::email_client::{EmailClient, EmailClientError};

pub const SUCCESS_MESSAGE: &str = "Email sent successfully";

/// Everything that can stop a submission, in the order the checks run.
/// `Display` is the text returned to the caller.
#[derive(thiserror::Error)]
pub enum SendMailError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Unauthorized origin")]
    UnauthorizedOrigin,
    #[error("Invalid JSON data")]
    InvalidJson(#[source] serde_json::Error),
    #[error("Server configuration error")]
    ServerConfiguration(#[source] ConfigurationError),
    #[error("Error sending email: {0}")]
    DeliveryFailed(#[source] EmailClientError)
}

impl Debug for SendMailError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl SendMailError {
    pub fn http_status(&self) -> u16 {
        match self {
            SendMailError::MethodNotAllowed => 405,
            SendMailError::UnauthorizedOrigin => 401,
            SendMailError::InvalidJson(_) => 400,
            SendMailError::ServerConfiguration(_) |
            SendMailError::DeliveryFailed(_) => 500
        }
    }
}

/// Receives contact-form submissions and forwards them to the configured
/// recipient. Shared by the HTTP server and the serverless function.
pub struct ContactMailer {
    allowed_origin: String,
    // A broken configuration is reported per submission instead of
    // preventing startup.
    email_client: Result<EmailClient, ConfigurationError>
}

impl ContactMailer {
    pub fn new(
        allowed_origin: String,
        email_client: Result<EmailClient, ConfigurationError>
    ) -> Self {
        Self { allowed_origin, email_client }
    }

    pub fn allowed_origin(&self) -> &str {
        &self.allowed_origin
    }

    #[tracing::instrument(
        name = "Handle a contact form submission",
        skip(self, body),
        fields(contact_email = tracing::field::Empty)
    )]
    pub async fn handle(
        &self,
        method: &str,
        origin: Option<&str>,
        body: &[u8]
    ) -> Result<(), SendMailError> {
        if method != "POST" {
            return Err(SendMailError::MethodNotAllowed);
        }

        if origin != Some(self.allowed_origin.as_str()) {
            tracing::warn!(expected = %self.allowed_origin, "Rejecting submission from an unknown origin");
            return Err(SendMailError::UnauthorizedOrigin);
        }

        let form = ContactForm::parse(body)
            .map_err(SendMailError::InvalidJson)?;
        tracing::Span::current().record(
            "contact_email",
            &tracing::field::display(&form.email)
        );

        let email_client = self.email_client
            .as_ref()
            .map_err(|e| SendMailError::ServerConfiguration(e.clone()))?;

        email_client
            .send_email(ContactForm::SUBJECT, &form.text_part())
            .await
            .map_err(SendMailError::DeliveryFailed)?;

        tracing::info!("Contact form submission delivered");
        Ok(())
    }
}

/// Print an error followed by every error in its `source` chain
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut Formatter<'_>
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
