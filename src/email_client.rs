use std::time::Duration;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};

use crate::email_request::{Mailbox, SendEmailRequest, SendEmailResponse};

/// Mailjet API key pair, sent as HTTP basic auth on every call
#[derive(Clone)]
pub struct MailjetCredentials {
    api_key: Secret<String>,
    secret_key: Secret<String>
}

impl MailjetCredentials {
    pub fn new(api_key: Secret<String>, secret_key: Secret<String>) -> Self {
        Self { api_key, secret_key }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum EmailClientError {
    #[error("error sending request to Mailjet: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mailjet error: {body}")]
    Rejected {
        status: StatusCode,
        body: String
    }
}

pub struct EmailClient {
    http_client: Client,
    base_url: String,
    credentials: MailjetCredentials,
    sender: Mailbox,
    recipient: Mailbox
}

impl EmailClient {
    pub fn new(
        base_url: String,
        credentials: MailjetCredentials,
        sender: Mailbox,
        recipient: Mailbox,
        timeout: Duration
    ) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build the Mailjet HTTP client");

        Self {
            http_client,
            base_url,
            credentials,
            sender,
            recipient
        }
    }

    pub fn recipient(&self) -> &Mailbox {
        &self.recipient
    }

    /// Send one plain-text message from the configured sender to the
    /// configured recipient.
    #[tracing::instrument(
        name = "Send email through Mailjet",
        skip(self, text_content),
        fields(recipient = %self.recipient.email())
    )]
    pub async fn send_email(
        &self,
        subject: &str,
        text_content: &str
    ) -> Result<SendEmailResponse, EmailClientError> {
        let url = format!("{}/v3.1/send", self.base_url.trim_end_matches('/'));

        let request_body = SendEmailRequest::single(
            &self.sender,
            &self.recipient,
            subject,
            text_content
        );

        let response = self.http_client
            .post(&url)
            .basic_auth(
                self.credentials.api_key.expose_secret(),
                Some(self.credentials.secret_key.expose_secret())
            )
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // An unreadable body still leaves the status worth reporting
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable response body: {}>", e));
            tracing::error!(%status, mailjet.body = %body, "Mailjet rejected the message");
            return Err(EmailClientError::Rejected { status, body });
        }

        // The message is already accepted at this point, the receipt is
        // only logged
        let receipt = receipt_from_body(response.text().await);
        for message in &receipt.messages {
            for delivered in &message.to {
                tracing::info!(
                    mailjet.status = %message.status,
                    mailjet.message_id = delivered.message_id,
                    mailjet.message_uuid = %delivered.message_uuid,
                    "Mailjet accepted the message"
                );
            }
        }

        Ok(receipt)
    }
}

fn receipt_from_body<E: std::fmt::Debug>(body: Result<String, E>) -> SendEmailResponse {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(
                error.cause_chain = ?e,
                "Mailjet accepted the message but its response could not be read"
            );
            return SendEmailResponse::default();
        }
    };
    match serde_json::from_str::<SendEmailResponse>(&body) {
        Ok(receipt) => receipt,
        Err(e) => {
            tracing::warn!(
                error.cause_chain = ?e,
                "Mailjet accepted the message but its response could not be parsed"
            );
            SendEmailResponse::default()
        }
    }
}
