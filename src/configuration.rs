use std::time::Duration;
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;
use crate::domain::mailbox_address::MailboxAddress;
use crate::email_client::{EmailClient, MailjetCredentials};
use crate::email_request::Mailbox;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub email_client: EmailClientSettings
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    /// Exact value the `Origin` header of a submission has to carry
    pub allowed_origin: String
}

/// Mailjet account and the two fixed mailboxes of every contact email.
///
/// The API key and secret are wrapped in [`Secret`] so they never end up in
/// `Debug` output or logs; access goes through [`ExposeSecret`].
#[derive(serde::Deserialize, Clone)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    pub sender_email: String,
    pub sender_name: String,
    pub recipient_email: String,
    pub recipient_name: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Required email settings are blank: {}", .0.join(", "))]
    Blank(Vec<&'static str>),
    #[error("`{field}` is not usable: {reason}")]
    InvalidAddress {
        field: &'static str,
        reason: String
    }
}

impl EmailClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn sender(&self) -> Result<Mailbox, ConfigurationError> {
        mailbox("sender_email", &self.sender_email, &self.sender_name)
    }

    pub fn recipient(&self) -> Result<Mailbox, ConfigurationError> {
        mailbox("recipient_email", &self.recipient_email, &self.recipient_name)
    }

    /// Build the Mailjet client, reporting every blank required value at once.
    pub fn client(&self) -> Result<EmailClient, ConfigurationError> {
        let required = [
            ("api_key", self.api_key.expose_secret().as_str()),
            ("secret_key", self.secret_key.expose_secret().as_str()),
            ("sender_email", self.sender_email.as_str()),
            ("recipient_email", self.recipient_email.as_str()),
        ];
        let blank: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !blank.is_empty() {
            return Err(ConfigurationError::Blank(blank));
        }

        let credentials = MailjetCredentials::new(
            self.api_key.clone(),
            self.secret_key.clone()
        );

        Ok(EmailClient::new(
            self.base_url.clone(),
            credentials,
            self.sender()?,
            self.recipient()?,
            self.timeout()
        ))
    }
}

fn mailbox(field: &'static str, email: &str, name: &str) -> Result<Mailbox, ConfigurationError> {
    let email = MailboxAddress::parse(email.to_owned())
        .map_err(|reason| ConfigurationError::InvalidAddress { field, reason })?;
    Ok(Mailbox::new(email, name.to_owned()))
}

/// The possible runtime environment for the application.
#[derive(Debug)]
pub enum Environment {
    Local,
    Production
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production"
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            ))
        }
    }
}

/// Flat variable names used by existing deployments of the contact form.
/// A blank value leaves the setting to the earlier layers.
const PLAIN_ENV_OVERRIDES: [(&str, &str); 7] = [
    ("ALLOWED_ORIGIN", "application.allowed_origin"),
    ("MAILJET_API_KEY", "email_client.api_key"),
    ("MAILJET_SECRET_KEY", "email_client.secret_key"),
    ("SENDER_EMAIL", "email_client.sender_email"),
    ("SENDER_NAME", "email_client.sender_name"),
    ("RECIPIENT_EMAIL", "email_client.recipient_email"),
    ("RECIPIENT_NAME", "email_client.recipient_name"),
];

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let mut settings = config::Config::default();

    settings
        .set_default("application.host", "127.0.0.1")?
        .set_default("application.port", 8000_i64)?
        .set_default("application.allowed_origin", "https://yourwebsite.com")?
        .set_default("email_client.base_url", "https://api.mailjet.com")?
        .set_default("email_client.api_key", "")?
        .set_default("email_client.secret_key", "")?
        .set_default("email_client.sender_email", "")?
        .set_default("email_client.sender_name", "Your Business Name")?
        .set_default("email_client.recipient_email", "")?
        .set_default("email_client.recipient_name", "Recipient Name")?
        .set_default("email_client.timeout_milliseconds", 10000_i64)?;

    // Files are optional so the function binary can run from the
    // environment alone.
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    let configuration_directory = base_path.join("configuration");
    settings.merge(
        config::File::from(configuration_directory.join("base")).required(false)
    )?;

    // Detect the running environment, default to `local` if unspecified
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    settings.merge(
        config::File::from(configuration_directory.join(environment.as_str())).required(false)
    )?;

    // e.g. `APP_APPLICATION__PORT=5001` sets `Settings.application.port`
    settings.merge(config::Environment::with_prefix("app").separator("__"))?;

    for (variable, key) in PLAIN_ENV_OVERRIDES {
        if let Ok(value) = std::env::var(variable) {
            if !value.trim().is_empty() {
                settings.set(key, value)?;
            }
        }
    }

    settings.try_into()
}
