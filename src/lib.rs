pub mod configuration;
pub mod contact_mailer;
pub mod domain;
pub mod email_client;
pub mod email_request;
pub mod routes;
pub mod serverless;
pub mod startup;
pub mod telemetry;
