use crate::domain::mailbox_address::MailboxAddress;

/// Address plus display name, as Mailjet expects it in `From` and `To`
#[derive(serde::Serialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct Mailbox {
    email: MailboxAddress,
    name: String
}

impl Mailbox {
    pub fn new(email: MailboxAddress, name: String) -> Self {
        Self { email, name }
    }

    pub fn email(&self) -> &MailboxAddress {
        &self.email
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Message<'a> {
    pub from: &'a Mailbox,
    pub to: Vec<&'a Mailbox>,
    pub subject: &'a str,
    pub text_part: &'a str
}

/// Body of `POST /v3.1/send`
#[derive(serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendEmailRequest<'a> {
    pub messages: Vec<Message<'a>>
}

impl<'a> SendEmailRequest<'a> {
    /// A batch of exactly one message to one recipient.
    pub fn single(
        from: &'a Mailbox,
        to: &'a Mailbox,
        subject: &'a str,
        text_part: &'a str
    ) -> Self {
        Self {
            messages: vec![Message {
                from,
                to: vec![to],
                subject,
                text_part
            }]
        }
    }
}

// Mailjet answers a successful send with one result per message.
// Only used for logging, so every field is optional.

#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct SendEmailResponse {
    #[serde(default)]
    pub messages: Vec<MessageResult>
}

#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct MessageResult {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub to: Vec<DeliveredTo>
}

#[derive(serde::Deserialize, Debug, Default)]
pub struct DeliveredTo {
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(rename = "MessageUUID", default)]
    pub message_uuid: String,
    #[serde(rename = "MessageID", default)]
    pub message_id: u64,
    #[serde(rename = "MessageHref", default)]
    pub message_href: String
}
