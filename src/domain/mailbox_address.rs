use validator::validate_email;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MailboxAddress(String);


impl MailboxAddress {
    pub fn parse(s: String) -> Result<Self, String> {
        if s.trim().is_empty() {
            return Err("an email address is required".to_string());
        }
        if validate_email(&s) {
            Ok(Self(s))
        } else {
            Err(format!("{} is not a valid email address.", s))
        }
    }
}


impl AsRef<str> for MailboxAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MailboxAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
