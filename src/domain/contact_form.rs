use std::fmt::Formatter;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};

/// A contact-form submission as posted by the website.
///
/// Decoding is lenient the same way the website's existing backends are:
/// * keys match regardless of case (`Email`, `EMAIL`, ...);
/// * a repeated key overwrites the earlier value;
/// * a missing key or an explicit `null` leaves the field empty (a `null`
///   does not clear a value set earlier in the same object);
/// * a top-level `null` is an empty form;
/// * unknown keys are ignored, non-string values are rejected.
///
/// The values are forwarded as typed, nothing is validated here.
#[derive(Debug, Default, PartialEq)]
pub struct ContactForm {
    pub email: String,
    pub phone: String,
    pub message: String
}

impl ContactForm {
    pub const SUBJECT: &'static str = "New Contact Form Submission";

    pub fn parse(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Plain-text body of the email sent to the recipient
    pub fn text_part(&self) -> String {
        format!(
            "Email: {}\nPhone: {}\nMessage: {}",
            self.email, self.phone, self.message
        )
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        if key_matches(key, "email") {
            Some(&mut self.email)
        } else if key_matches(key, "phone") {
            Some(&mut self.phone)
        } else if key_matches(key, "message") {
            Some(&mut self.message)
        } else {
            None
        }
    }
}

/// Case-insensitive key comparison. `ſ` (long s) folds to `s`.
fn key_matches(key: &str, field: &str) -> bool {
    let fold = |c: char| if c == 'ſ' { 's' } else { c.to_ascii_lowercase() };
    key.chars().map(fold).eq(field.chars())
}

impl<'de> serde::Deserialize<'de> for ContactForm {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>
    {
        deserializer.deserialize_any(ContactFormVisitor)
    }
}

struct ContactFormVisitor;

impl<'de> Visitor<'de> for ContactFormVisitor {
    type Value = ContactForm;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("a contact form object")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ContactForm::default())
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>
    {
        let mut form = ContactForm::default();
        while let Some(key) = map.next_key::<String>()? {
            match form.field_mut(&key) {
                Some(field) => {
                    if let Some(value) = map.next_value::<Option<String>>()? {
                        *field = value;
                    }
                },
                None => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(form)
    }
}
