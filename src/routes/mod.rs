mod health_check;
mod send_mail;

pub use health_check::*;
pub use send_mail::*;
