pub mod contact_form;
pub mod mailbox_address;
