//! Email notification that a new draft is ready.

mod config;
mod email;

pub use config::MailConfig;
pub use email::EmailSender;
