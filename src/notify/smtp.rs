//! SMTP delivery over STARTTLS

use crate::config::EmailConfig;
use crate::notify::{MailMessage, MailTransport, NotifyError};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

/// Sends mail through the relay configured in `[notification.email]`
///
/// The connection is upgraded with STARTTLS and authenticated with the
/// configured username and password when a username is set.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    /// Builds a mailer for the configured relay; no connection is made yet
    pub fn from_config(email: &EmailConfig) -> Result<Self, NotifyError> {
        let mut builder = SmtpTransport::starttls_relay(&email.smtp_server)
            .map_err(|e| NotifyError::Transport(e.to_string()))?
            .port(email.smtp_port);

        if !email.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                email.username.clone(),
                email.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

/// Converts a [`MailMessage`] into a plain-text UTF-8 message
fn build_message(message: &MailMessage) -> Result<Message, NotifyError> {
    if message.to.is_empty() {
        return Err(NotifyError::NoRecipients);
    }

    let from: Mailbox = message
        .from
        .parse()
        .map_err(|e| NotifyError::Address(format!("{}: {}", message.from, e)))?;

    let mut builder = Message::builder()
        .from(from)
        .subject(message.subject.as_str())
        .header(ContentType::TEXT_PLAIN);
    for recipient in &message.to {
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| NotifyError::Address(format!("{}: {}", recipient, e)))?;
        builder = builder.to(to);
    }

    builder
        .body(message.body.clone())
        .map_err(|e| NotifyError::Transport(e.to_string()))
}

impl MailTransport for SmtpMailer {
    fn send(&self, message: &MailMessage) -> Result<(), NotifyError> {
        let email = build_message(message)?;
        self.transport
            .send(&email)
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        Ok(())
    }
}
