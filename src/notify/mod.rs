//! Change notifications
//!
//! After a check run, every `Changed` result is collected into a plain-text
//! digest. The digest is always logged; when email is enabled it is also
//! handed to a [`MailTransport`] as a [`MailMessage`].
//!
//! Delivery failures are logged and never abort a run.

mod smtp;

pub use smtp::SmtpMailer;

use crate::config::EmailConfig;
use crate::state::CheckResult;
use thiserror::Error;

/// Subject line of the digest mail
pub const DIGEST_SUBJECT: &str = "Regulation update notification";

const DIGEST_HEADER: &str = "The following regulations, schemes or guidelines were updated:";

/// Errors raised by a mail transport
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("No recipients configured")]
    NoRecipients,

    #[error("Invalid mail address {0}")]
    Address(String),

    #[error("Mail transport failed: {0}")]
    Transport(String),
}

/// An outgoing plain-text mail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    /// Addresses a digest using the configured sender and recipients
    pub fn digest(email: &EmailConfig, body: String) -> Self {
        Self {
            from: email.sender.clone(),
            to: email.recipients.clone(),
            subject: DIGEST_SUBJECT.to_string(),
            body,
        }
    }
}

/// Delivers mail messages
pub trait MailTransport: Send + Sync {
    fn send(&self, message: &MailMessage) -> Result<(), NotifyError>;
}

/// Transport that writes the outgoing message to the log instead of sending it
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransport;

impl MailTransport for LogTransport {
    fn send(&self, message: &MailMessage) -> Result<(), NotifyError> {
        if message.to.is_empty() {
            return Err(NotifyError::NoRecipients);
        }

        tracing::info!(
            from = %message.from,
            to = %message.to.join(", "),
            subject = %message.subject,
            "Outgoing notification mail:\n{}",
            message.body
        );
        Ok(())
    }
}

/// Picks the transport for the email settings
///
/// Enabled email goes through [`SmtpMailer`]; otherwise messages are only
/// written to the log.
pub fn transport_for(email: &EmailConfig) -> Result<Box<dyn MailTransport>, NotifyError> {
    if email.enabled {
        Ok(Box::new(SmtpMailer::from_config(email)?))
    } else {
        Ok(Box::new(LogTransport))
    }
}

/// Builds the digest text for the changed results of a run
///
/// Returns `None` when nothing changed.
pub fn format_digest(results: &[CheckResult]) -> Option<String> {
    let changed: Vec<&CheckResult> = results.iter().filter(|r| r.status.is_change()).collect();
    if changed.is_empty() {
        return None;
    }

    let mut digest = format!("{}\n\n", DIGEST_HEADER);
    for result in changed {
        digest.push_str(&format!(
            "- {}\n  URL: {}\n  Checked at: {}\n\n",
            result.name,
            result.url,
            result.timestamp()
        ));
    }
    Some(digest)
}

/// Sends change digests according to the email settings
pub struct Notifier {
    email: EmailConfig,
    transport: Box<dyn MailTransport>,
}

impl Notifier {
    pub fn new(email: EmailConfig, transport: Box<dyn MailTransport>) -> Self {
        Self { email, transport }
    }

    /// Builds a notifier with the transport chosen by [`transport_for`]
    ///
    /// A relay that cannot be configured is logged and replaced by
    /// [`LogTransport`], so the digest is still recorded.
    pub fn from_config(email: &EmailConfig) -> Self {
        let transport = transport_for(email).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Invalid SMTP settings, notifications go to the log only");
            Box::new(LogTransport)
        });
        Self::new(email.clone(), transport)
    }

    /// Logs and, if enabled, mails the digest for a run
    ///
    /// Returns true if a message was handed to the transport successfully.
    pub fn notify(&self, results: &[CheckResult]) -> bool {
        let Some(digest) = format_digest(results) else {
            tracing::debug!("No changes detected, nothing to notify");
            return false;
        };

        tracing::info!("{}", digest);

        if !self.email.enabled {
            return false;
        }

        let message = MailMessage::digest(&self.email, digest);
        match self.transport.send(&message) {
            Ok(()) => {
                tracing::info!(recipients = message.to.len(), "Notification mail sent");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to send notification mail");
                false
            }
        }
    }
}
