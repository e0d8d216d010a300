//! SMTP delivery of notices
//!
//! A fresh authenticated STARTTLS connection is opened for every notice and
//! dropped once the message is accepted.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use super::{Notice, Notifier};
use crate::config::EmailSettings;
use crate::constants::email;
use crate::errors::NotifyResult;

/// Sends notices through the configured SMTP relay
#[derive(Debug, Clone)]
pub struct SmtpNotifier {
    settings: EmailSettings,
}

impl SmtpNotifier {
    pub fn new(settings: EmailSettings) -> Self {
        Self { settings }
    }

    /// Compose the email for `notice`
    pub fn build_message(&self, notice: &Notice) -> NotifyResult<Message> {
        let from: Mailbox = self.settings.sender.parse()?;
        let to: Mailbox = self.settings.receiver.parse()?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(notice.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(notice.body())?;
        Ok(message)
    }

    fn transport(&self) -> NotifyResult<AsyncSmtpTransport<Tokio1Executor>> {
        let credentials =
            Credentials::new(self.settings.sender.clone(), self.settings.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.server)?
            .port(email::SMTP_PORT)
            .credentials(credentials)
            .build();
        Ok(transport)
    }
}

impl Notifier for SmtpNotifier {
    async fn deliver(&self, notice: &Notice) -> NotifyResult<()> {
        let message = self.build_message(notice)?;
        let transport = self.transport()?;
        debug!(
            "Sending notification via {}:{}",
            self.settings.server,
            email::SMTP_PORT
        );
        transport.send(message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> EmailSettings {
        EmailSettings {
            sender: "extracts@example.com".to_string(),
            receiver: "ops@example.com".to_string(),
            server: "smtp.example.com".to_string(),
            password: "pw".to_string(),
        }
    }

    #[test]
    fn test_build_success_message() {
        let notifier = SmtpNotifier::new(settings());
        let message = notifier.build_message(&Notice::Success).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: Waiting Period Daily Extract"));
        assert!(raw.contains("From: extracts@example.com"));
        assert!(raw.contains("To: ops@example.com"));
        assert!(raw.contains("successfully extracted"));
    }

    #[test]
    fn test_build_failure_message_carries_error() {
        let notifier = SmtpNotifier::new(settings());
        let message = notifier
            .build_message(&Notice::failure("SFTP Connection failed"))
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Error Message: SFTP Connection failed"));
    }

    #[test]
    fn test_invalid_sender_is_an_error() {
        let mut bad = settings();
        bad.sender = "nobody".to_string();
        let notifier = SmtpNotifier::new(bad);

        assert!(notifier.build_message(&Notice::Success).is_err());
    }

    #[test]
    fn test_transport_builds_without_connecting() {
        let notifier = SmtpNotifier::new(settings());
        assert!(notifier.transport().is_ok());
    }
}
