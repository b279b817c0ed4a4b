//! SMTP mailer adapter.

use crate::alert::ports::{Mailer, MailerError, MailerResult, OutboundEmail};
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// SMTP username and password pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    /// Login username.
    pub username: String,
    /// Login password.
    pub password: String,
}

/// Mailer delivering through an SMTP relay.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    recipients: Vec<Mailbox>,
}

impl SmtpMailer {
    /// Creates a mailer for the given relay and addresses.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError::InvalidMessage`] when an address does not
    /// parse or no recipient is given, and [`MailerError`] when the relay
    /// host is unusable.
    pub fn new(
        host: &str,
        port: u16,
        credentials: Option<SmtpCredentials>,
        from: &str,
        recipients: &[String],
    ) -> MailerResult<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(MailerError::transport)?
            .port(port);
        if let Some(auth) = credentials {
            builder = builder.credentials(Credentials::new(auth.username, auth.password));
        }

        let from_mailbox = from
            .parse::<Mailbox>()
            .map_err(|err| MailerError::InvalidMessage(format!("sender '{from}': {err}")))?;
        let parsed: Result<Vec<Mailbox>, MailerError> = recipients
            .iter()
            .map(|address| {
                address.parse::<Mailbox>().map_err(|err| {
                    MailerError::InvalidMessage(format!("recipient '{address}': {err}"))
                })
            })
            .collect();
        let recipient_boxes = parsed?;
        if recipient_boxes.is_empty() {
            return Err(MailerError::InvalidMessage(
                "at least one recipient is required".to_owned(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from: from_mailbox,
            recipients: recipient_boxes,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutboundEmail) -> MailerResult<()> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(email.subject.clone())
            .header(ContentType::TEXT_PLAIN);
        for recipient in &self.recipients {
            builder = builder.to(recipient.clone());
        }
        let message = builder
            .body(email.body.clone())
            .map_err(|err| MailerError::InvalidMessage(err.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(MailerError::transport)?;
        Ok(())
    }
}
