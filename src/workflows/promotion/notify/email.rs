use std::fmt::Debug;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tokio::runtime::Runtime;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum EmailDeliveryError {
    #[error("invalid email address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("unable to build email message: {0}")]
    Message(String),
    #[error("smtp delivery failed: {0}")]
    Transport(String),
    #[error("smtp runtime unavailable: {0}")]
    Runtime(String),
}

pub trait EmailGateway: Debug {
    fn send_html(&self, to: &str, subject: &str, html_body: &str)
        -> Result<(), EmailDeliveryError>;
}

/// Settings for [`SmtpMailer`]. The password is the already-resolved secret.
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub from_address: String,
    pub password: String,
}

/// STARTTLS SMTP client that logs in as the sender address. Owns a
/// single-threaded runtime so callers stay synchronous.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    runtime: Runtime,
}

impl SmtpMailer {
    pub fn connect(settings: SmtpSettings) -> Result<Self, EmailDeliveryError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| EmailDeliveryError::Runtime(err.to_string()))?;
        let from = parse_mailbox(&settings.from_address)?;

        let transport = {
            let _guard = runtime.enter();
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                .map_err(|err| EmailDeliveryError::Transport(err.to_string()))?
                .port(settings.port)
                .credentials(Credentials::new(
                    settings.from_address.clone(),
                    settings.password,
                ))
                .build()
        };

        Ok(Self {
            transport,
            from,
            runtime,
        })
    }
}

impl Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("from", &self.from.to_string())
            .finish_non_exhaustive()
    }
}

impl EmailGateway for SmtpMailer {
    fn send_html(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), EmailDeliveryError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(to)?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|err| EmailDeliveryError::Message(err.to_string()))?;

        let response = self
            .runtime
            .block_on(self.transport.send(message))
            .map_err(|err| EmailDeliveryError::Transport(err.to_string()))?;
        debug!(code = %response.code(), "smtp server accepted message");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, EmailDeliveryError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|err| EmailDeliveryError::InvalidAddress {
            address: address.to_string(),
            reason: err.to_string(),
        })
}
