//! Mail dispatch - workbook attachments over blocking SMTP

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use miette::Diagnostic;
use thiserror::Error;

use crate::core::Config;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Mail-transport errors, distinct from workbook serialization errors
#[derive(Debug, Error, Diagnostic)]
pub enum MailError {
    #[error("SMTP transport is not configured (set smtp.host and smtp.from in .pqt/config.yaml)")]
    #[diagnostic(
        code(pqt::mail::not_configured),
        help("add an smtp section to .pqt/config.yaml and export PQT_SMTP_PASSWORD")
    )]
    NotConfigured,

    #[error("invalid mail address '{address}'")]
    #[diagnostic(code(pqt::mail::address))]
    Address { address: String },

    #[error("failed to compose message: {message}")]
    #[diagnostic(code(pqt::mail::compose))]
    Compose { message: String },

    #[error("mail transport failed: {message}")]
    #[diagnostic(code(pqt::mail::transport))]
    Transport { message: String },
}

/// The mail collaborator: sends a subject/body plus one attachment
pub struct Mailer {
    host: String,
    port: u16,
    from: String,
    username: Option<String>,
    password: Option<String>,
}

impl Mailer {
    /// Build a mailer from the loaded configuration
    ///
    /// Requires `smtp.host` and `smtp.from`; credentials are attached when
    /// both `smtp.username` and `PQT_SMTP_PASSWORD` are present.
    pub fn from_config(config: &Config) -> Result<Self, MailError> {
        let (Some(host), Some(from)) = (config.smtp.host.clone(), config.smtp.from.clone())
        else {
            return Err(MailError::NotConfigured);
        };

        Ok(Self {
            host,
            port: config.smtp.port.unwrap_or(587),
            from,
            username: config.smtp.username.clone(),
            password: config.smtp_password(),
        })
    }

    /// Send one message with a workbook attachment
    pub fn send(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
        attachment_name: &str,
        attachment: Vec<u8>,
    ) -> Result<(), MailError> {
        let from: Mailbox = self.from.parse().map_err(|_| MailError::Address {
            address: self.from.clone(),
        })?;
        let to: Mailbox = recipient.parse().map_err(|_| MailError::Address {
            address: recipient.to_string(),
        })?;

        let attachment_type =
            ContentType::parse(XLSX_MIME).map_err(|e| MailError::Compose {
                message: e.to_string(),
            })?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        Attachment::new(attachment_name.to_string())
                            .body(attachment, attachment_type),
                    ),
            )
            .map_err(|e| MailError::Compose {
                message: e.to_string(),
            })?;

        let mut builder =
            SmtpTransport::starttls_relay(&self.host).map_err(|e| MailError::Transport {
                message: e.to_string(),
            })?;
        builder = builder.port(self.port);
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        builder
            .build()
            .send(&message)
            .map_err(|e| MailError::Transport {
                message: e.to_string(),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SmtpConfig;

    #[test]
    fn test_from_config_requires_host_and_from() {
        let config = Config::default();
        assert!(matches!(
            Mailer::from_config(&config),
            Err(MailError::NotConfigured)
        ));
    }

    #[test]
    fn test_from_config_defaults_port() {
        let config = Config {
            smtp: SmtpConfig {
                host: Some("smtp.example.com".to_string()),
                from: Some("PQT Reports <reports@example.com>".to_string()),
                ..SmtpConfig::default()
            },
            ..Config::default()
        };
        let mailer = Mailer::from_config(&config).unwrap();
        assert_eq!(mailer.port, 587);
    }

    #[test]
    fn test_send_rejects_bad_recipient() {
        let config = Config {
            smtp: SmtpConfig {
                host: Some("smtp.example.com".to_string()),
                from: Some("reports@example.com".to_string()),
                ..SmtpConfig::default()
            },
            ..Config::default()
        };
        let mailer = Mailer::from_config(&config).unwrap();
        let err = mailer
            .send("not-an-address", "s", "b", "a.xlsx", Vec::new())
            .unwrap_err();
        assert!(matches!(err, MailError::Address { .. }));
    }
}
