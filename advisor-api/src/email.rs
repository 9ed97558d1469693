use advisor_core::ReportTransport;
use anyhow::Context;
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::config::SmtpConfig;

/// Delivers reports over authenticated SMTP (STARTTLS)
pub struct SmtpReportTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpReportTransport {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        let sender: Mailbox = config
            .sender
            .parse()
            .context("Invalid SMTP sender address")?;
        Ok(Self { mailer, sender })
    }
}

#[async_trait]
impl ReportTransport for SmtpReportTransport {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(recipient.parse().context("Invalid recipient address")?)
            .subject(subject)
            .body(body.to_string())?;

        self.mailer
            .send(message)
            .await
            .context("SMTP delivery failed")?;
        info!(recipient = %recipient, "Report email delivered");
        Ok(())
    }
}

/// Stands in when no `[smtp]` block is configured; every send fails with
/// guidance so `report_sent` stays false.
pub struct DisabledTransport;

#[async_trait]
impl ReportTransport for DisabledTransport {
    async fn send(&self, _recipient: &str, _subject: &str, _body: &str) -> anyhow::Result<()> {
        anyhow::bail!("Email delivery is not configured (missing [smtp] settings)")
    }
}
