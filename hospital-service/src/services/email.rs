//! Outbound email behind a provider trait so tests can swap the transport.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::services::ServiceError;

#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Deliver a password reset email carrying the one-time token. The
    /// token appears only in the outbound message, never in logs.
    async fn send_password_reset_email(
        &self,
        to: &str,
        token: &str,
        base_url: &str,
    ) -> Result<(), ServiceError>;
}

pub struct SmtpEmailService {
    host: String,
    port: u16,
    username: String,
    password: String,
    from_address: String,
}

impl SmtpEmailService {
    pub fn new(
        host: String,
        port: u16,
        username: String,
        password: String,
        from_address: String,
    ) -> Self {
        Self {
            host,
            port,
            username,
            password,
            from_address,
        }
    }

    fn build_transport(&self) -> Result<SmtpTransport, ServiceError> {
        let creds = Credentials::new(self.username.clone(), self.password.clone());
        SmtpTransport::relay(&self.host)
            .map_err(|e| ServiceError::EmailDelivery(e.to_string()))
            .map(|builder| builder.port(self.port).credentials(creds).build())
    }
}

#[async_trait]
impl EmailProvider for SmtpEmailService {
    async fn send_password_reset_email(
        &self,
        to: &str,
        token: &str,
        base_url: &str,
    ) -> Result<(), ServiceError> {
        let reset_url = format!("{}/reset-password/{}", base_url, token);
        let body = format!(
            "You requested a password reset.\n\n\
             Open the link below to choose a new password. The link is valid \
             for 1 hour and can be used once:\n\n{}\n\n\
             If you did not request this, you can ignore this email.",
            reset_url
        );

        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e| ServiceError::EmailDelivery(format!("Invalid from address: {}", e)))?,
            )
            .to(to
                .parse()
                .map_err(|e| ServiceError::EmailDelivery(format!("Invalid recipient: {}", e)))?)
            .subject("Password reset request")
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| ServiceError::EmailDelivery(e.to_string()))?;

        let transport = self.build_transport()?;

        // lettre's sync SMTP transport blocks on the socket.
        let result = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| ServiceError::EmailDelivery(e.to_string()))?;

        result
            .map(|_| ())
            .map_err(|e| ServiceError::EmailDelivery(e.to_string()))
    }
}

/// No-op provider for local development without an SMTP relay. Logs the
/// recipient, never the token.
pub struct MockEmailService;

#[async_trait]
impl EmailProvider for MockEmailService {
    async fn send_password_reset_email(
        &self,
        to: &str,
        _token: &str,
        _base_url: &str,
    ) -> Result<(), ServiceError> {
        tracing::info!(recipient = %to, "Mock email provider: password reset email suppressed");
        Ok(())
    }
}
