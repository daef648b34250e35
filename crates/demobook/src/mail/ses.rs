use std::fmt::Debug;

use async_trait::async_trait;
use aws_sdk_sesv2::error::SdkError;
use aws_sdk_sesv2::operation::send_email::SendEmailError;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use aws_sdk_sesv2::Client;

use demobook_core::mail::{EmailMessage, MailError, Mailer};

/// Mailer backed by Amazon SES v2.
pub struct SesMailer {
    client: Client,
}

impl SesMailer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a mailer using the AWS SDK default credential chain.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config))
    }
}

fn utf8_content(data: &str) -> Result<Content, MailError> {
    Content::builder()
        .data(data)
        .charset("UTF-8")
        .build()
        .map_err(|e| MailError::InvalidMessage(e.to_string()))
}

fn map_send_email_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<SendEmailError, R>,
) -> MailError {
    match err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            return MailError::Unavailable("SES unreachable".to_string())
        }
        SdkError::ConstructionFailure(_) => {
            return MailError::InvalidMessage("Failed to build SES request".to_string())
        }
        _ => {}
    }
    match err.into_service_error() {
        SendEmailError::MessageRejected(e) => MailError::Rejected(format!("{e:?}")),
        SendEmailError::MailFromDomainNotVerifiedException(_) => {
            MailError::Rejected("Sender domain is not verified".to_string())
        }
        SendEmailError::TooManyRequestsException(_) => {
            MailError::Unavailable("Too many requests, please retry".to_string())
        }
        SendEmailError::SendingPausedException(_) => {
            MailError::Unavailable("Sending is paused for this account".to_string())
        }
        err => MailError::Rejected(format!("SendEmail failed: {:?}", err)),
    }
}

#[async_trait]
impl Mailer for SesMailer {
    async fn send(&self, message: &EmailMessage) -> Result<Option<String>, MailError> {
        if message.to.is_empty() {
            return Err(MailError::InvalidMessage("no recipients".to_string()));
        }

        let content = EmailContent::builder()
            .simple(
                Message::builder()
                    .subject(utf8_content(&message.subject)?)
                    .body(Body::builder().html(utf8_content(&message.html)?).build())
                    .build(),
            )
            .build();

        let output = self
            .client
            .send_email()
            .from_email_address(&message.from)
            .destination(
                Destination::builder()
                    .set_to_addresses(Some(message.to.clone()))
                    .build(),
            )
            .content(content)
            .send()
            .await
            .map_err(map_send_email_error)?;

        Ok(output.message_id)
    }
}
