use reqwest::{Client, Url};
use thiserror::Error;
use tracing::{debug, info};

use super::TELEGRAM_API;
use crate::config::Config;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("telegram rejected message: {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Sends report text to a Telegram chat. Delivery failures are
/// returned to the caller and never retried.
pub struct Notifier {
    client: Client,
    base_url: Url,
    token: String,
    chat_id: String,
}

impl Notifier {
    /// `None` when the bot credentials are not configured; the caller
    /// runs without delivery in that case.
    pub fn from_config(config: &Config) -> Option<Notifier> {
        let (Some(token), Some(chat_id)) = (&config.bot_token, &config.chat_id) else {
            info!("BOT_TOKEN/CHAT_ID not set, delivery disabled");
            return None;
        };

        Some(Self::new(
            TELEGRAM_API.parse().unwrap(),
            token.clone(),
            chat_id.clone(),
        ))
    }

    fn new(base_url: Url, token: String, chat_id: String) -> Notifier {
        Notifier {
            client: Client::new(),
            base_url,
            token,
            chat_id,
        }
    }

    pub async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let url = self
            .base_url
            .join(&format!("/bot{}/sendMessage", self.token))
            .expect("token forms a valid path");

        let response = self
            .client
            .post(url)
            .form(&[
                ("chat_id", self.chat_id.as_str()),
                ("text", text),
                ("disable_web_page_preview", "true"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected { status, body });
        }

        debug!("telegram accepted message for chat {}", self.chat_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// One-shot HTTP server answering every request with `status_line`.
    async fn serve_once(status_line: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf).await;
            let response = format!("HTTP/1.1 {status_line}\r\ncontent-length: 2\r\n\r\nok");
            let _ = stream.write_all(response.as_bytes()).await;
        });

        format!("http://{addr}").parse().unwrap()
    }

    #[tokio::test]
    async fn test_send_ok() {
        let base = serve_once("200 OK").await;
        let notifier = Notifier::new(base, "123:abc".to_string(), "42".to_string());

        assert!(notifier.send("hello").await.is_ok());
    }

    #[tokio::test]
    async fn test_rejected_is_reported_not_raised() {
        let base = serve_once("403 Forbidden").await;
        let notifier = Notifier::new(base, "123:abc".to_string(), "42".to_string());

        let err = notifier.send("hello").await.unwrap_err();
        match err {
            NotifyError::Rejected { status, .. } => assert_eq!(status.as_u16(), 403),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_credentials_disable_delivery() {
        let config = Config {
            symbol: "NIFTY".to_string(),
            poll_secs: 180,
            strike_step: 50,
            otm_count: 3,
            send_every_run: true,
            bot_token: None,
            chat_id: Some("42".to_string()),
        };

        assert!(Notifier::from_config(&config).is_none());
    }
}
