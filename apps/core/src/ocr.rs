//! OCR forwarding.
//!
//! Images arrive as `data:` URLs (or bare base64) from the whiteboard client and
//! are relayed to the Mathpix `v3/text` API. The provider's JSON is returned as is.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::actors::traits::OcrProvider;
use crate::error::AppError;

pub const DEFAULT_MATHPIX_ENDPOINT: &str = "https://api.mathpix.com/v3/text";

/// Decode the image part of a `data:image/...;base64,` URL.
///
/// Anything after the first comma is treated as the payload; input without a
/// comma is taken to be bare base64.
pub fn decode_image_payload(image: &str) -> Result<Vec<u8>, AppError> {
    let encoded = match image.split_once(',') {
        Some((_, data)) => data,
        None => image,
    };
    let encoded = encoded.trim();

    if encoded.is_empty() {
        return Err(AppError::Validation("image payload is empty".to_string()));
    }

    Ok(STANDARD.decode(encoded)?)
}

#[derive(Serialize)]
struct MathpixPayload<'a> {
    src: String,
    formats: &'a [&'a str],
    ocr: &'a [&'a str],
}

/// Mathpix API client
pub struct MathpixClient {
    client: Client,
    endpoint: String,
    app_id: Option<String>,
    app_key: Option<String>,
}

impl MathpixClient {
    pub fn new(endpoint: String, app_id: Option<String>, app_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            app_id,
            app_key,
        }
    }
}

#[async_trait]
impl OcrProvider for MathpixClient {
    #[instrument(skip(self, image), fields(bytes = image.len()))]
    async fn recognize(&self, image: Vec<u8>) -> Result<serde_json::Value, AppError> {
        let (Some(app_id), Some(app_key)) = (&self.app_id, &self.app_key) else {
            return Err(AppError::Config(
                "MATHPIX_APP_ID and MATHPIX_APP_KEY must be set for OCR".to_string(),
            ));
        };

        let payload = MathpixPayload {
            src: format!("data:image/png;base64,{}", STANDARD.encode(&image)),
            formats: &["text", "data"],
            ocr: &["math", "text"],
        };

        info!("Forwarding image to OCR provider");
        let res = self
            .client
            .post(&self.endpoint)
            .header("app_id", app_id)
            .header("app_key", app_key)
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!("OCR provider returned {}: {}", status, body);
            return Err(AppError::Upstream(format!(
                "OCR request failed with status {}: {}",
                status, body
            )));
        }

        Ok(res.json().await?)
    }

    fn is_configured(&self) -> bool {
        self.app_id.is_some() && self.app_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_decode_data_url() {
        let bytes = decode_image_payload("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");

        let bare = decode_image_payload("aGVsbG8=").unwrap();
        assert_eq!(bare, b"hello");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_image_payload("data:image/png;base64,"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            decode_image_payload("data:image/png;base64,@@not base64@@"),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_recognize_forwards_credentials_and_payload() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("app_id", "tutor"))
            .and(header("app_key", "secret"))
            .and(body_partial_json(json!({
                "src": "data:image/png;base64,aGVsbG8=",
                "formats": ["text", "data"],
                "ocr": ["math", "text"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "x^2"})))
            .mount(&mock_server)
            .await;

        let client = MathpixClient::new(
            format!("{}/v3/text", mock_server.uri()),
            Some("tutor".to_string()),
            Some("secret".to_string()),
        );

        let result = client.recognize(b"hello".to_vec()).await.unwrap();
        assert_eq!(result["text"], "x^2");
    }

    #[tokio::test]
    async fn test_recognize_without_credentials() {
        let client = MathpixClient::new(DEFAULT_MATHPIX_ENDPOINT.to_string(), None, None);

        assert!(!client.is_configured());
        assert!(matches!(
            client.recognize(vec![1, 2, 3]).await,
            Err(AppError::Config(_))
        ));
    }
}
