use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use squeezit_core::{CompressResponse, Format, UploadedImage};

/// Path of the transcode endpoint
pub const COMPRESS_PATH: &str = "/api/compress";

/// Anything that can turn a batch of uploads into a compress response.
#[async_trait]
pub trait CompressTransport: Send + Sync {
    async fn compress(&self, images: &[UploadedImage], target: Format)
        -> Result<CompressResponse>;
}

/// HTTP client for the Squeezit API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create client from environment: SQUEEZIT_API_URL (default http://localhost:3000).
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("SQUEEZIT_API_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        let url = self.build_url(path);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        let body: T = response
            .json()
            .await
            .context("Failed to parse response as JSON")?;

        Ok(body)
    }
}

/// Build the compress form: one `images` part per file, then `format`.
fn compress_form(images: &[UploadedImage], target: Format) -> Result<Form> {
    let mut form = Form::new();
    for (i, image) in images.iter().enumerate() {
        let file_name = image
            .file_name
            .clone()
            .unwrap_or_else(|| format!("image-{}", i + 1));
        let mut part = Part::bytes(image.data.clone()).file_name(file_name);
        if let Some(content_type) = &image.content_type {
            part = part
                .mime_str(content_type)
                .with_context(|| format!("Invalid content type: {}", content_type))?;
        }
        form = form.part("images", part);
    }
    Ok(form.text("format", target.as_str()))
}

#[async_trait]
impl CompressTransport for ApiClient {
    async fn compress(
        &self,
        images: &[UploadedImage],
        target: Format,
    ) -> Result<CompressResponse> {
        let form = compress_form(images, target)?;
        self.post_multipart(COMPRESS_PATH, form).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:3000/".to_string()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(
            client.build_url(COMPRESS_PATH),
            "http://localhost:3000/api/compress"
        );
    }

    #[test]
    fn test_compress_form_rejects_bad_content_type() {
        let image = UploadedImage {
            file_name: Some("a.png".to_string()),
            content_type: Some("not a mime\n".to_string()),
            data: vec![1, 2, 3],
        };
        assert!(compress_form(&[image], Format::Png).is_err());
    }

    #[test]
    fn test_compress_form_builds_for_valid_parts() {
        let images = vec![
            UploadedImage {
                file_name: Some("a.png".to_string()),
                content_type: Some("image/png".to_string()),
                data: vec![1],
            },
            UploadedImage::new(vec![2]),
        ];
        let form = compress_form(&images, Format::Webp).unwrap();
        assert!(!form.boundary().is_empty());
    }

    fn png(name: &str) -> UploadedImage {
        UploadedImage {
            file_name: Some(name.to_string()),
            content_type: Some("image/png".to_string()),
            data: b"png-bytes".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_compress_posts_images_and_format() {
        let mut server = mockito::Server::new_async().await;
        let body = serde_json::json!({
            "files": [
                { "url": "data:image/webp;base64,UklGRg==", "size": 1, "originalSize": 2 },
                { "error": "Failed to decode image: bad", "originalSize": 0 }
            ]
        });
        let mock = server
            .mock("POST", COMPRESS_PATH)
            .match_header(
                "content-type",
                mockito::Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::Regex(r#"name="images"; filename="a.png""#.to_string()),
                mockito::Matcher::Regex(r#"name="images"; filename="b.png""#.to_string()),
                mockito::Matcher::Regex("name=\"format\"\r\n\r\nwebp".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = ApiClient::new(server.url()).unwrap();
        let response = client
            .compress(&[png("a.png"), png("b.png")], Format::Webp)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.files.len(), 2);
        assert!(response.files[0].is_converted());
        assert!(!response.files[1].is_converted());
    }

    #[tokio::test]
    async fn test_compress_surfaces_unsupported_format() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", COMPRESS_PATH)
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"Unsupported format"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(server.url()).unwrap();
        let err = client
            .compress(&[png("a.png")], Format::Png)
            .await
            .unwrap_err()
            .to_string();

        assert!(err.contains("400"));
        assert!(err.contains("Unsupported format"));
    }

    #[tokio::test]
    async fn test_compress_server_error_is_err() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", COMPRESS_PATH)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = ApiClient::new(server.url()).unwrap();
        assert!(client.compress(&[png("a.png")], Format::Png).await.is_err());
    }

    #[tokio::test]
    async fn test_compress_invalid_json_is_err() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", COMPRESS_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = ApiClient::new(server.url()).unwrap();
        let err = client
            .compress(&[png("a.png")], Format::Png)
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse response as JSON"));
    }
}
